// Filtros y transformaciones puras sobre las filas de una hoja.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::algorithm::fechas::{es_columna_fecha, normalizar_fecha};
use crate::models::{Fila, Hoja, Valor};

pub const COLOR_SIN_ASIGNAR: &str = "#000000";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConteoValor {
    pub value: String,
    pub count: usize,
}

/// Cuenta las apariciones de cada valor de `columna`. Las columnas de fecha se
/// normalizan a `dd/mm/yyyy`; los vacíos se ignoran. Orden: más frecuentes
/// primero y, a igual conteo, alfabético sin distinguir mayúsculas.
pub fn resumen_columna(hoja: &Hoja, columna: &str) -> Vec<ConteoValor> {
    let es_fecha = es_columna_fecha(columna);
    let mut conteos: HashMap<String, usize> = HashMap::new();
    for fila in &hoja.filas {
        let valor = match fila.get(columna) {
            Some(v) => v,
            None => continue,
        };
        let texto = if es_fecha { normalizar_fecha(Some(valor)) } else { valor.como_texto() };
        let clave = texto.trim();
        if clave.is_empty() {
            continue;
        }
        *conteos.entry(clave.to_string()).or_insert(0) += 1;
    }
    let mut resumen: Vec<ConteoValor> = conteos.into_iter().map(|(value, count)| ConteoValor { value, count }).collect();
    resumen.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.value.to_lowercase().cmp(&b.value.to_lowercase()))
            .then_with(|| a.value.cmp(&b.value))
    });
    resumen
}

/// Filas cuyo valor en `columna` (recortado) está en `valores`.
pub fn filtrar_por_valores(hoja: &Hoja, columna: &str, valores: &[String]) -> Hoja {
    let set: HashSet<&str> = valores.iter().map(|v| v.trim()).collect();
    let filas = hoja
        .filas
        .iter()
        .filter(|f| set.contains(f.texto(columna).trim()))
        .cloned()
        .collect();
    Hoja::new(hoja.nombre.clone(), hoja.encabezados.clone(), filas)
}

/// Deja sólo las columnas pedidas, en ese orden. Las columnas inexistentes se
/// conservan como encabezados vacíos.
pub fn proyectar(hoja: &Hoja, columnas: &[String]) -> Hoja {
    let filas = hoja
        .filas
        .iter()
        .map(|f| {
            columnas
                .iter()
                .filter_map(|c| f.get(c).map(|v| (c.clone(), v.clone())))
                .collect::<Fila>()
        })
        .collect();
    Hoja {
        nombre: hoja.nombre.clone(),
        encabezados: columnas.to_vec(),
        filas,
    }
}

/// Agrega `Color <columna>` a cada fila según el mapa valor -> color.
/// Valores sin color asignado (o vacíos) reciben `#000000`.
pub fn colorizar(hoja: &Hoja, columna: &str, colores: &HashMap<String, String>) -> Hoja {
    let col_color = format!("Color {}", columna);
    let mut salida = hoja.clone();
    for fila in salida.filas.iter_mut() {
        let color = fila
            .get(columna)
            .and_then(|v| colores.get(v.como_texto().trim()))
            .cloned()
            .unwrap_or_else(|| COLOR_SIN_ASIGNAR.to_string());
        fila.set(col_color.clone(), color);
    }
    salida.asegurar_encabezado(&col_color);
    salida
}

/// Asegura que las columnas existan en el encabezado y en cada fila (vacías).
pub fn asegurar_columnas(hoja: &mut Hoja, columnas: &[&str]) {
    for c in columnas {
        hoja.asegurar_encabezado(c);
    }
    for fila in hoja.filas.iter_mut() {
        for c in columnas {
            if !fila.contiene(c) {
                fila.set(*c, Valor::Texto(String::new()));
            }
        }
    }
}
