// Mutaciones de filas por orden de trabajo o por correría.

use std::collections::HashSet;

use crate::models::{Hoja, Valor, COL_DESCRIPTION, COL_ID_ORDEN};

/// Cambio sobre una columna. `valor == None` conserva el valor actual (o lo
/// deja vacío si la fila no tenía la columna).
#[derive(Debug, Clone)]
pub struct Cambio {
    pub columna: &'static str,
    pub valor: Option<Valor>,
}

impl Cambio {
    pub fn new(columna: &'static str, valor: Option<Valor>) -> Self {
        Cambio { columna, valor }
    }
}

/// Resultado de una actualización masiva por ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultadoIds {
    pub actualizadas: usize,
    pub no_encontrados: Vec<String>,
}

fn aplicar(fila: &mut crate::models::Fila, cambios: &[Cambio]) {
    for cambio in cambios {
        match &cambio.valor {
            Some(v) => fila.set(cambio.columna, v.clone()),
            None => {
                if !fila.contiene(cambio.columna) {
                    fila.set(cambio.columna, Valor::Texto(String::new()));
                }
            }
        }
    }
}

/// Aplica `cambios` a todas las filas cuyo `Id. Orden Trabajo` coincide con
/// `id` (comparando como texto). Devuelve cuántas filas cambiaron.
pub fn actualizar_por_id(hoja: &mut Hoja, id: &str, cambios: &[Cambio]) -> usize {
    let id = id.trim();
    let mut n = 0usize;
    for fila in hoja.filas.iter_mut() {
        if fila.texto(COL_ID_ORDEN).trim() == id {
            aplicar(fila, cambios);
            n += 1;
        }
    }
    if n > 0 {
        for c in cambios {
            hoja.asegurar_encabezado(c.columna);
        }
    }
    n
}

/// Versión masiva de [`actualizar_por_id`] (selección con lazo en el mapa).
/// Los ids que no aparecen se informan en `no_encontrados`, en el orden
/// recibido y sin repetir.
pub fn actualizar_por_ids(hoja: &mut Hoja, ids: &[String], cambios: &[Cambio]) -> ResultadoIds {
    let buscados: HashSet<&str> = ids.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    let mut encontrados: HashSet<String> = HashSet::new();
    let mut actualizadas = 0usize;
    for fila in hoja.filas.iter_mut() {
        let id = fila.texto(COL_ID_ORDEN).trim().to_string();
        if buscados.contains(id.as_str()) {
            aplicar(fila, cambios);
            encontrados.insert(id);
            actualizadas += 1;
        }
    }
    if actualizadas > 0 {
        for c in cambios {
            hoja.asegurar_encabezado(c.columna);
        }
    }
    let mut no_encontrados: Vec<String> = Vec::new();
    for id in ids.iter().map(|s| s.trim()) {
        if !id.is_empty() && !encontrados.contains(id) && !no_encontrados.iter().any(|x| x == id) {
            no_encontrados.push(id.to_string());
        }
    }
    ResultadoIds { actualizadas, no_encontrados }
}

/// Asigna `valor` en `columna` a todas las filas de la correría `description`.
/// La comparación usa el nombre recortado, igual que `resumen_correrias`.
pub fn actualizar_por_description(hoja: &mut Hoja, description: &str, columna: &'static str, valor: Option<Valor>) -> usize {
    let description = description.trim();
    let cambio = [Cambio::new(columna, valor)];
    let mut n = 0usize;
    for fila in hoja.filas.iter_mut() {
        if fila.texto(COL_DESCRIPTION).trim() == description {
            aplicar(fila, &cambio);
            n += 1;
        }
    }
    hoja.asegurar_encabezado(columna);
    n
}
