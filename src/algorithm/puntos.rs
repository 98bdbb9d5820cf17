// Conversión de filas de proyecto a marcadores del mapa.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::algorithm::fechas::normalizar_fecha;
use crate::algorithm::gps::{parse_gps, Coordenada};
use crate::models::{Fila, Hoja, Valor, COL_DESCRIPTION, COL_ESTADO_OTS, COL_GPS};

pub const COLOR_DEFECTO: &str = "#28a745";

/// Campos de la fila que viajan en `props` de cada punto.
pub const CAMPOS_PUNTO: [&str; 11] = [
    "Cliente",
    "Ruta",
    "Dirección",
    "Nombre",
    "Ciclo",
    "Tarea",
    "Id. Orden Trabajo",
    "Revisión",
    "Nombre Localidad",
    "Gps",
    "Fecha Solicitud",
];

#[derive(Debug, Clone, Serialize)]
pub struct Punto {
    pub lat: f64,
    pub lng: f64,
    pub color: String,
    pub props: Map<String, Value>,
    pub description: String,
    #[serde(rename = "estadoOts")]
    pub estado_ots: String,
}

/// Columna que define el color del marcador: la primera cuyo nombre empieza
/// por "color ", o en su defecto una que contenga "color tarea".
pub fn columna_color(encabezados: &[String]) -> Option<&str> {
    encabezados
        .iter()
        .find(|c| c.to_lowercase().starts_with("color "))
        .or_else(|| encabezados.iter().find(|c| c.to_lowercase().contains("color tarea")))
        .map(String::as_str)
}

fn color_de(fila: &Fila, columna: Option<&str>) -> String {
    match columna.and_then(|c| fila.get(c)) {
        Some(Valor::Texto(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => COLOR_DEFECTO.to_string(),
    }
}

pub fn fila_a_punto(fila: &Fila, columna_color: Option<&str>, defecto: Coordenada) -> Punto {
    let coord = parse_gps(fila.get(COL_GPS), defecto);
    let mut props = Map::new();
    for campo in CAMPOS_PUNTO {
        let valor = if campo == COL_GPS {
            coord.texto()
        } else if campo.to_lowercase().contains("fecha") {
            normalizar_fecha(fila.get(campo))
        } else {
            fila.texto(campo)
        };
        props.insert(campo.to_string(), Value::String(valor));
    }
    Punto {
        lat: coord.lat,
        lng: coord.lng,
        color: color_de(fila, columna_color),
        props,
        description: fila.texto(COL_DESCRIPTION),
        estado_ots: fila.texto(COL_ESTADO_OTS),
    }
}

pub fn hoja_a_puntos(hoja: &Hoja, defecto: Coordenada) -> Vec<Punto> {
    let col = columna_color(&hoja.encabezados);
    let mut sin_coordenada = 0usize;
    let puntos: Vec<Punto> = hoja
        .filas
        .iter()
        .map(|f| {
            let p = fila_a_punto(f, col, defecto);
            if f.contiene(COL_GPS) && p.lat == defecto.lat && p.lng == defecto.lng {
                sin_coordenada += 1;
            }
            p
        })
        .collect();
    if sin_coordenada > 0 {
        log::debug!("{} filas con Gps ilegible, se usó la coordenada por defecto", sin_coordenada);
    }
    puntos
}
