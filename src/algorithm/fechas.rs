// Normalización de fechas a `dd/mm/yyyy`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::excel::io::serial_a_fecha;
use crate::models::Valor;

pub fn fecha_texto(f: &NaiveDateTime) -> String {
    f.format("%d/%m/%Y").to_string()
}

/// `true` si el nombre de columna parece una fecha (`fecha` o `date`, sin
/// distinguir mayúsculas).
pub fn es_columna_fecha(columna: &str) -> bool {
    let c = columna.to_lowercase();
    c.contains("fecha") || c.contains("date")
}

/// Intenta interpretar un texto como fecha y devolverlo como `dd/mm/yyyy`.
/// Los textos que ya vienen como `dd/mm/yyyy` se respetan tal cual.
pub fn texto_a_fecha(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if NaiveDate::parse_from_str(s, "%d/%m/%Y").is_ok() {
        return Some(s.to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(fecha_texto(&dt.naive_utc()));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(fecha_texto(&dt));
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.format("%d/%m/%Y").to_string());
        }
    }
    None
}

/// Normaliza cualquier valor de celda a `dd/mm/yyyy`. Los números se tratan
/// como seriales de Excel; los textos no reconocidos se devuelven recortados
/// y las celdas vacías como cadena vacía.
pub fn normalizar_fecha(v: Option<&Valor>) -> String {
    match v {
        None => String::new(),
        Some(Valor::Fecha(f)) => fecha_texto(f),
        Some(Valor::Numero(n)) => match serial_a_fecha(*n) {
            Some(f) => fecha_texto(&f),
            None => v.map(Valor::como_texto).unwrap_or_default(),
        },
        Some(Valor::Texto(s)) => texto_a_fecha(s).unwrap_or_else(|| s.trim().to_string()),
        Some(otro) => otro.como_texto(),
    }
}
