use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::models::Valor;

const MS_POR_DIA: f64 = 86_400_000.0;

/// Día cero de los seriales de Excel (sistema 1900, con el 29/02/1900 ficticio).
fn epoca_excel() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Serial de Excel (días con fracción) a fecha-hora, redondeado al milisegundo.
pub fn serial_a_fecha(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let ms = (serial * MS_POR_DIA).round();
    if ms.abs() > i64::MAX as f64 {
        return None;
    }
    epoca_excel().checked_add_signed(TimeDelta::milliseconds(ms as i64))
}

pub fn fecha_a_serial(fecha: &NaiveDateTime) -> f64 {
    (*fecha - epoca_excel()).num_milliseconds() as f64 / MS_POR_DIA
}

/// Convierte un `Data` de calamine a `Valor`. Devuelve `None` para celdas
/// vacías, errores y textos en blanco.
pub fn data_to_valor(d: &Data) -> Option<Valor> {
    match d {
        Data::String(s) => {
            if s.trim().is_empty() { None } else { Some(Valor::Texto(s.clone())) }
        }
        Data::Float(f) => Some(Valor::Numero(*f)),
        Data::Int(i) => Some(Valor::Numero(*i as f64)),
        Data::Bool(b) => Some(Valor::Booleano(*b)),
        // `as_datetime` ya aplica el desfase de los libros con sistema 1904
        Data::DateTime(dt) => {
            if dt.is_duration() {
                Some(Valor::Numero(dt.as_f64()))
            } else {
                Some(dt.as_datetime().map(Valor::Fecha).unwrap_or(Valor::Numero(dt.as_f64())))
            }
        }
        Data::DateTimeIso(s) => Some(
            parse_iso(s).map(Valor::Fecha).unwrap_or_else(|| Valor::Texto(s.clone())),
        ),
        Data::DurationIso(s) => Some(Valor::Texto(s.clone())),
        Data::Error(_) => None,
        Data::Empty => None,
    }
}

/// Convierte un `Data` de calamine a String (para encabezados)
pub fn data_to_string(d: &Data) -> String {
    match data_to_valor(d) {
        Some(v) => v.como_texto().trim().to_string(),
        None => String::new(),
    }
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Nombres de columna a partir de la fila de encabezado: las celdas vacías
/// se llaman `__EMPTY`, `__EMPTY_1`, ... y los repetidos reciben sufijo `_1`, `_2`, ...
pub fn nombrar_encabezados(crudos: &[String]) -> Vec<String> {
    let mut vistos: Vec<String> = Vec::with_capacity(crudos.len());
    for crudo in crudos {
        let base = if crudo.trim().is_empty() { "__EMPTY".to_string() } else { crudo.clone() };
        let mut nombre = base.clone();
        let mut n = 0usize;
        while vistos.contains(&nombre) {
            n += 1;
            nombre = format!("{}_{}", base, n);
        }
        vistos.push(nombre);
    }
    vistos
}
