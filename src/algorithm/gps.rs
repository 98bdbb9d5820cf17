//! Lectura de la columna `Gps` ("lat, lng" o "lng, lat").

use serde::Serialize;

use crate::models::Valor;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordenada {
    pub lat: f64,
    pub lng: f64,
}

impl Coordenada {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordenada { lat, lng }
    }

    /// "lat, lng" con 6 decimales
    pub fn texto(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Lee el número al inicio del texto, ignorando lo que siga
/// (`"7.5abc"` -> 7.5). `None` si no empieza por un número.
pub fn parse_float_prefijo(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut fin = 0usize;
    if fin < bytes.len() && (bytes[fin] == b'+' || bytes[fin] == b'-') {
        fin += 1;
    }
    let inicio_digitos = fin;
    while fin < bytes.len() && bytes[fin].is_ascii_digit() {
        fin += 1;
    }
    let mut digitos = fin - inicio_digitos;
    if fin < bytes.len() && bytes[fin] == b'.' {
        fin += 1;
        let inicio_frac = fin;
        while fin < bytes.len() && bytes[fin].is_ascii_digit() {
            fin += 1;
        }
        digitos += fin - inicio_frac;
    }
    if digitos == 0 {
        return None;
    }
    // exponente opcional, sólo si va seguido de dígitos
    if fin < bytes.len() && (bytes[fin] == b'e' || bytes[fin] == b'E') {
        let mut exp = fin + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        let inicio_exp = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > inicio_exp {
            fin = exp;
        }
    }
    s[..fin].parse::<f64>().ok()
}

/// Interpreta el valor de `Gps`. Sin coma, vacío o con partes no numéricas
/// devuelve `defecto`.
///
/// Orden de ejes: si la primera parte no cabe como latitud (|a| > 90) y la
/// segunda sí, el texto venía como "lng, lat" y se invierte.
pub fn parse_gps(v: Option<&Valor>, defecto: Coordenada) -> Coordenada {
    let s = match v {
        Some(v) => v.como_texto(),
        None => return defecto,
    };
    let s = s.trim();
    if s.is_empty() || !s.contains(',') {
        return defecto;
    }
    let partes: Vec<Option<f64>> = s.split(',').map(parse_float_prefijo).collect();
    let (a, b) = match (partes.first().copied().flatten(), partes.get(1).copied().flatten()) {
        (Some(a), Some(b)) => (a, b),
        _ => return defecto,
    };
    if a.abs() > 90.0 && b.abs() <= 90.0 {
        return Coordenada::new(b, a);
    }
    Coordenada::new(a, b)
}
