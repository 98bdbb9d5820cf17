use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;

use crate::error::ProyectoError;
use crate::excel::io::{data_to_string, data_to_valor, nombrar_encabezados};
use crate::models::{Fila, Hoja};

/// Lee la primera hoja del libro como filas. El formato (xlsx/xls/ods) se
/// detecta por contenido, no por extensión.
pub fn leer_hoja<P: AsRef<Path>>(path: P) -> Result<Hoja, ProyectoError> {
    let bytes = std::fs::read(path.as_ref())?;
    leer_hoja_desde_bytes(bytes)
}

pub fn leer_hoja_desde_bytes(bytes: Vec<u8>) -> Result<Hoja, ProyectoError> {
    let (nombre, range) = primera_hoja(bytes)?;
    Ok(rango_a_hoja(nombre, &range))
}

/// Fila de encabezado tal como está en el archivo, sin columnas en blanco.
pub fn leer_encabezados<P: AsRef<Path>>(path: P) -> Result<Vec<String>, ProyectoError> {
    let bytes = std::fs::read(path.as_ref())?;
    let (_, range) = primera_hoja(bytes)?;
    let encabezados = range
        .rows()
        .next()
        .map(|r| r.iter().map(data_to_string).filter(|h| !h.trim().is_empty()).collect())
        .unwrap_or_default();
    Ok(encabezados)
}

fn primera_hoja(bytes: Vec<u8>) -> Result<(String, Range<Data>), ProyectoError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(ProyectoError::excel)?;
    let nombre = match workbook.sheet_names().first() {
        Some(n) => n.clone(),
        None => return Err(ProyectoError::Excel("el libro no tiene hojas".to_string())),
    };
    let range = workbook.worksheet_range(&nombre).map_err(ProyectoError::excel)?;
    Ok((nombre, range))
}

fn rango_a_hoja(nombre: String, range: &Range<Data>) -> Hoja {
    let mut rows = range.rows();
    let crudos: Vec<String> = match rows.next() {
        Some(r) => r.iter().map(data_to_string).collect(),
        None => return Hoja::new(nombre, Vec::new(), Vec::new()),
    };
    let encabezados = nombrar_encabezados(&crudos);

    let mut filas = Vec::new();
    for r in rows {
        let mut fila = Fila::new();
        for (col, celda) in encabezados.iter().zip(r.iter()) {
            if let Some(v) = data_to_valor(celda) {
                fila.set(col.clone(), v);
            }
        }
        if !fila.is_empty() {
            filas.push(fila);
        }
    }
    log::debug!("hoja '{}' leída: {} columnas, {} filas", nombre, encabezados.len(), filas.len());
    Hoja::new(nombre, encabezados, filas)
}
