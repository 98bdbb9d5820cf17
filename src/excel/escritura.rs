use std::io::Cursor;
use std::path::Path;

use crate::error::ProyectoError;
use crate::excel::io::fecha_a_serial;
use crate::models::{Hoja, Valor};

const FORMATO_FECHA: &str = "dd/mm/yyyy";

/// Construye un libro xlsx de una sola hoja: encabezados en la fila 1 y las
/// filas a continuación, en el orden de `hoja.encabezados`.
pub fn hoja_a_bytes(hoja: &Hoja) -> Result<Vec<u8>, ProyectoError> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_active_sheet_mut();
    let nombre = if hoja.nombre.trim().is_empty() { "Sheet1" } else { hoja.nombre.as_str() };
    sheet.set_name(nombre);

    for (ci, encabezado) in hoja.encabezados.iter().enumerate() {
        let col = (ci + 1) as u32;
        sheet.get_cell_mut((col, 1u32)).set_value_string(encabezado.clone());
    }

    for (ri, fila) in hoja.filas.iter().enumerate() {
        let row = (ri + 2) as u32;
        for (ci, encabezado) in hoja.encabezados.iter().enumerate() {
            let valor = match fila.get(encabezado) {
                Some(v) => v,
                None => continue,
            };
            let col = (ci + 1) as u32;
            let cell = sheet.get_cell_mut((col, row));
            match valor {
                Valor::Texto(s) => {
                    cell.set_value_string(s.clone());
                }
                Valor::Numero(n) => {
                    cell.set_value_number(*n);
                }
                Valor::Booleano(b) => {
                    cell.set_value_bool(*b);
                }
                Valor::Fecha(f) => {
                    cell.set_value_number(fecha_a_serial(f));
                    cell.get_style_mut().get_number_format_mut().set_format_code(FORMATO_FECHA);
                }
            }
        }
    }

    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf).map_err(ProyectoError::excel)?;
    Ok(buf.into_inner())
}

/// Escribe la hoja sobre `path`. Se escribe primero a un temporal hermano y
/// luego se renombra, para no dejar el proyecto a medio escribir.
pub fn escribir_hoja<P: AsRef<Path>>(path: P, hoja: &Hoja) -> Result<(), ProyectoError> {
    let path = path.as_ref();
    let bytes = hoja_a_bytes(hoja)?;
    let nombre = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or(ProyectoError::NombreInvalido)?;
    let tmp = path.with_file_name(format!(".{}.tmp", nombre));
    std::fs::write(&tmp, &bytes)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    log::debug!("libro escrito: {:?} ({} filas)", path, hoja.filas.len());
    Ok(())
}
