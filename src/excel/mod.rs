//! Módulo `excel`: la hoja de cálculo como almacén de filas.
//!
//! Submódulos:
//! - `io`: conversión de celdas de calamine y seriales de fecha
//! - `lectura`: lectura de la primera hoja como `Hoja`
//! - `escritura`: escritura de una `Hoja` como libro xlsx
//! - `bloqueo`: candados por archivo para lectura-modificación-escritura

/// Helpers de conversión de celdas
pub mod io;

/// Lectura de libros: `leer_hoja`, `leer_encabezados`
mod lectura;

/// Escritura de libros: `escribir_hoja`, `hoja_a_bytes`
mod escritura;

/// Candados por archivo
pub mod bloqueo;

pub use escritura::{escribir_hoja, hoja_a_bytes};
pub use lectura::{leer_encabezados, leer_hoja, leer_hoja_desde_bytes};

use std::fs;
use std::path::Path;

use crate::error::ProyectoError;
use crate::models::Hoja;

/// Extensiones aceptadas para libros de trabajo.
pub const EXTENSIONES: [&str; 2] = [".xlsx", ".xls"];

pub fn es_libro(nombre: &str) -> bool {
    EXTENSIONES.iter().any(|ext| nombre.ends_with(ext))
}

/// Lista (ordenados) los libros de un directorio, ignorando temporales.
pub fn listar_libros(dir: &Path) -> Result<Vec<String>, ProyectoError> {
    let mut libros: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let nombre = match entry.file_name().to_str() {
            Some(s) => s.to_string(),
            None => continue,
        };
        if nombre.starts_with('.') || nombre.starts_with('~') {
            continue;
        }
        if es_libro(&nombre) {
            libros.push(nombre);
        }
    }
    libros.sort();
    Ok(libros)
}

/// Lee el libro, aplica `f` sobre la hoja y, si `f` termina bien, escribe el
/// libro completo de vuelta. Si `f` devuelve error el archivo no se toca.
pub fn modificar_hoja<T, F>(path: &Path, f: F) -> Result<T, ProyectoError>
where
    F: FnOnce(&mut Hoja) -> Result<T, ProyectoError>,
{
    bloqueo::con_candado(path, || {
        let mut hoja = leer_hoja(path)?;
        let resultado = f(&mut hoja)?;
        hoja.sincronizar_encabezados();
        escribir_hoja(path, &hoja)?;
        Ok(resultado)
    })
}
