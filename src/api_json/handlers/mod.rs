pub mod exports;
pub mod files;
pub mod projects;

pub use exports::*;
pub use files::*;
pub use projects::*;

use actix_web::{http::header, web, HttpResponse};

use crate::error::ProyectoError;

const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Ejecuta la lectura/escritura de libros en el pool bloqueante de actix.
pub(crate) async fn en_bloque<T, F>(f: F) -> Result<T, ProyectoError>
where
    F: FnOnce() -> Result<T, ProyectoError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f).await?
}

/// Respuesta de descarga de un libro xlsx.
pub(crate) fn respuesta_xlsx(nombre: &str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(MIME_XLSX)
        .append_header((header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", nombre)))
        .body(bytes)
}
