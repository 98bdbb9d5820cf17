//! Errores del servicio y su traducción a respuestas HTTP.
//!
//! Los mensajes visibles para el cliente están en español, igual que los que
//! consume el mapa. Los fallos internos se registran con su causa y se
//! reemplazan por un mensaje propio de cada ruta mediante [`Contexto`].

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ProyectoError {
    #[error("Nombre de archivo inválido")]
    NombreInvalido,

    #[error("Archivo no encontrado")]
    NoEncontrado,

    /// Campo obligatorio ausente; el texto es el mensaje completo.
    #[error("{0}")]
    CampoRequerido(&'static str),

    #[error("{0}")]
    RegistroNoEncontrado(&'static str),

    #[error("Archivo demasiado grande")]
    ArchivoGrande,

    #[error("error de excel: {0}")]
    Excel(String),

    #[error("error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("{mensaje}")]
    Interno { mensaje: String, causa: String },
}

impl ProyectoError {
    pub fn excel(e: impl std::fmt::Display) -> Self {
        ProyectoError::Excel(e.to_string())
    }
}

impl ResponseError for ProyectoError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProyectoError::NombreInvalido | ProyectoError::CampoRequerido(_) => StatusCode::BAD_REQUEST,
            ProyectoError::NoEncontrado | ProyectoError::RegistroNoEncontrado(_) => StatusCode::NOT_FOUND,
            ProyectoError::ArchivoGrande => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({"error": self.to_string()}))
    }
}

impl From<actix_web::error::BlockingError> for ProyectoError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        ProyectoError::Interno { mensaje: "Error interno".to_string(), causa: e.to_string() }
    }
}

/// Reemplaza errores internos (excel, E/S) por el mensaje de la ruta,
/// dejando intactos los errores de validación que ya son para el cliente.
pub trait Contexto<T> {
    fn contexto(self, mensaje: &str) -> Result<T, ProyectoError>;
}

impl<T> Contexto<T> for Result<T, ProyectoError> {
    fn contexto(self, mensaje: &str) -> Result<T, ProyectoError> {
        self.map_err(|e| match e {
            ProyectoError::Excel(_) | ProyectoError::Io(_) => {
                log::error!("{}: {}", mensaje, e);
                ProyectoError::Interno { mensaje: mensaje.to_string(), causa: e.to_string() }
            }
            ProyectoError::Interno { causa, .. } => {
                log::error!("{}: {}", mensaje, causa);
                ProyectoError::Interno { mensaje: mensaje.to_string(), causa }
            }
            otro => otro,
        })
    }
}
