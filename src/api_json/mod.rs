//! Cuerpos y parámetros JSON de las rutas, y validación de nombres de archivo.
//!
//! Los nombres de campo siguen lo que envía el mapa (`idOrdenTrabajo`,
//! `estadoOts`, ...). Todos los campos son opcionales a nivel de serde: la
//! obligatoriedad se valida en cada handler para responder con el mensaje
//! adecuado.

pub mod handlers;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ProyectoError;
use crate::excel::es_libro;
use crate::models::{numero_a_texto, Valor};

/// Distingue un campo ausente (`None`) de un `null` explícito (`Some(Null)`).
fn presente<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(d).map(Some)
}

/// POST /projects/{f}/update-record
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordBody {
    pub id_orden_trabajo: Option<Value>,
    #[serde(default, deserialize_with = "presente")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "presente")]
    pub estado_ots: Option<Value>,
    #[serde(default, deserialize_with = "presente")]
    pub color: Option<Value>,
}

/// POST /projects/{f}/update-records (asignación con lazo)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordsBody {
    #[serde(default)]
    pub ids: Vec<Value>,
    #[serde(default, deserialize_with = "presente")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "presente")]
    pub estado_ots: Option<Value>,
    #[serde(default, deserialize_with = "presente")]
    pub color: Option<Value>,
}

/// POST /projects/{f}/update-tpl-by-description
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTplBody {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "presente")]
    pub tpl: Option<Value>,
}

/// POST /projects/{f}/update-estado-correria
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEstadoCorreriaBody {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "presente")]
    pub estado_correria: Option<Value>,
}

/// POST /projects/{f}/update-motivo
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMotivoBody {
    pub id_orden_trabajo: Option<Value>,
    #[serde(default, deserialize_with = "presente")]
    pub motivo: Option<Value>,
    #[serde(default, deserialize_with = "presente")]
    pub color: Option<Value>,
}

/// POST /files/{f}/colorized
#[derive(Debug, Default, Deserialize)]
pub struct ColorizedBody {
    pub column: Option<String>,
    pub colors: Option<HashMap<String, String>>,
}

/// POST /projects/{f}/merge
#[derive(Debug, Default, Deserialize)]
pub struct MergeBody {
    pub source: Option<String>,
    pub columns: Option<Vec<String>>,
}

/// GET /files/{f}/column-summary?column=
#[derive(Debug, Default, Deserialize)]
pub struct ColumnQuery {
    pub column: Option<String>,
}

/// GET /projects/{f}/export?column=&values=a,b&columns=x,y
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub column: Option<String>,
    pub values: Option<String>,
    pub columns: Option<String>,
}

/// Lista separada por comas -> Vec sin elementos vacíos
pub fn split_list(s: Option<&str>) -> Vec<String> {
    match s {
        Some(s) if !s.trim().is_empty() => s.split(',').map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect(),
        _ => Vec::new(),
    }
}

/// Texto de un id de orden recibido en JSON (cadena o número). `None` si
/// falta, es vacío, cero o de otro tipo.
pub fn id_texto(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => n.as_f64().filter(|f| *f != 0.0).map(numero_a_texto),
        _ => None,
    }
}

/// Valor JSON de un campo de actualización -> valor de celda. Un campo
/// ausente conserva la celda (`None`); un `null` explícito la vacía.
pub fn valor_opcional(v: Option<&Value>) -> Option<Valor> {
    match v? {
        Value::Null => Some(Valor::Texto(String::new())),
        otro => Valor::desde_json(otro),
    }
}

/// Último componente de la ruta recibida; descarta cualquier directorio.
pub fn basename(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or("")
}

/// Valida el nombre recibido en la URL y lo resuelve dentro de `dir`.
/// Nombre sin extensión de libro -> 400; archivo inexistente -> 404.
pub fn resolver_archivo(dir: &Path, raw: &str) -> Result<(String, PathBuf), ProyectoError> {
    let safe = basename(raw);
    if safe.is_empty() || !es_libro(safe) {
        return Err(ProyectoError::NombreInvalido);
    }
    let full = dir.join(safe);
    if !full.is_file() {
        return Err(ProyectoError::NoEncontrado);
    }
    Ok((safe.to_string(), full))
}

/// Nombre sin `.xlsx` / `.xls` (sin distinguir mayúsculas).
pub fn sin_extension(nombre: &str) -> &str {
    for ext in [".xlsx", ".xls"] {
        let corte = nombre.len().saturating_sub(ext.len());
        if let (Some(base), Some(sufijo)) = (nombre.get(..corte), nombre.get(corte..)) {
            if nombre.len() >= ext.len() && sufijo.eq_ignore_ascii_case(ext) {
                return base;
            }
        }
    }
    nombre
}
