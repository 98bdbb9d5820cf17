// Rutas sobre el directorio de subidas (`/upload`, `/files/...`).

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::stream::StreamExt;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use super::en_bloque;
use crate::algorithm::{colorizar, resumen_columna};
use crate::api_json::{basename, resolver_archivo, sin_extension, ColorizedBody, ColumnQuery};
use crate::config::Configuracion;
use crate::error::{Contexto, ProyectoError};
use crate::excel;

const CAMPO_ARCHIVO: &str = "excelFile";

fn error_subida(e: impl std::fmt::Display) -> ProyectoError {
    log::error!("Error al procesar el archivo: {}", e);
    ProyectoError::Interno { mensaje: "Error al procesar el archivo".to_string(), causa: e.to_string() }
}

/// POST /upload
/// Guarda el campo `excelFile` como `<epoch-ms>-<nombre>` y devuelve sus filas.
pub async fn upload_handler(cfg: web::Data<Configuracion>, mut payload: Multipart) -> Result<HttpResponse, ProyectoError> {
    let mut guardado: Option<(String, std::path::PathBuf)> = None;

    while let Some(field_res) = payload.next().await {
        let mut field = match field_res {
            Ok(f) => f,
            Err(e) => {
                log::warn!("error en campo multipart: {}", e);
                break;
            }
        };
        let disposition = field.content_disposition();
        let es_archivo = disposition.get_name() == Some(CAMPO_ARCHIVO);
        let original = disposition.get_filename().map(|s| basename(s).to_string());
        let original = match original {
            Some(n) if es_archivo && guardado.is_none() && !n.trim().is_empty() => n,
            _ => {
                // drenar campos que no interesan
                while let Some(chunk) = field.next().await {
                    if chunk.is_err() {
                        break;
                    }
                }
                continue;
            }
        };

        let filename = format!("{}-{}", chrono::Utc::now().timestamp_millis(), original);
        let filepath = cfg.upload_dir.join(&filename);
        let mut f = tokio::fs::File::create(&filepath).await.map_err(error_subida)?;
        let mut escritos = 0usize;
        while let Some(chunk) = field.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    log::warn!("error en la subida de '{}': {}", filename, e);
                    drop(f);
                    let _ = tokio::fs::remove_file(&filepath).await;
                    return Err(error_subida(e));
                }
            };
            escritos += bytes.len();
            if escritos > cfg.max_upload_bytes {
                drop(f);
                let _ = tokio::fs::remove_file(&filepath).await;
                log::warn!("subida rechazada, supera {} bytes: {}", cfg.max_upload_bytes, original);
                return Err(ProyectoError::ArchivoGrande);
            }
            f.write_all(&bytes).await.map_err(error_subida)?;
        }
        f.flush().await.map_err(error_subida)?;
        log::info!("archivo subido: {} ({} bytes)", filename, escritos);
        guardado = Some((filename, filepath));
    }

    let (filename, filepath) = guardado.ok_or(ProyectoError::CampoRequerido("No se subió ningún archivo"))?;
    let hoja = en_bloque(move || excel::leer_hoja(&filepath))
        .await
        .contexto("Error al procesar el archivo")?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Archivo subido correctamente",
        "filename": filename,
        "data": hoja.filas,
    })))
}

/// GET /files
pub async fn files_list_handler(cfg: web::Data<Configuracion>) -> Result<HttpResponse, ProyectoError> {
    let dir = cfg.upload_dir.clone();
    let libros = en_bloque(move || excel::listar_libros(&dir))
        .await
        .contexto("Error al leer el directorio")?;
    Ok(HttpResponse::Ok().json(libros))
}

/// GET /files/{filename}/columns
pub async fn file_columns_handler(cfg: web::Data<Configuracion>, path: web::Path<String>) -> Result<HttpResponse, ProyectoError> {
    let (_, full) = resolver_archivo(&cfg.upload_dir, &path)?;
    let columnas = en_bloque(move || excel::leer_encabezados(&full))
        .await
        .contexto("Error al leer columnas")?;
    Ok(HttpResponse::Ok().json(json!({"columns": columnas})))
}

/// GET /files/{filename}/column-summary?column=
pub async fn column_summary_handler(
    cfg: web::Data<Configuracion>,
    path: web::Path<String>,
    query: web::Query<ColumnQuery>,
) -> Result<HttpResponse, ProyectoError> {
    let column = match query.into_inner().column {
        Some(c) if !c.is_empty() => c,
        _ => return Err(ProyectoError::CampoRequerido("Parámetro column es requerido")),
    };
    let (_, full) = resolver_archivo(&cfg.upload_dir, &path)?;
    let col = column.clone();
    let summary = en_bloque(move || {
        let hoja = excel::leer_hoja(&full)?;
        Ok(resumen_columna(&hoja, &col))
    })
    .await
    .contexto("Error al generar resumen")?;
    Ok(HttpResponse::Ok().json(json!({"column": column, "summary": summary})))
}

/// DELETE /files/{filename}
pub async fn file_delete_handler(cfg: web::Data<Configuracion>, path: web::Path<String>) -> Result<HttpResponse, ProyectoError> {
    let (safe, full) = resolver_archivo(&cfg.upload_dir, &path)?;
    if let Err(e) = tokio::fs::remove_file(&full).await {
        log::error!("no se pudo borrar {:?}: {}", full, e);
        return Err(ProyectoError::Interno { mensaje: "No se pudo borrar el archivo".to_string(), causa: e.to_string() });
    }
    log::info!("archivo borrado: {}", safe);
    Ok(HttpResponse::Ok().json(json!({"message": "Archivo borrado correctamente"})))
}

/// POST /files/{filename}/colorized
/// Agrega `Color <column>` y guarda el resultado como proyecto nuevo.
pub async fn colorized_handler(
    cfg: web::Data<Configuracion>,
    path: web::Path<String>,
    body: web::Json<ColorizedBody>,
) -> Result<HttpResponse, ProyectoError> {
    let body = body.into_inner();
    let (column, colors) = match (body.column, body.colors) {
        (Some(c), Some(colors)) if !c.is_empty() => (c, colors),
        _ => return Err(ProyectoError::CampoRequerido("column y colors son requeridos")),
    };
    let (safe, full) = resolver_archivo(&cfg.upload_dir, &path)?;
    let out_name = format!("{}-{}-colored.xlsx", chrono::Utc::now().timestamp_millis(), sin_extension(&safe));
    let out_path = cfg.data_dir.join(&out_name);

    en_bloque(move || {
        let hoja = excel::leer_hoja(&full)?;
        let coloreada = colorizar(&hoja, &column, &colors);
        excel::escribir_hoja(&out_path, &coloreada)
    })
    .await
    .contexto("Error al guardar el proyecto")?;

    log::info!("proyecto creado desde {}: {}", safe, out_name);
    Ok(HttpResponse::Ok().json(json!({"message": "Proyecto guardado", "output": out_name})))
}
