// Rutas sobre el directorio de proyectos (`/projects/...`).
//
// Todas las mutaciones leen el libro completo, cambian filas en memoria y lo
// escriben de vuelta con `excel::modificar_hoja`.

use actix_web::{web, HttpResponse};
use serde_json::json;

use super::en_bloque;
use crate::algorithm::{
    actualizar_por_description, actualizar_por_id, actualizar_por_ids, asegurar_columnas, combinar,
    hoja_a_puntos, resumen_correrias, Cambio, Coordenada, COLUMNAS_CORRERIA,
};
use crate::api_json::{
    id_texto, resolver_archivo, valor_opcional, MergeBody, UpdateEstadoCorreriaBody, UpdateMotivoBody,
    UpdateRecordBody, UpdateRecordsBody, UpdateTplBody,
};
use crate::config::Configuracion;
use crate::error::{Contexto, ProyectoError};
use crate::excel;
use crate::models::{
    COL_COLOR_CORRERIA, COL_COLOR_MOTIVO, COL_DESCRIPTION, COL_ESTADO_CORRERIA, COL_ESTADO_OTS, COL_MOTIVO, COL_TPL,
};

/// GET /projects
pub async fn projects_list_handler(cfg: web::Data<Configuracion>) -> Result<HttpResponse, ProyectoError> {
    let dir = cfg.data_dir.clone();
    let libros = en_bloque(move || excel::listar_libros(&dir))
        .await
        .contexto("Error al leer el directorio")?;
    Ok(HttpResponse::Ok().json(libros))
}

/// GET /projects/{filename}/points
pub async fn project_points_handler(cfg: web::Data<Configuracion>, path: web::Path<String>) -> Result<HttpResponse, ProyectoError> {
    let (_, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let defecto = Coordenada::new(cfg.lat_defecto, cfg.lng_defecto);
    let points = en_bloque(move || {
        let hoja = excel::leer_hoja(&full)?;
        Ok(hoja_a_puntos(&hoja, defecto))
    })
    .await
    .contexto("Error al leer puntos del proyecto")?;
    Ok(HttpResponse::Ok().json(json!({"points": points})))
}

/// POST /projects/{filename}/ensure-columns
pub async fn ensure_columns_handler(cfg: web::Data<Configuracion>, path: web::Path<String>) -> Result<HttpResponse, ProyectoError> {
    let (safe, full) = resolver_archivo(&cfg.data_dir, &path)?;
    en_bloque(move || {
        excel::modificar_hoja(&full, |hoja| {
            asegurar_columnas(hoja, &COLUMNAS_CORRERIA);
            Ok(())
        })
    })
    .await
    .contexto("Error al asegurar columnas")?;
    log::info!("{}: columnas de correría aseguradas", safe);
    Ok(HttpResponse::Ok().json(json!({"message": "Columnas aseguradas", "file": safe})))
}

/// POST /projects/{filename}/update-record
/// Asigna una orden de trabajo a una correría (Description, EstadoOts, color).
pub async fn update_record_handler(
    cfg: web::Data<Configuracion>,
    path: web::Path<String>,
    body: web::Json<UpdateRecordBody>,
) -> Result<HttpResponse, ProyectoError> {
    let body = body.into_inner();
    let id = id_texto(body.id_orden_trabajo.as_ref()).ok_or(ProyectoError::CampoRequerido("idOrdenTrabajo es requerido"))?;
    let (safe, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let cambios = vec![
        Cambio::new(COL_DESCRIPTION, valor_opcional(body.description.as_ref())),
        Cambio::new(COL_ESTADO_OTS, valor_opcional(body.estado_ots.as_ref())),
        Cambio::new(COL_COLOR_CORRERIA, valor_opcional(body.color.as_ref())),
    ];
    let id_log = id.clone();
    en_bloque(move || {
        excel::modificar_hoja(&full, |hoja| match actualizar_por_id(hoja, &id, &cambios) {
            0 => Err(ProyectoError::RegistroNoEncontrado("Registro no encontrado")),
            n => Ok(n),
        })
    })
    .await
    .contexto("Error al actualizar el registro")?;
    log::info!("{}: orden {} actualizada", safe, id_log);
    Ok(HttpResponse::Ok().json(json!({"message": "Registro actualizado", "file": safe})))
}

/// POST /projects/{filename}/update-records
/// Variante masiva para la selección con lazo del mapa.
pub async fn update_records_handler(
    cfg: web::Data<Configuracion>,
    path: web::Path<String>,
    body: web::Json<UpdateRecordsBody>,
) -> Result<HttpResponse, ProyectoError> {
    let body = body.into_inner();
    let ids: Vec<String> = body.ids.iter().filter_map(|v| id_texto(Some(v))).collect();
    if ids.is_empty() {
        return Err(ProyectoError::CampoRequerido("ids es requerido"));
    }
    let (safe, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let cambios = vec![
        Cambio::new(COL_DESCRIPTION, valor_opcional(body.description.as_ref())),
        Cambio::new(COL_ESTADO_OTS, valor_opcional(body.estado_ots.as_ref())),
        Cambio::new(COL_COLOR_CORRERIA, valor_opcional(body.color.as_ref())),
    ];
    let resultado = en_bloque(move || {
        excel::modificar_hoja(&full, |hoja| {
            let r = actualizar_por_ids(hoja, &ids, &cambios);
            if r.actualizadas == 0 {
                return Err(ProyectoError::RegistroNoEncontrado("Registros no encontrados"));
            }
            Ok(r)
        })
    })
    .await
    .contexto("Error al actualizar los registros")?;
    log::info!("{}: {} filas asignadas en bloque", safe, resultado.actualizadas);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Registros actualizados",
        "updatedCount": resultado.actualizadas,
        "notFound": resultado.no_encontrados,
    })))
}

/// POST /projects/{filename}/update-tpl-by-description
pub async fn update_tpl_handler(
    cfg: web::Data<Configuracion>,
    path: web::Path<String>,
    body: web::Json<UpdateTplBody>,
) -> Result<HttpResponse, ProyectoError> {
    let body = body.into_inner();
    let description = match body.description {
        Some(d) if !d.trim().is_empty() => d,
        _ => return Err(ProyectoError::CampoRequerido("description es requerido")),
    };
    let (safe, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let tpl = valor_opcional(body.tpl.as_ref());
    let updated = en_bloque(move || {
        excel::modificar_hoja(&full, |hoja| Ok(actualizar_por_description(hoja, &description, COL_TPL, tpl)))
    })
    .await
    .contexto("Error al actualizar Tpl por Description")?;
    log::info!("{}: Tpl actualizado en {} filas", safe, updated);
    Ok(HttpResponse::Ok().json(json!({"message": "Tpl actualizado por Description", "updatedCount": updated})))
}

/// POST /projects/{filename}/update-estado-correria
pub async fn update_estado_correria_handler(
    cfg: web::Data<Configuracion>,
    path: web::Path<String>,
    body: web::Json<UpdateEstadoCorreriaBody>,
) -> Result<HttpResponse, ProyectoError> {
    let body = body.into_inner();
    let description = match body.description {
        Some(d) if !d.trim().is_empty() => d,
        _ => return Err(ProyectoError::CampoRequerido("description es requerido")),
    };
    let (safe, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let estado = valor_opcional(body.estado_correria.as_ref());
    let updated = en_bloque(move || {
        excel::modificar_hoja(&full, |hoja| {
            Ok(actualizar_por_description(hoja, &description, COL_ESTADO_CORRERIA, estado))
        })
    })
    .await
    .contexto("Error al actualizar el estado de la correría")?;
    log::info!("{}: EstadoCorreria actualizado en {} filas", safe, updated);
    Ok(HttpResponse::Ok().json(json!({"message": "Estado de correría actualizado", "updatedCount": updated})))
}

/// POST /projects/{filename}/update-motivo
pub async fn update_motivo_handler(
    cfg: web::Data<Configuracion>,
    path: web::Path<String>,
    body: web::Json<UpdateMotivoBody>,
) -> Result<HttpResponse, ProyectoError> {
    let body = body.into_inner();
    let id = id_texto(body.id_orden_trabajo.as_ref()).ok_or(ProyectoError::CampoRequerido("idOrdenTrabajo es requerido"))?;
    let (safe, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let cambios = vec![
        Cambio::new(COL_MOTIVO, valor_opcional(body.motivo.as_ref())),
        Cambio::new(COL_COLOR_MOTIVO, valor_opcional(body.color.as_ref())),
    ];
    let actualizadas = en_bloque(move || {
        excel::modificar_hoja(&full, |hoja| match actualizar_por_id(hoja, &id, &cambios) {
            0 => Err(ProyectoError::RegistroNoEncontrado("Registro no encontrado")),
            n => Ok(n),
        })
    })
    .await
    .contexto("Error al actualizar el motivo")?;
    log::info!("{}: motivo actualizado en {} filas", safe, actualizadas);
    Ok(HttpResponse::Ok().json(json!({"message": "Motivo actualizado", "file": safe})))
}

/// GET /projects/{filename}/correrias
pub async fn correrias_handler(cfg: web::Data<Configuracion>, path: web::Path<String>) -> Result<HttpResponse, ProyectoError> {
    let (_, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let correrias = en_bloque(move || {
        let hoja = excel::leer_hoja(&full)?;
        Ok(resumen_correrias(&hoja))
    })
    .await
    .contexto("Error al resumir correrías")?;
    Ok(HttpResponse::Ok().json(json!({"correrias": correrias})))
}

/// POST /projects/{filename}/merge
/// Upsert de las filas de un archivo subido sobre el proyecto.
pub async fn merge_handler(
    cfg: web::Data<Configuracion>,
    path: web::Path<String>,
    body: web::Json<MergeBody>,
) -> Result<HttpResponse, ProyectoError> {
    let body = body.into_inner();
    let source = match body.source {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(ProyectoError::CampoRequerido("source es requerido")),
    };
    let (safe, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let (source_safe, source_full) = resolver_archivo(&cfg.upload_dir, &source)?;
    let columnas = body.columns.filter(|c| !c.is_empty());

    let resultado = en_bloque(move || {
        let origen = excel::leer_hoja(&source_full)?;
        excel::modificar_hoja(&full, |hoja| Ok(combinar(hoja, &origen, columnas.as_deref())))
    })
    .await
    .contexto("Error al combinar proyectos")?;
    log::info!("{} combinado con {}", safe, source_safe);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Proyecto combinado",
        "updated": resultado.updated,
        "inserted": resultado.inserted,
        "skipped": resultado.skipped,
    })))
}
