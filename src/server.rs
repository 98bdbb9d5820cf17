use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpResponse, HttpServer};
use serde_json::json;

use crate::api_json::handlers::*;
use crate::config::Configuracion;

/// Registra todas las rutas. Se usa tanto en `run_server` como en los tests
/// (`App::new().configure(...)`).
pub fn configurar_rutas(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| {
            log::debug!("cuerpo JSON rechazado: {}", err);
            error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(json!({"error": "Cuerpo JSON inválido"})),
            )
            .into()
        }),
    )
    .app_data(
        web::QueryConfig::default().error_handler(|err, _req| {
            error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(json!({"error": "Parámetros inválidos"})),
            )
            .into()
        }),
    )
    .route("/upload", web::post().to(upload_handler))
    .route("/files", web::get().to(files_list_handler))
    .route("/files/{filename}", web::delete().to(file_delete_handler))
    .route("/files/{filename}/columns", web::get().to(file_columns_handler))
    .route("/files/{filename}/column-summary", web::get().to(column_summary_handler))
    .route("/files/{filename}/colorized", web::post().to(colorized_handler))
    .route("/projects", web::get().to(projects_list_handler))
    .route("/projects/{filename}/points", web::get().to(project_points_handler))
    .route("/projects/{filename}/ensure-columns", web::post().to(ensure_columns_handler))
    .route("/projects/{filename}/update-record", web::post().to(update_record_handler))
    .route("/projects/{filename}/update-records", web::post().to(update_records_handler))
    .route("/projects/{filename}/update-tpl-by-description", web::post().to(update_tpl_handler))
    .route("/projects/{filename}/update-estado-correria", web::post().to(update_estado_correria_handler))
    .route("/projects/{filename}/update-motivo", web::post().to(update_motivo_handler))
    .route("/projects/{filename}/correrias", web::get().to(correrias_handler))
    .route("/projects/{filename}/merge", web::post().to(merge_handler))
    .route("/projects/{filename}/export", web::get().to(export_handler))
    .route("/projects/{filename}/export/integracion", web::get().to(export_integracion_handler));
}

pub async fn run_server(config: Configuracion) -> std::io::Result<()> {
    config.preparar_directorios()?;
    let bind = config.bind_addr();
    let cors_permisivo = config.cors_permisivo;
    let datos = web::Data::new(config);

    log::info!("servidor escuchando en http://{}", bind);
    HttpServer::new(move || {
        let cors = if cors_permisivo { Cors::permissive() } else { Cors::default() };
        App::new()
            .app_data(datos.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configurar_rutas)
    })
    .bind(bind)?
    .run()
    .await
}
