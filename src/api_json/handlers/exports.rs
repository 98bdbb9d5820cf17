// Descargas de hojas derivadas de un proyecto.

use actix_web::{web, HttpResponse};

use super::{en_bloque, respuesta_xlsx};
use crate::algorithm::{exportacion_filtrada, exportacion_integracion, FiltroExportacion};
use crate::api_json::{resolver_archivo, sin_extension, split_list, ExportQuery};
use crate::config::Configuracion;
use crate::error::{Contexto, ProyectoError};
use crate::excel;

/// GET /projects/{filename}/export?column=&values=&columns=
pub async fn export_handler(
    cfg: web::Data<Configuracion>,
    path: web::Path<String>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, ProyectoError> {
    let (safe, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let q = query.into_inner();
    let filtro = FiltroExportacion {
        columna: q.column.filter(|c| !c.trim().is_empty()),
        valores: split_list(q.values.as_deref()),
        columnas: split_list(q.columns.as_deref()),
    };
    let bytes = en_bloque(move || {
        let hoja = excel::leer_hoja(&full)?;
        excel::hoja_a_bytes(&exportacion_filtrada(&hoja, &filtro))
    })
    .await
    .contexto("Error al exportar el proyecto")?;
    Ok(respuesta_xlsx(&format!("{}-export.xlsx", sin_extension(&safe)), bytes))
}

/// GET /projects/{filename}/export/integracion
pub async fn export_integracion_handler(cfg: web::Data<Configuracion>, path: web::Path<String>) -> Result<HttpResponse, ProyectoError> {
    let (safe, full) = resolver_archivo(&cfg.data_dir, &path)?;
    let bytes = en_bloque(move || {
        let hoja = excel::leer_hoja(&full)?;
        excel::hoja_a_bytes(&exportacion_integracion(&hoja))
    })
    .await
    .contexto("Error al exportar el proyecto")?;
    log::info!("{}: exportación de integración generada", safe);
    Ok(respuesta_xlsx(&format!("{}-integracion.xlsx", sin_extension(&safe)), bytes))
}
