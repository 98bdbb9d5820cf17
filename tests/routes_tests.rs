use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::path::Path;

use correrias::config::Configuracion;
use correrias::excel::{escribir_hoja, hoja_a_bytes, leer_hoja, leer_hoja_desde_bytes};
use correrias::models::{Fila, Hoja, Valor, COL_ID_ORDEN};
use correrias::server::configurar_rutas;

fn config_en(dir: &Path) -> Configuracion {
    let cfg = Configuracion {
        data_dir: dir.join("data"),
        upload_dir: dir.join("upload"),
        ..Configuracion::default()
    };
    cfg.preparar_directorios().unwrap();
    cfg
}

fn ordenes() -> Hoja {
    let filas = vec![
        [(COL_ID_ORDEN, Valor::Numero(1.0)), ("Tarea", "Corte".into()), ("Gps", "-172.5, 7.9".into())]
            .into_iter()
            .collect::<Fila>(),
        [(COL_ID_ORDEN, Valor::Numero(2.0)), ("Tarea", "Revision".into())].into_iter().collect(),
        [(COL_ID_ORDEN, Valor::Numero(3.0)), ("Tarea", "Corte".into())].into_iter().collect(),
    ];
    Hoja::new("Hoja1", vec![COL_ID_ORDEN.to_string(), "Tarea".to_string(), "Gps".to_string()], filas)
}

const BOUNDARY: &str = "----correriasboundary";

fn cuerpo_multipart(filename: &str, contenido: &[u8]) -> Vec<u8> {
    let mut payload: Vec<u8> = Vec::new();
    payload.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"excelFile\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            b = BOUNDARY,
            f = filename
        )
        .as_bytes(),
    );
    payload.extend_from_slice(contenido);
    payload.extend_from_slice(format!("\r\n--{b}--\r\n", b = BOUNDARY).as_bytes());
    payload
}

macro_rules! app {
    ($cfg:expr) => {
        test::init_service(App::new().app_data(web::Data::new($cfg)).configure(configurar_rutas)).await
    };
}

#[actix_web::test]
async fn test_flujo_colorizar_asignar_y_resumir() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_en(dir.path());
    escribir_hoja(cfg.upload_dir.join("ordenes.xlsx"), &ordenes()).unwrap();
    let data_dir = cfg.data_dir.clone();
    let app = app!(cfg);

    // subidas disponibles
    let req = test::TestRequest::get().uri("/files").to_request();
    let files: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(files, json!(["ordenes.xlsx"]));

    // resumen de columna
    let req = test::TestRequest::get().uri("/files/ordenes.xlsx/column-summary?column=Tarea").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["summary"][0], json!({"value": "Corte", "count": 2}));

    // colorizar -> proyecto nuevo
    let req = test::TestRequest::post()
        .uri("/files/ordenes.xlsx/colorized")
        .set_json(json!({"column": "Tarea", "colors": {"Corte": "#ff0000"}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let proyecto = body["output"].as_str().unwrap().to_string();
    assert!(proyecto.ends_with("-ordenes-colored.xlsx"));
    assert!(data_dir.join(&proyecto).exists());

    // puntos con color de la columna generada; GPS con ejes invertidos
    let req = test::TestRequest::get().uri(&format!("/projects/{}/points", proyecto)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let p0 = &body["points"][0];
    assert_eq!(p0["color"], "#ff0000");
    assert_eq!(p0["lat"], 7.9);
    assert_eq!(p0["props"]["Id. Orden Trabajo"], "1");
    assert_eq!(body["points"][1]["color"], "#000000");

    // asegurar columnas y asignar dos órdenes a una correría
    let req = test::TestRequest::post().uri(&format!("/projects/{}/ensure-columns", proyecto)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/projects/{}/update-record", proyecto))
        .set_json(json!({"idOrdenTrabajo": "1", "description": "Norte", "color": "#00ff00"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/projects/{}/update-records", proyecto))
        .set_json(json!({"ids": [3, 99], "description": "Norte", "color": "#0000ff"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["updatedCount"], 1);
    assert_eq!(body["notFound"], json!(["99"]));

    let req = test::TestRequest::post()
        .uri(&format!("/projects/{}/update-tpl-by-description", proyecto))
        .set_json(json!({"description": "Norte", "tpl": "T-1"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["updatedCount"], 2);

    let req = test::TestRequest::get().uri(&format!("/projects/{}/correrias", proyecto)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let c = &body["correrias"][0];
    assert_eq!(c["name"], "Norte");
    assert_eq!(c["count"], 2);
    assert_eq!(c["tpl"], "T-1");
    assert_eq!(c["color"], "#00ff00");

    // el resto de columnas sigue intacto en el archivo
    let hoja = leer_hoja(data_dir.join(&proyecto)).unwrap();
    assert_eq!(hoja.filas[1].texto("Tarea"), "Revision");
    assert_eq!(hoja.filas[1].texto("Description"), "");
    assert_eq!(hoja.filas[0].texto("Color Tarea"), "#ff0000");
}

#[actix_web::test]
async fn test_validaciones_y_errores_en_espanol() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_en(dir.path());
    escribir_hoja(cfg.data_dir.join("p.xlsx"), &ordenes()).unwrap();
    let app = app!(cfg);

    let req = test::TestRequest::get().uri("/projects/notas.txt/points").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Nombre de archivo inválido");

    let req = test::TestRequest::get().uri("/projects/nada.xlsx/points").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-record")
        .set_json(json!({"description": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "idOrdenTrabajo es requerido");

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-record")
        .set_json(json!({"idOrdenTrabajo": "404"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Registro no encontrado");

    let req = test::TestRequest::get().uri("/files/p.xlsx/column-summary").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/files/p.xlsx/colorized")
        .set_json(json!({"column": "Tarea"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "column y colors son requeridos");
}

#[actix_web::test]
async fn test_merge_y_exportaciones() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_en(dir.path());
    let mut proyecto = ordenes();
    proyecto.filas[0].set("Description", "Sur");
    proyecto.sincronizar_encabezados();
    escribir_hoja(cfg.data_dir.join("p.xlsx"), &proyecto).unwrap();

    let novedades = Hoja::new(
        "Hoja1",
        Vec::new(),
        vec![
            [(COL_ID_ORDEN, "2"), ("EstadoOts", "Ejecutada")].into_iter().collect::<Fila>(),
            [(COL_ID_ORDEN, "4"), ("Tarea", "Instalacion")].into_iter().collect(),
        ],
    );
    escribir_hoja(cfg.upload_dir.join("novedades.xlsx"), &novedades).unwrap();
    let data_dir = cfg.data_dir.clone();
    let app = app!(cfg);

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/merge")
        .set_json(json!({"source": "novedades.xlsx"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["updated"], 1);
    assert_eq!(body["inserted"], 1);

    let hoja = leer_hoja(data_dir.join("p.xlsx")).unwrap();
    assert_eq!(hoja.filas.len(), 4);
    assert_eq!(hoja.filas[1].texto("EstadoOts"), "Ejecutada");
    assert_eq!(hoja.filas[1].texto("Tarea"), "Revision");

    let req = test::TestRequest::get().uri("/projects/p.xlsx/export?column=Tarea&values=Corte&columns=Id.%20Orden%20Trabajo,Tarea").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disp = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap().to_string();
    assert!(disp.contains("p-export.xlsx"));
    let bytes = test::read_body(resp).await;
    let exportada = leer_hoja_desde_bytes(bytes.to_vec()).unwrap();
    assert_eq!(exportada.encabezados, vec![COL_ID_ORDEN, "Tarea"]);
    assert_eq!(exportada.filas.len(), 2);

    let req = test::TestRequest::get().uri("/projects/p.xlsx/export/integracion").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = test::read_body(resp).await;
    let integracion = leer_hoja_desde_bytes(bytes.to_vec()).unwrap();
    assert_eq!(integracion.filas.len(), 1);
    assert_eq!(integracion.filas[0].texto("Correria"), "Sur");
    assert_eq!(integracion.filas[0].texto(COL_ID_ORDEN), "1");
}

#[actix_web::test]
async fn test_upload_multipart() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_en(dir.path());
    let upload_dir = cfg.upload_dir.clone();
    let app = app!(cfg);

    let libro = hoja_a_bytes(&ordenes()).unwrap();
    let payload = cuerpo_multipart("../ordenes.xlsx", &libro);

    let req = test::TestRequest::post()
        .uri("/upload")
        .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY)))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.ends_with("-ordenes.xlsx"));
    assert!(upload_dir.join(filename).exists());
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"][0]["Tarea"], "Corte");

    // sin archivo
    let vacio = format!("--{b}--\r\n", b = BOUNDARY);
    let req = test::TestRequest::post()
        .uri("/upload")
        .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY)))
        .set_payload(vacio)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_upload_supera_el_limite() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config_en(dir.path());
    cfg.max_upload_bytes = 16;
    let upload_dir = cfg.upload_dir.clone();
    let app = app!(cfg);

    let libro = hoja_a_bytes(&ordenes()).unwrap();
    let req = test::TestRequest::post()
        .uri("/upload")
        .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY)))
        .set_payload(cuerpo_multipart("ordenes.xlsx", &libro))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Archivo demasiado grande");
    // el parcial se borra
    assert_eq!(std::fs::read_dir(&upload_dir).unwrap().count(), 0);
}

#[actix_web::test]
async fn test_columnas_y_borrado_de_subidas() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_en(dir.path());
    escribir_hoja(cfg.upload_dir.join("ordenes.xlsx"), &ordenes()).unwrap();
    let app = app!(cfg);

    let req = test::TestRequest::get().uri("/files/ordenes.xlsx/columns").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["columns"], json!([COL_ID_ORDEN, "Tarea", "Gps"]));

    let req = test::TestRequest::delete().uri("/files/ordenes.xlsx").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Archivo borrado correctamente");

    let req = test::TestRequest::get().uri("/files").to_request();
    let files: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(files, json!([]));

    let req = test::TestRequest::delete().uri("/files/ordenes.xlsx").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_estado_correria_motivo_y_null() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_en(dir.path());
    escribir_hoja(cfg.data_dir.join("p.xlsx"), &ordenes()).unwrap();
    let data_dir = cfg.data_dir.clone();
    let app = app!(cfg);

    // "Norte " y "Norte" son la misma correría
    for (id, desc) in [(1, "Norte "), (3, "Norte")] {
        let req = test::TestRequest::post()
            .uri("/projects/p.xlsx/update-record")
            .set_json(json!({"idOrdenTrabajo": id, "description": desc}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-estado-correria")
        .set_json(json!({"description": "Norte", "estadoCorreria": "En curso"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["updatedCount"], 2);

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-estado-correria")
        .set_json(json!({"description": "  ", "estadoCorreria": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "description es requerido");

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-motivo")
        .set_json(json!({"idOrdenTrabajo": 3, "motivo": "Cliente ausente", "color": "#ff8800"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Motivo actualizado");

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-motivo")
        .set_json(json!({"motivo": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "idOrdenTrabajo es requerido");

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-motivo")
        .set_json(json!({"idOrdenTrabajo": 777, "motivo": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Registro no encontrado");

    let req = test::TestRequest::get().uri("/projects/p.xlsx/correrias").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["correrias"].as_array().unwrap().len(), 1);
    let c = &body["correrias"][0];
    assert_eq!(c["count"], 2);
    assert_eq!(c["estadoCorreria"], "En curso");
    assert_eq!(c["motivos"], json!([{"motivo": "Cliente ausente", "count": 1}]));

    // null explícito vacía la celda; el campo ausente la conserva
    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-record")
        .set_json(json!({"idOrdenTrabajo": 1, "description": null}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let hoja = leer_hoja(data_dir.join("p.xlsx")).unwrap();
    assert_eq!(hoja.filas[0].texto("Description"), "");
    assert_eq!(hoja.filas[0].texto("EstadoCorreria"), "En curso");
    assert_eq!(hoja.filas[2].texto("Color Motivo"), "#ff8800");
}

#[actix_web::test]
async fn test_update_records_sin_ids_o_sin_coincidencias() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_en(dir.path());
    escribir_hoja(cfg.data_dir.join("p.xlsx"), &ordenes()).unwrap();
    let data_dir = cfg.data_dir.clone();
    let antes = std::fs::read(data_dir.join("p.xlsx")).unwrap();
    let app = app!(cfg);

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-records")
        .set_json(json!({"ids": [], "description": "Norte"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "ids es requerido");

    let req = test::TestRequest::post()
        .uri("/projects/p.xlsx/update-records")
        .set_json(json!({"ids": ["998", 999], "description": "Norte"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Registros no encontrados");
    assert_eq!(std::fs::read(data_dir.join("p.xlsx")).unwrap(), antes);
}

#[actix_web::test]
async fn test_libro_corrupto_y_exportacion_sin_valores() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_en(dir.path());
    std::fs::write(cfg.data_dir.join("roto.xlsx"), b"no es un libro").unwrap();
    escribir_hoja(cfg.data_dir.join("p.xlsx"), &ordenes()).unwrap();
    let app = app!(cfg);

    let req = test::TestRequest::get().uri("/projects/roto.xlsx/points").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Error al leer puntos del proyecto");

    // column sin values no filtra
    let req = test::TestRequest::get().uri("/projects/p.xlsx/export?column=Tarea").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = test::read_body(resp).await;
    let exportada = leer_hoja_desde_bytes(bytes.to_vec()).unwrap();
    assert_eq!(exportada.filas.len(), 3);
}
