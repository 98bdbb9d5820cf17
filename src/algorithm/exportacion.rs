// Hojas derivadas para descarga: exportación filtrada e integración.

use crate::algorithm::fechas::normalizar_fecha;
use crate::algorithm::filters::{filtrar_por_valores, proyectar};
use crate::models::{
    Fila, Hoja, Valor, COL_DESCRIPTION, COL_ESTADO_CORRERIA, COL_ESTADO_OTS, COL_ID_ORDEN, COL_MOTIVO, COL_TPL,
};

/// Columnas del archivo que consume el sistema externo, en este orden.
pub const COLUMNAS_INTEGRACION: [&str; 7] = [
    "Id. Orden Trabajo",
    "Correria",
    "Tpl",
    "EstadoOts",
    "EstadoCorreria",
    "Motivo",
    "Fecha Solicitud",
];

#[derive(Debug, Clone, Default)]
pub struct FiltroExportacion {
    pub columna: Option<String>,
    pub valores: Vec<String>,
    pub columnas: Vec<String>,
}

/// Aplica el filtro (si hay columna y valores) y la proyección (si hay
/// columnas). Una columna sin valores no filtra nada.
pub fn exportacion_filtrada(hoja: &Hoja, filtro: &FiltroExportacion) -> Hoja {
    let filtrada = match &filtro.columna {
        Some(c) if !c.trim().is_empty() && !filtro.valores.is_empty() => {
            filtrar_por_valores(hoja, c, &filtro.valores)
        }
        _ => hoja.clone(),
    };
    if filtro.columnas.is_empty() {
        filtrada
    } else {
        proyectar(&filtrada, &filtro.columnas)
    }
}

/// Órdenes ya asignadas a una correría, con ids y fechas normalizados a texto.
pub fn exportacion_integracion(hoja: &Hoja) -> Hoja {
    let mut filas = Vec::new();
    for fila in &hoja.filas {
        let correria = fila.texto(COL_DESCRIPTION).trim().to_string();
        if correria.is_empty() {
            continue;
        }
        let mut salida = Fila::new();
        if let Some(id) = fila.id_orden() {
            salida.set(COL_ID_ORDEN, id);
        }
        salida.set("Correria", correria);
        for col in [COL_TPL, COL_ESTADO_OTS, COL_ESTADO_CORRERIA, COL_MOTIVO] {
            let v = fila.texto(col);
            if !v.trim().is_empty() {
                salida.set(col, Valor::Texto(v));
            }
        }
        let fecha = normalizar_fecha(fila.get("Fecha Solicitud"));
        if !fecha.is_empty() {
            salida.set("Fecha Solicitud", fecha);
        }
        filas.push(salida);
    }
    Hoja {
        nombre: "Integracion".to_string(),
        encabezados: COLUMNAS_INTEGRACION.iter().map(|s| s.to_string()).collect(),
        filas,
    }
}
