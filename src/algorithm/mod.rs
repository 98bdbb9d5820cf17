//! Transformaciones puras sobre hojas en memoria.
//!
//! Ninguna función de este módulo toca el disco: las rutas leen el libro,
//! llaman a estas funciones y escriben el resultado.

pub mod actualizacion;
pub mod correrias;
pub mod exportacion;
pub mod fechas;
pub mod filters;
pub mod gps;
pub mod merge;
pub mod puntos;

pub use actualizacion::{actualizar_por_description, actualizar_por_id, actualizar_por_ids, Cambio, ResultadoIds};
pub use correrias::{resumen_correrias, ResumenCorreria};
pub use exportacion::{exportacion_filtrada, exportacion_integracion, FiltroExportacion};
pub use fechas::normalizar_fecha;
pub use filters::{asegurar_columnas, colorizar, resumen_columna, ConteoValor};
pub use gps::{parse_gps, Coordenada};
pub use merge::{combinar, ResultadoCombinacion};
pub use puntos::{hoja_a_puntos, Punto};

use crate::models::{
    COL_COLOR_CORRERIA, COL_COLOR_MOTIVO, COL_DESCRIPTION, COL_ESTADO_CORRERIA, COL_ESTADO_OTS, COL_MOTIVO, COL_TPL,
};

/// Columnas que el mapa necesita para asignar correrías.
pub const COLUMNAS_CORRERIA: [&str; 7] = [
    COL_DESCRIPTION,
    COL_ESTADO_OTS,
    COL_TPL,
    COL_COLOR_CORRERIA,
    COL_ESTADO_CORRERIA,
    COL_MOTIVO,
    COL_COLOR_MOTIVO,
];
