//! Combinación de dos proyectos con semántica de upsert por `Id. Orden Trabajo`.
//!
//! - fila del origen con id existente en el destino: sus columnas pisan las
//!   del destino (primera coincidencia); el resto de columnas no se toca.
//! - fila con id nuevo: se agrega al final.
//! - fila sin id: se omite.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Fila, Hoja, COL_ID_ORDEN};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultadoCombinacion {
    pub updated: usize,
    pub inserted: usize,
    pub skipped: usize,
}

fn seleccionar<'a>(fila: &'a Fila, columnas: Option<&'a [String]>) -> Vec<(&'a String, &'a crate::models::Valor)> {
    fila.iter()
        .filter(|(c, _)| match columnas {
            Some(cols) => cols.iter().any(|x| x == *c) || c.as_str() == COL_ID_ORDEN,
            None => true,
        })
        .collect()
}

pub fn combinar(destino: &mut Hoja, origen: &Hoja, columnas: Option<&[String]>) -> ResultadoCombinacion {
    let mut indice: HashMap<String, usize> = HashMap::new();
    for (i, fila) in destino.filas.iter().enumerate() {
        if let Some(id) = fila.id_orden() {
            indice.entry(id).or_insert(i);
        }
    }

    let mut resultado = ResultadoCombinacion::default();
    for fila in &origen.filas {
        let id = match fila.id_orden() {
            Some(id) => id,
            None => {
                log::debug!("fila del origen sin {}, se omite", COL_ID_ORDEN);
                resultado.skipped += 1;
                continue;
            }
        };
        let celdas = seleccionar(fila, columnas);
        match indice.get(&id) {
            Some(&i) => {
                let objetivo = &mut destino.filas[i];
                for (c, v) in celdas {
                    if c.as_str() == COL_ID_ORDEN {
                        continue;
                    }
                    objetivo.set(c.clone(), v.clone());
                }
                resultado.updated += 1;
            }
            None => {
                let nueva: Fila = celdas.into_iter().map(|(c, v)| (c.clone(), v.clone())).collect();
                destino.filas.push(nueva);
                indice.insert(id, destino.filas.len() - 1);
                resultado.inserted += 1;
            }
        }
    }

    // encabezados del origen que faltan, en su orden original
    for h in &origen.encabezados {
        let incluida = match columnas {
            Some(cols) => cols.iter().any(|x| x == h) || h == COL_ID_ORDEN,
            None => true,
        };
        if incluida {
            destino.asegurar_encabezado(h);
        }
    }
    destino.sincronizar_encabezados();
    log::info!(
        "combinación: {} actualizadas, {} insertadas, {} omitidas",
        resultado.updated, resultado.inserted, resultado.skipped
    );
    resultado
}
