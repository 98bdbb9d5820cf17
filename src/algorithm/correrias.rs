//! Resumen de correrías: agrupación de órdenes por `Description`.
//!
//! Una correría no se guarda en ningún lado; se deriva cada vez agrupando las
//! filas con `Description` no vacía, en orden de primera aparición.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{
    Hoja, COL_COLOR_CORRERIA, COL_DESCRIPTION, COL_ESTADO_CORRERIA, COL_ESTADO_OTS, COL_MOTIVO, COL_TPL,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumenCorreria {
    pub name: String,
    pub count: usize,
    pub tpl: String,
    pub estado_ots: String,
    pub estado_correria: String,
    pub color: String,
    pub motivos: Vec<ConteoMotivo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConteoMotivo {
    pub motivo: String,
    pub count: usize,
}

/// Contador que recuerda el orden de primera aparición para desempatar.
#[derive(Debug, Default)]
struct Frecuencias {
    orden: Vec<String>,
    conteos: HashMap<String, usize>,
}

impl Frecuencias {
    fn agregar(&mut self, valor: &str) {
        let v = valor.trim();
        if v.is_empty() {
            return;
        }
        match self.conteos.get_mut(v) {
            Some(c) => *c += 1,
            None => {
                self.orden.push(v.to_string());
                self.conteos.insert(v.to_string(), 1);
            }
        }
    }

    /// Valor más frecuente; ante empate gana el primero que apareció.
    fn mas_frecuente(&self) -> String {
        let mut mejor: Option<(&String, usize)> = None;
        for v in &self.orden {
            let c = self.conteos.get(v).copied().unwrap_or(0);
            if mejor.map_or(true, |(_, mc)| c > mc) {
                mejor = Some((v, c));
            }
        }
        mejor.map(|(v, _)| v.clone()).unwrap_or_default()
    }

    fn en_orden(&self) -> Vec<(String, usize)> {
        self.orden
            .iter()
            .map(|v| (v.clone(), self.conteos.get(v).copied().unwrap_or(0)))
            .collect()
    }
}

#[derive(Debug, Default)]
struct Grupo {
    count: usize,
    tpl: Frecuencias,
    estado_ots: Frecuencias,
    estado_correria: Frecuencias,
    color: Frecuencias,
    motivos: Frecuencias,
}

pub fn resumen_correrias(hoja: &Hoja) -> Vec<ResumenCorreria> {
    let mut nombres: Vec<String> = Vec::new();
    let mut grupos: HashMap<String, Grupo> = HashMap::new();

    for fila in &hoja.filas {
        let nombre = fila.texto(COL_DESCRIPTION).trim().to_string();
        if nombre.is_empty() {
            continue;
        }
        if !grupos.contains_key(&nombre) {
            nombres.push(nombre.clone());
        }
        let g = grupos.entry(nombre).or_default();
        g.count += 1;
        g.tpl.agregar(&fila.texto(COL_TPL));
        g.estado_ots.agregar(&fila.texto(COL_ESTADO_OTS));
        g.estado_correria.agregar(&fila.texto(COL_ESTADO_CORRERIA));
        g.color.agregar(&fila.texto(COL_COLOR_CORRERIA));
        g.motivos.agregar(&fila.texto(COL_MOTIVO));
    }

    nombres
        .into_iter()
        .filter_map(|nombre| {
            let g = grupos.remove(&nombre)?;
            Some(ResumenCorreria {
                count: g.count,
                tpl: g.tpl.mas_frecuente(),
                estado_ots: g.estado_ots.mas_frecuente(),
                estado_correria: g.estado_correria.mas_frecuente(),
                color: g.color.mas_frecuente(),
                motivos: g
                    .motivos
                    .en_orden()
                    .into_iter()
                    .map(|(motivo, count)| ConteoMotivo { motivo, count })
                    .collect(),
                name: nombre,
            })
        })
        .collect()
}
