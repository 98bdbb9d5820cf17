// Estructuras de datos principales: valores de celda, filas y hojas

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// Columna que identifica una orden de trabajo dentro de un proyecto.
pub const COL_ID_ORDEN: &str = "Id. Orden Trabajo";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_ESTADO_OTS: &str = "EstadoOts";
pub const COL_TPL: &str = "Tpl";
pub const COL_COLOR_CORRERIA: &str = "Color Correria";
pub const COL_ESTADO_CORRERIA: &str = "EstadoCorreria";
pub const COL_MOTIVO: &str = "Motivo";
pub const COL_COLOR_MOTIVO: &str = "Color Motivo";
pub const COL_GPS: &str = "Gps";

/// Valor de una celda. Las celdas vacías no se representan: la clave
/// simplemente no existe en la fila.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Valor {
    Texto(String),
    Numero(f64),
    Booleano(bool),
    Fecha(NaiveDateTime),
}

impl Valor {
    /// Forma textual usada para comparar claves y construir resúmenes.
    pub fn como_texto(&self) -> String {
        match self {
            Valor::Texto(s) => s.clone(),
            Valor::Numero(n) => numero_a_texto(*n),
            Valor::Booleano(b) => b.to_string(),
            Valor::Fecha(f) => f.format("%d/%m/%Y").to_string(),
        }
    }

    pub fn es_vacio(&self) -> bool {
        matches!(self, Valor::Texto(s) if s.trim().is_empty())
    }

    /// Convierte un valor JSON de un cuerpo de petición. `null`, objetos y
    /// arreglos no tienen representación en una celda.
    pub fn desde_json(v: &serde_json::Value) -> Option<Valor> {
        match v {
            serde_json::Value::String(s) => Some(Valor::Texto(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(Valor::Numero),
            serde_json::Value::Bool(b) => Some(Valor::Booleano(*b)),
            _ => None,
        }
    }
}

impl From<&str> for Valor {
    fn from(s: &str) -> Self {
        Valor::Texto(s.to_string())
    }
}

impl From<String> for Valor {
    fn from(s: String) -> Self {
        Valor::Texto(s)
    }
}

impl From<f64> for Valor {
    fn from(n: f64) -> Self {
        Valor::Numero(n)
    }
}

/// Enteros sin decimales (`123.0` -> "123"), el resto con la representación
/// decimal más corta.
pub fn numero_a_texto(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Una fila de la hoja: nombre de columna -> valor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fila {
    celdas: HashMap<String, Valor>,
}

impl Fila {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, columna: &str) -> Option<&Valor> {
        self.celdas.get(columna)
    }

    /// Texto de la columna, o cadena vacía si no existe.
    pub fn texto(&self, columna: &str) -> String {
        self.celdas.get(columna).map(Valor::como_texto).unwrap_or_default()
    }

    pub fn set(&mut self, columna: impl Into<String>, valor: impl Into<Valor>) {
        self.celdas.insert(columna.into(), valor.into());
    }

    pub fn quitar(&mut self, columna: &str) -> Option<Valor> {
        self.celdas.remove(columna)
    }

    pub fn contiene(&self, columna: &str) -> bool {
        self.celdas.contains_key(columna)
    }

    pub fn columnas(&self) -> impl Iterator<Item = &String> {
        self.celdas.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Valor)> {
        self.celdas.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.celdas.is_empty()
    }

    /// Identificador de la orden de trabajo, ya recortado. `None` si falta.
    pub fn id_orden(&self) -> Option<String> {
        let id = self.texto(COL_ID_ORDEN).trim().to_string();
        if id.is_empty() { None } else { Some(id) }
    }
}

impl<K: Into<String>, V: Into<Valor>> FromIterator<(K, V)> for Fila {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fila = Fila::new();
        for (k, v) in iter {
            fila.set(k, v);
        }
        fila
    }
}

/// Primera hoja de un libro, leída como base de datos de filas.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Hoja {
    pub nombre: String,
    pub encabezados: Vec<String>,
    pub filas: Vec<Fila>,
}

impl Hoja {
    pub fn new(nombre: impl Into<String>, encabezados: Vec<String>, filas: Vec<Fila>) -> Self {
        let mut hoja = Hoja { nombre: nombre.into(), encabezados, filas };
        hoja.sincronizar_encabezados();
        hoja
    }

    /// Agrega la columna al final de los encabezados si aún no existe.
    pub fn asegurar_encabezado(&mut self, columna: &str) {
        if !self.encabezados.iter().any(|h| h == columna) {
            self.encabezados.push(columna.to_string());
        }
    }

    /// Incorpora a los encabezados las columnas que aparecen en las filas y
    /// todavía no están registradas, en orden de primera aparición.
    pub fn sincronizar_encabezados(&mut self) {
        let mut nuevas: Vec<String> = Vec::new();
        for fila in &self.filas {
            let mut faltantes: Vec<&String> = fila
                .columnas()
                .filter(|c| !self.encabezados.contains(c) && !nuevas.contains(c))
                .collect();
            // el orden interno de la fila no es estable
            faltantes.sort();
            nuevas.extend(faltantes.into_iter().cloned());
        }
        self.encabezados.extend(nuevas);
    }
}
