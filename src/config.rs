// Configuración del servicio leída del entorno. `main` carga `.env` antes.

use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Configuracion {
    pub host: String,
    pub puerto: u16,
    /// Directorio de proyectos (libros ya coloreados que se editan en el mapa)
    pub data_dir: PathBuf,
    /// Directorio de archivos subidos sin procesar
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub lat_defecto: f64,
    pub lng_defecto: f64,
    pub cors_permisivo: bool,
}

impl Default for Configuracion {
    fn default() -> Self {
        Configuracion {
            host: "0.0.0.0".to_string(),
            puerto: 3000,
            data_dir: PathBuf::from("data"),
            upload_dir: PathBuf::from("upload"),
            max_upload_bytes: 200 * 1024 * 1024,
            lat_defecto: 7.896031,
            lng_defecto: -72.504365,
            cors_permisivo: false,
        }
    }
}

fn var_parseada<T: std::str::FromStr>(nombre: &str) -> Option<T> {
    match env::var(nombre) {
        Ok(v) if !v.trim().is_empty() => match v.trim().parse::<T>() {
            Ok(p) => Some(p),
            Err(_) => {
                log::warn!("valor inválido para {}: '{}', se usa el predeterminado", nombre, v);
                None
            }
        },
        _ => None,
    }
}

/// Límite de subida en bytes; `None` si `mb` no cabe en `usize`.
fn mb_a_bytes(mb: usize) -> Option<usize> {
    mb.checked_mul(1024 * 1024)
}

impl Configuracion {
    /// Lee las variables conocidas; las ausentes o inválidas toman el valor
    /// predeterminado.
    pub fn desde_entorno() -> Self {
        let d = Configuracion::default();
        Configuracion {
            host: env::var("HOST").ok().filter(|h| !h.trim().is_empty()).unwrap_or(d.host),
            puerto: var_parseada("PORT").unwrap_or(d.puerto),
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(d.data_dir),
            upload_dir: env::var("UPLOAD_DIR").map(PathBuf::from).unwrap_or(d.upload_dir),
            max_upload_bytes: var_parseada::<usize>("MAX_UPLOAD_MB")
                .and_then(|mb| {
                    let bytes = mb_a_bytes(mb);
                    if bytes.is_none() {
                        log::warn!("valor inválido para MAX_UPLOAD_MB: '{}', se usa el predeterminado", mb);
                    }
                    bytes
                })
                .unwrap_or(d.max_upload_bytes),
            lat_defecto: var_parseada("DEFAULT_LAT").unwrap_or(d.lat_defecto),
            lng_defecto: var_parseada("DEFAULT_LNG").unwrap_or(d.lng_defecto),
            cors_permisivo: var_parseada("CORS_PERMISIVO").unwrap_or(d.cors_permisivo),
        }
    }

    /// Crea los directorios de datos y subidas si no existen.
    pub fn preparar_directorios(&self) -> std::io::Result<()> {
        for dir in [&self.data_dir, &self.upload_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
                log::info!("directorio creado: {:?}", dir);
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.puerto)
    }
}
