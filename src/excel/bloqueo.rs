//! Registro en memoria de candados por archivo.
//!
//! Cada ruta que modifica un proyecto hace lectura-modificación-escritura del
//! libro completo; el candado serializa esas operaciones sobre un mismo
//! archivo. Archivos distintos no se bloquean entre sí.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

static CANDADOS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

/// Devuelve el candado asociado a `path`, creándolo si no existe.
pub fn candado_para(path: &Path) -> Arc<Mutex<()>> {
    let registro = CANDADOS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = registro.lock().unwrap_or_else(|p| p.into_inner());
    Arc::clone(guard.entry(path.to_path_buf()).or_default())
}

/// Ejecuta `f` mientras se mantiene el candado del archivo.
pub fn con_candado<T>(path: &Path, f: impl FnOnce() -> T) -> T {
    let candado = candado_para(path);
    let _guard = candado.lock().unwrap_or_else(|p| p.into_inner());
    f()
}
