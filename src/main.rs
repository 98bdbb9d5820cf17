// --- Correrías: servidor de órdenes de trabajo ---

use correrias::config::Configuracion;
use correrias::run_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // `.env` antes del logger para que RUST_LOG también pueda venir de ahí
    let _ = dotenv::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Configuracion::desde_entorno();
    log::info!("=== Correrías (API) ===");
    log::info!("proyectos en {:?}, subidas en {:?}", config.data_dir, config.upload_dir);
    run_server(config).await
}
