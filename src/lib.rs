// Biblioteca raíz del crate `correrias`.
// Órdenes de trabajo en hojas de cálculo: lectura/escritura de libros,
// transformaciones de filas y la API HTTP que consume el mapa.
pub mod algorithm;
pub mod api_json;
pub mod config;
pub mod error;
pub mod excel;
pub mod models;
pub mod server;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
