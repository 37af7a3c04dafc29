// Library exports for integration tests and reusable components

pub mod backend_client;
pub mod compute_gate;
pub mod config;
pub mod drive_client;
pub mod export;
pub mod import;
pub mod models;
pub mod parser_client;
pub mod project_context;
