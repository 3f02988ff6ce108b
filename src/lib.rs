pub mod aggregate;
pub mod api_types;
pub mod config;
pub mod export;
pub mod fetch;
pub mod format;
pub mod highlight;
pub mod models;
pub mod orchestrator;
pub mod paginate;
pub mod render;
pub mod state;
