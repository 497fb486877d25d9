pub mod analytics;
pub mod cleaning;
pub mod export;
pub mod frame;
pub mod ingest;
pub mod pages;
pub mod schema;
pub mod session_store;
pub mod sessions;
