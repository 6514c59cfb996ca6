pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod model;
pub mod server;
pub mod types;
pub mod vectorizer;
