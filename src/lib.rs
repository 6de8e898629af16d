pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod maze;
pub mod types;
