//! Library entrypoint: re‑export modules

pub mod analyzer;
pub mod config;
pub mod db;
pub mod errors;
pub mod publisher;
