// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub rust_log: String,
    /// Optional JSON file of topics and questions loaded at startup.
    pub seed_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let seed_file = env::var("SEED_FILE").ok();

        Self {
            bind_addr,
            rust_log,
            seed_file,
        }
    }
}
