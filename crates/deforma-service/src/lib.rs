//! CSV ingest and HTTP query API for deformation sensor readings.
//!
//! This crate provides a service that:
//! - Loads a semicolon-delimited source CSV into SQLite once, when the
//!   database file does not exist yet
//! - Exposes a REST API for querying the stored readings
//! - Renders per-sensor line charts as PNG
//!
//! # REST API Endpoints
//!
//! - `GET /health` - Service health check
//! - `GET /data` - Raw readings, optionally filtered by sensor and
//!   inclusive time range
//! - `GET /extremes` - Per-period min/max values for one sensor
//! - `GET /graph` - PNG line chart of one sensor over a time range
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/deforma/config.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [storage]
//! path = "~/.local/share/deforma/data.db"
//!
//! [ingest]
//! csv = "case_1.csv"
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod state;

pub use config::{Config, ConfigError, IngestConfig, ServerConfig, StorageConfig};
pub use state::AppState;
