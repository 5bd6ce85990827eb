//! SQLite persistence for deformation sensor readings.
//!
//! This crate stores readings in a single `deformations` table and
//! answers the three read shapes the service exposes: filtered raw
//! rows, per-period min/max extremes, and a time/value series for
//! charting.
//!
//! # Example
//!
//! ```no_run
//! use deforma_store::{ReadingFilter, Store};
//!
//! let store = Store::open("deformations.db")?;
//!
//! let filter = ReadingFilter::new()
//!     .sensor("S1")
//!     .since("2024-01-01 00:00:00");
//! let readings = store.query_readings(&filter)?;
//! # Ok::<(), deforma_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{PeriodExtremes, Reading};
pub use queries::ReadingFilter;
pub use store::Store;
