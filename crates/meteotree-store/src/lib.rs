//! Local persistence for the meteotree data-point tree.
//!
//! This crate provides SQLite-based storage for weather data points,
//! keyed by dotted hierarchical ids such as `Berlin.current.temperature_2m`.
//!
//! # Features
//!
//! - Create-once point definitions (kind, role, unit, label)
//! - Value writes that never touch existing metadata
//! - Subtree deletion by id prefix for reconciliation
//! - An in-memory [`MemoryStore`] with call counters for tests
//!
//! # Example
//!
//! ```no_run
//! use meteotree_store::{SqliteStore, StateStore};
//! use meteotree_types::{PointId, PointMeta, PointValue, Role, ValueKind};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), meteotree_store::Error> {
//! let store = SqliteStore::open_default()?;
//!
//! let id = PointId::parse("Berlin.current.temperature_2m").unwrap();
//! let meta = PointMeta::new(ValueKind::Number, Role::Value, "Temperature").with_unit("°C");
//!
//! store.define(&id, &meta).await?;
//! store.write(&id, &PointValue::Number(20.5), true).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod models;
mod schema;
mod sqlite;
mod traits;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use models::StoredPoint;
pub use sqlite::SqliteStore;
pub use traits::StateStore;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/meteotree/points.db`
/// - macOS: `~/Library/Application Support/meteotree/points.db`
/// - Windows: `C:\Users\<user>\AppData\Local\meteotree\points.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("meteotree")
        .join("points.db")
}
