//! SQLite-backed state-tree store.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::Connection;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info};

use meteotree_types::{PointId, PointMeta, PointValue, Role, ValueKind};

use crate::error::{Error, Result};
use crate::models::StoredPoint;
use crate::schema;
use crate::traits::StateStore;

/// SQLite-based store for the data-point tree.
///
/// One row per point: the dotted id is the primary key, metadata columns
/// hold the create-once half, and the value column holds the current value
/// as JSON. Subtree operations match on the id prefix.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL mode for concurrent readers while a cycle writes
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        // Initialize schema
        schema::initialize(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of persisted points.
    pub async fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM points", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Raw row form, converted outside the rusqlite closure so id and value
/// failures map onto this crate's error taxonomy.
struct RawPoint {
    id: String,
    kind: String,
    role: String,
    unit: Option<String>,
    label: String,
    value: Option<String>,
    acknowledged: bool,
    defined_at: i64,
    updated_at: Option<i64>,
}

impl RawPoint {
    const COLUMNS: &'static str =
        "id, kind, role, unit, label, value, acknowledged, defined_at, updated_at";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawPoint {
            id: row.get(0)?,
            kind: row.get(1)?,
            role: row.get(2)?,
            unit: row.get(3)?,
            label: row.get(4)?,
            value: row.get(5)?,
            acknowledged: row.get(6)?,
            defined_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_stored(self) -> Result<StoredPoint> {
        let id = PointId::parse(&self.id).map_err(|source| Error::CorruptId {
            id: self.id.clone(),
            source,
        })?;
        let value = match self.value {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };
        Ok(StoredPoint {
            id,
            meta: PointMeta {
                kind: parse_kind(&self.kind),
                role: parse_role(&self.role),
                unit: self.unit,
                label: self.label,
            },
            value,
            acknowledged: self.acknowledged,
            defined_at: OffsetDateTime::from_unix_timestamp(self.defined_at)
                .unwrap_or(OffsetDateTime::UNIX_EPOCH),
            updated_at: self
                .updated_at
                .map(|ts| OffsetDateTime::from_unix_timestamp(ts).unwrap_or(OffsetDateTime::UNIX_EPOCH)),
        })
    }
}

fn parse_kind(s: &str) -> ValueKind {
    match s {
        "text" => ValueKind::Text,
        "bool" => ValueKind::Bool,
        _ => ValueKind::Number,
    }
}

fn parse_role(s: &str) -> Role {
    match s {
        "text" => Role::Text,
        "url" => Role::Url,
        "date" => Role::Date,
        _ => Role::Value,
    }
}

/// LIKE pattern matching everything strictly below `root`.
///
/// `_` and `%` are meaningful to LIKE and legal in id segments, so they are
/// escaped with `\`.
fn like_prefix(root: &str) -> String {
    let mut pattern = String::with_capacity(root.len() + 3);
    for ch in root.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push_str(".%");
    pattern
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn exists(&self, id: &PointId) -> Result<bool> {
        let conn = self.conn.lock().await;
        let exists: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM points WHERE id = ?",
            [id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    async fn define(&self, id: &PointId, meta: &PointMeta) -> Result<()> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let conn = self.conn.lock().await;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO points (id, kind, role, unit, label, defined_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                id.as_str(),
                meta.kind.as_str(),
                meta.role.as_str(),
                meta.unit.as_deref(),
                meta.label,
                now
            ],
        )?;

        if inserted == 0 {
            debug!("Point {} already defined, keeping existing metadata", id);
        }

        Ok(())
    }

    async fn write(&self, id: &PointId, value: &PointValue, acknowledged: bool) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE points SET value = ?2, acknowledged = ?3, updated_at = ?4 WHERE id = ?1",
            rusqlite::params![id.as_str(), json, acknowledged, now],
        )?;

        if changed == 0 {
            return Err(Error::Undefined(id.clone()));
        }

        Ok(())
    }

    async fn read(&self, id: &PointId) -> Result<Option<StoredPoint>> {
        use rusqlite::OptionalExtension;

        let raw = {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM points WHERE id = ?",
                RawPoint::COLUMNS
            ))?;
            stmt.query_row([id.as_str()], RawPoint::from_row).optional()?
        };

        raw.map(RawPoint::into_stored).transpose()
    }

    async fn ids(&self) -> Result<Vec<PointId>> {
        let raw_ids: Vec<String> = {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare("SELECT id FROM points ORDER BY id")?;
            stmt.query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };

        raw_ids
            .into_iter()
            .map(|id| {
                PointId::parse(&id).map_err(|source| Error::CorruptId {
                    id: id.clone(),
                    source,
                })
            })
            .collect()
    }

    async fn delete_subtree(&self, root: &PointId) -> Result<u64> {
        let pattern = like_prefix(root.as_str());
        let conn = self.conn.lock().await;
        let removed = conn.execute(
            "DELETE FROM points WHERE id = ?1 OR id LIKE ?2 ESCAPE '\\'",
            rusqlite::params![root.as_str(), pattern],
        )?;

        debug!("Deleted {} points under {}", removed, root);
        Ok(removed as u64)
    }
}
