use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::db::init_db;
use crate::error::Result;
use crate::types::{HistoryEntry, HistoryEntryKind, Worker};

/// Durable append-only log of per-worker `HistoryEntry` rows (spec.md
/// §4.5 Log Store).
pub struct LogStore {
    conn: Mutex<Connection>,
}

impl LogStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one entry, assigning its ordering timestamp and row id.
    pub fn save_entry(
        &self,
        worker_name: &str,
        kind: HistoryEntryKind,
        content: &str,
        metadata: &serde_json::Value,
    ) -> Result<HistoryEntry> {
        let conn = self.conn.lock().unwrap();
        let timestamp = Utc::now();
        conn.execute(
            "INSERT INTO worker_history (worker_name, kind, content, metadata, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                worker_name,
                kind.to_string(),
                content,
                metadata.to_string(),
                timestamp.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(HistoryEntry {
            id,
            worker_name: worker_name.to_string(),
            kind,
            content: content.to_string(),
            timestamp,
            metadata: metadata.clone(),
        })
    }

    /// Load a worker's history in chronological (ascending) order, most
    /// recent `limit` entries. Ties broken by the insertion-assigned row
    /// id, matching the ordering invariant of the log.
    pub fn load_history(&self, worker_name: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, worker_name, kind, content, metadata, timestamp
             FROM worker_history
             WHERE worker_name = ?1
             ORDER BY timestamp DESC, id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![worker_name, limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, worker_name, kind, content, metadata, timestamp) = row?;
            let kind = kind
                .parse::<HistoryEntryKind>()
                .unwrap_or(HistoryEntryKind::Request);
            let metadata: serde_json::Value =
                serde_json::from_str(&metadata).unwrap_or(serde_json::json!({}));
            let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            entries.push(HistoryEntry {
                id,
                worker_name,
                kind,
                content,
                timestamp,
                metadata,
            });
        }
        entries.reverse();
        Ok(entries)
    }

    pub fn list_worker_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT DISTINCT worker_name FROM worker_history ORDER BY worker_name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    pub fn clear_history(&self, worker_name: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM worker_history WHERE worker_name = ?1",
            params![worker_name],
        )?;
        Ok(())
    }

    /// Keep only the most recent `max_per_worker` entries for every
    /// worker. Intended to run periodically, not on the hot path.
    pub fn prune(&self, max_per_worker: usize) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT DISTINCT worker_name FROM worker_history")?;
        let names: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<_, _>>()?;
        drop(stmt);
        for name in names {
            conn.execute(
                "DELETE FROM worker_history
                 WHERE worker_name = ?1
                 AND id NOT IN (
                     SELECT id FROM worker_history
                     WHERE worker_name = ?1
                     ORDER BY timestamp DESC, id DESC
                     LIMIT ?2
                 )",
                params![name, max_per_worker as i64],
            )?;
        }
        Ok(())
    }
}

/// Open (and initialise) a `rusqlite::Connection` at `path`.
pub fn open_connection(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    init_db(&conn)?;
    Ok(conn)
}

/// In-memory map of live `Worker`s, lazily hydrated from the `LogStore`
/// (spec.md §4.5 Worker Roster).
pub struct WorkerRoster {
    log_store: LogStore,
    workers: Mutex<HashMap<String, Worker>>,
}

impl WorkerRoster {
    pub fn new(log_store: LogStore) -> Self {
        Self {
            log_store,
            workers: Mutex::new(HashMap::new()),
        }
    }

    pub fn log_store(&self) -> &LogStore {
        &self.log_store
    }

    /// Get the named worker, creating it (and hydrating its history from
    /// the Log Store) on first reference. Returns `(worker, is_new)`.
    ///
    /// Grounded on `SessionManager::get_or_create`'s insert-or-ignore plus
    /// read-back pattern, adapted to an in-memory map guarded by a single
    /// mutex rather than a SQL unique index — there is no concurrent
    /// writer to race against here, but the check/create-if-absent/return
    /// shape is the same.
    pub fn get_or_create(&self, name: &str) -> Result<(Worker, bool)> {
        let mut workers = self.workers.lock().unwrap();
        if let Some(worker) = workers.get(name) {
            return Ok((worker.clone(), false));
        }

        let history = self.log_store.load_history(name, 50)?;
        let worker = Worker {
            name: name.to_string(),
            history,
        };
        workers.insert(name.to_string(), worker.clone());
        debug!(worker = name, "created worker entry");
        Ok((worker, true))
    }

    /// Record that `worker_name` just produced `entry`, in both the
    /// in-memory roster and the durable Log Store.
    pub fn record_entry(
        &self,
        worker_name: &str,
        kind: HistoryEntryKind,
        content: &str,
        metadata: serde_json::Value,
    ) -> Result<HistoryEntry> {
        let entry = self
            .log_store
            .save_entry(worker_name, kind, content, &metadata)?;

        let mut workers = self.workers.lock().unwrap();
        let worker = workers
            .entry(worker_name.to_string())
            .or_insert_with(|| Worker::new(worker_name));
        worker.history.push(entry.clone());
        Ok(entry)
    }
}
