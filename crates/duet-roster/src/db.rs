use rusqlite::Connection;

use crate::error::Result;

/// Initialise the worker history table and its index. Safe to call on
/// every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS worker_history (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_name TEXT NOT NULL,
            kind        TEXT NOT NULL,
            content     TEXT NOT NULL,
            metadata    TEXT NOT NULL DEFAULT '{}',
            timestamp   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_worker_history_name
            ON worker_history(worker_name, timestamp, id);",
    )?;
    Ok(())
}
