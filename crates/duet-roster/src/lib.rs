pub mod db;
pub mod error;
pub mod manager;
pub mod types;

pub use error::{Result, RosterError};
pub use manager::{open_connection, LogStore, WorkerRoster};
pub use types::{HistoryEntry, HistoryEntryKind, Worker};

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use serde_json::json;

    fn in_memory_roster() -> WorkerRoster {
        let conn = Connection::open_in_memory().unwrap();
        let log_store = LogStore::new(conn).unwrap();
        WorkerRoster::new(log_store)
    }

    #[test]
    fn get_or_create_reports_new_then_existing() {
        let roster = in_memory_roster();
        let (worker, is_new) = roster.get_or_create("alpha").unwrap();
        assert_eq!(worker.name, "alpha");
        assert!(is_new);

        let (_, is_new_second) = roster.get_or_create("alpha").unwrap();
        assert!(!is_new_second);
    }

    #[test]
    fn record_entry_persists_and_hydrates() {
        let roster = in_memory_roster();
        roster
            .record_entry("bravo", HistoryEntryKind::Request, "do the thing", json!({}))
            .unwrap();
        roster
            .record_entry(
                "bravo",
                HistoryEntryKind::Response,
                "done",
                json!({"tools_used": []}),
            )
            .unwrap();

        let history = roster.log_store().load_history("bravo", 50).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, HistoryEntryKind::Request);
        assert_eq!(history[1].kind, HistoryEntryKind::Response);
        assert!(history[0].timestamp <= history[1].timestamp);
    }

    #[test]
    fn prune_keeps_only_most_recent_per_worker() {
        let roster = in_memory_roster();
        for i in 0..5 {
            roster
                .record_entry(
                    "charlie",
                    HistoryEntryKind::Action,
                    &format!("step {i}"),
                    json!({}),
                )
                .unwrap();
        }
        roster.log_store().prune(2).unwrap();
        let history = roster.log_store().load_history("charlie", 50).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "step 3");
        assert_eq!(history[1].content, "step 4");
    }

    #[test]
    fn list_worker_names_and_clear_history() {
        let roster = in_memory_roster();
        roster
            .record_entry("delta", HistoryEntryKind::Request, "hi", json!({}))
            .unwrap();
        roster
            .record_entry("echo", HistoryEntryKind::Request, "hi", json!({}))
            .unwrap();

        let names = roster.log_store().list_worker_names().unwrap();
        assert_eq!(names, vec!["delta".to_string(), "echo".to_string()]);

        roster.log_store().clear_history("delta").unwrap();
        let history = roster.log_store().load_history("delta", 50).unwrap();
        assert!(history.is_empty());
    }
}
