//! Append-only audit trail of successful assignments.

use std::time::{SystemTime, UNIX_EPOCH};

use keyroute_fleet::{KeyId, ServerId};
use parking_lot::Mutex;

use crate::config::{DispatchConfig, MAX_AUDIT_CAPACITY};

/// One successful assignment. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditRecord {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    /// Transaction that received the key.
    pub transaction_id: String,
    /// Server the key was reserved on.
    pub server_id: ServerId,
    /// Reserved key.
    pub key_id: KeyId,
    /// Unix timestamp in milliseconds, when timestamps are enabled.
    pub recorded_at_ms: Option<u64>,
}

impl AuditRecord {
    /// `(transaction, server, key)` view of the record.
    pub fn as_tuple(&self) -> (&str, &str, &str) {
        (&self.transaction_id, &self.server_id, &self.key_id)
    }
}

/// Ordered, append-only record of assignments.
///
/// Append order is assignment order. The coordinator appends from inside a
/// server's reservation critical section, so records for any one server
/// appear in the order their reservations happened.
#[derive(Debug, Default)]
pub struct AuditLog {
    records: Mutex<Vec<AuditRecord>>,
    record_timestamps: bool,
}

impl AuditLog {
    /// Create an empty log without timestamps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log sized and stamped per `config`.
    pub fn with_config(config: &DispatchConfig) -> Self {
        Self {
            records: Mutex::new(Vec::with_capacity(config.audit_capacity.min(MAX_AUDIT_CAPACITY))),
            record_timestamps: config.record_timestamps,
        }
    }

    /// Append a record and return a copy of it.
    pub fn append(
        &self,
        transaction_id: impl Into<String>,
        server_id: impl Into<ServerId>,
        key_id: impl Into<KeyId>,
    ) -> AuditRecord {
        let recorded_at_ms = self.record_timestamps.then(now_unix_ms);
        let mut records = self.records.lock();
        let record = AuditRecord {
            sequence: records.len() as u64,
            transaction_id: transaction_id.into(),
            server_id: server_id.into(),
            key_id: key_id.into(),
            recorded_at_ms,
        };
        records.push(record.clone());
        record
    }

    /// Copy of every record, in append order.
    pub fn snapshot(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// `(transaction, server, key)` tuples, in append order.
    pub fn entries(&self) -> Vec<(String, String, String)> {
        self.records
            .lock()
            .iter()
            .map(|r| {
                (
                    r.transaction_id.clone(),
                    r.server_id.clone(),
                    r.key_id.clone(),
                )
            })
            .collect()
    }

    /// Records for one server, in append order.
    pub fn for_server(&self, server_id: &str) -> Vec<AuditRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.server_id == server_id)
            .cloned()
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_sequence() {
        let log = AuditLog::new();
        let first = log.append("T1", "C", "kC1");
        let second = log.append("T2", "B", "kB1");

        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.snapshot(), vec![first, second]);
    }

    #[test]
    fn entries_are_tuples_in_order() {
        let log = AuditLog::new();
        log.append("T1", "C", "kC1");
        log.append("T2", "B", "kB1");

        assert_eq!(
            log.entries(),
            vec![
                ("T1".to_string(), "C".to_string(), "kC1".to_string()),
                ("T2".to_string(), "B".to_string(), "kB1".to_string()),
            ]
        );
    }

    #[test]
    fn oversized_capacity_hint_is_clamped() {
        let config = DispatchConfig {
            record_timestamps: false,
            audit_capacity: usize::MAX,
        };
        let log = AuditLog::with_config(&config);
        log.append("T1", "A", "k");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn timestamps_follow_config() {
        let plain = AuditLog::new();
        assert_eq!(plain.append("T1", "A", "k").recorded_at_ms, None);

        let stamped = AuditLog::with_config(&DispatchConfig::default());
        assert!(stamped.append("T1", "A", "k").recorded_at_ms.is_some());
    }

    #[test]
    fn filter_by_server() {
        let log = AuditLog::new();
        log.append("T1", "C", "kC1");
        log.append("T2", "B", "kB1");
        log.append("T3", "C", "kC1");

        let for_c: Vec<_> = log.for_server("C").iter().map(|r| r.sequence).collect();
        assert_eq!(for_c, vec![0, 2]);
        assert!(log.for_server("Z").is_empty());
    }

    #[test]
    fn snapshot_is_detached() {
        let log = AuditLog::new();
        log.append("T1", "A", "k");
        let snapshot = log.snapshot();
        log.append("T2", "A", "k");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(snapshot[0].as_tuple(), ("T1", "A", "k"));
    }
}
