//! Hash-chained audit log.
//!
//! Every committed mutating operation appends exactly one record. Each
//! record's hash covers the previous record's hash, its sequence number, and
//! the canonical JSON payload of the event, so any tampering with a past
//! record breaks every later link. Aborted operations append nothing.

use custodex_types::ExchangeEvent;
use sha2::{Digest, Sha256};

const DOMAIN_SEP: &[u8] = b"custodex:audit:v1:";

/// Genesis value for the first record's `prev_hash`.
pub const GENESIS_HASH: [u8; 32] = [0u8; 32];

/// One committed audit record.
#[derive(Debug, Clone)]
pub struct EventRecord {
    /// Zero-based position in the log.
    pub seq: u64,
    pub event: ExchangeEvent,
    /// Hash of the preceding record (`GENESIS_HASH` for the first).
    pub prev_hash: [u8; 32],
    /// `SHA-256(domain_sep || prev_hash || seq || json(event))`.
    pub hash: [u8; 32],
}

/// Append-only, hash-chained event log.
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append an event, extending the hash chain.
    pub fn record(&mut self, event: ExchangeEvent) -> &EventRecord {
        let seq = self.records.len() as u64;
        let prev_hash = self.head();
        let hash = Self::link_hash(&prev_hash, seq, &event);
        tracing::debug!(
            seq,
            kind = event.kind(),
            hash = hex::encode(hash),
            "Audit event recorded"
        );
        self.records.push(EventRecord {
            seq,
            event,
            prev_hash,
            hash,
        });
        &self.records[self.records.len() - 1]
    }

    /// Hash of the most recent record, or the genesis hash for an empty log.
    #[must_use]
    pub fn head(&self) -> [u8; 32] {
        self.records.last().map_or(GENESIS_HASH, |r| r.hash)
    }

    /// All records in append order.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// The events alone, in append order.
    pub fn events(&self) -> impl Iterator<Item = &ExchangeEvent> {
        self.records.iter().map(|r| &r.event)
    }

    /// The most recent event, if any.
    #[must_use]
    pub fn last(&self) -> Option<&ExchangeEvent> {
        self.records.last().map(|r| &r.event)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute every link from genesis and check it against the stored
    /// hashes. True iff the whole chain is intact.
    #[must_use]
    pub fn verify_chain(&self) -> bool {
        let mut prev = GENESIS_HASH;
        for (i, record) in self.records.iter().enumerate() {
            if record.seq != i as u64 || record.prev_hash != prev {
                return false;
            }
            let expected = Self::link_hash(&prev, record.seq, &record.event);
            if record.hash != expected {
                return false;
            }
            prev = record.hash;
        }
        true
    }

    fn link_hash(prev_hash: &[u8; 32], seq: u64, event: &ExchangeEvent) -> [u8; 32] {
        let payload =
            serde_json::to_vec(event).expect("ExchangeEvent serialization is infallible");
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_SEP);
        hasher.update(prev_hash);
        hasher.update(seq.to_le_bytes());
        hasher.update(&payload);
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}
