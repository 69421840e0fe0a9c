//! The reconciliation state machine.
//!
//! ```text
//! Compare ─┬─ text identical ─────────────────────────────► NoChange
//!          └─ parse ─┬─ fails ──────────────────────────────► Rejected
//!                    └─ ok ─► merge known keys ─┬─ differs ─► Accepted
//!                                               └─ equal ───► Synchronized
//! ```
//!
//! Only keys already present in the local store are merged. Keys the external
//! text adds (including new pressed-key flags) are never copied in, but they
//! still make the post-merge comparison fail, which yields `Accepted`.

use std::fmt;

use tracing::{debug, info, warn};

use crate::errors::ParseError;
use crate::store::KeyValueStore;

/// Result of one reconciliation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// External text already equals the local canonical text.
    NoChange,
    /// External text does not parse; nothing was touched.
    Rejected(ParseError),
    /// External text carries differences the closed schema cannot absorb; it
    /// stays authoritative for this cycle and must not be overwritten.
    Accepted,
    /// After merging, local state matches the external document; the caller
    /// should write the local canonical text back out.
    Synchronized,
}

impl SyncOutcome {
    /// Whether the external side holds an edit that must not be overwritten.
    pub fn is_external_edit(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Whether the caller should push local canonical text to the endpoint.
    pub fn needs_push(&self) -> bool {
        matches!(self, Self::Synchronized)
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChange => write!(f, "no_change"),
            Self::Rejected(_) => write!(f, "rejected"),
            Self::Accepted => write!(f, "accepted"),
            Self::Synchronized => write!(f, "synchronized"),
        }
    }
}

/// Stateless reconciliation engine.
pub struct SyncProtocol;

impl SyncProtocol {
    /// Reconcile `local` against one snapshot of external text.
    ///
    /// `local` is only modified when the external text parses; on
    /// [`SyncOutcome::Rejected`] it is left exactly as it was.
    pub fn reconcile(local: &mut KeyValueStore, external_text: &str) -> SyncOutcome {
        if external_text == local.serialize() {
            debug!("external text matches local state");
            return SyncOutcome::NoChange;
        }

        let incoming = match KeyValueStore::parse(external_text) {
            Ok(incoming) => incoming,
            Err(e) => {
                warn!(error = %e, line = e.line(), "rejecting malformed external text");
                return SyncOutcome::Rejected(e);
            }
        };

        let merged = Self::merge_known_keys(local, &incoming);

        if *local == incoming {
            info!(merged, "external text merged, local state now matches");
            SyncOutcome::Synchronized
        } else {
            info!(merged, "external edit accepted with unmerged differences");
            SyncOutcome::Accepted
        }
    }

    /// Copy into `local` every value whose `(section, key)` exists in both
    /// stores and differs. Returns the number of values copied.
    pub fn merge_known_keys(local: &mut KeyValueStore, incoming: &KeyValueStore) -> usize {
        let mut updates = Vec::new();
        for (section, key, value) in local.iter() {
            if let Ok(theirs) = incoming.get(section, key) {
                if theirs != value {
                    updates.push((section.to_string(), key.to_string(), theirs.to_string()));
                }
            }
        }

        for (section, key, value) in &updates {
            debug!(section = %section, key = %key, "merging external value");
            local.set(section, key, value.as_str());
        }
        updates.len()
    }
}
