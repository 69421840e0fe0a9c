//! Reconciliation between local state and an externally edited text buffer.
//!
//! The subsystem has two parts:
//! 1. **Protocol** -- compare, parse, merge, and classify one external snapshot.
//! 2. **Terminal** -- bind a [`Packet`](crate::packet::Packet) to one text
//!    endpoint and decide, per tick, whether to push canonical text back.

pub mod protocol;
pub mod terminal;

pub use protocol::{SyncOutcome, SyncProtocol};
pub use terminal::Terminal;
