//! terminal-sync core library.
//!
//! Keeps a typed key/value store in step with a plain-text buffer that a human
//! may edit between ticks: the store and its canonical text encoding, the
//! fixed terminal schema, the reconciliation protocol, text endpoints, and
//! host configuration.

pub mod config;
pub mod endpoint;
pub mod errors;
pub mod packet;
pub mod schema;
pub mod store;
pub mod sync;

// Re-exports for convenience.
pub use config::AppConfig;
pub use endpoint::{FileEndpoint, MemoryEndpoint, TextEndpoint};
pub use packet::{CmdMode, Packet, VisualStyle};
pub use store::{KeyValueStore, Vector2, Vector4};
pub use sync::{SyncOutcome, SyncProtocol, Terminal};
