pub mod adaptive;
pub mod config;
pub mod dom;
pub mod errors;
pub mod testing;

pub use adaptive::{Fingerprint, FingerprintStore, Matcher, MemoryStore, Relocation, Relocator, SqliteStore};
pub use config::{AdaptiveConfig, FingerprintConfig, MatchWeights, StoreBackend, StoreConfig};
pub use dom::{Document, Element};
pub use errors::{AdaptiveError, Result};
