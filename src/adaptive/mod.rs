pub mod fingerprint;
pub mod matcher;
pub mod relocator;
pub mod store;

pub use fingerprint::{AdaptiveRecord, Fingerprint};
pub use matcher::Matcher;
pub use relocator::{Relocation, Relocator};
pub use store::{FingerprintStore, MemoryStore, SqliteStore};
