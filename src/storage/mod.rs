//! Local persistence for farsight.
//!
//! Two independent JSON blobs (stats and settings) are kept in a key-value
//! store, file-backed in production and in-memory in tests.

pub mod file;
pub mod memory;
pub mod settings_store;
pub mod stats_store;
pub mod traits;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;
pub use settings_store::{SettingsStore, SETTINGS_KEY};
pub use stats_store::{StatsStore, STATS_KEY};
pub use traits::KvStore;
