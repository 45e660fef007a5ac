//! Country directory controller.
//!
//! Keeps a windowed country list in sync with a debounced, racy search
//! stream and a single detail-view selection:
//! - Result store and incremental loader for infinite scrolling
//! - Debounced search driver and token-checked query coordinator
//! - Selection controller with an owned scroll-lock flag
//! - REST and GraphQL gateway clients, preference stores, configuration

pub mod bus;
pub mod config;
pub mod directory;
pub mod error;
pub mod event;
pub mod source;
pub mod storage;
pub mod types;

pub use config::{load_or_create_config, DirectoryConfig};
pub use directory::{spawn_directory, DirectoryHandle, DirectoryView};
pub use error::{DirectoryError, Result, SourceError, SourceResult};
pub use event::DirectoryUpdate;
pub use source::{DirectorySources, GatewayClient, RestCountriesClient};
pub use storage::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use types::{CountryDetail, CountrySummary, SearchCriterion};
