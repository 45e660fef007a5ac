//! Search and incremental-rendering controller for the country list.

mod actor;
pub mod debounce;
mod handle;
pub mod loader;
mod protocol;
pub mod query;
pub mod results;
pub mod selection;
pub mod token;
pub mod view;


pub use debounce::SearchDebouncer;
pub use handle::{spawn_directory, DirectoryHandle};
pub use loader::{IncrementalLoader, VisibilityObserver};
pub use query::{QueryCoordinator, QueryPlan, QueryResolution};
pub use results::{ActiveSource, ResultStore};
pub use selection::{SelectionController, SelectionState, SelectionStatus, UiState};
pub use token::{DetailToken, ObserverId, QueryToken};
pub use view::DirectoryView;
