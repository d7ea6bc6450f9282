pub mod coordinator;
pub mod error;
pub mod registry;
pub mod types;

pub use coordinator::{BatchCoordinator, DEFAULT_TIMEOUT_SECONDS};
pub use error::{BatchError, Result};
pub use registry::{BatchRegistry, OnBatchComplete};
pub use types::{BatchState, PendingExecution};
