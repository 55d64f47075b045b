pub mod config;
pub mod console;
pub mod logic;
pub mod model;
pub mod store;

// Export controller types
pub use logic::{ContactListController, FormMode, FormState, Outcome, UiAction, View};

// Export all model types
pub use model::*;

// Export store types
pub use store::{ApiError, ApiResult, ContactStore, HttpContactStore, MemoryContactStore};
