pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod users;

pub use error::{ErrorKind, StoreError, UserError};
pub use store::UserStore;
pub use types::User;

use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }
}
