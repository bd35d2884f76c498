use crate::storage::LogStore;

#[derive(Clone)]
pub struct AppState {
    pub store: LogStore,
}

impl AppState {
    pub fn new(store: LogStore) -> Self {
        Self { store }
    }
}
