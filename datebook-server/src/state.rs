use std::sync::Arc;

use datebook_core::Datebook;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    datebook: Arc<Datebook>,
}

impl AppState {
    pub fn new(datebook: Datebook) -> Self {
        AppState {
            datebook: Arc::new(datebook),
        }
    }

    pub fn datebook(&self) -> &Datebook {
        &self.datebook
    }
}
