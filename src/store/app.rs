//! Global loading and error flags

use std::sync::Arc;
use tokio::sync::watch;

/// Two independent observable values: a loading flag and an error message.
///
/// Clones share the same values.
#[derive(Debug, Clone)]
pub struct AppStore {
    loading: Arc<watch::Sender<bool>>,
    error: Arc<watch::Sender<Option<String>>>,
}

impl Default for AppStore {
    fn default() -> Self {
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        Self {
            loading: Arc::new(loading),
            error: Arc::new(error),
        }
    }
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn set_loading(&self, value: bool) {
        self.loading.send_replace(value);
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.error.send_replace(Some(message.into()));
    }

    pub fn clear_error(&self) {
        self.error.send_replace(None);
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }
}
