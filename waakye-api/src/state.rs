//! Shared application state handed to every handler.

use std::sync::Arc;
use std::time::Instant;

use crate::services::VendorDirectory;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<VendorDirectory>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(directory: VendorDirectory) -> Self {
        Self {
            directory: Arc::new(directory),
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(Arc<VendorDirectory>, directory);
crate::impl_from_ref!(Instant, start_time);
