use crate::charm::MinioCharm;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub charm: Arc<MinioCharm>,
}
