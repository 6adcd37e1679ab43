use prometheus_client::registry::Registry;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::domain::Library;

pub struct AppState {
    pub library: Library,
    pub shutdown_token: CancellationToken,
    pub registry: RwLock<Registry>,
}

impl AppState {
    pub fn new(library: Library, shutdown_token: CancellationToken) -> Self {
        Self {
            library,
            shutdown_token,
            registry: RwLock::new(<Registry>::default()),
        }
    }
}
