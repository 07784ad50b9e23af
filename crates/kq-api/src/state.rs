//! Shared application state for the Axum server.
//!
//! Both collaborator handles are built once at startup and read-only for the
//! process lifetime; requests share them through `Arc`.

use std::sync::Arc;

use crate::cluster::ClusterClient;
use crate::dispatch::Dispatcher;
use crate::interpret::QueryInterpreter;

/// Shared application state, cloned into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Read-only control-plane client.
    pub cluster: Arc<dyn ClusterClient>,
    /// Free-text-to-intent model collaborator.
    pub interpreter: Arc<dyn QueryInterpreter>,
    /// Intent router over the two handles above.
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(cluster: Arc<dyn ClusterClient>, interpreter: Arc<dyn QueryInterpreter>) -> Self {
        let dispatcher = Dispatcher::new(cluster.clone(), interpreter.clone());
        Self {
            cluster,
            interpreter,
            dispatcher,
        }
    }
}
