//! KubeQuery API — library crate for the natural-language cluster query
//! server.
//!
//! Re-exports all modules so the binary (`main.rs`) and tests can access
//! internal types like `AppState`, `build_router`, and `Dispatcher`.

pub mod cluster;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod interpret;
pub mod routes;
pub mod state;
