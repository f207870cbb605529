//! HTTP transport: configuration, handlers, middleware, and shutdown control.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::*;
pub use handlers::{AppState, DisplayOrigin};
pub use module::{build_router, NetworkModule};
pub use shutdown::*;
