//! mooring-server: thin HTTP surface over the mooring-core pool lifecycle.
//!
//! Routes, handlers, and the auth middleware are deliberately small: they
//! borrow the pool through [`AppState`] and call the typed query façade.
//! All the engineering lives in mooring-core.

pub mod app;
pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use app::{build_router, run, ServerArgs};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
