//! Client plumbing around `carboard_core`: the HTTP remote-store
//! adapter and the worker-thread driver a rendering layer talks to.

pub mod api;
pub mod driver;

pub use api::HttpStore;
pub use driver::{spawn_session, SessionCommand, SessionEvent, SessionHandle};
