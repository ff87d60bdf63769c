//! Transport boundary: request/response value types and the wire trait.
//!
//! The core never names a concrete networking stack. Everything above
//! this module talks to a [`Transport`] implementation, which makes the
//! wire fully substitutable: production code injects
//! [`ReqwestTransport`], tests inject mocks.

mod client;
mod error;
mod http;


pub use client::ReqwestTransport;
pub use error::TransportError;
pub use http::{HttpRequest, HttpResponse, Transport};
