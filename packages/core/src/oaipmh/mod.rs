//! OAI-PMH 2.0 protocol engine.
//!
//! Raw parameters go through [`request::Request::parse`], are dispatched by
//! [`dispatch::Dispatcher`] and come back as a [`response::Response`], which
//! serializes to the protocol envelope. [`Engine`] wires the three together.

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod request;
pub mod response;
pub mod types;
pub mod verb;

pub use dispatch::Dispatcher;
pub use engine::{Engine, HandledRequest, SelfLink};
pub use error::{ErrorCode, ProtocolError, ProtocolErrors};
pub use request::{Request, RequestError};
pub use response::{Outcome, RequestEcho, Response};
pub use types::Payload;
pub use verb::{Argument, Verb};
