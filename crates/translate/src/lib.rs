//! Request translation core for the toolrelay gateway.
//!
//! Turns an arbitrary caller payload plus a stored endpoint configuration
//! into one outbound HTTP call, and maps the outcome back.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod merge;
pub mod payload;

pub use config::EndpointConfig;
pub use dispatch::Dispatcher;
pub use error::{ExecuteError, Result};
