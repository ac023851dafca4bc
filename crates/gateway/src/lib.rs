//! toolrelay gateway: the HTTP surface and record store wrapped around the
//! translate core. Built as a lib so integration tests can drive the router
//! in-process.

pub mod execute;
pub mod http;
pub mod records;
pub mod store;
