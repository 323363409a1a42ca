//! HTTP transport module
//!
//! The seam between the object model and the wire. Everything above this
//! module talks to a [`Transport`]; the [`HttpTransport`] implementation
//! issues the requests with reqwest.
//!
//! # Status mapping
//!
//! - **2xx**: parsed JSON body, or `null` when the body is empty
//! - **404**: `NotFound`
//! - **409**: `Conflict` (rebalance in progress)
//! - **other 4xx**: `InvalidRequest` with the server's message
//! - **5xx**: `ServerError`
//! - **network failure or timeout**: `Unreachable`
//!
//! No request is ever retried here.

mod client;
mod rate_limit;

pub use client::{HttpTransport, Transport};
pub use rate_limit::{Throttle, ThrottleConfig};
