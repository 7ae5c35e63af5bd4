//! HTTP listener.
//!
//! Plain HTTP/1.1 on a fixed port. There is no TLS and no signal handling;
//! the process serves until it is terminated externally.

mod server;

pub use server::{start_server, Listener, ServerError};
