//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → echo.rs (copy bytes back to the peer)
//! ```
//!
//! HTTP services do not go through this layer; axum owns their accept loop.

pub mod echo;
pub mod listener;

pub use echo::EchoServer;
pub use listener::{Listener, ListenerError};
