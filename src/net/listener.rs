//! Bounded TCP listener for the echo server.
//!
//! At most `max_connections` clients are served at once; further clients
//! queue in the kernel backlog until a slot frees up.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::ListenerConfig;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("invalid listen address {address:?}")]
    Address { address: String },

    #[error("cannot listen on {address}: {source}")]
    Bind { address: SocketAddr, source: io::Error },

    #[error("accept failed: {0}")]
    Accept(io::Error),

    #[error("connection slots closed")]
    Closed,
}

pub struct Listener {
    socket: TcpListener,
    slots: Arc<Semaphore>,
}

/// An accepted client. The slot is released when this is dropped.
#[derive(Debug)]
pub struct Accepted {
    pub stream: TcpStream,
    pub peer: SocketAddr,
    _slot: OwnedSemaphorePermit,
}

impl Listener {
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let address: SocketAddr = config
            .bind_address
            .parse()
            .map_err(|_| ListenerError::Address {
                address: config.bind_address.clone(),
            })?;

        let socket = TcpListener::bind(address)
            .await
            .map_err(|source| ListenerError::Bind { address, source })?;

        tracing::info!(
            address = %socket.local_addr().unwrap_or(address),
            max_connections = config.max_connections,
            "TCP listener bound"
        );

        Ok(Self {
            socket,
            slots: Arc::new(Semaphore::new(config.max_connections.max(1))),
        })
    }

    /// Wait for a free slot, then for a client.
    pub async fn accept(&self) -> Result<Accepted, ListenerError> {
        let slot = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ListenerError::Closed)?;

        let (stream, peer) = self.socket.accept().await.map_err(ListenerError::Accept)?;
        tracing::debug!(peer = %peer, free_slots = self.slots.available_permits(), "Client accepted");

        Ok(Accepted {
            stream,
            peer,
            _slot: slot,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    #[cfg(test)]
    pub fn free_slots(&self) -> usize {
        self.slots.available_permits()
    }
}
