//! Raw TCP echo server, the target of the mesh's TCP routing tests.
//!
//! Every byte read from a connection is written straight back until the peer
//! closes its side.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::broadcast;
use tokio::time;

use crate::net::listener::{Accepted, Listener, ListenerError};

/// Port the echo server listens on unless told otherwise.
pub const DEFAULT_ECHO_PORT: u16 = 1111;

const BUFFER_SIZE: usize = 1024;

/// Back-off after an accept error that is not specific to one client.
pub const ACCEPT_ERROR_PAUSE: Duration = Duration::from_millis(100);

pub struct EchoServer {
    listener: Listener,
}

impl EchoServer {
    pub fn new(listener: Listener) -> Self {
        Self { listener }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and echo until shutdown.
    ///
    /// A failed accept never stops the server. Errors tied to one client are
    /// skipped; anything else (file descriptor exhaustion in particular)
    /// pauses accepting for [`ACCEPT_ERROR_PAUSE`] before trying again.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ListenerError> {
        tracing::info!("Echo server waiting for connections");

        loop {
            let accepted = tokio::select! {
                accepted = self.listener.accept() => accepted,
                _ = shutdown.recv() => break,
            };

            match accepted {
                Ok(client) => {
                    tokio::spawn(echo(client));
                }
                Err(ListenerError::Accept(e)) => match accept_error_pause(&e) {
                    None => tracing::debug!(error = %e, "Client went away during accept"),
                    Some(pause) => {
                        tracing::warn!(error = %e, pause_ms = pause.as_millis() as u64, "Accept failed, pausing");
                        tokio::select! {
                            _ = time::sleep(pause) => {}
                            _ = shutdown.recv() => break,
                        }
                    }
                },
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Echo server received shutdown signal");
        Ok(())
    }
}

/// How long to stop accepting after `error`. `None` for errors that only
/// concern the client being accepted.
fn accept_error_pause(error: &io::Error) -> Option<Duration> {
    match error.kind() {
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::Interrupted => None,
        _ => Some(ACCEPT_ERROR_PAUSE),
    }
}

async fn echo(client: Accepted) {
    let Accepted { mut stream, peer, .. } = client;
    tracing::info!(peer = %peer, "Client connected");
    let mut buf = [0u8; BUFFER_SIZE];
    let mut total = 0usize;

    loop {
        let read = match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(peer = %peer, error = %e, "Read failed");
                break;
            }
        };
        tracing::debug!(peer = %peer, bytes = read, "Received data");

        if let Err(e) = stream.write_all(&buf[..read]).await {
            tracing::warn!(peer = %peer, error = %e, "Write failed");
            break;
        }
        total += read;
    }

    tracing::info!(peer = %peer, bytes = total, "Client disconnected");
}
