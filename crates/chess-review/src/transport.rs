//! Line-oriented duplex channel to an engine process.

use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::session::SessionError;

/// Duplex text transport to a UCI engine.
///
/// Outbound lines go through a writer task feeding the engine's stdin;
/// inbound lines arrive from a reader task draining its stdout. There is
/// exactly one inbound receiver, so whoever holds the transport mutably is
/// the single listener. Engine death is observed as the inbound channel
/// closing.
pub struct EngineTransport {
    outbound: mpsc::UnboundedSender<String>,
    inbound: mpsc::UnboundedReceiver<String>,
    child: Option<Child>,
}

impl EngineTransport {
    /// Spawn an engine subprocess and wire both pump tasks.
    pub fn spawn<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let mut child = Command::new(path.as_ref())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SessionError::Spawn(std::io::Error::other("engine stdin unavailable")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SessionError::Spawn(std::io::Error::other("engine stdout unavailable")))?;

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        tokio::spawn(async move {
            while let Some(line) = outbound_rx.recv().await {
                if stdin.write_all(line.as_bytes()).await.is_err() {
                    break;
                }
                if stdin.write_all(b"\n").await.is_err() {
                    break;
                }
                if stdin.flush().await.is_err() {
                    break;
                }
            }
        });

        let (inbound_tx, inbound) = mpsc::unbounded_channel::<String>();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if inbound_tx.send(line.trim().to_string()).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            outbound,
            inbound,
            child: Some(child),
        })
    }

    /// Build a transport over caller-supplied channels.
    ///
    /// The engine does not have to be a subprocess; anything that speaks
    /// newline-delimited UCI over a pair of channels works (an in-process
    /// engine, a worker thread, a scripted peer in tests).
    pub fn from_parts(
        outbound: mpsc::UnboundedSender<String>,
        inbound: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self {
            outbound,
            inbound,
            child: None,
        }
    }

    /// Push one command line. Non-blocking; fails only when the write side
    /// is gone, which means the engine is too.
    pub fn send(&self, line: String) -> Result<(), SessionError> {
        self.outbound
            .send(line)
            .map_err(|_| SessionError::TransportClosed)
    }

    /// Await the next inbound line. `None` means the channel closed and no
    /// further lines will ever arrive.
    pub async fn recv(&mut self) -> Option<String> {
        self.inbound.recv().await
    }

    /// Tear the transport down, killing the subprocess if there is one.
    /// Dropping the transport has the same effect via `kill_on_drop`.
    pub async fn close(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill().await;
        }
        self.inbound.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_nonexistent_engine_fails() {
        let result = EngineTransport::spawn("/nonexistent/path/to/engine");
        assert!(matches!(result, Err(SessionError::Spawn(_))));
    }

    #[tokio::test]
    async fn channel_transport_round_trip() {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let mut transport = EngineTransport::from_parts(out_tx, in_rx);

        transport.send("isready".to_string()).unwrap();
        assert_eq!(out_rx.recv().await.unwrap(), "isready");

        in_tx.send("readyok".to_string()).unwrap();
        assert_eq!(transport.recv().await.unwrap(), "readyok");
    }

    #[tokio::test]
    async fn recv_resolves_none_when_peer_drops() {
        let (out_tx, _out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let mut transport = EngineTransport::from_parts(out_tx, in_rx);

        drop(in_tx);
        assert_eq!(transport.recv().await, None);
    }
}
