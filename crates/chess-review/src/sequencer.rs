//! Serialized command batches against the engine transport.

use std::time::Duration;

use uci_protocol::EngineCommand;

use crate::session::SessionError;
use crate::transport::EngineTransport;

/// Sends an ordered command batch and collects every response line up to and
/// including the first one matching a terminal prefix.
///
/// At most one batch can be in flight per transport: a sequencer holds the
/// transport's only inbound receiver by mutable borrow, so a second batch
/// cannot even be constructed until the first has returned. That borrow is
/// what keeps two requests from interleaving each other's response lines.
pub struct CommandSequencer<'a> {
    transport: &'a mut EngineTransport,
    timeout: Duration,
}

impl<'a> CommandSequencer<'a> {
    pub(crate) fn new(transport: &'a mut EngineTransport, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Issue `commands` in order, then await response lines until one starts
    /// with `terminal_prefix`. All received lines are returned in arrival
    /// order, terminal line included.
    ///
    /// # Errors
    ///
    /// - [`SessionError::TransportClosed`] when the channel closes before the
    ///   terminal line arrives; the call never hangs on a dead engine.
    /// - [`SessionError::Timeout`] when the terminal line does not arrive
    ///   within the configured response timeout.
    pub async fn send_commands(
        &mut self,
        commands: &[EngineCommand],
        terminal_prefix: &str,
    ) -> Result<Vec<String>, SessionError> {
        for command in commands {
            self.transport.send(command.to_uci())?;
        }

        let collect = async {
            let mut lines = Vec::new();
            loop {
                match self.transport.recv().await {
                    Some(line) => {
                        let terminal = line.starts_with(terminal_prefix);
                        lines.push(line);
                        if terminal {
                            return Ok(lines);
                        }
                    }
                    None => return Err(SessionError::TransportClosed),
                }
            }
        };

        match tokio::time::timeout(self.timeout, collect).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn scripted() -> (
        EngineTransport,
        mpsc::UnboundedReceiver<String>,
        mpsc::UnboundedSender<String>,
    ) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        (EngineTransport::from_parts(out_tx, in_rx), out_rx, in_tx)
    }

    #[tokio::test]
    async fn collects_through_terminal_line_only() {
        let (mut transport, mut commands, lines) = scripted();
        lines.send("info depth 1 pv e2e4".to_string()).unwrap();
        lines.send("info depth 2 pv e2e4".to_string()).unwrap();
        lines.send("bestmove e2e4".to_string()).unwrap();
        lines.send("info after terminal".to_string()).unwrap();

        let mut seq = CommandSequencer::new(&mut transport, Duration::from_secs(1));
        let received = seq
            .send_commands(&[EngineCommand::go_depth(2)], "bestmove")
            .await
            .unwrap();

        assert_eq!(commands.recv().await.unwrap(), "go depth 2");
        assert_eq!(
            received,
            vec![
                "info depth 1 pv e2e4",
                "info depth 2 pv e2e4",
                "bestmove e2e4",
            ]
        );
    }

    #[tokio::test]
    async fn commands_are_issued_in_order() {
        let (mut transport, mut commands, lines) = scripted();
        lines.send("readyok".to_string()).unwrap();

        let mut seq = CommandSequencer::new(&mut transport, Duration::from_secs(1));
        seq.send_commands(
            &[EngineCommand::UciNewGame, EngineCommand::IsReady],
            "readyok",
        )
        .await
        .unwrap();

        assert_eq!(commands.recv().await.unwrap(), "ucinewgame");
        assert_eq!(commands.recv().await.unwrap(), "isready");
    }

    #[tokio::test]
    async fn closed_channel_is_an_error_not_a_hang() {
        let (mut transport, _commands, lines) = scripted();
        lines.send("info depth 1".to_string()).unwrap();
        drop(lines);

        let mut seq = CommandSequencer::new(&mut transport, Duration::from_secs(1));
        let err = seq
            .send_commands(&[EngineCommand::go_depth(10)], "bestmove")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::TransportClosed));
    }

    #[tokio::test]
    async fn silent_engine_times_out() {
        let (mut transport, _commands, _lines) = scripted();

        let mut seq = CommandSequencer::new(&mut transport, Duration::from_millis(20));
        let err = seq
            .send_commands(&[EngineCommand::IsReady], "readyok")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Timeout(_)));
    }

    #[tokio::test]
    async fn sequential_batches_do_not_interleave() {
        let (mut transport, _commands, lines) = scripted();
        lines.send("readyok".to_string()).unwrap();
        lines.send("bestmove d2d4".to_string()).unwrap();

        // First batch consumes exactly up to its terminal; the second sees
        // only what the first left behind.
        let mut seq = CommandSequencer::new(&mut transport, Duration::from_secs(1));
        let first = seq
            .send_commands(&[EngineCommand::IsReady], "readyok")
            .await
            .unwrap();
        assert_eq!(first, vec!["readyok"]);

        let second = seq
            .send_commands(&[EngineCommand::go_depth(1)], "bestmove")
            .await
            .unwrap();
        assert_eq!(second, vec!["bestmove d2d4"]);
    }
}
