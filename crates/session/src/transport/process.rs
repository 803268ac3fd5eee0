use super::{Transport, forward_line};
use crate::codec::FrameCodec;
use crate::error::SessionError;
use crate::protocol::{ClientAction, SessionEvent};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Runs the agent as a child process speaking JSONL over stdio
///
/// Frames are read from the child's stdout and actions are written to its stdin. The child's
/// stderr is forwarded to the log at debug level so it never reaches the terminal view.
#[derive(Debug, Clone)]
pub struct ProcessTransport {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessTransport {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args, cwd: None }
    }

    /// Build from a `[program, args...]` command line
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Transport for ProcessTransport {
    fn name(&self) -> &str {
        "process"
    }

    async fn run(
        self: Box<Self>, events: mpsc::UnboundedSender<SessionEvent>,
        mut actions: mpsc::UnboundedReceiver<ClientAction>, cancel: CancellationToken,
    ) -> Result<(), SessionError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        let mut child = command
            .spawn()
            .map_err(|source| SessionError::Spawn { program: self.program.clone(), source })?;

        let mut stdin = child.stdin.take().ok_or(SessionError::ChannelClosed)?;
        let stdout = child.stdout.take().ok_or(SessionError::ChannelClosed)?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(target: "parley_session::agent_stderr", "{}", line);
                }
            });
        }

        tracing::info!(program = %self.program, pid = ?child.id(), "agent process started");
        if events.send(SessionEvent::Connected).is_err() {
            return Ok(());
        }

        let mut codec = FrameCodec::new();
        let mut lines = BufReader::new(stdout).lines();
        let mut actions_open = true;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("cancelling agent process");
                    child.kill().await?;
                    return Ok(());
                }
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if !forward_line(&mut codec, &line, &events) {
                                child.kill().await?;
                                return Ok(());
                            }
                        }
                        None => break,
                    }
                }
                action = actions.recv(), if actions_open => {
                    match action {
                        Some(action) => {
                            tracing::debug!(action = action.name(), "sending action to agent");
                            let frame = codec.encode(&action)?;
                            stdin.write_all(frame.as_bytes()).await?;
                            stdin.flush().await?;
                        }
                        None => actions_open = false,
                    }
                }
            }
        }

        let status = child.wait().await?;
        tracing::info!(%status, frames = codec.lines_read(), "agent process exited");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command_splits_program() {
        let command = vec!["python".to_string(), "-m".to_string(), "agent".to_string()];
        let transport = ProcessTransport::from_command(&command).unwrap();
        assert_eq!(transport.program(), "python");
        assert_eq!(transport.args, vec!["-m".to_string(), "agent".to_string()]);
    }

    #[test]
    fn test_from_command_empty() {
        assert!(ProcessTransport::from_command(&[]).is_none());
    }

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let transport = Box::new(ProcessTransport::new("/definitely/not/an/agent", Vec::new()));
        let (events, _events_rx) = mpsc::unbounded_channel();
        let (_actions_tx, actions) = mpsc::unbounded_channel();

        let result = transport.run(events, actions, CancellationToken::new()).await;
        assert!(matches!(result, Err(SessionError::Spawn { .. })));
    }
}
