/// Fire-and-forget command channel to the MSAgent-AI companion process.
///
/// Every message opens a fresh connection, writes one newline-terminated
/// line, performs a single read of the reply, and closes.  There is no
/// pooling, queueing or retry: if the companion is not listening the
/// message is dropped.
///
/// The tick loop runs inside the host's frame budget.  All exchanges made
/// during one tick share a single timeout budget on a private current-thread
/// tokio runtime, and the first failure in a tick drops the rest of that
/// tick's messages without connecting.
use std::fmt;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::runtime::Runtime;

use crate::config::ChannelConfig;

/// Well-known pipe name the companion listens on.
#[cfg(windows)]
pub const DEFAULT_ENDPOINT: &str = r"\\.\pipe\MSAgentAI";

/// Socket name (under the temp directory) used where named pipes are unavailable.
#[cfg(not(windows))]
pub const DEFAULT_SOCKET_NAME: &str = "msagent-ai.sock";

/// Returns the platform default endpoint.
pub fn default_endpoint() -> String {
    #[cfg(windows)]
    {
        DEFAULT_ENDPOINT.to_string()
    }
    #[cfg(not(windows))]
    {
        std::env::temp_dir()
            .join(DEFAULT_SOCKET_NAME)
            .to_string_lossy()
            .into_owned()
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// One line of the companion protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    /// Short utterance read out verbatim.
    Speak(&'a str),
    /// Prompt the companion should react to in its own words.
    Chat(&'a str),
    Animation(&'a str),
    Ping,
    Version,
    Hide,
    Show,
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Speak(text) => write!(f, "SPEAK:{}", one_line(text)),
            Command::Chat(text) => write!(f, "CHAT:{}", one_line(text)),
            Command::Animation(name) => write!(f, "ANIMATION:{}", one_line(name)),
            Command::Ping => f.write_str("PING"),
            Command::Version => f.write_str("VERSION"),
            Command::Hide => f.write_str("HIDE"),
            Command::Show => f.write_str("SHOW"),
        }
    }
}

/// Line breaks would split one command into two frames on the companion side.
fn one_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

// ── Notify ────────────────────────────────────────────────────────────────────

/// Sink for outbound commands.
///
/// `send` never fails observably: implementations absorb every error and may
/// silently drop the message.
pub trait Notify {
    fn send(&mut self, command: &Command<'_>);

    /// Called by the tick loop before anything is sent in a new frame.
    fn begin_tick(&mut self) {}

    fn speak(&mut self, text: &str) {
        self.send(&Command::Speak(text));
    }

    fn chat(&mut self, prompt: &str) {
        self.send(&Command::Chat(prompt));
    }
}

/// Records every line instead of delivering it.  Used by dry-run replays
/// and as the fake channel in tests.
#[derive(Debug, Default)]
pub struct Transcript {
    pub lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl Notify for Transcript {
    fn send(&mut self, command: &Command<'_>) {
        self.lines.push(command.to_string());
    }
}

// ── Pipe transport ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("companion not listening on {endpoint}: {source}")]
    Unavailable {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    #[error("exchange with companion failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("companion did not answer within {0:?}")]
    TimedOut(Duration),
}

/// Real transport: a named pipe on Windows, a Unix domain socket elsewhere.
pub struct PipeChannel {
    endpoint: String,
    timeout: Duration,
    reply_capacity: usize,
    runtime: Runtime,
    /// End of the current tick's budget. `None` outside the tick loop.
    deadline: Option<Instant>,
    /// Set by the first failed send; cleared by `begin_tick`.
    unresponsive: bool,
}

impl PipeChannel {
    pub fn new(config: &ChannelConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
            .context("Failed to build channel runtime")?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            timeout: config.effective_timeout(),
            reply_capacity: config.effective_reply_capacity(),
            runtime,
            deadline: None,
            unresponsive: false,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one command and returns the companion's reply (trimmed).
    ///
    /// Must not be called from inside another tokio runtime.
    pub fn request(&self, command: &Command<'_>) -> Result<String, ChannelError> {
        self.request_within(command, self.timeout)
    }

    fn request_within(&self, command: &Command<'_>, limit: Duration) -> Result<String, ChannelError> {
        let line = format!("{command}\n");
        let exchange = exchange(&self.endpoint, line.as_bytes(), self.reply_capacity);
        self.runtime.block_on(async {
            match tokio::time::timeout(limit, exchange).await {
                Ok(result) => result,
                Err(_) => Err(ChannelError::TimedOut(limit)),
            }
        })
    }

    pub fn is_unresponsive(&self) -> bool {
        self.unresponsive
    }
}

impl Notify for PipeChannel {
    fn begin_tick(&mut self) {
        self.deadline = Some(Instant::now() + self.timeout);
        self.unresponsive = false;
    }

    fn send(&mut self, command: &Command<'_>) {
        if self.unresponsive {
            log::debug!("channel: dropped {command:?}: companion unresponsive this tick");
            return;
        }
        let limit = match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => self.timeout,
        };
        if limit.is_zero() {
            self.unresponsive = true;
            log::debug!("channel: dropped {command:?}: tick budget spent");
            return;
        }
        match self.request_within(command, limit) {
            Ok(reply) => log::debug!("channel: sent {command:?}, reply {reply:?}"),
            Err(e) => {
                self.unresponsive = true;
                log::debug!("channel: dropped {command:?}: {e}");
            }
        }
    }
}

async fn exchange(endpoint: &str, line: &[u8], reply_capacity: usize) -> Result<String, ChannelError> {
    let mut stream = connect(endpoint)
        .await
        .map_err(|source| ChannelError::Unavailable {
            endpoint: endpoint.to_string(),
            source,
        })?;

    stream.write_all(line).await?;
    stream.flush().await?;

    // Exactly one read: the reply is a single message frame.
    let mut buf = vec![0u8; reply_capacity];
    let n = stream.read(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf[..n]).trim().to_string())
}

#[cfg(windows)]
async fn connect(
    endpoint: &str,
) -> std::io::Result<tokio::net::windows::named_pipe::NamedPipeClient> {
    use tokio::net::windows::named_pipe::{ClientOptions, PipeMode};
    // No WaitNamedPipe loop: a busy or absent server counts as unavailable.
    ClientOptions::new().pipe_mode(PipeMode::Message).open(endpoint)
}

#[cfg(not(windows))]
async fn connect(endpoint: &str) -> std::io::Result<tokio::net::UnixStream> {
    tokio::net::UnixStream::connect(endpoint).await
}
