use crate::domain::error::{EchoError, EchoResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Command text that selects the interrupt relay instead of a normal send.
pub const INTERRUPT_COMMAND: &str = "Ctrl+C";

/// Immutable settings for one session, built once by the CLI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Serial port name, e.g. `COM3` or `/dev/ttyUSB0`
    pub port: String,
    /// Baud rate; framing is always 8N1
    pub baud_rate: u32,
    /// Silence that marks a response as complete
    pub idle_timeout: Duration,
    /// Emit diagnostic lines
    #[serde(default)]
    pub debug: bool,
    /// How the captured response is presented
    #[serde(default)]
    pub output_mode: OutputMode,
    /// Terminator appended to every command
    #[serde(default)]
    pub line_ending: LineEnding,
    /// Fixed delays used by the transmitter and reader
    #[serde(default)]
    pub timings: Timings,
}

/// Delays and cadences of the session protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Upper bound of a single blocking call on the port handle
    #[serde(default = "default_read_timeout")]
    pub read_timeout: Duration,
    /// Cadence of the idle-timeout polling loop
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,
    /// Pause after a bulk write so the device can start echoing
    #[serde(default = "default_settle_delay")]
    pub settle_delay: Duration,
    /// Pause after the paced wake-up terminator
    #[serde(default = "default_wakeup_delay")]
    pub wakeup_delay: Duration,
    /// Pause after each character of a paced send
    #[serde(default = "default_inter_char_delay")]
    pub inter_char_delay: Duration,
}

/// Presentation of the captured response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Print chunks as they arrive, escape sequences stripped
    Stream,
    /// Collect, trim noise lines and print once at the end
    #[default]
    Buffered,
    /// Like buffered, as a JSON document
    Json,
}

/// Line terminator sent after each command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    CrLf,
    Lf,
    Cr,
}

/// One line to send: tokens joined with single spaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCommand {
    tokens: Vec<String>,
}

// Default value functions
fn default_read_timeout() -> Duration {
    Duration::from_secs(1)
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_settle_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_wakeup_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_inter_char_delay() -> Duration {
    Duration::from_millis(150)
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            read_timeout: default_read_timeout(),
            poll_interval: default_poll_interval(),
            settle_delay: default_settle_delay(),
            wakeup_delay: default_wakeup_delay(),
            inter_char_delay: default_inter_char_delay(),
        }
    }
}

impl SessionConfig {
    pub fn new(port: impl Into<String>, baud_rate: u32, idle_timeout: Duration) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            idle_timeout,
            debug: false,
            output_mode: OutputMode::default(),
            line_ending: LineEnding::default(),
            timings: Timings::default(),
        }
    }

    /// Reject settings the session protocol cannot honor
    pub fn validate(&self) -> EchoResult<()> {
        if self.port.trim().is_empty() {
            return Err(EchoError::InvalidInput("serial port must not be empty".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(EchoError::InvalidInput("baud rate must be positive".to_string()));
        }
        if self.idle_timeout.is_zero() {
            return Err(EchoError::InvalidInput("idle timeout must be positive".to_string()));
        }
        if self.timings.poll_interval.is_zero() || self.timings.poll_interval >= self.idle_timeout {
            return Err(EchoError::InvalidInput(format!(
                "poll interval {:?} must be non-zero and shorter than the idle timeout {:?}",
                self.timings.poll_interval, self.idle_timeout
            )));
        }
        Ok(())
    }
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::CrLf => "\r\n",
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl DeviceCommand {
    pub fn from_tokens<I, S>(tokens: I) -> EchoResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.is_empty() {
            return Err(EchoError::InvalidInput("command must not be empty".to_string()));
        }
        Ok(Self { tokens })
    }

    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    /// True when the whole command is the interrupt keyword
    pub fn is_interrupt(&self) -> bool {
        self.tokens.len() == 1 && self.tokens[0] == INTERRUPT_COMMAND
    }

    /// Wire form: command text followed by the line terminator
    pub fn line(&self, line_ending: LineEnding) -> String {
        format!("{}{}", self.text(), line_ending.as_str())
    }

    pub fn encode(&self, line_ending: LineEnding) -> Vec<u8> {
        self.line(line_ending).into_bytes()
    }
}

impl std::fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::Stream => write!(f, "stream"),
            OutputMode::Buffered => write!(f, "buffered"),
            OutputMode::Json => write!(f, "json"),
        }
    }
}
