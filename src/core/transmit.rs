use crate::domain::{
    config::{DeviceCommand, LineEnding, SessionConfig, Timings},
    error::EchoResult,
};
use crate::infrastructure::serial::DeviceSession;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a command is put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStrategy {
    /// The whole line in one write
    Bulk,
    /// One character at a time, for devices with a tiny receive buffer
    Paced,
}

impl SendStrategy {
    /// Baud rate used when none is given on the command line
    pub fn default_baud_rate(&self) -> u32 {
        match self {
            SendStrategy::Bulk => 9600,
            SendStrategy::Paced => 115200,
        }
    }
}

impl std::fmt::Display for SendStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendStrategy::Bulk => write!(f, "bulk"),
            SendStrategy::Paced => write!(f, "paced"),
        }
    }
}

/// Writes commands to an open session.
///
/// Both strategies return only after their trailing delay, so a read started
/// afterwards never overlaps the transmission.
#[derive(Debug, Clone)]
pub struct Transmitter {
    line_ending: LineEnding,
    timings: Timings,
}

impl Transmitter {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            line_ending: config.line_ending,
            timings: config.timings,
        }
    }

    pub async fn send(
        &self,
        strategy: SendStrategy,
        session: &mut DeviceSession,
        command: &DeviceCommand,
    ) -> EchoResult<()> {
        match strategy {
            SendStrategy::Bulk => self.send_bulk(session, command).await,
            SendStrategy::Paced => self.send_paced(session, command).await,
        }
    }

    /// Write the terminated line at once, then let the device start echoing.
    pub async fn send_bulk(&self, session: &mut DeviceSession, command: &DeviceCommand) -> EchoResult<()> {
        session.write(&command.encode(self.line_ending))?;
        tokio::time::sleep(self.timings.settle_delay).await;
        Ok(())
    }

    /// Wake the shell with a bare terminator, drop whatever it printed, then
    /// send the line one character at a time.
    pub async fn send_paced(&self, session: &mut DeviceSession, command: &DeviceCommand) -> EchoResult<()> {
        session.write(self.line_ending.as_bytes())?;
        tokio::time::sleep(self.timings.wakeup_delay).await;

        let discarded = session.read_available()?;
        if !discarded.is_empty() {
            debug!("Discarded {} bytes of wake-up output", discarded.len());
        }

        let line = command.line(self.line_ending);
        let mut encoded = [0u8; 4];
        for c in line.chars() {
            session.write(c.encode_utf8(&mut encoded).as_bytes())?;
            tokio::time::sleep(self.timings.inter_char_delay).await;
        }

        debug!("Paced {} characters to {}", line.chars().count(), session.port());
        Ok(())
    }
}
