//! SerialEcho Library
//!
//! Sends a line-oriented command to an interactive device over a serial link
//! and captures the echoed response, which is complete once the device stays
//! silent for a configured idle timeout.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::{IdleTimeoutReader, InterruptRelay, ReadOutcome, ResponseBuffer, SendStrategy, Transmitter};
pub use crate::domain::config::{DeviceCommand, LineEnding, OutputMode, SessionConfig, Timings};
pub use crate::domain::error::{EchoError, EchoResult};
pub use crate::infrastructure::serial::{DeviceSession, SessionState};
