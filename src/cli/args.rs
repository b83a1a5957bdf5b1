use crate::core::SendStrategy;
use crate::domain::config::{DeviceCommand, LineEnding, OutputMode, SessionConfig};
use crate::domain::error::EchoResult;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::time::Duration;

/// Command line arguments for SerialEcho
#[derive(Parser, Debug)]
#[command(
    name = "serialecho",
    version = env!("CARGO_PKG_VERSION"),
    about = "Send a command to a serial console and capture its echoed response",
    long_about = "SerialEcho sends a command to a device over a physical or virtual serial port and \
prints the device's response, which is considered complete once the device stays silent for \
the configured timeout. Use it to script embedded shells that have no other interface.",
    after_help = "Examples:\n  serialecho send -p /dev/ttyUSB0 ls -l /\n  serialecho paced -p COM3 -b 57600 --timeout 5 reboot\n  serialecho send -p /dev/ttyUSB0 Ctrl+C"
)]
pub struct Args {
    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send the whole command in one write (default 9600 baud)
    Send(SendArgs),
    /// Send one character at a time, for devices with a tiny receive buffer (default 115200 baud)
    Paced(SendArgs),
    /// List available serial ports
    List,
}

/// Arguments shared by both send strategies
#[derive(ClapArgs, Debug)]
pub struct SendArgs {
    /// Serial port name, e.g. COM3 or /dev/ttyUSB0
    #[arg(short, long)]
    pub port: String,

    /// Baud rate (default: 9600 for send, 115200 for paced)
    #[arg(short, long)]
    pub baudrate: Option<u32>,

    /// Seconds of silence that end the response
    #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Print connection diagnostics
    #[arg(short, long)]
    pub debug: bool,

    /// How to print the response
    #[arg(short, long, value_enum, default_value = "buffered")]
    pub mode: OutputModeArg,

    /// Terminator appended to the command
    #[arg(long, value_enum, default_value = "crlf")]
    pub line_ending: LineEndingArg,

    /// Command to send, including its options; use Ctrl+C to interrupt the running program.
    /// Must come last.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Output mode argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputModeArg {
    /// Print output live as it arrives
    Stream,
    /// Print one cleaned log block at the end
    Buffered,
    /// Print the cleaned lines as JSON
    Json,
}

/// Line ending argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LineEndingArg {
    Crlf,
    Lf,
    Cr,
}

impl SendArgs {
    /// Build the session settings and the command for the given strategy
    pub fn into_request(self, strategy: SendStrategy) -> EchoResult<(SessionConfig, DeviceCommand)> {
        let command = DeviceCommand::from_tokens(self.command)?;

        let baud_rate = self.baudrate.unwrap_or_else(|| strategy.default_baud_rate());
        let mut config = SessionConfig::new(self.port, baud_rate, Duration::from_secs(self.timeout));
        config.debug = self.debug;
        config.output_mode = self.mode.into();
        config.line_ending = self.line_ending.into();
        config.validate()?;

        Ok((config, command))
    }
}

impl From<OutputModeArg> for OutputMode {
    fn from(mode: OutputModeArg) -> Self {
        match mode {
            OutputModeArg::Stream => Self::Stream,
            OutputModeArg::Buffered => Self::Buffered,
            OutputModeArg::Json => Self::Json,
        }
    }
}

impl From<LineEndingArg> for LineEnding {
    fn from(line_ending: LineEndingArg) -> Self {
        match line_ending {
            LineEndingArg::Crlf => Self::CrLf,
            LineEndingArg::Lf => Self::Lf,
            LineEndingArg::Cr => Self::Cr,
        }
    }
}
