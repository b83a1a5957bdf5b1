use crate::cli::args::{Args, Command, SendArgs};
use crate::cli::output::ConsoleWriter;
use crate::core::{IdleTimeoutReader, InterruptRelay, ReadOutcome, SendStrategy, Transmitter};
use crate::domain::config::{DeviceCommand, SessionConfig};
use crate::domain::error::{EchoError, EchoResult};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::DeviceSession;
use std::future::Future;
use std::io::Write;
use tracing::{debug, warn};

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// The user pressed Ctrl+C while the response was being read
    Interrupted,
}

/// Execute CLI command
pub async fn execute_command(args: Args) -> EchoResult<RunOutcome> {
    match args.command {
        Command::Send(send_args) => execute_send(SendStrategy::Bulk, send_args).await,
        Command::Paced(send_args) => execute_send(SendStrategy::Paced, send_args).await,
        Command::List => {
            init_logging(false)?;
            let ports = serialport::available_ports().map_err(|e| {
                EchoError::Configuration(format!("Failed to list serial ports: {}", e))
            })?;
            ConsoleWriter::stdout(Default::default()).write_ports(&ports)?;
            Ok(RunOutcome::Completed)
        }
    }
}

async fn execute_send(strategy: SendStrategy, args: SendArgs) -> EchoResult<RunOutcome> {
    let (config, command) = args.into_request(strategy)?;
    init_logging(config.debug)?;
    debug!("Using {} send on {} at {} baud", strategy, config.port, config.baud_rate);

    let mut session = DeviceSession::open(&config)?;
    let mut writer = ConsoleWriter::stdout(config.output_mode);
    let outcome = run_session(&config, strategy, &mut session, &command, &mut writer, user_interrupt()).await;
    session.close();
    outcome
}

/// One command cycle on an open session: send, read until idle, print.
///
/// `cancel` resolving during the read relays an interrupt to the device and
/// closes the session instead of printing a response.
pub async fn run_session<W, C>(
    config: &SessionConfig,
    strategy: SendStrategy,
    session: &mut DeviceSession,
    command: &DeviceCommand,
    writer: &mut ConsoleWriter<W>,
    cancel: C,
) -> EchoResult<RunOutcome>
where
    W: Write,
    C: Future<Output = ()>,
{
    if command.is_interrupt() {
        InterruptRelay::new().relay(session)?;
    } else {
        Transmitter::new(config).send(strategy, session, command).await?;
    }

    match IdleTimeoutReader::new(config).read(session, writer, cancel).await? {
        ReadOutcome::Complete(buffer) => {
            writer.write_response(session.port(), command, &buffer)?;
            Ok(RunOutcome::Completed)
        }
        ReadOutcome::Interrupted { discarded } => {
            debug!("Dropped {} bytes of partial response", discarded);
            Ok(RunOutcome::Interrupted)
        }
    }
}

/// Resolves when the user presses Ctrl+C
async fn user_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
