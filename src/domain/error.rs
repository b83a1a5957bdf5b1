use thiserror::Error;

/// SerialEcho unified error type
#[derive(Error, Debug)]
pub enum EchoError {
    #[error("Error opening serial port {port}: {source}")]
    Connection {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Transmission error: {message}")]
    Transmission { message: String },

    #[error("Error in reading process: {message}")]
    Receive { message: String },

    #[error("Device not connected")]
    DeviceNotConnected,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Output error: {0}")]
    Output(String),
}

pub type EchoResult<T> = Result<T, EchoError>;

/// Process exit codes reported by the binary.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 3;
    pub const TRANSMISSION: i32 = 4;
    pub const RECEIVE: i32 = 5;
    /// 128 + SIGINT, the shell convention for a user interrupt.
    pub const INTERRUPTED: i32 = 130;
}

impl EchoError {
    pub fn transmission(err: impl std::fmt::Display) -> Self {
        Self::Transmission {
            message: err.to_string(),
        }
    }

    pub fn receive(err: impl std::fmt::Display) -> Self {
        Self::Receive {
            message: err.to_string(),
        }
    }

    /// Exit code the top-level handler reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            EchoError::Connection { .. } => exit_code::CONNECTION,
            EchoError::Transmission { .. } => exit_code::TRANSMISSION,
            // A session that vanished mid-read is a receive-side failure.
            EchoError::Receive { .. } | EchoError::DeviceNotConnected => exit_code::RECEIVE,
            EchoError::InvalidInput(_) => exit_code::USAGE,
            EchoError::Configuration(_) | EchoError::Output(_) => exit_code::FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let connection = EchoError::Connection {
            port: "/dev/ttyUSB9".to_string(),
            source: serialport::Error::new(serialport::ErrorKind::NoDevice, "no such device"),
        };
        assert_eq!(connection.exit_code(), exit_code::CONNECTION);
        assert_eq!(EchoError::transmission("broken pipe").exit_code(), exit_code::TRANSMISSION);
        assert_eq!(EchoError::receive("eof").exit_code(), exit_code::RECEIVE);
        assert_eq!(EchoError::Output("stdout closed".into()).exit_code(), exit_code::FAILURE);
        assert_ne!(exit_code::INTERRUPTED, exit_code::SUCCESS);
    }

    #[test]
    fn test_connection_error_names_port() {
        let error = EchoError::Connection {
            port: "COM7".to_string(),
            source: serialport::Error::new(serialport::ErrorKind::NoDevice, "busy"),
        };
        let message = error.to_string();
        assert!(message.contains("COM7"));
        assert!(message.contains("busy"));
    }
}
