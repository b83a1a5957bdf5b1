use crate::domain::{config::SessionConfig, error::{EchoError, EchoResult}};
use crate::infrastructure::serial::link::Link;
use std::io;
use tracing::{debug, warn};

/// Lifecycle state of a device session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Exclusive owner of one open serial link.
///
/// The link is released by [`DeviceSession::close`] or, on any early return or
/// unwinding path, when the session is dropped.
pub struct DeviceSession {
    port: String,
    link: Option<Box<dyn Link>>,
}

impl DeviceSession {
    /// Open the configured port with 8N1 framing and a bounded per-call timeout.
    pub fn open(config: &SessionConfig) -> EchoResult<Self> {
        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(config.timings.read_timeout)
            .open()
            .map_err(|source| EchoError::Connection {
                port: config.port.clone(),
                source,
            })?;

        debug!("Connected to {} at {} baud", config.port, config.baud_rate);

        Ok(Self::with_link(config, Box::new(port)))
    }

    /// Wrap an already-open link
    pub fn with_link(config: &SessionConfig, link: Box<dyn Link>) -> Self {
        Self {
            port: config.port.clone(),
            link: Some(link),
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn state(&self) -> SessionState {
        if self.link.is_some() {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == SessionState::Open
    }

    fn link(&mut self) -> EchoResult<&mut Box<dyn Link>> {
        self.link.as_mut().ok_or(EchoError::DeviceNotConnected)
    }

    /// Write all of `data` and flush it to the device
    pub fn write(&mut self, data: &[u8]) -> EchoResult<()> {
        let link = self.link()?;
        link.write_all(data).map_err(EchoError::transmission)?;
        link.flush().map_err(EchoError::transmission)?;
        debug!("Sent {} bytes: {}", data.len(), hex::encode(data));
        Ok(())
    }

    /// Number of bytes the device has already delivered
    pub fn bytes_available(&mut self) -> EchoResult<usize> {
        self.link()?.bytes_to_read().map_err(EchoError::receive)
    }

    /// Read whatever is currently buffered; empty when nothing is waiting.
    pub fn read_available(&mut self) -> EchoResult<Vec<u8>> {
        let available = self.bytes_available()?;
        if available == 0 {
            return Ok(Vec::new());
        }

        let mut buffer = vec![0u8; available];
        let n = match self.link()?.read(&mut buffer) {
            Ok(n) => n,
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => 0,
            Err(e) => return Err(EchoError::receive(e)),
        };
        buffer.truncate(n);
        Ok(buffer)
    }

    /// Release the link. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(mut link) = self.link.take() {
            if let Err(e) = link.flush() {
                warn!("Failed to flush {} before closing: {}", self.port, e);
            }
            drop(link);
            debug!("Serial connection {} closed", self.port);
        }
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("port", &self.port)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::serial::link::mock::{written_bytes, ScriptedLink};
    use std::time::Duration;

    fn create_test_config() -> SessionConfig {
        SessionConfig::new("/dev/null", 9600, Duration::from_secs(2))
    }

    #[test]
    fn test_open_fails_with_connection_error() {
        let mut config = create_test_config();
        config.port = "/dev/serialecho-does-not-exist".to_string();

        let result = DeviceSession::open(&config);
        assert!(matches!(result, Err(EchoError::Connection { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_is_idempotent() {
        let config = create_test_config();
        let mut session = DeviceSession::with_link(&config, Box::new(ScriptedLink::new()));
        assert_eq!(session.state(), SessionState::Open);

        session.close();
        assert_eq!(session.state(), SessionState::Closed);
        session.close();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_session_rejects_io() {
        let config = create_test_config();
        let mut session = DeviceSession::with_link(&config, Box::new(ScriptedLink::new()));
        session.close();

        assert!(matches!(session.write(b"x"), Err(EchoError::DeviceNotConnected)));
        assert!(matches!(session.bytes_available(), Err(EchoError::DeviceNotConnected)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failure_is_transmission_error() {
        let config = create_test_config();
        let link = ScriptedLink::new().fail_writes_after(0);
        let mut session = DeviceSession::with_link(&config, Box::new(link));

        assert!(matches!(session.write(b"x"), Err(EchoError::Transmission { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_available_drains_buffered_bytes() {
        let config = create_test_config();
        let link = ScriptedLink::new().emit(Duration::ZERO, b"hello");
        let writes = link.writes();
        let mut session = DeviceSession::with_link(&config, Box::new(link));

        session.write(b"ping\r\n").unwrap();
        assert_eq!(session.read_available().unwrap(), b"hello".to_vec());
        assert!(session.read_available().unwrap().is_empty());
        assert_eq!(written_bytes(&writes), b"ping\r\n".to_vec());
    }
}
