use crate::domain::error::EchoResult;
use crate::infrastructure::serial::DeviceSession;
use tracing::debug;

/// ASCII ETX, what a terminal sends for Ctrl+C
pub const INTERRUPT_BYTE: u8 = 0x03;

/// Forwards a user cancellation to the remote shell as a single ETX byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterruptRelay;

impl InterruptRelay {
    pub fn new() -> Self {
        Self
    }

    /// Write exactly one interrupt byte. Failures surface as transmission errors.
    pub fn relay(&self, session: &mut DeviceSession) -> EchoResult<()> {
        session.write(&[INTERRUPT_BYTE])?;
        debug!("Sent Ctrl+C to the device on {}", session.port());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{config::SessionConfig, error::EchoError};
    use crate::infrastructure::serial::link::mock::{written_bytes, ScriptedLink};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_relay_writes_one_etx_byte() {
        let config = SessionConfig::new("/dev/ttyMOCK", 9600, Duration::from_secs(2));
        let link = ScriptedLink::new();
        let writes = link.writes();
        let mut session = DeviceSession::with_link(&config, Box::new(link));

        InterruptRelay::new().relay(&mut session).unwrap();

        assert_eq!(written_bytes(&writes), vec![INTERRUPT_BYTE]);
        assert_eq!(writes.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_on_closed_session() {
        let config = SessionConfig::new("/dev/ttyMOCK", 9600, Duration::from_secs(2));
        let mut session = DeviceSession::with_link(&config, Box::new(ScriptedLink::new()));
        session.close();

        let result = InterruptRelay::new().relay(&mut session);
        assert!(matches!(result, Err(EchoError::DeviceNotConnected)));
    }
}
