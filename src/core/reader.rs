use crate::core::interrupt::InterruptRelay;
use crate::domain::{config::SessionConfig, error::EchoResult};
use crate::infrastructure::serial::DeviceSession;
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Bytes accumulated during one read cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBuffer {
    data: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Observer for chunks as they arrive, used for live echo
pub trait ResponseSink {
    fn on_chunk(&mut self, chunk: &[u8]) -> EchoResult<()>;
}

/// Sink that ignores chunks; the buffer is consumed at the end instead
#[derive(Debug, Default)]
pub struct NullSink;

impl ResponseSink for NullSink {
    fn on_chunk(&mut self, _chunk: &[u8]) -> EchoResult<()> {
        Ok(())
    }
}

/// How a read cycle ended
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The device stayed silent for the idle timeout. May be empty.
    Complete(ResponseBuffer),
    /// The user cancelled; the interrupt byte was relayed and the session closed.
    Interrupted { discarded: usize },
}

/// Frames a response by silence: reading ends once no byte has arrived for
/// the idle timeout. There is no cap on the total duration.
#[derive(Debug, Clone)]
pub struct IdleTimeoutReader {
    idle_timeout: Duration,
    poll_interval: Duration,
    relay: InterruptRelay,
}

impl IdleTimeoutReader {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            idle_timeout: config.idle_timeout,
            poll_interval: config.timings.poll_interval,
            relay: InterruptRelay::new(),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Poll the session until it falls idle or `cancel` resolves.
    ///
    /// Returns no earlier than the idle timeout after the last received byte and
    /// at most one poll interval later.
    pub async fn read<S, C>(
        &self,
        session: &mut DeviceSession,
        sink: &mut S,
        cancel: C,
    ) -> EchoResult<ReadOutcome>
    where
        S: ResponseSink + ?Sized,
        C: Future<Output = ()>,
    {
        let started = Instant::now();
        let mut buffer = ResponseBuffer::new();
        let mut last_data = Instant::now();

        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(cancel);

        loop {
            tokio::select! {
                biased;
                _ = &mut cancel => {
                    debug!("Read cancelled with {} bytes buffered", buffer.len());
                    let relayed = self.relay.relay(session);
                    session.close();
                    relayed?;
                    return Ok(ReadOutcome::Interrupted { discarded: buffer.len() });
                }
                _ = ticker.tick() => {}
            }

            let chunk = session.read_available()?;
            if !chunk.is_empty() {
                sink.on_chunk(&chunk)?;
                buffer.append(&chunk);
                last_data = Instant::now();
            } else if last_data.elapsed() >= self.idle_timeout {
                break;
            }
        }

        debug!(
            "Device idle for {:?}; read {} bytes in {:?}",
            self.idle_timeout,
            buffer.len(),
            started.elapsed()
        );
        Ok(ReadOutcome::Complete(buffer))
    }
}
