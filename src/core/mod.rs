// Core module - Session protocol: transmit, idle-framed read, interrupt, cleanup
pub mod format;
pub mod interrupt;
pub mod reader;
pub mod transmit;

pub use interrupt::{InterruptRelay, INTERRUPT_BYTE};
pub use reader::{IdleTimeoutReader, NullSink, ReadOutcome, ResponseBuffer, ResponseSink};
pub use transmit::{SendStrategy, Transmitter};
