// Serial module - Serial link and session lifecycle
pub mod link;
pub mod session;

pub use link::Link;
pub use session::{DeviceSession, SessionState};
