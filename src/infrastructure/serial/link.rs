use serialport::SerialPort;
use std::io::{self, Read, Write};

/// Byte pipe underneath a device session.
///
/// Implemented for real serial handles; tests substitute a scripted device.
pub trait Link: Send {
    /// Bytes ready to be read without blocking
    fn bytes_to_read(&mut self) -> io::Result<usize>;

    /// Read up to `buf.len()` bytes, bounded by the handle's read timeout
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

impl Link for Box<dyn SerialPort> {
    fn bytes_to_read(&mut self) -> io::Result<usize> {
        let available = SerialPort::bytes_to_read(self.as_ref()).map_err(io::Error::from)?;
        Ok(available as usize)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        Write::write_all(self, data)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}
