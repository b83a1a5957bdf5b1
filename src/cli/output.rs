use crate::core::format::{self, StreamDecoder};
use crate::core::{ResponseBuffer, ResponseSink};
use crate::domain::config::{DeviceCommand, OutputMode};
use crate::domain::error::{EchoError, EchoResult};
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};
use std::io::{self, Write};

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for EchoError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// JSON document printed in json mode
#[derive(Debug, Serialize)]
pub struct ResponseLog<'a> {
    pub port: &'a str,
    pub command: String,
    pub bytes: usize,
    pub lines: Vec<String>,
}

/// Console output writer.
///
/// In stream mode chunks are echoed as they arrive; the other modes print the
/// whole response once reading is complete.
pub struct ConsoleWriter<W: Write> {
    out: W,
    mode: OutputMode,
    decoder: StreamDecoder,
}

impl ConsoleWriter<io::Stdout> {
    pub fn stdout(mode: OutputMode) -> Self {
        Self::new(io::stdout(), mode)
    }
}

impl<W: Write> ConsoleWriter<W> {
    pub fn new(out: W, mode: OutputMode) -> Self {
        Self {
            out,
            mode,
            decoder: StreamDecoder::new(),
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the completed response according to the output mode
    pub fn write_response(
        &mut self,
        port: &str,
        command: &DeviceCommand,
        buffer: &ResponseBuffer,
    ) -> Result<(), OutputError> {
        match self.mode {
            OutputMode::Stream => {
                let rest = self.decoder.finish();
                self.out.write_all(rest.as_bytes())?;
            }
            OutputMode::Buffered => {
                let text = format::decode(buffer.as_bytes());
                self.out.write_all(format::framed_log(&text).as_bytes())?;
            }
            OutputMode::Json => {
                let text = format::decode(buffer.as_bytes());
                let log = ResponseLog {
                    port,
                    command: command.text(),
                    bytes: buffer.len(),
                    lines: format::clean_lines(&text),
                };
                serde_json::to_writer_pretty(&mut self.out, &log)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn write_ports(&mut self, ports: &[SerialPortInfo]) -> Result<(), OutputError> {
        if ports.is_empty() {
            writeln!(self.out, "No serial ports found")?;
            return Ok(());
        }

        writeln!(self.out, "Available serial ports:")?;
        for port in ports {
            writeln!(self.out, "  {}{}", port.port_name, describe_port_type(&port.port_type))?;
        }
        Ok(())
    }
}

impl<W: Write> ResponseSink for ConsoleWriter<W> {
    fn on_chunk(&mut self, chunk: &[u8]) -> EchoResult<()> {
        if self.mode != OutputMode::Stream {
            return Ok(());
        }

        let text = self.decoder.push(chunk);
        self.out.write_all(text.as_bytes()).map_err(OutputError::from)?;
        self.out.flush().map_err(OutputError::from)?;
        Ok(())
    }
}

fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let product = usb.product.as_deref().unwrap_or("USB serial");
            format!(" ({} {:04x}:{:04x})", product, usb.vid, usb.pid)
        }
        SerialPortType::BluetoothPort => " (Bluetooth)".to_string(),
        SerialPortType::PciPort => " (PCI)".to_string(),
        SerialPortType::Unknown => String::new(),
    }
}
