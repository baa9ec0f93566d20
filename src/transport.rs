//! Byte transport between the session and the radar module.

use crate::config::Config;
use crate::error::Result;
use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};

/// Raw byte I/O used by a session
pub trait Transport {
    /// Next received byte, or `None` when nothing is waiting
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Send bytes to the module
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Serial port transport
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the port named in `config`
    pub fn open(config: &Config) -> Result<Self> {
        Ok(SerialTransport {
            port: config.open_port()?,
        })
    }

    /// Wrap an already opened port
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        SerialTransport { port }
    }
}

impl Transport for SerialTransport {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.port.bytes_to_read()? == 0 {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }
}

/// List available serial ports
pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>> {
    Ok(serialport::available_ports()?)
}
