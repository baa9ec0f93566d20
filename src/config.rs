//! Session configuration.

use crate::constants::*;
use crate::error::{R24Error, Result};
use serde::{Deserialize, Serialize};
use serialport::SerialPort;
use std::path::Path;
use std::time::Duration;

/// Serial and polling settings for one radar session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial port name, e.g. `/dev/ttyUSB0` or `COM3`
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    /// Period of the poll step
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: String::new(),
            baud_rate: BAUD_RATE,
            read_timeout_ms: READ_TIMEOUT_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Default settings for the given port
    pub fn for_port(port: &str) -> Self {
        Config {
            port: port.to_string(),
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(R24Error::Config("baud_rate must be nonzero".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(R24Error::Config("poll_interval_ms must be nonzero".to_string()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Open the configured serial port (8N1)
    pub fn open_port(&self) -> Result<Box<dyn SerialPort>> {
        if self.port.is_empty() {
            return Err(R24Error::Config("no serial port configured".to_string()));
        }
        let port = serialport::new(&self.port, self.baud_rate)
            .timeout(Duration::from_millis(self.read_timeout_ms))
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .open()?;
        Ok(port)
    }
}
