//! # R24 Protocol Library
//!
//! A Rust library for talking to 24GHz human presence radar modules over
//! their UART frame protocol.
//!
//! ## Features
//!
//! - Byte-synchronous frame decoder with checksum verification and resync
//! - Typed decoding of every reply family (system, product info, work status,
//!   detection range, open underlying info, human presence)
//! - Query and setting encoders with checksum injection
//! - Poll scheduler that detects whether the module runs the standard or the
//!   open (custom) protocol and sweeps the matching queries
//! - Change detection so high-frequency telemetry is only published when it moves
//!
//! ## Example
//!
//! ```no_run
//! use r24_protocol::{Config, LogSink, R24};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::for_port("/dev/ttyUSB0");
//!     let mut radar = R24::open(&config, LogSink)?;
//!     radar.run_for(Duration::from_secs(60))?;
//!     println!("Dialect: {:?}", radar.dialect());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod checksum;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod query;
pub mod scheduler;
pub mod session;
pub mod sink;
pub mod transport;
pub mod types;

pub use config::Config;
pub use dispatch::Report;
pub use error::{R24Error, Result};
pub use frame::{Frame, FrameDecoder};
pub use query::{Query, Setting};
pub use session::{SessionStats, R24};
pub use sink::{FnSink, LogSink, TelemetrySink};
pub use transport::{list_ports, SerialTransport, Transport};
pub use types::*;
