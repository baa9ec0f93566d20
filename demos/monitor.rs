//! Presence Monitor Example
//!
//! Connects to a radar module, learns which reporting dialect it is in and
//! logs every telemetry change for a while:
//! - Interactive serial port selection (or command-line argument)
//! - Optional JSON config file instead of a port name
//! - Periodic polling with heartbeat tracking
//!
//! Usage:
//!   cargo run --example monitor                          # Interactive mode
//!   cargo run --example monitor -- /dev/ttyUSB0          # Specify port
//!   cargo run --example monitor -- /dev/ttyUSB0 120      # Run for 120 s
//!   cargo run --example monitor -- radar.json            # Load config file
//!
//! Set RUST_LOG environment variable to control logging:
//!   RUST_LOG=trace cargo run --example monitor     # Raw frames in hex
//!   RUST_LOG=debug cargo run --example monitor

use inquire::Select;
use log::{error, info};
use r24_protocol::{list_ports, Config, LogSink, Result, R24};
use std::time::Duration;

/// Interactive serial port selection using inquire
fn select_port() -> Result<String> {
    let ports = list_ports()?;

    if ports.is_empty() {
        eprintln!("No serial ports found!");
        std::process::exit(1);
    }

    let port_names: Vec<String> = ports
        .iter()
        .map(|p| format!("{} - {:?}", p.port_name, p.port_type))
        .collect();

    let selection = Select::new("Select a serial port:", port_names)
        .prompt()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Selection cancelled: {}", e),
            )
        })?;

    let port_name = selection
        .split(" - ")
        .next()
        .unwrap_or_default()
        .to_string();
    Ok(port_name)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(arg) if arg.ends_with(".json") => Config::load(&arg)?,
        Some(port) => Config::for_port(&port),
        None => Config::for_port(&select_port()?),
    };
    let seconds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60);

    info!("Connecting to radar on {}...", config.port);
    let mut radar = R24::open(&config, LogSink)?;

    info!("=== Monitoring for {} s ===", seconds);
    if let Err(e) = radar.run_for(Duration::from_secs(seconds)) {
        error!("Monitoring stopped: {}", e);
        error!("Check that the module is powered and wired TX to RX at {} baud", config.baud_rate);
    }

    info!("Dialect: {:?}", radar.dialect());
    let stats = radar.stats();
    info!(
        "Frames: {}, checksum errors: {}, framing errors: {}",
        stats.frames, stats.checksum_errors, stats.framing_errors
    );

    Ok(())
}
