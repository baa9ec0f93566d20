//! Device Info Example
//!
//! Queries the module's product information and prints it as JSON:
//! - Interactive serial port selection (or command-line argument)
//! - Product model, ID, hardware model, firmware version and protocol type
//! - Structured device data with JSON export
//!
//! Usage:
//!   cargo run --example device_info              # Interactive mode
//!   cargo run --example device_info -- COM3      # Specify port
//!   cargo run --example device_info -- /dev/ttyUSB0
//!
//! Set RUST_LOG environment variable to control logging:
//!   RUST_LOG=debug cargo run --example device_info

use inquire::Select;
use log::{error, info};
use r24_protocol::{list_ports, Config, Metric, Query, Result, Value, R24};
use std::thread;
use std::time::Duration;

const PRODUCT_QUERIES: [Query; 5] = [
    Query::ProductMode,
    Query::ProductId,
    Query::HardwareModel,
    Query::FirmwareVersion,
    Query::ProtocolType,
];

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

    let port_name = std::env::args()
        .nth(1)
        .map(Ok)
        .unwrap_or_else(select_port)?;

    info!("Connecting to radar on {}...", port_name);
    let mut radar = R24::open(&Config::for_port(&port_name), Vec::<(Metric, Value)>::new())?;

    for query in PRODUCT_QUERIES {
        radar.send_query(query)?;
        thread::sleep(Duration::from_millis(100));
        radar.process_available()?;
    }

    let info = radar.device_info();
    if info.updated_at.is_none() {
        error!("No product information received");
        return Ok(());
    }

    info!("=== Device Info (JSON) ===");
    println!("{}", serde_json::to_string_pretty(info)?);

    Ok(())
}
