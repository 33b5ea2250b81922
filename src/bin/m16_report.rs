//! M16 status report utility
//! Requests a status report from the modem and prints it as text or JSON

use m16_rs::serial::{list_ports, SerialConfig, SerialPort};
use m16_rs::{BitLayout, M16Modem};
use std::env;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <port> [--json]", args[0]);
        eprintln!("Example: {} /dev/ttyUSB0 --json", args[0]);
        if let Ok(ports) = list_ports() {
            if !ports.is_empty() {
                eprintln!("\nAvailable ports:");
                for port in ports {
                    eprintln!("  {}", port);
                }
            }
        }
        std::process::exit(1);
    }

    let port_name = &args[1];
    let json = match args.get(2).map(|s| s.as_str()) {
        None => false,
        Some("--json") => true,
        Some(other) => anyhow::bail!("Unknown option: {}", other),
    };

    tracing::info!("Opening {}", port_name);
    let port = SerialPort::open(port_name, SerialConfig::default())?;
    let mut modem = M16Modem::new(port, BitLayout::default());

    let report = modem.request_report().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Report received:");
        println!("{}", report);
    }

    Ok(())
}
