//! M16 receiver
//! Waits for two-byte messages and prints them decoded

use m16_rs::serial::{SerialConfig, SerialPort};
use m16_rs::{BitLayout, M16Modem, ModemError};
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
    if args.len() < 2 || args.len() > 4 {
        eprintln!("Usage: {} <port> [layout] [--raw]", args[0]);
        eprintln!("Example: {} /dev/ttyUSB0 3/3/10", args[0]);
        eprintln!("\n--raw prints buffered bytes in hex instead of decoding them");
        std::process::exit(1);
    }

    let port_name = &args[1];
    let mut layout = BitLayout::default();
    let mut raw = false;
    for arg in &args[2..] {
        match arg.as_str() {
            "--raw" => raw = true,
            other => layout = other.parse()?,
        }
    }

    tracing::info!("Listening on {} (layout {})", port_name, layout);
    let port = SerialPort::open(port_name, SerialConfig::default())?;
    let mut modem = M16Modem::new(port, layout);

    loop {
        if raw {
            if modem.rx_buffer_len().await? == 0 {
                tokio::time::sleep(modem.retry_policy().poll_interval).await;
                continue;
            }
            let data = modem.drain_rx_buffer().await?;
            let hex: Vec<String> = data.iter().map(|b| format!("{:02X}", b)).collect();
            println!("Received data: {}", hex.join(" "));
            continue;
        }

        match modem.receive_message().await {
            Ok(message) => println!("{}", message),
            // Nothing arrived within the poll budget; keep waiting
            Err(ModemError::Timeout(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
