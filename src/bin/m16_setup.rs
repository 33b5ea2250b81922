//! M16 configuration utility
//! Switches operation mode, selects the channel or sets the power level

use m16_rs::core::{CHANNEL_RANGE, POWER_LEVEL_RANGE};
use m16_rs::serial::{SerialConfig, SerialPort};
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
    if args.len() < 3 {
        eprintln!("Usage: {} <port> mode | channel <1-12> | power <1-4>", args[0]);
        eprintln!("Example: {} /dev/ttyUSB0 channel 10", args[0]);
        std::process::exit(1);
    }

    let port_name = &args[1];
    let action = args[2].as_str();
    let value = args.get(3).map(|s| s.parse::<u8>()).transpose()?;

    let port = SerialPort::open(port_name, SerialConfig::default())?;
    let mut modem = M16Modem::new(port, BitLayout::default());

    match (action, value) {
        ("mode", None) => modem.switch_operation_mode().await?,
        ("channel", Some(channel)) => {
            if !CHANNEL_RANGE.contains(&channel) {
                anyhow::bail!("Channel must be within {:?}", CHANNEL_RANGE);
            }
            modem.set_channel(channel).await?;
        }
        ("power", Some(level)) => {
            if !POWER_LEVEL_RANGE.contains(&level) {
                anyhow::bail!("Power level must be within {:?}", POWER_LEVEL_RANGE);
            }
            modem.set_power_level(level).await?;
        }
        _ => anyhow::bail!("Unrecognised command: {}", args[2..].join(" ")),
    }

    println!("Done");
    Ok(())
}
