//! M16 message sender
//! Encodes one (id, command, payload) message and transmits it, optionally repeating

use m16_rs::serial::{SerialConfig, SerialPort};
use m16_rs::{BitLayout, Command, M16Modem, Message};
use std::env;
use std::time::Duration;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

/// Time one two-byte transmission takes on air, plus margin
const REPEAT_INTERVAL: Duration = Duration::from_secs(2);

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
    if args.len() < 5 {
        eprintln!(
            "Usage: {} <port> <id> <command> <payload> [layout] [--strict] [--repeat]",
            args[0]
        );
        eprintln!("Example: {} /dev/ttyUSB0 7 FINISHED 0xff 4/4/8", args[0]);
        eprintln!("\nLayouts: 4/4/8 (default), 3/3/10, 3/0/13");
        eprintln!("Commands: name (e.g. TEMP_SENSOR) or numeric code");
        std::process::exit(1);
    }

    let port_name = &args[1];
    let id = parse_int(&args[2])?;
    let command = Command::parse(&args[3])
        .ok_or_else(|| anyhow::anyhow!("Unknown command: {}", args[3]))?;
    let payload = parse_int(&args[4])?;

    let mut layout = BitLayout::default();
    let mut strict = false;
    let mut repeat = false;
    for arg in &args[5..] {
        match arg.as_str() {
            "--strict" => strict = true,
            "--repeat" => repeat = true,
            other => layout = other.parse()?,
        }
    }

    let id = u8::try_from(id).map_err(|_| anyhow::anyhow!("id {} does not fit in a byte", id))?;
    let message = Message::new(id, command, payload);

    tracing::info!("Opening {} (layout {})", port_name, layout);
    let port = SerialPort::open(port_name, SerialConfig::default())?;
    let mut modem = M16Modem::new(port, layout);

    loop {
        if strict {
            modem.send_message_checked(&message).await?;
        } else {
            modem.send_message(&message).await?;
        }
        let word = modem.codec().encode_message(&message);
        println!("Sent {} as {} ({})", message, word, word.to_binary_string());

        if !repeat {
            break;
        }
        tokio::time::sleep(REPEAT_INTERVAL).await;
    }

    Ok(())
}

/// Parse a decimal, 0x-hex or 0b-binary number
fn parse_int(s: &str) -> anyhow::Result<u16> {
    let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)?
    } else if let Some(bin) = s.strip_prefix("0b") {
        u16::from_str_radix(bin, 2)?
    } else {
        s.parse()?
    };
    Ok(value)
}
