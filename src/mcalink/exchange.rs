use clap::Parser;
use mcalink::devices::SerialOverride;
use mcalink::error::{LinkError, LinkResult};
use mcalink::{KnownDevice, Session};

#[derive(Parser, Debug, Clone)]
pub(crate) struct ExchangeOptions {
    /// Target device
    #[clap(short, long)]
    device: KnownDevice,

    /// Serial port
    #[clap(short, long)]
    serial: Option<String>,

    /// Baud rate
    #[clap(short, long)]
    baudrate: Option<u32>,

    /// Command frame as hex digits
    #[clap(short, long, default_value = "0001")]
    command: String,
}

pub(crate) fn handle_exchange(opts: ExchangeOptions) -> LinkResult<()> {
    let frame = parse_hex(&opts.command)?;

    let mut session = if opts.serial.is_some() || opts.baudrate.is_some() {
        Session::from_device_and_override(
            opts.device,
            SerialOverride {
                port: opts.serial,
                baud: opts.baudrate,
            },
        )?
    } else {
        Session::new(opts.device)?
    };

    println!("{}", session.port_name());

    let response = session.exchange(&frame)?;
    println!("{:02x?}", response);

    Ok(())
}

fn parse_hex(input: &str) -> LinkResult<Vec<u8>> {
    if !input.is_ascii() || input.len() % 2 != 0 {
        return Err(LinkError::Configuration(format!(
            "command frame must be an even number of hex digits, got {:?}",
            input
        )));
    }

    let mut bytes = Vec::with_capacity(input.len() / 2);
    for i in (0..input.len()).step_by(2) {
        let byte = u8::from_str_radix(&input[i..i + 2], 16).map_err(|e| {
            LinkError::Configuration(format!("bad hex byte in {:?}: {}", input, e))
        })?;
        bytes.push(byte);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::parse_hex;

    #[test]
    fn parses_the_default_command_frame() {
        assert_eq!(parse_hex("0001").unwrap(), vec![0x00, 0x01]);
    }

    #[test]
    fn rejects_odd_length_input() {
        assert!(parse_hex("001").is_err());
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert!(parse_hex("zz").is_err());
    }
}
