use std::path::PathBuf;

use clap::Parser;
use mcalink::devices::SerialOverride;
use mcalink::error::LinkResult;
use mcalink::{KnownDevice, Session};

#[derive(Parser, Debug, Clone)]
pub(crate) struct MonitorOptions {
    /// Target device
    #[clap(short, long)]
    device: KnownDevice,

    /// Serial port
    #[clap(short, long)]
    serial: Option<String>,

    /// Baud rate
    #[clap(short, long)]
    baudrate: Option<u32>,

    /// Log file
    #[clap(short, long, default_value = "dump.txt")]
    output: PathBuf,

    /// Number of lines to capture before stopping
    #[clap(short, long, default_value_t = 2000)]
    lines: u64,

    #[clap(short, long, default_value_t = false)]
    no_progress: bool,
}

pub(crate) fn handle_monitor(opts: MonitorOptions) -> LinkResult<()> {
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

    session.progress_bar(!opts.no_progress);

    println!("{}", session.port_name());

    let captured = session.capture_to_file(&opts.output, opts.lines)?;
    println!("Captured {} lines to {}", captured, opts.output.display());

    Ok(())
}
