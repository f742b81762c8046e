use clap::{Parser, command};
use exchange::{ExchangeOptions, handle_exchange};
use list::handle_list;
use mcalink::error::LinkResult;
use monitor::{MonitorOptions, handle_monitor};

mod exchange;
mod list;
mod monitor;

#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
enum Cli {
    /// Write a command frame and print the response
    #[command(name = "exchange", alias = "x")]
    Exchange(ExchangeOptions),

    /// Capture device output lines to a log file
    #[command(name = "monitor", alias = "m")]
    Monitor(MonitorOptions),

    /// List attached serial ports and USB devices
    #[command(name = "list", alias = "l")]
    List,
}

fn main() -> LinkResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli {
        Cli::Exchange(opts) => handle_exchange(opts)?,
        Cli::Monitor(opts) => handle_monitor(opts)?,
        Cli::List => handle_list()?,
    }

    Ok(())
}
