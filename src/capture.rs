use std::io::Write;

use indicatif::ProgressBar;

use crate::error::{LinkError, LinkResult};
use crate::transport::DeviceTransport;

/// Read `lines` newline-terminated lines from the transport, echoing each to
/// `echo` and appending it to `log`, in that order. A line that is not valid
/// UTF-8 aborts the loop; everything captured before it stays in the log.
pub(crate) fn run_capture(
    transport: &mut dyn DeviceTransport,
    log: &mut dyn Write,
    echo: &mut dyn Write,
    lines: u64,
    progress: Option<&ProgressBar>,
) -> LinkResult<u64> {
    let mut captured = 0;

    for _ in 0..lines {
        let raw = transport.receive_line()?;
        let line = String::from_utf8(raw)
            .map_err(|e| LinkError::Decode(format!("line is not valid UTF-8: {}", e)))?;

        echo.write_all(line.as_bytes())
            .map_err(|e| LinkError::Capture(format!("failed to echo line: {}", e)))?;
        echo.flush()
            .map_err(|e| LinkError::Capture(format!("failed to echo line: {}", e)))?;
        log.write_all(line.as_bytes())
            .map_err(|e| LinkError::Capture(format!("failed to append to log: {}", e)))?;

        captured += 1;
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    log.flush()
        .map_err(|e| LinkError::Capture(format!("failed to flush log: {}", e)))?;

    Ok(captured)
}
