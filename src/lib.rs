use std::{fs::File, path::Path};

pub use devices::KnownDevice;
use devices::{SerialOverride, transport_for_device};
use error::{LinkError, LinkResult};
use transport::DeviceTransport;
use transport::serialport::{SerialDevice, SerialParams};
use transport::usb::{UsbDevice, UsbParams};

pub(crate) mod capture;
pub(crate) mod constants;
pub mod devices;
pub mod error;
pub mod transport;
pub(crate) mod util;

pub enum TransportType {
    Serial(SerialParams),
    Usb(UsbParams),
}

pub struct Session {
    transport: Box<dyn DeviceTransport>,
    progress_bar_enable: bool,
}

impl Session {
    pub fn from_transport(transport: TransportType) -> LinkResult<Self> {
        let transport: Box<dyn DeviceTransport> = match transport {
            TransportType::Serial(params) => Box::new(SerialDevice::open(params)?),
            TransportType::Usb(params) => Box::new(UsbDevice::open(&params)?),
        };

        Ok(Session {
            transport,
            progress_bar_enable: false,
        })
    }

    pub fn new(device: KnownDevice) -> LinkResult<Self> {
        let transport = transport_for_device(device, None)?;
        Self::from_transport(transport)
    }

    pub fn from_device_and_override(
        device: KnownDevice,
        overrides: SerialOverride,
    ) -> LinkResult<Self> {
        let transport = transport_for_device(device, Some(overrides))?;
        Self::from_transport(transport)
    }

    pub fn progress_bar(&mut self, enable: bool) {
        self.progress_bar_enable = enable;
    }

    /// Identity of the open port or device, as reported by the driver
    pub fn port_name(&self) -> String {
        self.transport.name()
    }

    /// Write a command frame, then perform one bounded read of the response.
    /// A device that stays silent past the transport timeout yields an
    /// empty buffer
    pub fn exchange(&mut self, frame: &[u8]) -> LinkResult<Vec<u8>> {
        self.transport.send(frame)?;
        self.transport.receive()
    }

    /// Capture `lines` newline-terminated lines to the file at `path`,
    /// echoing each line to stdout. The file is truncated at the start of
    /// the capture and closed on every exit path
    pub fn capture_to_file(&mut self, path: impl AsRef<Path>, lines: u64) -> LinkResult<u64> {
        let path = path.as_ref();
        let mut log = File::create(path).map_err(|e| {
            LinkError::Capture(format!("failed to open log file {:?}: {}", path, e))
        })?;

        let progress = self
            .progress_bar_enable
            .then(|| util::create_progress_bar(lines, "Capturing"));
        let mut echo = std::io::stdout();

        let result = capture::run_capture(
            self.transport.as_mut(),
            &mut log,
            &mut echo,
            lines,
            progress.as_ref(),
        );

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        result
    }

    #[cfg(test)]
    pub(crate) fn with_transport(transport: Box<dyn DeviceTransport>) -> Self {
        Session {
            transport,
            progress_bar_enable: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::transport::testing::ScriptedTransport;

    #[test]
    fn exchange_returns_the_scripted_response() {
        let mut transport = ScriptedTransport::default();
        transport.responses.push_back(vec![0x14, 0x10]);
        let sent = transport.sent.clone();

        let mut session = Session::with_transport(Box::new(transport));
        let response = session.exchange(&[0x00, 0x01]).unwrap();

        assert_eq!(response, vec![0x14, 0x10]);
        assert_eq!(*sent.borrow(), vec![vec![0x00, 0x01]]);
    }

    #[test]
    fn exchange_with_a_silent_device_returns_empty() {
        let mut session = Session::with_transport(Box::new(ScriptedTransport::default()));

        let response = session.exchange(&[0x00, 0x01]).unwrap();

        assert!(response.is_empty());
    }

    #[test]
    fn capture_to_file_truncates_and_writes_the_log() {
        let mut session = Session::with_transport(Box::new(ScriptedTransport::with_lines([
            "a\n", "b\n", "c\n",
        ])));

        let path =
            std::env::temp_dir().join(format!("mcalink-capture-{}.txt", std::process::id()));
        std::fs::write(&path, "stale contents from an earlier run").unwrap();

        let captured = session.capture_to_file(&path, 3).unwrap();

        assert_eq!(captured, 3);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
        std::fs::remove_file(&path).unwrap();
    }
}
