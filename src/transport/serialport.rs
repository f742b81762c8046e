use tracing::{info, trace};

use super::DeviceTransport;
use crate::constants::{MAX_RESPONSE_SIZE, SERIAL_TIMEOUT_MS};

use crate::error::{LinkError, LinkResult};
use serialport::{DataBits, Parity, StopBits};
use std::io::{Read, Write};

pub type ComPort = String;
pub type BaudRate = u32;

/// Parameters for opening a serial port
#[derive(Debug, Clone)]
pub struct SerialParams {
    pub port: ComPort,
    pub baud: BaudRate,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
}

impl SerialParams {
    /// 8 data bits, one stop bit, no parity
    pub fn new(port: ComPort, baud: BaudRate) -> SerialParams {
        SerialParams {
            port,
            baud,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
        }
    }
}

/// Serial port transport layer
pub(crate) struct SerialDevice {
    serial_port: Box<dyn serialport::SerialPort>,
    port: ComPort,
}

impl SerialDevice {
    pub fn open(params: SerialParams) -> LinkResult<SerialDevice> {
        let serial_port = serialport::new(params.port.clone(), params.baud)
            .data_bits(params.data_bits)
            .stop_bits(params.stop_bits)
            .parity(Parity::None)
            .timeout(std::time::Duration::from_millis(SERIAL_TIMEOUT_MS))
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => LinkError::DeviceNotFound(format!(
                    "{} is not an available serial port",
                    params.port
                )),
                serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
                    LinkError::DeviceNotFound(format!(
                        "{} does not exist on this host",
                        params.port
                    ))
                }
                _ => LinkError::Communication(format!("{:?}", e)),
            })?;

        Ok(SerialDevice {
            serial_port,
            port: params.port,
        })
    }
}

impl DeviceTransport for SerialDevice {
    fn name(&self) -> String {
        self.serial_port.name().unwrap_or_else(|| self.port.clone())
    }

    fn send(&mut self, frame: &[u8]) -> LinkResult<()> {
        self.serial_port
            .write_all(frame)
            .map_err(|e| LinkError::Communication(format!("{:?}", e)))?;
        trace!("Sent bytes {:?}", frame);
        Ok(())
    }

    fn receive(&mut self) -> LinkResult<Vec<u8>> {
        let mut buffer: Vec<u8> = vec![0; MAX_RESPONSE_SIZE];

        let size = self
            .serial_port
            .read(&mut buffer)
            // Timeout error is fine, the device had nothing to say
            .or_else(|e| {
                if e.kind() == std::io::ErrorKind::TimedOut {
                    Ok(0)
                } else {
                    Err(e)
                }
            })
            .map_err(|e| LinkError::Communication(format!("{:?}", e)))?;

        // Return a buffer with the actual length
        buffer.truncate(size);
        info!("Received bytes {:?}", buffer);
        Ok(buffer)
    }

    fn receive_line(&mut self) -> LinkResult<Vec<u8>> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match self.serial_port.read(&mut byte) {
                Ok(0) => continue,
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                // Timeout error is fine, keep waiting for the newline
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(LinkError::Communication(format!("{:?}", e))),
            }
        }

        trace!("Captured {} line bytes", line.len());
        Ok(line)
    }
}
