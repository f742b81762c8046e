use clap::ValueEnum;
use rusb::UsbContext;

use crate::TransportType;
use crate::error::{LinkError, LinkResult};
use crate::transport::serialport::{BaudRate, ComPort, SerialParams};
use crate::transport::usb::UsbParams;

/// USB identity of the CapeMCA spectrum acquisition unit
pub const CAPEMCA_VENDOR_ID: u16 = 0x4701;
pub const CAPEMCA_PRODUCT_ID: u16 = 0x0290;

/// KnownDevice enum includes all devices that have been tested
/// to work with mcalink
#[derive(Debug, Clone, ValueEnum)]
pub enum KnownDevice {
    /// Arduino Uno over its USB virtual COM port
    ArduinoUno,

    /// Arduino Nano
    ArduinoNano,

    /// CapeMCA acquisition unit over bulk USB
    CapeMca,
}

/// Overrides for the serial parameters a device preset would otherwise pick
#[derive(Debug, Clone, Default)]
pub struct SerialOverride {
    pub port: Option<ComPort>,
    pub baud: Option<BaudRate>,
}

/// Figure out the transport and all associated parameters for a given device.
/// overrides can be provided to pin the serial port or baud rate; when the
/// port is not provided, this function will attempt to find the serial port
/// where the given device is connected
pub fn transport_for_device(
    device: KnownDevice,
    overrides: Option<SerialOverride>,
) -> LinkResult<TransportType> {
    match device {
        KnownDevice::ArduinoUno => {
            let default_baud_rate = 115200;
            let product_id = vec![0x0043, 0x7523, 0x0001, 0xea60, 0x6015];

            let (port, baud) = match overrides {
                Some(params) => {
                    let port = match params.port {
                        Some(port) => port,
                        None => serial_port_from_product_id(&product_id)?,
                    };
                    (port, params.baud.unwrap_or(default_baud_rate))
                }
                None => {
                    // Default baud rate when none is provided
                    let baud = default_baud_rate;

                    // Try to find the serial port using product_id
                    let port = serial_port_from_product_id(&product_id)?;

                    (port, baud)
                }
            };

            Ok(TransportType::Serial(SerialParams::new(port, baud)))
        }
        KnownDevice::ArduinoNano => {
            let default_baud_rate = 57600;
            let product_id = vec![0x6001, 0x7523];

            let (port, baud) = match overrides {
                Some(params) => {
                    let port = match params.port {
                        Some(port) => port,
                        None => serial_port_from_product_id(&product_id)?,
                    };
                    (port, params.baud.unwrap_or(default_baud_rate))
                }
                None => {
                    // Default baud rate when none is provided
                    let baud = default_baud_rate;

                    // Try to find the serial port using product_id
                    let port = serial_port_from_product_id(&product_id)?;

                    (port, baud)
                }
            };

            Ok(TransportType::Serial(SerialParams::new(port, baud)))
        }
        KnownDevice::CapeMca => {
            if overrides
                .as_ref()
                .is_some_and(|params| params.port.is_some() || params.baud.is_some())
            {
                return Err(LinkError::Configuration(
                    "cape-mca is a bulk USB device; serial port overrides do not apply"
                        .to_string(),
                ));
            }

            Ok(TransportType::Usb(UsbParams {
                vendor_id: CAPEMCA_VENDOR_ID,
                product_id: CAPEMCA_PRODUCT_ID,
            }))
        }
    }
}

pub(crate) fn serial_port_from_product_id(product_ids: &[u16]) -> LinkResult<ComPort> {
    match serialport::available_ports() {
        Ok(ports) => {
            for port in ports {
                if let serialport::SerialPortType::UsbPort(info) = port.port_type {
                    if product_ids.contains(&info.pid) {
                        return Ok(port.port_name);
                    }
                }
            }
        }
        Err(e) => {
            return Err(LinkError::Configuration(format!(
                "Could not get available ports. Err {:?}",
                e
            )));
        }
    };

    Err(LinkError::DeviceNotFound(format!(
        "Looked at all available serial ports; could not find one that matches one of \
        product IDs {:?}. Try specifying a serial port for the given device?",
        product_ids
    )))
}

/// One row of the serial side of the diagnostic listing
#[derive(Debug, Clone)]
pub struct SerialPortListing {
    pub name: String,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
}

/// One row of the USB side of the diagnostic listing
#[derive(Debug, Clone, Copy)]
pub struct UsbDeviceListing {
    pub vendor_id: u16,
    pub product_id: u16,
}

/// List the serial ports available on this host
pub fn list_serial_ports() -> LinkResult<Vec<SerialPortListing>> {
    let ports = serialport::available_ports().map_err(|e| {
        LinkError::Configuration(format!("Could not get available ports. Err {:?}", e))
    })?;

    Ok(ports
        .into_iter()
        .map(|port| {
            let (vendor_id, product_id) = match port.port_type {
                serialport::SerialPortType::UsbPort(info) => (Some(info.vid), Some(info.pid)),
                _ => (None, None),
            };
            SerialPortListing {
                name: port.port_name,
                vendor_id,
                product_id,
            }
        })
        .collect())
}

/// List every USB device attached to the bus
pub fn list_usb_devices() -> LinkResult<Vec<UsbDeviceListing>> {
    let context = rusb::Context::new()
        .map_err(|e| LinkError::Communication(format!("libusb init failed: {:?}", e)))?;
    let devices = context
        .devices()
        .map_err(|e| LinkError::Communication(format!("{:?}", e)))?;

    let mut listings = Vec::new();
    for device in devices.iter() {
        let descriptor = match device.device_descriptor() {
            Ok(descriptor) => descriptor,
            Err(_) => continue,
        };
        listings.push(UsbDeviceListing {
            vendor_id: descriptor.vendor_id(),
            product_id: descriptor.product_id(),
        });
    }

    Ok(listings)
}
