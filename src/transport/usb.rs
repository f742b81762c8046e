use tracing::{debug, info, trace};

use super::DeviceTransport;
use crate::constants::{MAX_RESPONSE_SIZE, USB_TRANSFER_TIMEOUT_MS};

use crate::error::{LinkError, LinkResult};
use rusb::{Context, Device, DeviceDescriptor, Direction, UsbContext};
use std::time::Duration;

/// USB device selector
#[derive(Debug, Clone, Copy)]
pub struct UsbParams {
    pub vendor_id: u16,
    pub product_id: u16,
}

/// Bulk USB transport layer
pub(crate) struct UsbDevice {
    handle: rusb::DeviceHandle<Context>,
    interface: u8,
    endpoint_out: u8,
    endpoint_in: Option<u8>,
    label: String,
    pending: Vec<u8>,
}

impl UsbDevice {
    pub fn open(params: &UsbParams) -> LinkResult<UsbDevice> {
        let context = Context::new()
            .map_err(|e| LinkError::Communication(format!("libusb init failed: {:?}", e)))?;
        let devices = context
            .devices()
            .map_err(|e| LinkError::Communication(format!("{:?}", e)))?;

        for device in devices.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(descriptor) => descriptor,
                Err(_) => continue,
            };

            if descriptor.vendor_id() == params.vendor_id
                && descriptor.product_id() == params.product_id
            {
                return Self::claim(device, descriptor, params);
            }
        }

        Err(LinkError::DeviceNotFound(format!(
            "no USB device matches {:04x}:{:04x}",
            params.vendor_id, params.product_id
        )))
    }

    fn claim(
        device: Device<Context>,
        descriptor: DeviceDescriptor,
        params: &UsbParams,
    ) -> LinkResult<UsbDevice> {
        // Default configuration, interface (0,0)
        let config = device.config_descriptor(0).map_err(|e| {
            LinkError::Communication(format!("failed to read configuration descriptor: {:?}", e))
        })?;
        let interface = config.interfaces().next().ok_or_else(|| {
            LinkError::EndpointNotFound("default configuration has no interfaces".to_string())
        })?;
        let interface_descriptor = interface.descriptors().next().ok_or_else(|| {
            LinkError::EndpointNotFound("first interface has no descriptors".to_string())
        })?;

        let mut endpoint_out = None;
        let mut endpoint_in = None;
        for endpoint in interface_descriptor.endpoint_descriptors() {
            match endpoint.direction() {
                Direction::Out if endpoint_out.is_none() => {
                    endpoint_out = Some(endpoint.address())
                }
                Direction::In if endpoint_in.is_none() => endpoint_in = Some(endpoint.address()),
                _ => {}
            }
        }

        let endpoint_out = endpoint_out.ok_or_else(|| {
            LinkError::EndpointNotFound(format!(
                "no outbound endpoint on interface {}",
                interface_descriptor.interface_number()
            ))
        })?;

        let mut handle = device
            .open()
            .map_err(|e| LinkError::Communication(format!("failed to open USB device: {:?}", e)))?;

        // The kernel may already have a driver bound to the interface
        if handle.set_auto_detach_kernel_driver(true).is_err() {
            debug!("kernel driver auto-detach is not supported on this platform");
        }
        if let Err(e) = handle.set_active_configuration(config.number()) {
            // Most hosts have already activated the default configuration
            debug!("set_configuration failed: {:?}", e);
        }

        handle
            .claim_interface(interface_descriptor.interface_number())
            .map_err(|e| {
                LinkError::Communication(format!(
                    "failed to claim interface {}: {:?}",
                    interface_descriptor.interface_number(),
                    e
                ))
            })?;

        let label = handle
            .read_serial_number_string_ascii(&descriptor)
            .map(|serial| format!("{:04x}:{:04x} ({})", params.vendor_id, params.product_id, serial))
            .unwrap_or_else(|_| format!("{:04x}:{:04x}", params.vendor_id, params.product_id));

        info!("Claimed USB device {}", label);

        Ok(UsbDevice {
            handle,
            interface: interface_descriptor.interface_number(),
            endpoint_out,
            endpoint_in,
            label,
            pending: Vec::new(),
        })
    }

    fn endpoint_in(&self) -> LinkResult<u8> {
        self.endpoint_in.ok_or_else(|| {
            LinkError::EndpointNotFound("no inbound endpoint on the claimed interface".to_string())
        })
    }
}

impl DeviceTransport for UsbDevice {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn send(&mut self, frame: &[u8]) -> LinkResult<()> {
        self.handle
            .write_bulk(
                self.endpoint_out,
                frame,
                Duration::from_millis(USB_TRANSFER_TIMEOUT_MS),
            )
            .map_err(|e| LinkError::Communication(format!("bulk write failed: {:?}", e)))?;
        trace!("Sent bytes {:?}", frame);
        Ok(())
    }

    fn receive(&mut self) -> LinkResult<Vec<u8>> {
        if !self.pending.is_empty() {
            return Ok(std::mem::take(&mut self.pending));
        }

        let endpoint = self.endpoint_in()?;
        let mut buffer: Vec<u8> = vec![0; MAX_RESPONSE_SIZE];

        let size = match self.handle.read_bulk(
            endpoint,
            &mut buffer,
            Duration::from_millis(USB_TRANSFER_TIMEOUT_MS),
        ) {
            Ok(size) => size,
            // Timeout error is fine, the device had nothing to say
            Err(rusb::Error::Timeout) => 0,
            Err(e) => return Err(LinkError::Communication(format!("bulk read failed: {:?}", e))),
        };

        buffer.truncate(size);
        info!("Received bytes {:?}", buffer);
        Ok(buffer)
    }

    fn receive_line(&mut self) -> LinkResult<Vec<u8>> {
        let endpoint = self.endpoint_in()?;

        loop {
            if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.pending.drain(..=pos).collect();
                trace!("Captured {} line bytes", line.len());
                return Ok(line);
            }

            let mut buffer: Vec<u8> = vec![0; MAX_RESPONSE_SIZE];
            match self.handle.read_bulk(
                endpoint,
                &mut buffer,
                Duration::from_millis(USB_TRANSFER_TIMEOUT_MS),
            ) {
                Ok(size) => self.pending.extend_from_slice(&buffer[..size]),
                // Timeout error is fine, keep waiting for the newline
                Err(rusb::Error::Timeout) => continue,
                Err(e) => {
                    return Err(LinkError::Communication(format!("bulk read failed: {:?}", e)));
                }
            }
        }
    }
}

impl Drop for UsbDevice {
    fn drop(&mut self) {
        // The interface must be released before libusb closes the handle
        if self.handle.release_interface(self.interface).is_err() {
            debug!("failed to release interface {}", self.interface);
        }
    }
}
