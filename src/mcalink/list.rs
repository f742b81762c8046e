use mcalink::devices::{list_serial_ports, list_usb_devices};
use mcalink::error::LinkResult;

pub(crate) fn handle_list() -> LinkResult<()> {
    let ports = list_serial_ports()?;
    if ports.is_empty() {
        println!("No serial ports found.");
    }
    for port in ports {
        match (port.vendor_id, port.product_id) {
            (Some(vid), Some(pid)) => println!("{} (USB {:04x}:{:04x})", port.name, vid, pid),
            _ => println!("{}", port.name),
        }
    }

    for device in list_usb_devices()? {
        println!(
            "VendorID=0x{:04x} & ProductID=0x{:04x}",
            device.vendor_id, device.product_id
        );
    }

    Ok(())
}
