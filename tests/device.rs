#[cfg(test)]
mod tests {
    use mcalink::devices::{
        CAPEMCA_PRODUCT_ID, CAPEMCA_VENDOR_ID, SerialOverride, transport_for_device,
    };
    use mcalink::error::LinkError;
    use mcalink::transport::serialport::SerialParams;
    use mcalink::transport::usb::UsbParams;
    use mcalink::{KnownDevice, Session, TransportType};

    fn absent_port() -> &'static str {
        if cfg!(windows) { "COM254" } else { "/dev/ttyACM254" }
    }

    #[test]
    fn arduino_preset_keeps_an_explicit_port() {
        let transport = transport_for_device(
            KnownDevice::ArduinoUno,
            Some(SerialOverride {
                port: Some("/dev/ttyACM0".to_string()),
                baud: None,
            }),
        )
        .unwrap();

        match transport {
            TransportType::Serial(SerialParams { port, baud, .. }) => {
                assert_eq!(port, "/dev/ttyACM0");
                assert_eq!(baud, 115200);
            }
            TransportType::Usb(_) => panic!("expected a serial transport"),
        }
    }

    #[test]
    fn arduino_preset_keeps_an_explicit_baud_rate() {
        let transport = transport_for_device(
            KnownDevice::ArduinoNano,
            Some(SerialOverride {
                port: Some("/dev/ttyUSB0".to_string()),
                baud: Some(9600),
            }),
        )
        .unwrap();

        match transport {
            TransportType::Serial(params) => assert_eq!(params.baud, 9600),
            TransportType::Usb(_) => panic!("expected a serial transport"),
        }
    }

    #[test]
    fn capemca_preset_is_bulk_usb() {
        let transport = transport_for_device(KnownDevice::CapeMca, None).unwrap();

        match transport {
            TransportType::Usb(params) => {
                assert_eq!(params.vendor_id, CAPEMCA_VENDOR_ID);
                assert_eq!(params.product_id, CAPEMCA_PRODUCT_ID);
            }
            TransportType::Serial(_) => panic!("expected a USB transport"),
        }
    }

    #[test]
    fn capemca_preset_rejects_serial_overrides() {
        let result = transport_for_device(
            KnownDevice::CapeMca,
            Some(SerialOverride {
                port: Some("/dev/ttyACM0".to_string()),
                baud: None,
            }),
        );

        assert!(matches!(result, Err(LinkError::Configuration(_))));
    }

    #[test]
    fn opening_an_absent_serial_port_is_device_not_found() {
        let result = Session::from_transport(TransportType::Serial(SerialParams::new(
            absent_port().to_string(),
            115200,
        )));

        match result {
            Err(LinkError::DeviceNotFound(_)) => {}
            Err(e) => panic!("expected DeviceNotFound, got {:?}", e),
            Ok(_) => panic!("{} should not resolve to a device", absent_port()),
        }
    }

    #[test]
    fn missing_usb_device_is_device_not_found() {
        // The CapeMCA is never on a CI bus
        let result = Session::from_transport(TransportType::Usb(UsbParams {
            vendor_id: CAPEMCA_VENDOR_ID,
            product_id: CAPEMCA_PRODUCT_ID,
        }));

        match result {
            Err(LinkError::DeviceNotFound(_)) => {}
            Err(e) => panic!("expected DeviceNotFound, got {:?}", e),
            Ok(_) => panic!("unexpected CapeMCA attached to the bus"),
        }
    }

    #[test]
    #[ignore = "needs an Arduino attached over USB serial"]
    fn arduino_exchange() {
        let mut session = Session::new(KnownDevice::ArduinoUno).unwrap();
        println!("{}", session.port_name());

        let response = session.exchange(&[0x00, 0x01]).unwrap();
        assert!(response.len() <= 1024);
    }

    #[test]
    #[ignore = "needs a device streaming lines over USB serial"]
    fn arduino_capture() {
        let mut session = Session::new(KnownDevice::ArduinoUno).unwrap();
        session.progress_bar(true);
        println!("{}", session.port_name());

        let captured = session.capture_to_file("dump.txt", 10).unwrap();
        assert_eq!(captured, 10);
    }
}
