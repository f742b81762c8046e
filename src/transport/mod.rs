pub mod serialport;
pub mod usb;

use crate::error::LinkResult;

pub(crate) trait DeviceTransport {
    /// Identity of the open port or device
    fn name(&self) -> String;

    /// Send a command frame to the target device
    fn send(&mut self, frame: &[u8]) -> LinkResult<()>;

    /// Single bounded read of whatever the device has ready
    fn receive(&mut self) -> LinkResult<Vec<u8>>;

    /// Block until one newline-terminated line has arrived
    fn receive_line(&mut self) -> LinkResult<Vec<u8>>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::DeviceTransport;
    use crate::error::{LinkError, LinkResult};

    /// In-memory transport fed from a script of responses and lines
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        pub sent: Rc<RefCell<Vec<Vec<u8>>>>,
        pub responses: VecDeque<Vec<u8>>,
        pub lines: VecDeque<Vec<u8>>,
    }

    impl ScriptedTransport {
        pub(crate) fn with_lines<I, L>(lines: I) -> ScriptedTransport
        where
            I: IntoIterator<Item = L>,
            L: AsRef<[u8]>,
        {
            ScriptedTransport {
                lines: lines.into_iter().map(|line| line.as_ref().to_vec()).collect(),
                ..ScriptedTransport::default()
            }
        }
    }

    impl DeviceTransport for ScriptedTransport {
        fn name(&self) -> String {
            "scripted0".to_string()
        }

        fn send(&mut self, frame: &[u8]) -> LinkResult<()> {
            self.sent.borrow_mut().push(frame.to_vec());
            Ok(())
        }

        fn receive(&mut self) -> LinkResult<Vec<u8>> {
            // A silent device reads as an empty buffer, same as a timeout
            Ok(self.responses.pop_front().unwrap_or_default())
        }

        fn receive_line(&mut self) -> LinkResult<Vec<u8>> {
            self.lines.pop_front().ok_or_else(|| {
                LinkError::Communication("scripted transport ran out of lines".to_string())
            })
        }
    }
}
