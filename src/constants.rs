pub(crate) const SERIAL_TIMEOUT_MS: u64 = 1000;
pub(crate) const USB_TRANSFER_TIMEOUT_MS: u64 = 10_000;
pub(crate) const MAX_RESPONSE_SIZE: usize = 1024;
