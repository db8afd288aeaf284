use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::{Error, HardwareError};
use crate::io::ControlTransfer;

/// A control transfer as received by [`MockControlTransfer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub data: Vec<u8>,
}

/// Mock implementation of [`ControlTransfer`]: records every transfer.
#[derive(Clone, Debug, Default)]
pub struct MockControlTransfer {
    transfers: Arc<RwLock<Vec<Transfer>>>,
    failing: bool,
}

impl MockControlTransfer {
    /// Makes every transfer fail (simulates an unplugged device).
    pub fn set_failing(mut self, failing: bool) -> Self {
        self.failing = failing;
        self
    }

    /// Returns every transfer received, oldest first.
    pub fn get_transfers(&self) -> Vec<Transfer> {
        self.transfers.read().clone()
    }
}

impl ControlTransfer for MockControlTransfer {
    fn control_out(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, Error> {
        if self.failing {
            return Err(HardwareError::UsbTransfer {
                info: String::from("device not found"),
            }
            .into());
        }
        self.transfers.write().push(Transfer {
            request_type,
            request,
            value,
            index,
            data: data.to_vec(),
        });
        Ok(data.len())
    }
}
