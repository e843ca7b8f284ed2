//! Report types sent from the engine to the hid writer.

use usbd_hid::descriptor::{AsInputReport, BufferOverflow};

use crate::descriptor::{KeyboardReport, MouseReport};

/// A report produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// Normal keyboard hid report
    Keyboard(KeyboardReport),
    /// Mouse hid report
    Mouse(MouseReport),
}

impl AsInputReport for Report {
    fn serialize(&self, buffer: &mut [u8]) -> Result<usize, BufferOverflow> {
        match self {
            Report::Keyboard(report) => report.serialize(buffer),
            Report::Mouse(report) => report.serialize(buffer),
        }
    }
}
