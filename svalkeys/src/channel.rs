//! Exposed channels which connect the engine to the scanning layer and the
//! HID writer.

use embassy_sync::channel::Channel;

use crate::event::{KeyEvent, PointerEvent};
use crate::hid::Report;
use crate::{EVENT_CHANNEL_SIZE, REPORT_CHANNEL_SIZE, RawMutex};

/// Channel for key transition events from the scanning layer
pub static KEY_EVENT_CHANNEL: Channel<RawMutex, KeyEvent, EVENT_CHANNEL_SIZE> = Channel::new();
/// Channel for pointer motion events from the pointing devices
pub static POINTER_EVENT_CHANNEL: Channel<RawMutex, PointerEvent, EVENT_CHANNEL_SIZE> = Channel::new();
/// Channel for hid reports from the engine to the hid writer
pub static KEYBOARD_REPORT_CHANNEL: Channel<RawMutex, Report, REPORT_CHANNEL_SIZE> = Channel::new();
