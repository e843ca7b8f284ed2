#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]
//! Svalboard keymap engine.
//!
//! This crate implements the userspace half of a Svalboard keyboard: the
//! keymap with its layer stack, a tap-dance engine for dual-role keys
//! (tap/hold/layer-tap/modifier-tap with multi-tap grouping), and the four
//! dual-role modifier-or-mouse-button keys of the auto-mouse layer. Matrix
//! scanning, the USB/BLE transport and persistent storage are external: the
//! engine consumes [`event::KeyEvent`]s and [`event::PointerEvent`]s from
//! [`channel::KEY_EVENT_CHANNEL`] / [`channel::POINTER_EVENT_CHANNEL`] and
//! emits HID reports on [`channel::KEYBOARD_REPORT_CHANNEL`].
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

#[macro_use]
mod macros;

pub mod action;
pub mod caps_word;
pub mod channel;
pub mod config;
pub mod descriptor;
pub mod event;
pub mod hid;
pub mod hid_state;
pub mod input_device;
pub mod key_override;
pub mod keyboard;
pub mod keycode;
pub mod keymap;
pub mod layout;
pub mod layout_macro;
pub mod light;
pub mod mod_button;
pub mod tap_dance;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Mutex type guarding the static channels.
pub type RawMutex = CriticalSectionRawMutex;

/// Capacity of the key event and pointer event channels.
pub const EVENT_CHANNEL_SIZE: usize = 16;
/// Capacity of the report channel.
pub const REPORT_CHANNEL_SIZE: usize = 16;
