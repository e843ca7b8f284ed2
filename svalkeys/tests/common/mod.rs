pub mod test_macro;

use core::cell::RefCell;

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use futures::{FutureExt, join};
use svalkeys::channel::{KEY_EVENT_CHANNEL, KEYBOARD_REPORT_CHANNEL, POINTER_EVENT_CHANNEL};
use svalkeys::config::BehaviorConfig;
use svalkeys::descriptor::{KeyboardReport, MouseReport};
use svalkeys::event::{KeyEvent, PointerEvent};
use svalkeys::hid::Report;
use svalkeys::input_device::Runnable;
use svalkeys::keyboard::Keyboard;
use svalkeys::keymap::KeyMap;
use svalkeys::layout;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

// Modifier bits of the keyboard report
pub const KC_LCTRL: u8 = 1 << 0;
pub const KC_LSHIFT: u8 = 1 << 1;
pub const KC_LALT: u8 = 1 << 2;
pub const KC_LGUI: u8 = 1 << 3;
pub const KC_RCTRL: u8 = 1 << 4;
pub const KC_RSHIFT: u8 = 1 << 5;

// Mouse button bits of the mouse report
pub const BTN1: u8 = 1 << 0;
pub const BTN2: u8 = 1 << 1;
pub const BTN3: u8 = 1 << 2;
pub const BTN4: u8 = 1 << 3;

pub type TestKeyboard = Keyboard<'static, { layout::ROWS }, { layout::COLS }, { layout::NUM_LAYERS }>;

/// One scripted input, fed to the engine after `delay` milliseconds.
#[derive(Debug, Clone)]
pub enum TestInput {
    Key { row: u8, col: u8, pressed: bool, delay: u64 },
    Pointer { dx: i8, dy: i8, delay: u64 },
}

pub fn press(row: u8, col: u8, delay: u64) -> TestInput {
    TestInput::Key { row, col, pressed: true, delay }
}

pub fn release(row: u8, col: u8, delay: u64) -> TestInput {
    TestInput::Key { row, col, pressed: false, delay }
}

pub fn motion(dx: i8, dy: i8, delay: u64) -> TestInput {
    TestInput::Pointer { dx, dy, delay }
}

pub fn kb(modifier: u8, keycodes: [u8; 6]) -> Report {
    Report::Keyboard(KeyboardReport {
        modifier,
        reserved: 0,
        leds: 0,
        keycodes,
    })
}

pub fn mouse(buttons: u8, x: i8, y: i8) -> Report {
    Report::Mouse(MouseReport {
        buttons,
        x,
        y,
        wheel: 0,
        pan: 0,
    })
}

/// Run the keyboard against a scripted input sequence and assert the exact
/// stream of emitted reports.
pub async fn run_sequence_test(keyboard: &mut TestKeyboard, inputs: &[TestInput], expected_reports: &[Report]) {
    static REPORTS_DONE: Mutex<CriticalSectionRawMutex, bool> = Mutex::new(false);
    static MAX_TEST_TIMEOUT: Duration = Duration::from_secs(10);

    KEY_EVENT_CHANNEL.clear();
    POINTER_EVENT_CHANNEL.clear();
    KEYBOARD_REPORT_CHANNEL.clear();

    join!(
        // Run keyboard until all reports are received
        async {
            select(keyboard.run(), async {
                select(
                    Timer::after(MAX_TEST_TIMEOUT).then(|_| async {
                        panic!("Test timeout reached");
                    }),
                    async {
                        while !*REPORTS_DONE.lock().await {
                            Timer::after(Duration::from_millis(50)).await;
                        }
                    },
                )
                .await;
            })
            .await;
        },
        // Send all inputs with their delays
        async {
            for input in inputs {
                match *input {
                    TestInput::Key { row, col, pressed, delay } => {
                        Timer::after(Duration::from_millis(delay)).await;
                        KEY_EVENT_CHANNEL.send(KeyEvent { row, col, pressed }).await;
                    }
                    TestInput::Pointer { dx, dy, delay } => {
                        Timer::after(Duration::from_millis(delay)).await;
                        POINTER_EVENT_CHANNEL.send(PointerEvent { dx, dy }).await;
                    }
                }
            }
        },
        // Verify reports
        async {
            for (index, expected) in expected_reports.iter().enumerate() {
                match select(Timer::after(Duration::from_secs(2)), KEYBOARD_REPORT_CHANNEL.receive()).await {
                    Either::First(_) => panic!("Wait for report #{index} timed out"),
                    Either::Second(report) => {
                        log::debug!("Received report #{index}: {report:?}");
                        assert_eq!(
                            *expected, report,
                            "on report #{}, expected left but actually right",
                            index
                        );
                    }
                }
            }
            // Set done flag after all reports are verified
            *REPORTS_DONE.lock().await = true;
        }
    );

    // Reset the done flag for the next harness invocation
    *REPORTS_DONE.lock().await = false;
}

pub fn create_test_keyboard_with_config(config: BehaviorConfig) -> TestKeyboard {
    // Box::leak is acceptable in tests
    let leaked_keymap = Box::leak(Box::new(layout::default_keymap()));
    let keymap = KeyMap::new(leaked_keymap, config);
    let keymap_cell = Box::leak(Box::new(RefCell::new(keymap)));
    Keyboard::new(keymap_cell)
}

pub fn create_test_keyboard() -> TestKeyboard {
    create_test_keyboard_with_config(layout::default_behavior())
}

/// The stock behavior with the multi-tap grouping window stretched, so
/// scripted double taps are not at the mercy of scheduler jitter.
pub fn create_test_keyboard_with_wide_tap_window() -> TestKeyboard {
    let mut config = layout::default_behavior();
    config.dance.release_timeout = Duration::from_millis(150);
    create_test_keyboard_with_config(config)
}
