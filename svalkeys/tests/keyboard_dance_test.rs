pub mod common;

mod dance_test {
    use embassy_futures::block_on;
    use rusty_fork::rusty_fork_test;

    use crate::common::{
        KC_LSHIFT, KC_RSHIFT, create_test_keyboard, create_test_keyboard_with_wide_tap_window,
        press, release, run_sequence_test,
    };

    rusty_fork_test! {
        #[test]
        fn test_dance_tap() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(4, 0, 10),    // +T (dance: T / LShift)
                    release(4, 0, 100), // -T before the tap timeout
                ];
                let expected = key_report![
                    [0, [kc8!(T), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_dance_hold_modifier() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(4, 0, 10),    // +T
                    release(4, 0, 400), // -T after the tap timeout
                ];
                let expected = key_report![
                    [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_dance_layer_tap_is_plain_tap() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(8, 1, 10),   // +Space (dance: Space / number layer)
                    release(8, 1, 50), // -Space quickly
                ];
                // One tap, zero layer activity
                let expected = key_report![
                    [0, [kc8!(Space), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_dance_layer_hold_and_restore() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(8, 1, 10),    // +Space, hold past the tap timeout
                    press(4, 3, 400),   // +L1-south: Kp4 on the number layer
                    release(4, 3, 30),
                    release(8, 1, 30),  // -Space pops the layer
                    press(4, 3, 30),    // same position is D on the base layer again
                    release(4, 3, 30),
                ];
                let expected = key_report![
                    [0, [kc8!(Kp4), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                    [0, [kc8!(D), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_dance_nested_layer_holds_balance() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(8, 1, 10),    // +Space -> number layer after timeout
                    press(9, 1, 400),   // +Backspace (transparent on num) -> nav layer after timeout
                    press(4, 1, 400),   // both held: the number layer wins, KpPlus
                    release(4, 1, 30),
                    release(9, 1, 30),  // innermost hold released first, pops nav
                    press(0, 0, 30),    // number layer still active: RShift
                    release(0, 0, 30),
                    release(8, 1, 30),  // pops num
                    press(4, 3, 30),    // base D proves the stack is empty
                    release(4, 3, 30),
                ];
                let expected = key_report![
                    [0, [kc8!(KpPlus), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                    [KC_RSHIFT, [0, 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                    [0, [kc8!(D), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_multi_tap_then_hold_repeats_key() {
            let main = async {
                let mut keyboard = create_test_keyboard_with_wide_tap_window();
                let inputs = [
                    press(4, 0, 10),    // +T
                    release(4, 0, 50),  // -T: first tap
                    press(4, 0, 20),    // +T again inside the grouping window
                    release(4, 0, 400), // held past the tap timeout: repeat branch
                ];
                let expected = key_report![
                    // the tap
                    [0, [kc8!(T), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                    // hold after one tap keeps the literal key down, not the modifier
                    [0, [kc8!(T), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_foreign_key_does_not_resolve_touched_key() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(4, 0, 10),   // +T
                    press(4, 3, 40),   // +D while T is undecided
                    release(4, 3, 20), // -D
                    release(4, 0, 40), // -T before the tap timeout: tap
                ];
                // T resolves by its own release only; D is replayed afterwards
                // in arrival order.
                let expected = key_report![
                    [0, [kc8!(T), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                    [0, [kc8!(D), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_stray_release_is_noop() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    release(4, 0, 10), // release with no matching press
                    press(0, 3, 30),   // +H shows the engine is still alive
                    release(0, 3, 30),
                ];
                let expected = key_report![
                    [0, [kc8!(H), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_back_tab_taps_shifted_tab() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(8, 3, 10),   // +BackTab
                    release(8, 3, 50), // -BackTab quickly
                ];
                let expected = key_report![
                    [KC_LSHIFT, [kc8!(Tab), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }
    }
}
