pub mod common;

mod override_test {
    use embassy_futures::block_on;
    use rusty_fork::rusty_fork_test;

    use crate::common::{KC_LSHIFT, create_test_keyboard, press, release, run_sequence_test};

    rusty_fork_test! {
        #[test]
        fn test_paren_without_shift_is_plain() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(6, 2, 10),   // the "(" key: shifted 9
                    release(6, 2, 30),
                ];
                let expected = key_report![
                    [KC_LSHIFT, [kc8!(Kc9), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_shift_paren_becomes_at() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(4, 0, 10),    // +T dance, held: LShift
                    press(6, 2, 400),   // +"(" with shift held: overridden to @
                    release(6, 2, 30),
                    press(0, 3, 30),    // +H: suppression is gone, shift is back
                    release(0, 3, 30),
                    release(4, 0, 30),  // -T
                ];
                let expected = key_report![
                    [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
                    // @ is shift+2; the held shift is suppressed, the
                    // replacement's own shift wins
                    [KC_LSHIFT, [kc8!(Kc2), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                    [KC_LSHIFT, [kc8!(H), 0, 0, 0, 0, 0]],
                    [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_shift_exclam_becomes_caret() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(4, 0, 10),    // +T dance, held: LShift
                    press(5, 4, 400),   // +"!" with shift held: overridden to ^
                    release(5, 4, 30),
                    release(4, 0, 30),
                ];
                let expected = key_report![
                    [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
                    [KC_LSHIFT, [kc8!(Kc6), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_gui_bracket_becomes_tilde() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(5, 0, 10),    // +S dance, held: LGui
                    press(7, 2, 400),   // +"[" with gui held: overridden to ~
                    release(7, 2, 30),
                    release(5, 0, 30),
                ];
                let expected = key_report![
                    [crate::common::KC_LGUI, [0, 0, 0, 0, 0, 0]],
                    // ~ is shift+grave with the gui suppressed
                    [KC_LSHIFT, [kc8!(Grave), 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                    [0, [0, 0, 0, 0, 0, 0]],
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }
    }
}
