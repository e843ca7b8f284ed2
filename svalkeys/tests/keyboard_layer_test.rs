pub mod common;

mod layer_test {
    use embassy_futures::block_on;
    use rusty_fork::rusty_fork_test;

    use crate::common::{
        BTN1, create_test_keyboard, kb, motion, mouse, press, release, run_sequence_test,
    };

    rusty_fork_test! {
        #[test]
        fn test_momentary_mouse_layer() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    press(8, 4, 10),   // +MO(mouse layer)
                    press(4, 3, 20),   // button1 on the mouse layer
                    release(4, 3, 30),
                    release(8, 4, 20), // -MO
                    press(4, 3, 30),   // base layer again: D
                    release(4, 3, 30),
                ];
                let expected = [
                    mouse(BTN1, 0, 0),
                    mouse(0, 0, 0),
                    kb(0, [kc8!(D), 0, 0, 0, 0, 0]),
                    kb(0, [0; 6]),
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_to_base_leaves_mouse_mode() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    motion(1, 0, 10),  // auto-activates the mouse layer
                    press(8, 2, 20),   // TO(0) on the mouse layer
                    release(8, 2, 20),
                    press(4, 0, 30),   // base again: T dance, tapped
                    release(4, 0, 50),
                ];
                let expected = [
                    mouse(0, 1, 0),
                    kb(0, [kc8!(T), 0, 0, 0, 0, 0]),
                    kb(0, [0; 6]),
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }

        #[test]
        fn test_motion_keeps_buttons_in_reports() {
            let main = async {
                let mut keyboard = create_test_keyboard();
                let inputs = [
                    motion(1, 0, 10),
                    press(4, 3, 20),   // button1 held on the mouse layer
                    motion(3, -2, 30), // drag
                    release(4, 3, 30),
                ];
                let expected = [
                    mouse(0, 1, 0),
                    mouse(BTN1, 0, 0),
                    mouse(BTN1, 3, -2),
                    mouse(0, 0, 0),
                ];
                run_sequence_test(&mut keyboard, &inputs, &expected).await;
            };
            block_on(main);
        }
    }
}
