extern crate svalkeys;

// a rust macro to map a key name to its u8 hid usage id
#[macro_export]
macro_rules! kc8 {
    ($key: ident) => {
        svalkeys::keycode::KeyCode::$key as u8
    };
}

// a rust macro to build the expected report stream
#[macro_export]
macro_rules! key_report {
    ($([$modifier:expr, $keys:expr]),* $(,)?) => {
        vec![
            $(
                $crate::common::kb($modifier, $keys),
            )*
        ]
    };
}
