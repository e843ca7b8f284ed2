//! Caps word: type one word in caps without holding shift.

use crate::keycode::KeyCode;

/// Caps word state. While on, letter keys are reported with left shift;
/// any key outside the word-continuation set turns it off.
#[derive(Debug, Default)]
pub struct CapsWord {
    on: bool,
}

impl CapsWord {
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn turn_on(&mut self) {
        if !self.on {
            info!("Caps word on");
            self.on = true;
        }
    }

    pub fn turn_off(&mut self) {
        if self.on {
            info!("Caps word off");
            self.on = false;
        }
    }

    pub fn toggle(&mut self) {
        if self.on { self.turn_off() } else { self.turn_on() }
    }

    /// Keys that keep the current word going: alphanumerics, minus (and its
    /// shifted underscore), backspace and delete. Everything else ends it.
    pub fn continues_word(key: KeyCode) -> bool {
        (KeyCode::A <= key && key <= KeyCode::Z)
            || (KeyCode::Kc1 <= key && key <= KeyCode::Kc0)
            || key == KeyCode::Minus
            || key == KeyCode::Backspace
            || key == KeyCode::Delete
    }

    /// Keys that are reported shifted while caps word is on.
    pub fn shifts(key: KeyCode) -> bool {
        key.is_alpha()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn word_continuation() {
        assert!(CapsWord::continues_word(KeyCode::A));
        assert!(CapsWord::continues_word(KeyCode::Kc0));
        assert!(CapsWord::continues_word(KeyCode::Minus));
        assert!(CapsWord::continues_word(KeyCode::Backspace));
        assert!(CapsWord::continues_word(KeyCode::Delete));
        assert!(!CapsWord::continues_word(KeyCode::Space));
        assert!(!CapsWord::continues_word(KeyCode::Enter));
    }

    #[test]
    fn only_letters_shift() {
        assert!(CapsWord::shifts(KeyCode::Q));
        assert!(!CapsWord::shifts(KeyCode::Kc1));
        assert!(!CapsWord::shifts(KeyCode::Minus));
    }
}
