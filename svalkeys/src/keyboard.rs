//! The keyboard engine: consumes key and pointer events, resolves dual-role
//! keys and emits hid reports.

use core::cell::RefCell;

use embassy_futures::select::{Either, Either3, select, select3};
use embassy_futures::yield_now;
use embassy_time::{Instant, Timer};
use heapless::Vec;

use crate::action::{Action, KeyAction};
use crate::caps_word::CapsWord;
use crate::channel::{KEY_EVENT_CHANNEL, KEYBOARD_REPORT_CHANNEL, POINTER_EVENT_CHANNEL};
use crate::descriptor::{KeyboardReport, MouseReport};
use crate::event::{KeyEvent, PointerEvent};
use crate::hid::Report;
use crate::hid_state::{HidModifiers, HidMouseButtons};
use crate::input_device::Runnable;
use crate::key_override::{ActiveOverride, KEY_OVERRIDE_MAX_NUM};
use crate::keycode::{KeyCode, ModifierCombination};
use crate::keymap::KeyMap;
use crate::light::layer_color;
use crate::mod_button::{MOD_BUTTON_MAX_NUM, ModButton, ModButtonState};
use crate::tap_dance::{HoldOutcome, ResolvedHold, TapDance, TapOutcome};

/// Capacity of the deferred-event buffer used while a dance key waits for
/// its resolution.
const UNPROCESSED_EVENTS_NUM: usize = 16;
/// Maximum number of simultaneously resolved dance holds.
const DANCE_HOLDS_NUM: usize = 8;

impl<const ROW: usize, const COL: usize, const NUM_LAYER: usize> Runnable for Keyboard<'_, ROW, COL, NUM_LAYER> {
    /// Main keyboard processing task: receives events, processes them, and
    /// sends reports via the report channel.
    async fn run(&mut self) {
        loop {
            match select(KEY_EVENT_CHANNEL.receive(), POINTER_EVENT_CHANNEL.receive()).await {
                Either::First(key_event) => {
                    self.process_inner(key_event).await;

                    // Process events deferred while a dance key was waiting
                    // for its resolution. The buffer can grow again during
                    // this loop if a deferred press is itself a dance key.
                    loop {
                        if self.unprocessed_events.is_empty() {
                            break;
                        }
                        let e = self.unprocessed_events.remove(0);
                        self.process_inner(e).await;
                    }
                }
                Either::Second(pointer_event) => self.process_pointer(pointer_event).await,
            }
        }
    }
}

pub struct Keyboard<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    /// Keymap
    pub(crate) keymap: &'a RefCell<KeyMap<'a, ROW, COL, NUM_LAYER>>,

    /// Unprocessed events
    unprocessed_events: Vec<KeyEvent, UNPROCESSED_EVENTS_NUM>,

    /// Timer which records the timestamp of key presses
    timer: [[Option<Instant>; ROW]; COL],

    /// Resolved dance holds with their positions, until the release arrives
    dance_holds: Vec<((u8, u8), ResolvedHold), DANCE_HOLDS_NUM>,

    /// Resolution state of the dual-role mod/mouse buttons
    mod_button_states: [ModButtonState; MOD_BUTTON_MAX_NUM],

    /// Triggered key overrides, index-aligned with the override table
    override_states: [Option<ActiveOverride>; KEY_OVERRIDE_MAX_NUM],

    /// Caps word state
    caps_word: CapsWord,

    /// One-shot modifiers armed by smart shift, merged into the next press report
    oneshot_mods: HidModifiers,

    /// Whether the auto mouse layer is currently active
    mouse_mode: bool,

    /// The held modifiers for the keyboard hid report
    held_modifiers: HidModifiers,

    /// The modifiers of currently held `WithModifier` actions
    with_modifiers: HidModifiers,

    /// The held keys for the keyboard hid report, except the modifiers
    held_keycodes: [KeyCode; 6],

    /// Registered key positions, aligned with `held_keycodes`
    registered_keys: [Option<(u8, u8)>; 6],

    /// Internal mouse report buf
    mouse_report: MouseReport,
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> Keyboard<'a, ROW, COL, NUM_LAYER> {
    pub fn new(keymap: &'a RefCell<KeyMap<'a, ROW, COL, NUM_LAYER>>) -> Self {
        Keyboard {
            keymap,
            unprocessed_events: Vec::new(),
            timer: [[None; ROW]; COL],
            dance_holds: Vec::new(),
            mod_button_states: [ModButtonState::default(); MOD_BUTTON_MAX_NUM],
            override_states: [None; KEY_OVERRIDE_MAX_NUM],
            caps_word: CapsWord::default(),
            oneshot_mods: HidModifiers::new(),
            mouse_mode: false,
            held_modifiers: HidModifiers::new(),
            with_modifiers: HidModifiers::new(),
            held_keycodes: [KeyCode::No; 6],
            registered_keys: [None; 6],
            mouse_report: MouseReport::default(),
        }
    }

    async fn send_report(&self, report: Report) {
        KEYBOARD_REPORT_CHANNEL.sender().send(report).await
    }

    /// Process a key transition at (row, col)
    async fn process_inner(&mut self, key_event: KeyEvent) {
        if key_event.pressed {
            self.timer[key_event.col as usize][key_event.row as usize] = Some(Instant::now());
        }

        let original_action = self.keymap.borrow_mut().get_action_with_layer_cache(key_event);
        let key_action = self.try_start_overrides(original_action, key_event);

        // Any press commits held, still-speculative mod-buttons to their
        // modifier role before the new key is processed.
        if key_event.pressed {
            self.commit_held_mod_buttons(&key_action);
        }

        self.process_key_action(key_action, key_event).await;

        self.try_finish_overrides(original_action, key_event);
    }

    async fn process_key_action(&mut self, key_action: KeyAction, key_event: KeyEvent) {
        match key_action {
            KeyAction::No | KeyAction::Transparent => (),
            KeyAction::Single(a) => self.process_key_action_normal(a, key_event).await,
            KeyAction::WithModifier(a, m) => self.process_key_action_with_modifier(a, m, key_event).await,
            KeyAction::TapDance(idx) => self.process_key_action_tap_dance(idx, key_event).await,
            KeyAction::ModButton(idx) => self.process_key_action_mod_button(idx, key_event).await,
        }
    }

    async fn process_key_action_normal(&mut self, action: Action, key_event: KeyEvent) {
        match action {
            Action::Key(key) => self.process_action_key(key, key_event).await,
            Action::LayerOn(layer_num) => self.process_action_layer_switch(layer_num, key_event),
            Action::LayerToggle(layer_num) => {
                // Toggle a layer when the key is released
                if !key_event.pressed {
                    self.keymap.borrow_mut().toggle_layer(layer_num);
                    self.update_layer_indicator();
                }
            }
            Action::LayerToggleOnly(layer_num) => {
                // Activate a layer and deactivate all other layers(except default layer)
                if key_event.pressed {
                    let default_layer = self.keymap.borrow().get_default_layer();
                    for i in 0..NUM_LAYER as u8 {
                        if i != default_layer {
                            self.keymap.borrow_mut().deactivate_layer(i);
                        }
                    }
                    self.keymap.borrow_mut().activate_layer(layer_num);
                    // Leaving the mouse layer this way also leaves mouse mode
                    self.mouse_mode = layer_num == self.keymap.borrow().behavior.mouse_mode.layer;
                    self.update_layer_indicator();
                }
            }
            Action::Modifier(modifiers) => {
                if key_event.pressed {
                    self.register_modifiers(modifiers);
                } else {
                    self.unregister_modifiers(modifiers);
                }
                // Report the modifier press/release in its own hid report
                self.send_keyboard_report(key_event.pressed).await;
            }
        }
    }

    async fn process_key_action_with_modifier(
        &mut self,
        action: Action,
        modifiers: ModifierCombination,
        key_event: KeyEvent,
    ) {
        if key_event.pressed {
            // These modifiers are combined into the hid report, so they are
            // "pressed" the same time as the key (in the same report)
            self.with_modifiers |= modifiers.to_hid_modifiers();
        } else {
            self.with_modifiers &= !(modifiers.to_hid_modifiers());
        }
        self.process_key_action_normal(action, key_event).await;
    }

    /// Tap action: send a key when the key is pressed, then release it.
    async fn process_key_action_tap(&mut self, action: Action, mut key_event: KeyEvent) {
        if key_event.pressed {
            self.process_key_action_normal(action, key_event).await;

            // Wait 10ms, then send the release
            Timer::after_millis(10).await;

            key_event.pressed = false;
            self.process_key_action_normal(action, key_event).await;
        }
    }

    async fn process_action_key(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key == KeyCode::CapsWordToggle {
            if key_event.pressed {
                self.caps_word.toggle();
            }
            return;
        }

        if key.is_mouse_key() {
            self.process_action_mouse(key, key_event).await;
            return;
        }

        if key_event.pressed {
            // A key outside the word breaks caps word; modifiers do not
            if self.caps_word.is_on() && !key.is_modifier() && !CapsWord::continues_word(key) {
                self.caps_word.turn_off();
            }

            self.register_key(key, key_event);
            self.send_keyboard_report(true).await;

            // One-shot modifiers apply to exactly one key stroke
            if !key.is_modifier() {
                self.oneshot_mods = HidModifiers::new();
            }
        } else {
            self.unregister_key(key, key_event);
            self.send_keyboard_report(false).await;
        }
    }

    fn process_action_layer_switch(&mut self, layer_num: u8, key_event: KeyEvent) {
        // Change layer state only when the key state is changed
        if key_event.pressed {
            self.keymap.borrow_mut().activate_layer(layer_num);
        } else {
            self.keymap.borrow_mut().deactivate_layer(layer_num);
        }
        self.update_layer_indicator();
    }

    /// Process a mouse key from the keymap. Only the buttons appear in this
    /// layout; motion comes from the pointer devices themselves.
    async fn process_action_mouse(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key.is_mouse_button() {
            if key_event.pressed {
                self.register_mouse_buttons(key.as_mouse_buttons());
            } else {
                self.unregister_mouse_buttons(key.as_mouse_buttons());
            }
            self.send_mouse_report().await;
        } else {
            debug!("Ignoring mouse key {:?}", key);
        }
    }

    /// The tap-dance engine.
    ///
    /// A press starts a sequence: released within the tap timeout it is a
    /// tap (possibly one of several in quick succession), otherwise it is a
    /// hold. Keys other than the dance key itself never resolve the
    /// sequence; their events are deferred and re-processed in order after
    /// the resolution.
    async fn process_key_action_tap_dance(&mut self, idx: u8, key_event: KeyEvent) {
        if !key_event.pressed {
            // Only releases of resolved holds arrive here; a release with
            // no recorded hold state is a no-op.
            self.finish_dance_hold(key_event).await;
            return;
        }

        let dance = match self.keymap.borrow().behavior.dance.dances.get(idx as usize) {
            Some(dance) => *dance,
            None => {
                warn!("No dance configured at index {}", idx);
                return;
            }
        };
        let (tap_timeout, release_timeout) = {
            let keymap = self.keymap.borrow();
            (
                keymap.behavior.dance.tap_timeout_of(&dance),
                keymap.behavior.dance.release_timeout_of(&dance),
            )
        };

        let mut tap_count: u8 = 0;
        loop {
            // Touched: the press resolves by its own release (tap) or by
            // the tap timeout expiring (hold). The deadline is fixed at
            // press time; foreign events do not rearm it.
            let hold_deadline = Instant::now() + tap_timeout;
            let hold = loop {
                match select3(
                    Timer::at(hold_deadline),
                    KEY_EVENT_CHANNEL.receive(),
                    POINTER_EVENT_CHANNEL.receive(),
                )
                .await
                {
                    Either3::First(_) => break true,
                    Either3::Second(e) => {
                        if e.same_position(&key_event) && !e.pressed {
                            break false;
                        }
                        self.defer_event(e);
                    }
                    Either3::Third(e) => self.process_pointer(e).await,
                }
            };

            if hold {
                debug!("Dance key {} resolved to hold, tap_count {}", idx, tap_count);
                self.start_dance_hold(&dance, tap_count, key_event).await;
                return;
            }

            if let Some(pressed_at) = self.timer[key_event.col as usize][key_event.row as usize] {
                debug!(
                    "Dance key {} tapped after {}ms",
                    idx,
                    pressed_at.elapsed().as_millis()
                );
            }
            self.emit_dance_tap(&dance, tap_count, key_event).await;
            tap_count += 1;

            // Post-tap window: only a quick re-press of the same key
            // continues the sequence. Any foreign press ends it.
            let window_deadline = Instant::now() + release_timeout;
            let again = loop {
                match select3(
                    Timer::at(window_deadline),
                    KEY_EVENT_CHANNEL.receive(),
                    POINTER_EVENT_CHANNEL.receive(),
                )
                .await
                {
                    Either3::First(_) => break false,
                    Either3::Second(e) => {
                        if e.same_position(&key_event) && e.pressed {
                            break true;
                        }
                        self.defer_event(e);
                        if e.pressed {
                            break false;
                        }
                    }
                    Either3::Third(e) => self.process_pointer(e).await,
                }
            };
            if !again {
                return;
            }
        }
    }

    /// Emit one completed tap of a dance key.
    async fn emit_dance_tap(&mut self, dance: &TapDance, tap_count: u8, key_event: KeyEvent) {
        match dance.tap {
            TapOutcome::Key(key) => {
                self.process_key_action_tap(Action::Key(key), key_event).await;
                self.set_mouse_mode(false);
            }
            TapOutcome::KeyWith(key, modifiers) => {
                // The modifiers ride along in the press report and are gone
                // again in the release report
                let mods = modifiers.to_hid_modifiers();
                let mut release_event = key_event;
                release_event.pressed = false;
                self.with_modifiers |= mods;
                self.process_key_action_normal(Action::Key(key), key_event).await;
                Timer::after_millis(10).await;
                self.with_modifiers &= !mods;
                self.process_key_action_normal(Action::Key(key), release_event).await;
                self.set_mouse_mode(false);
            }
            TapOutcome::ShiftSwap { plain, swapped } => {
                let held_shift = self.held_modifiers & HidModifiers::SHIFT_MASK;
                let oneshot_shift = self.oneshot_mods & HidModifiers::SHIFT_MASK;
                if !(held_shift | oneshot_shift).is_empty() {
                    // Swapped stroke goes out without the shift, which is
                    // restored right after
                    self.held_modifiers &= !HidModifiers::SHIFT_MASK;
                    self.oneshot_mods &= !HidModifiers::SHIFT_MASK;
                    self.process_key_action_tap(Action::Key(swapped), key_event).await;
                    self.held_modifiers |= held_shift;
                } else {
                    self.process_key_action_tap(Action::Key(plain), key_event).await;
                }
                self.set_mouse_mode(false);
            }
            TapOutcome::SmartShift => {
                let shift_active =
                    !((self.held_modifiers | self.oneshot_mods) & HidModifiers::SHIFT_MASK).is_empty();
                if tap_count > 0 || shift_active {
                    self.caps_word.turn_on();
                } else {
                    info!("One-shot shift armed");
                    self.oneshot_mods |= HidModifiers::new().with_left_shift(true);
                }
            }
        }
    }

    /// Fire the hold branch of a dance key and record how to undo it.
    async fn start_dance_hold(&mut self, dance: &TapDance, tap_count: u8, key_event: KeyEvent) {
        let resolved = if tap_count == 0 {
            match dance.hold {
                HoldOutcome::Layer(layer) => {
                    self.set_mouse_mode(false);
                    self.keymap.borrow_mut().push_layer(layer);
                    self.update_layer_indicator();
                    ResolvedHold::Layer
                }
                HoldOutcome::Modifier(modifiers) => {
                    self.register_modifiers(modifiers);
                    self.send_keyboard_report(true).await;
                    ResolvedHold::Modifier(modifiers)
                }
            }
        } else {
            // Hold after taps keeps the literal tap key registered
            match dance.tap {
                TapOutcome::Key(key) => {
                    self.register_key(key, key_event);
                    self.send_keyboard_report(true).await;
                    ResolvedHold::Repeat {
                        key,
                        added: HidModifiers::new(),
                        restore: HidModifiers::new(),
                    }
                }
                TapOutcome::KeyWith(key, modifiers) => {
                    let added = modifiers.to_hid_modifiers();
                    self.with_modifiers |= added;
                    self.register_key(key, key_event);
                    self.send_keyboard_report(true).await;
                    ResolvedHold::Repeat {
                        key,
                        added,
                        restore: HidModifiers::new(),
                    }
                }
                TapOutcome::ShiftSwap { plain, swapped } => {
                    let held_shift = self.held_modifiers & HidModifiers::SHIFT_MASK;
                    let oneshot_shift = self.oneshot_mods & HidModifiers::SHIFT_MASK;
                    if !(held_shift | oneshot_shift).is_empty() {
                        self.held_modifiers &= !HidModifiers::SHIFT_MASK;
                        self.oneshot_mods &= !HidModifiers::SHIFT_MASK;
                        self.register_key(swapped, key_event);
                        self.send_keyboard_report(true).await;
                        ResolvedHold::Repeat {
                            key: swapped,
                            added: HidModifiers::new(),
                            restore: held_shift,
                        }
                    } else {
                        self.register_key(plain, key_event);
                        self.send_keyboard_report(true).await;
                        ResolvedHold::Repeat {
                            key: plain,
                            added: HidModifiers::new(),
                            restore: HidModifiers::new(),
                        }
                    }
                }
                TapOutcome::SmartShift => {
                    // The smart shift key holds plain shift whatever the tap count
                    let modifiers = ModifierCombination::LSHIFT;
                    self.register_modifiers(modifiers);
                    self.send_keyboard_report(true).await;
                    ResolvedHold::Modifier(modifiers)
                }
            }
        };

        if self
            .dance_holds
            .push(((key_event.row, key_event.col), resolved))
            .is_err()
        {
            error!("Dance hold table is full, dropping hold state");
        }
    }

    /// Undo a resolved dance hold on its key's release.
    async fn finish_dance_hold(&mut self, key_event: KeyEvent) {
        let position = (key_event.row, key_event.col);
        let resolved = match self.dance_holds.iter().position(|(pos, _)| *pos == position) {
            Some(index) => self.dance_holds.swap_remove(index).1,
            None => {
                debug!("Dance release with no recorded hold, ignored");
                return;
            }
        };

        match resolved {
            ResolvedHold::Layer => {
                self.keymap.borrow_mut().pop_layer();
                self.update_layer_indicator();
            }
            ResolvedHold::Modifier(modifiers) => {
                self.unregister_modifiers(modifiers);
                self.send_keyboard_report(false).await;
            }
            ResolvedHold::Repeat { key, added, restore } => {
                self.unregister_key(key, key_event);
                self.with_modifiers &= !added;
                self.send_keyboard_report(false).await;
                self.held_modifiers |= restore;
                self.set_mouse_mode(false);
            }
        }
    }

    /// Commit every held, still-speculative mod-button to its modifier role.
    /// Called for every key press; `key_action` is the action of the key
    /// being pressed.
    fn commit_held_mod_buttons(&mut self, key_action: &KeyAction) {
        let pressed_index = match key_action {
            KeyAction::ModButton(i) => Some(*i as usize),
            _ => None,
        };
        let is_plain_key = pressed_index.is_none() && !key_action.is_mouse_button();

        for (i, state) in self.mod_button_states.iter_mut().enumerate() {
            if Some(i) == pressed_index {
                continue;
            }
            if state.uncommitted() {
                state.used_as_modifier = true;
                // Typing on a plain key means the pointer session is over;
                // defer the actual mouse mode exit to this key's release
                if is_plain_key {
                    state.exit_mouse_mode = true;
                }
            }
        }
    }

    /// Modifiers currently asserted by held mod-buttons other than `except`,
    /// the exclusion set of the external-modifier snapshot.
    fn mod_button_asserted_mods(&self, except: usize) -> HidModifiers {
        let keymap = self.keymap.borrow();
        let mut asserted = HidModifiers::new();
        for (i, state) in self.mod_button_states.iter().enumerate() {
            if i == except {
                continue;
            }
            if state.is_held && !state.mods_on_press && !state.converted_to_mouse {
                if let Some(config) = keymap.behavior.mod_button.buttons.get(i) {
                    asserted |= config.modifier;
                }
            }
        }
        asserted
    }

    /// The dual-role modifier / mouse-button engine.
    async fn process_key_action_mod_button(&mut self, idx: u8, key_event: KeyEvent) {
        let config: ModButton = match self.keymap.borrow().behavior.mod_button.buttons.get(idx as usize) {
            Some(config) => *config,
            None => {
                warn!("No mod-button configured at index {}", idx);
                return;
            }
        };

        if key_event.pressed {
            // Snapshot external modifiers; modifiers asserted by the other
            // held mod-buttons do not count, otherwise two simultaneously
            // held mod-buttons would force each other into the mouse branch
            let external = self.held_modifiers & !self.mod_button_asserted_mods(idx as usize);
            let mods_on_press = !external.is_empty();

            self.mod_button_states[idx as usize] = ModButtonState {
                is_held: true,
                mods_on_press,
                ..ModButtonState::default()
            };

            if mods_on_press {
                // Click-with-modifier: act as a mouse button right away
                self.register_mouse_buttons(config.button);
                self.send_mouse_report().await;
            } else {
                // Speculative modifier, reversible until committed
                self.register_modifiers_state(config.modifier);
                self.send_keyboard_report(true).await;
            }
        } else {
            let state = self.mod_button_states[idx as usize];
            if state.mods_on_press || state.converted_to_mouse {
                self.unregister_mouse_buttons(config.button);
                self.send_mouse_report().await;
            } else if state.used_as_modifier {
                self.unregister_modifiers_state(config.modifier);
                self.send_keyboard_report(false).await;
            } else {
                // Tapped alone: take the speculative modifier back and click
                self.unregister_modifiers_state(config.modifier);
                self.send_keyboard_report(false).await;
                self.register_mouse_buttons(config.button);
                self.send_mouse_report().await;
                self.unregister_mouse_buttons(config.button);
                self.send_mouse_report().await;
            }

            if state.exit_mouse_mode {
                self.set_mouse_mode(false);
            }

            self.mod_button_states[idx as usize] = ModButtonState::default();
        }
    }

    /// Process a pointer motion report: convert held, uncommitted
    /// mod-buttons into dragging mouse buttons, keep the auto mouse layer
    /// alive and forward the motion.
    async fn process_pointer(&mut self, pointer_event: PointerEvent) {
        if pointer_event.is_motion() {
            for i in 0..self.mod_button_states.len() {
                if self.mod_button_states[i].uncommitted() {
                    let config: ModButton = match self.keymap.borrow().behavior.mod_button.buttons.get(i) {
                        Some(config) => *config,
                        None => continue,
                    };
                    debug!("Mod-button {} converted to mouse button by motion", i);
                    self.unregister_modifiers_state(config.modifier);
                    self.send_keyboard_report(false).await;
                    self.register_mouse_buttons(config.button);
                    self.mod_button_states[i].converted_to_mouse = true;
                }
            }

            let auto_activate = self.keymap.borrow().behavior.mouse_mode.auto_activate;
            if auto_activate {
                self.set_mouse_mode(true);
            }
        }

        self.mouse_report.x = pointer_event.dx;
        self.mouse_report.y = pointer_event.dy;
        self.send_mouse_report().await;
        self.mouse_report.x = 0;
        self.mouse_report.y = 0;
    }

    /// Replaces the incoming key action if a key override is armed for it.
    /// The decision is made at press time and kept until the release.
    fn try_start_overrides(&mut self, key_action: KeyAction, key_event: KeyEvent) -> KeyAction {
        let keymap = self.keymap.borrow();
        let overrides = &keymap.behavior.key_override.overrides;

        if !key_event.pressed {
            for (i, o) in overrides.iter().enumerate() {
                if let Some(active) = self.override_states[i] {
                    if o.trigger == key_action {
                        // Release the replacement key instead; deactivation
                        // happens after the release report is out
                        return active.replacement;
                    }
                }
            }
            return key_action;
        }

        for (i, o) in overrides.iter().enumerate() {
            if self.override_states[i].is_none()
                && o.trigger == key_action
                && !(self.held_modifiers & o.trigger_mods).is_empty()
            {
                debug!("Key override {} triggered", i);
                self.override_states[i] = Some(ActiveOverride {
                    replacement: o.replacement,
                    suppress: o.suppressed_mods,
                });
                return o.replacement;
            }
        }

        key_action
    }

    /// Release of an overridden key deactivates the override, after the
    /// release report is sent.
    fn try_finish_overrides(&mut self, original_action: KeyAction, key_event: KeyEvent) {
        if !key_event.pressed {
            let keymap = self.keymap.borrow();
            let overrides = &keymap.behavior.key_override.overrides;
            for (i, o) in overrides.iter().enumerate() {
                if self.override_states[i].is_some() && o.trigger == original_action {
                    self.override_states[i] = None;
                }
            }
        }
    }

    /// Turn the auto mouse layer on or off.
    fn set_mouse_mode(&mut self, on: bool) {
        if self.mouse_mode == on {
            return;
        }
        self.mouse_mode = on;
        let layer = self.keymap.borrow().behavior.mouse_mode.layer;
        if on {
            debug!("Mouse mode on");
            self.keymap.borrow_mut().activate_layer(layer);
        } else {
            debug!("Mouse mode off");
            self.keymap.borrow_mut().deactivate_layer(layer);
        }
        self.update_layer_indicator();
    }

    /// Report the indicator color of the topmost active layer; the RGB
    /// driver picks it up from here.
    fn update_layer_indicator(&self) {
        let layer = self.keymap.borrow().get_activated_layer();
        let color = layer_color(layer);
        debug!("Layer {} active, indicator color {:?}", layer, color);
    }

    async fn send_keyboard_report(&mut self, pressed: bool) {
        // All modifier related effects are combined here to be sent with
        // the hid report
        let modifier = self.resolve_modifiers(pressed).into_bits();

        self.send_report(Report::Keyboard(KeyboardReport {
            modifier,
            reserved: 0,
            leds: 0,
            keycodes: self.held_keycodes.map(|k| k as u16 as u8),
        }))
        .await;

        // Yield once after sending the report to the channel
        yield_now().await;
    }

    async fn send_mouse_report(&mut self) {
        let report = self.mouse_report;
        self.send_report(Report::Mouse(report)).await;
        yield_now().await;
    }

    /// The effective modifier byte of the next keyboard report.
    fn resolve_modifiers(&self, pressed: bool) -> HidModifiers {
        let mut modifiers = self.held_modifiers;

        // Key override suppression applies to the physically held modifiers
        for active in self.override_states.iter().flatten() {
            modifiers &= !active.suppress;
        }

        modifiers |= self.with_modifiers;

        if pressed {
            modifiers |= self.oneshot_mods;
        }

        // Caps word shifts the letter currently going down
        if self.caps_word.is_on() && self.held_keycodes.iter().any(|k| CapsWord::shifts(*k)) {
            modifiers |= HidModifiers::new().with_left_shift(true);
        }

        modifiers
    }

    /// Register a key, the key can be a basic keycode or a modifier.
    fn register_key(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key.is_modifier() {
            self.held_modifiers |= key.to_hid_modifiers();
        } else if key.is_basic() {
            self.register_keycode(key, key_event);
        }
    }

    /// Unregister a key, the key can be a basic keycode or a modifier.
    fn unregister_key(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key.is_modifier() {
            self.held_modifiers &= !key.to_hid_modifiers();
        } else if key.is_basic() {
            self.unregister_keycode(key, key_event);
        }
    }

    /// Register a key to be sent in hid report.
    fn register_keycode(&mut self, key: KeyCode, key_event: KeyEvent) {
        // First, find the slot already owned by this position
        let slot = self.registered_keys.iter().enumerate().find_map(|(i, k)| {
            if let Some((row, col)) = k {
                if key_event.row == *row && key_event.col == *col {
                    return Some(i);
                }
            }
            None
        });

        if let Some(index) = slot {
            self.held_keycodes[index] = key;
            self.registered_keys[index] = Some((key_event.row, key_event.col));
        } else if let Some(index) = self.held_keycodes.iter().position(|&k| k == KeyCode::No) {
            self.held_keycodes[index] = key;
            self.registered_keys[index] = Some((key_event.row, key_event.col));
        }
    }

    /// Unregister a key from hid report.
    fn unregister_keycode(&mut self, key: KeyCode, key_event: KeyEvent) {
        let slot = self.registered_keys.iter().enumerate().find_map(|(i, k)| {
            if let Some((row, col)) = k {
                if key_event.row == *row && key_event.col == *col {
                    return Some(i);
                }
            }
            None
        });

        if let Some(index) = slot {
            self.held_keycodes[index] = KeyCode::No;
            self.registered_keys[index] = None;
        } else if let Some(index) = self.held_keycodes.iter().position(|&k| k == key) {
            self.held_keycodes[index] = KeyCode::No;
            self.registered_keys[index] = None;
        }
    }

    /// Register a modifier combination to be sent in hid report.
    fn register_modifiers(&mut self, modifiers: ModifierCombination) {
        self.held_modifiers |= modifiers.to_hid_modifiers();
    }

    /// Unregister a modifier combination from hid report.
    fn unregister_modifiers(&mut self, modifiers: ModifierCombination) {
        self.held_modifiers &= !modifiers.to_hid_modifiers();
    }

    /// Register raw hid modifiers (mod-button engine).
    fn register_modifiers_state(&mut self, modifiers: HidModifiers) {
        self.held_modifiers |= modifiers;
    }

    /// Unregister raw hid modifiers (mod-button engine).
    fn unregister_modifiers_state(&mut self, modifiers: HidModifiers) {
        self.held_modifiers &= !modifiers;
    }

    /// Defer an event until the current dance key resolves.
    fn defer_event(&mut self, event: KeyEvent) {
        if self.unprocessed_events.push(event).is_err() {
            warn!("Unprocessed event queue is full, dropping event");
        }
    }

    fn register_mouse_buttons(&mut self, buttons: HidMouseButtons) {
        self.mouse_report.buttons |= buttons.into_bits();
    }

    fn unregister_mouse_buttons(&mut self, buttons: HidMouseButtons) {
        self.mouse_report.buttons &= !buttons.into_bits();
    }
}
