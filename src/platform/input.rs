//! Raw browser input folded into per-tick intents
//!
//! Event handlers may fire any number of times between ticks. The tracker
//! keeps held state and latches one-shot presses until the next tick reads
//! them.

use crate::consts::{CANVAS_WIDTH, TILT_FULL_SCALE_DEGREES};
use crate::sim::TickInput;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    A,
    ArrowRight,
    D,
    ArrowUp,
    W,
    Space,
    Escape,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_event_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "a" | "A" => Some(Key::A),
            "ArrowRight" => Some(Key::ArrowRight),
            "d" | "D" => Some(Key::D),
            "ArrowUp" => Some(Key::ArrowUp),
            "w" | "W" => Some(Key::W),
            " " | "Spacebar" => Some(Key::Space),
            "Escape" | "p" | "P" => Some(Key::Escape),
            _ => None,
        }
    }

    const ALL: [Key; 8] = [
        Key::ArrowLeft,
        Key::A,
        Key::ArrowRight,
        Key::D,
        Key::ArrowUp,
        Key::W,
        Key::Space,
        Key::Escape,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }

    fn mask(pred: fn(Key) -> bool) -> u8 {
        Key::ALL
            .into_iter()
            .filter(|&k| pred(k))
            .fold(0, |mask, k| mask | k.bit())
    }

    fn is_left(self) -> bool {
        matches!(self, Key::ArrowLeft | Key::A)
    }

    fn is_right(self) -> bool {
        matches!(self, Key::ArrowRight | Key::D)
    }

    fn is_jump(self) -> bool {
        matches!(self, Key::ArrowUp | Key::W | Key::Space)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    /// Bitset of held keys
    held: u8,
    jump_latched: bool,
    pause_latched: bool,
    touch_direction: i8,
    tilt_x: f32,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_held(&self, pred: fn(Key) -> bool) -> bool {
        self.held & Key::mask(pred) != 0
    }

    /// Returns true if the key is one the game uses
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(key) = Key::from_event_key(key) else {
            return false;
        };
        // Auto-repeat keydowns and a second jump key are not new presses
        if key.is_jump() && !self.is_held(Key::is_jump) {
            self.jump_latched = true;
        }
        if key == Key::Escape && self.held & key.bit() == 0 {
            self.pause_latched = true;
        }
        self.held |= key.bit();
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(key) = Key::from_event_key(key) else {
            return false;
        };
        self.held &= !key.bit();
        true
    }

    /// Touch or mouse press at a canvas-space x
    pub fn touch_start(&mut self, canvas_x: f32) {
        self.touch_direction = if canvas_x < CANVAS_WIDTH / 2.0 { -1 } else { 1 };
    }

    pub fn touch_end(&mut self) {
        self.touch_direction = 0;
    }

    /// Device orientation gamma in degrees; `None` when the sensor reports nothing
    pub fn set_tilt(&mut self, gamma: Option<f32>) {
        if let Some(gamma) = gamma {
            self.tilt_x = (gamma / TILT_FULL_SCALE_DEGREES).clamp(-1.0, 1.0);
        }
    }

    pub fn request_pause(&mut self) {
        self.pause_latched = true;
    }

    /// Drop everything, e.g. when the page loses focus
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Intent for the next tick; one-shot presses are consumed
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.is_held(Key::is_left),
            move_right: self.is_held(Key::is_right),
            jump_pressed: self.jump_latched,
            touch_direction: self.touch_direction,
            tilt_x: self.tilt_x,
            pause: self.pause_latched,
        };
        self.jump_latched = false;
        self.pause_latched = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_movement_keys() {
        let mut tracker = InputTracker::new();
        assert!(tracker.key_down("a"));
        assert!(tracker.key_down("ArrowRight"));
        let input = tracker.take_tick_input();
        assert!(input.move_left);
        assert!(input.move_right);

        // Still held next tick
        assert!(tracker.take_tick_input().move_left);

        tracker.key_up("a");
        assert!(!tracker.take_tick_input().move_left);
    }

    #[test]
    fn test_either_key_keeps_direction_held() {
        let mut tracker = InputTracker::new();
        tracker.key_down("ArrowLeft");
        tracker.key_down("a");
        tracker.key_up("ArrowLeft");
        assert!(tracker.take_tick_input().move_left);
    }

    #[test]
    fn test_jump_is_rising_edge() {
        let mut tracker = InputTracker::new();
        tracker.key_down(" ");
        assert!(tracker.take_tick_input().jump_pressed);
        // Held, and auto-repeat, are not new presses
        tracker.key_down(" ");
        assert!(!tracker.take_tick_input().jump_pressed);

        tracker.key_up(" ");
        tracker.key_down("w");
        assert!(tracker.take_tick_input().jump_pressed);
    }

    #[test]
    fn test_second_jump_key_while_held_is_not_a_press() {
        let mut tracker = InputTracker::new();
        tracker.key_down("ArrowUp");
        tracker.take_tick_input();
        tracker.key_down("w");
        assert!(!tracker.take_tick_input().jump_pressed);
    }

    #[test]
    fn test_press_and_release_between_ticks_still_jumps() {
        let mut tracker = InputTracker::new();
        tracker.key_down("ArrowUp");
        tracker.key_up("ArrowUp");
        assert!(tracker.take_tick_input().jump_pressed);
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut tracker = InputTracker::new();
        tracker.key_down("Escape");
        assert!(tracker.take_tick_input().pause);
        assert!(!tracker.take_tick_input().pause);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut tracker = InputTracker::new();
        assert!(!tracker.key_down("Shift"));
        assert!(!tracker.key_up("q"));
        assert_eq!(tracker.take_tick_input(), TickInput::default());
    }

    #[test]
    fn test_touch_halves() {
        let mut tracker = InputTracker::new();
        tracker.touch_start(10.0);
        assert_eq!(tracker.take_tick_input().touch_direction, -1);
        tracker.touch_start(CANVAS_WIDTH - 10.0);
        assert_eq!(tracker.take_tick_input().touch_direction, 1);
        tracker.touch_end();
        assert_eq!(tracker.take_tick_input().touch_direction, 0);
    }

    #[test]
    fn test_tilt_scaled_and_clamped() {
        let mut tracker = InputTracker::new();
        tracker.set_tilt(Some(22.5));
        assert_eq!(tracker.take_tick_input().tilt_x, 0.5);
        tracker.set_tilt(Some(-90.0));
        assert_eq!(tracker.take_tick_input().tilt_x, -1.0);
        // Missing reading keeps the last value
        tracker.set_tilt(None);
        assert_eq!(tracker.take_tick_input().tilt_x, -1.0);
    }
}
