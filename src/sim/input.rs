//! Per-frame input handed in by the platform layer
//!
//! Discrete presses arrive as a FIFO that the tick drains completely, in
//! arrival order. Held keys and the analog stick are level-triggered and may
//! be read any number of times within a frame.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    M,
    S,
    T,
    W,
    X,
    Digit1,
    Digit2,
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
}

/// Menu entries the presentation layer can report a click on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuOption {
    Adventure,
    CharacterSet,
    Bestiary,
    DevTesting,
    ToggleCrt,
    Quit,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Key presses since the last frame, oldest first
    pub key_events: VecDeque<Key>,
    /// Keys currently held down
    pub held: Vec<Key>,
    /// Analog stick, each axis in [-1, 1], +y is down
    pub stick: Vec2,
    /// Menu option clicked this frame (hit-tested by the presentation layer)
    pub menu_click: Option<MenuOption>,
}

impl FrameInput {
    /// Input with a single key press
    pub fn press(key: Key) -> Self {
        Self {
            key_events: VecDeque::from([key]),
            ..Default::default()
        }
    }

    /// Input with keys held and nothing pressed
    pub fn hold(keys: &[Key]) -> Self {
        Self {
            held: keys.to_vec(),
            ..Default::default()
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Movement direction from held keys (arrows or WASD), not normalized
    pub fn held_direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.is_held(Key::Left) || self.is_held(Key::A) {
            dir.x -= 1.0;
        }
        if self.is_held(Key::Right) || self.is_held(Key::D) {
            dir.x += 1.0;
        }
        if self.is_held(Key::Up) || self.is_held(Key::W) {
            dir.y -= 1.0;
        }
        if self.is_held(Key::Down) || self.is_held(Key::S) {
            dir.y += 1.0;
        }
        dir
    }
}
