//! Input state management.
//!
//! Keys are identified by name (`"KeyW"`, `"ArrowUp"`, ...) as reported by
//! whatever windowing layer feeds the session. Actions map to one or more keys.

use crate::locomotion::DriveInput;
use serde::{Deserialize, Serialize};
use snowline_core::Result;
use std::collections::{HashMap, HashSet};

pub const DRIVE_FORWARD: &str = "drive_forward";
pub const DRIVE_BACKWARD: &str = "drive_backward";
pub const STEER_LEFT: &str = "steer_left";
pub const STEER_RIGHT: &str = "steer_right";
pub const SWITCH_LEFT: &str = "switch_left";
pub const SWITCH_RIGHT: &str = "switch_right";

/// Action overrides, as read from a `[actions]` TOML table:
///
/// ```toml
/// [actions]
/// drive_forward = ["KeyI", "ArrowUp"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBindings {
    pub actions: HashMap<String, Vec<String>>,
}

impl InputBindings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Tracks held keys per frame and resolves them to actions
#[derive(Debug, Clone)]
pub struct InputState {
    keys_down: HashSet<String>,
    keys_just_pressed: HashSet<String>,
    keys_just_released: HashSet<String>,
    action_map: HashMap<String, Vec<String>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            keys_just_released: HashSet::new(),
            action_map: Self::default_action_map(),
        }
    }

    fn default_action_map() -> HashMap<String, Vec<String>> {
        fn keys(names: &[&str]) -> Vec<String> {
            names.iter().map(|k| k.to_string()).collect()
        }
        let mut map = HashMap::new();
        map.insert(DRIVE_FORWARD.into(), keys(&["KeyW", "ArrowUp"]));
        map.insert(DRIVE_BACKWARD.into(), keys(&["KeyS", "ArrowDown"]));
        map.insert(STEER_LEFT.into(), keys(&["KeyA", "ArrowLeft"]));
        map.insert(STEER_RIGHT.into(), keys(&["KeyD", "ArrowRight"]));
        map.insert(SWITCH_LEFT.into(), keys(&["KeyQ"]));
        map.insert(SWITCH_RIGHT.into(), keys(&["KeyE"]));
        map
    }

    /// Bind an action to one or more keys, replacing previous bindings
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<String>) {
        self.action_map.insert(action.into(), keys);
    }

    /// Apply every override in `bindings`
    pub fn apply_bindings(&mut self, bindings: &InputBindings) {
        for (action, keys) in &bindings.actions {
            self.bind_action(action.clone(), keys.clone());
        }
    }

    pub fn process_key_down(&mut self, key: &str) {
        if !self.keys_down.contains(key) {
            self.keys_just_pressed.insert(key.to_string());
        }
        self.keys_down.insert(key.to_string());
    }

    pub fn process_key_up(&mut self, key: &str) {
        self.keys_down.remove(key);
        self.keys_just_released.insert(key.to_string());
    }

    /// Call at end of frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }

    pub fn is_key_down(&self, key: &str) -> bool {
        self.keys_down.contains(key)
    }

    pub fn is_key_just_pressed(&self, key: &str) -> bool {
        self.keys_just_pressed.contains(key)
    }

    pub fn is_key_just_released(&self, key: &str) -> bool {
        self.keys_just_released.contains(key)
    }

    /// Is any key bound to `action` held?
    pub fn is_action_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_down.contains(k)))
            .unwrap_or(false)
    }

    /// Was any key bound to `action` pressed this frame?
    pub fn is_action_just_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_just_pressed.contains(k)))
            .unwrap_or(false)
    }

    /// Held drive controls
    pub fn drive_input(&self) -> DriveInput {
        DriveInput {
            forward: self.is_action_pressed(DRIVE_FORWARD),
            backward: self.is_action_pressed(DRIVE_BACKWARD),
            left: self.is_action_pressed(STEER_LEFT),
            right: self.is_action_pressed(STEER_RIGHT),
        }
    }

    /// Switch direction requested this frame: +1 left, -1 right
    pub fn switch_request(&self) -> Option<f32> {
        match (
            self.is_action_just_pressed(SWITCH_LEFT),
            self.is_action_just_pressed(SWITCH_RIGHT),
        ) {
            (true, false) => Some(1.0),
            (false, true) => Some(-1.0),
            _ => None,
        }
    }
}
