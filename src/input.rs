//! Input intents
//!
//! DOM listeners only record which keys and touch buttons are held; the
//! driver folds them into one [`InputState`] per frame and hands that to the
//! simulation.

use std::collections::HashSet;

/// Held intents for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// On-screen touch button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Left,
    Right,
    Fire,
}

impl TouchButton {
    /// Button for a DOM element id
    pub fn from_element_id(id: &str) -> Option<Self> {
        match id {
            "leftBtn" => Some(Self::Left),
            "rightBtn" => Some(Self::Right),
            "shootBtn" => Some(Self::Fire),
            _ => None,
        }
    }
}

/// Keys and touch buttons currently held down
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: HashSet<String>,
    touches: HashSet<TouchButton>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `keydown` by its `KeyboardEvent.key` value
    ///
    /// Returns true if the key maps to a game action, so the caller can
    /// suppress page scrolling for it.
    pub fn key_down(&mut self, key: &str) -> bool {
        let key = normalize(key);
        let bound = is_bound(&key);
        self.keys.insert(key);
        bound
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.remove(&normalize(key));
    }

    pub fn touch_start(&mut self, button: TouchButton) {
        self.touches.insert(button);
    }

    pub fn touch_end(&mut self, button: TouchButton) {
        self.touches.remove(&button);
    }

    /// Forget everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.keys.clear();
        self.touches.clear();
    }

    fn held(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Merge keyboard and touch sources into one frame of intents
    pub fn snapshot(&self) -> InputState {
        InputState {
            left: self.held("arrowleft")
                || self.held("a")
                || self.touches.contains(&TouchButton::Left),
            right: self.held("arrowright")
                || self.held("d")
                || self.touches.contains(&TouchButton::Right),
            fire: self.held(" ")
                || self.held("arrowup")
                || self.touches.contains(&TouchButton::Fire),
        }
    }
}

// Shift+A reports "A"; treat it the same as "a"
fn normalize(key: &str) -> String {
    key.to_ascii_lowercase()
}

fn is_bound(key: &str) -> bool {
    matches!(key, "arrowleft" | "arrowright" | "arrowup" | " " | "a" | "d")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_bindings() {
        let mut keys = HeldKeys::new();
        assert!(keys.key_down("ArrowLeft"));
        assert!(keys.key_down(" "));
        assert_eq!(
            keys.snapshot(),
            InputState {
                left: true,
                right: false,
                fire: true
            }
        );

        keys.key_up("ArrowLeft");
        assert!(keys.key_down("d"));
        let input = keys.snapshot();
        assert!(!input.left);
        assert!(input.right);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut keys = HeldKeys::new();
        assert!(!keys.key_down("Enter"));
        assert_eq!(keys.snapshot(), InputState::default());
    }

    #[test]
    fn test_shifted_letters() {
        let mut keys = HeldKeys::new();
        keys.key_down("A");
        assert!(keys.snapshot().left);
        keys.key_up("a");
        assert!(!keys.snapshot().left);
    }

    #[test]
    fn test_touch_merges_with_keyboard() {
        let mut keys = HeldKeys::new();
        keys.touch_start(TouchButton::Fire);
        keys.key_down("ArrowRight");
        let input = keys.snapshot();
        assert!(input.fire && input.right);

        keys.touch_end(TouchButton::Fire);
        assert!(!keys.snapshot().fire);
    }

    #[test]
    fn test_blur_clears_everything() {
        let mut keys = HeldKeys::new();
        keys.key_down("ArrowUp");
        keys.touch_start(TouchButton::Left);
        keys.clear();
        assert_eq!(keys.snapshot(), InputState::default());
    }

    #[test]
    fn test_button_ids() {
        assert_eq!(TouchButton::from_element_id("shootBtn"), Some(TouchButton::Fire));
        assert_eq!(TouchButton::from_element_id("nope"), None);
    }
}
