//! Input Bindings Module
//!
//! Maps physical keys to explorer commands so the binary dispatches on
//! logical actions instead of raw key codes.

use std::collections::HashMap;

use winit::keyboard::KeyCode;

/// Commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplorerAction {
    /// Generate a new galaxy from random parameters (default: R)
    Regenerate,
    /// Snap to the top camera preset (default: 1)
    TopView,
    /// Snap to the side camera preset (default: 2)
    SideView,
    /// Start the warp transition (default: W, Space)
    Warp,
    /// Close the explorer (default: Escape)
    Quit,
}

/// Key-to-action table. Several keys may share an action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, ExplorerAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = Self {
            key_to_action: HashMap::new(),
        };

        bindings.bind(KeyCode::KeyR, ExplorerAction::Regenerate);
        bindings.bind(KeyCode::Digit1, ExplorerAction::TopView);
        bindings.bind(KeyCode::Digit2, ExplorerAction::SideView);
        bindings.bind(KeyCode::KeyW, ExplorerAction::Warp);
        bindings.bind(KeyCode::Space, ExplorerAction::Warp);
        bindings.bind(KeyCode::Escape, ExplorerAction::Quit);

        bindings
    }

    /// Bind a key, replacing whatever it was bound to before.
    pub fn bind(&mut self, key: KeyCode, action: ExplorerAction) {
        self.key_to_action.insert(key, action);
    }

    pub fn unbind_key(&mut self, key: KeyCode) {
        self.key_to_action.remove(&key);
    }

    pub fn get_action(&self, key: KeyCode) -> Option<ExplorerAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Every key bound to `action`, sorted for stable display.
    pub fn keys_for(&self, action: ExplorerAction) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = self
            .key_to_action
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect();
        keys.sort_by_key(|k| format!("{k:?}"));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get_action(KeyCode::KeyR), Some(ExplorerAction::Regenerate));
        assert_eq!(bindings.get_action(KeyCode::Digit1), Some(ExplorerAction::TopView));
        assert_eq!(bindings.get_action(KeyCode::Digit2), Some(ExplorerAction::SideView));
        assert_eq!(bindings.get_action(KeyCode::KeyW), Some(ExplorerAction::Warp));
        assert_eq!(bindings.get_action(KeyCode::Space), Some(ExplorerAction::Warp));
        assert_eq!(bindings.get_action(KeyCode::Escape), Some(ExplorerAction::Quit));
        assert_eq!(bindings.get_action(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_shared_action_keys() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.keys_for(ExplorerAction::Warp),
            vec![KeyCode::KeyW, KeyCode::Space]
        );
    }

    #[test]
    fn test_rebind_key() {
        let mut bindings = KeyBindings::new();
        bindings.bind(KeyCode::KeyR, ExplorerAction::Warp);
        assert_eq!(bindings.get_action(KeyCode::KeyR), Some(ExplorerAction::Warp));
        assert!(bindings.keys_for(ExplorerAction::Regenerate).is_empty());

        bindings.unbind_key(KeyCode::KeyR);
        assert_eq!(bindings.get_action(KeyCode::KeyR), None);
    }
}
