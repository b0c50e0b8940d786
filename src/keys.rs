// src/keys.rs - OS-level key synthesis for recognized gestures
use anyhow::{anyhow, Result};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::info;

use crate::gesture::GestureAction;

/// Key each action synthesizes, matching the bindings common media players
/// ship with: space = play/pause, arrows = seek, f = fullscreen.
pub fn key_for(action: GestureAction) -> Key {
    match action {
        GestureAction::PlayPause => Key::Space,
        GestureAction::SeekForward => Key::RightArrow,
        GestureAction::SeekBackward => Key::LeftArrow,
        GestureAction::ToggleFullscreen => Key::Unicode('f'),
    }
}

/// Sends one press-and-release per dispatched action at the OS input layer.
pub struct KeyInjector {
    enigo: Enigo,
}

impl KeyInjector {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow!("failed to initialize key injection: {:?}", e))?;
        Ok(Self { enigo })
    }

    pub fn send(&mut self, action: GestureAction) -> Result<()> {
        info!(action = action.as_str(), "sending key press");
        self.enigo
            .key(key_for(action), Direction::Click)
            .map_err(|e| anyhow!("failed to send key for {}: {:?}", action.as_str(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_key_mapping() {
        assert_eq!(key_for(GestureAction::PlayPause), Key::Space);
        assert_eq!(key_for(GestureAction::SeekForward), Key::RightArrow);
        assert_eq!(key_for(GestureAction::SeekBackward), Key::LeftArrow);
        assert_eq!(key_for(GestureAction::ToggleFullscreen), Key::Unicode('f'));
    }
}
