//! Notification and ambient sound selection.
//!
//! Only identifiers and the ambient play flag live here; playback itself is
//! done by the players in [`crate::notify`].

use serde::{Deserialize, Serialize};

/// Sound identifier meaning "play nothing".
pub const NO_SOUND: &str = "none";

pub const DEFAULT_NOTIFICATION_SOUND: &str = "ding";

pub fn is_silent(id: &str) -> bool {
    id.is_empty() || id == NO_SOUND
}

/// What the ambient player should do after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmbientAction {
    Play(String),
    Pause,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientSound {
    #[serde(default = "default_ambient_id")]
    pub id: String,
    /// Written to disk as `false`; playback never survives a restart.
    #[serde(default)]
    pub is_playing: bool,
}

fn default_ambient_id() -> String {
    NO_SOUND.to_string()
}

impl Default for AmbientSound {
    fn default() -> Self {
        Self {
            id: default_ambient_id(),
            is_playing: false,
        }
    }
}

impl AmbientSound {
    /// Play/pause button. Pausing always succeeds; starting with `none`
    /// selected does nothing.
    pub fn toggle(&mut self, selected: &str) -> AmbientAction {
        if self.is_playing {
            self.is_playing = false;
            self.id = selected.to_string();
            return AmbientAction::Pause;
        }
        if is_silent(selected) {
            return AmbientAction::Nothing;
        }
        self.is_playing = true;
        self.id = selected.to_string();
        AmbientAction::Play(self.id.clone())
    }

    /// Switch to a different sound. A playing sound is stopped first and the
    /// new one started in its place.
    pub fn select(&mut self, id: &str) -> Vec<AmbientAction> {
        let mut actions = Vec::with_capacity(2);
        if self.is_playing {
            actions.push(self.toggle(id));
        }
        match self.toggle(id) {
            AmbientAction::Nothing => {
                self.id = id.to_string();
            }
            action => actions.push(action),
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_with_none_selected_does_nothing() {
        let mut ambient = AmbientSound::default();
        assert_eq!(ambient.toggle(NO_SOUND), AmbientAction::Nothing);
        assert!(!ambient.is_playing);
    }

    #[test]
    fn toggle_plays_then_pauses() {
        let mut ambient = AmbientSound::default();
        assert_eq!(ambient.toggle("rain"), AmbientAction::Play("rain".into()));
        assert!(ambient.is_playing);
        assert_eq!(ambient.id, "rain");
        assert_eq!(ambient.toggle("rain"), AmbientAction::Pause);
        assert!(!ambient.is_playing);
    }

    #[test]
    fn select_while_playing_swaps_sounds() {
        let mut ambient = AmbientSound::default();
        ambient.toggle("rain");
        let actions = ambient.select("cafe");
        assert_eq!(
            actions,
            vec![AmbientAction::Pause, AmbientAction::Play("cafe".into())]
        );
        assert!(ambient.is_playing);
        assert_eq!(ambient.id, "cafe");
    }

    #[test]
    fn select_none_while_playing_stops() {
        let mut ambient = AmbientSound::default();
        ambient.toggle("rain");
        let actions = ambient.select(NO_SOUND);
        assert_eq!(actions, vec![AmbientAction::Pause]);
        assert!(!ambient.is_playing);
        assert_eq!(ambient.id, NO_SOUND);
    }

    #[test]
    fn select_while_stopped_starts_playing() {
        let mut ambient = AmbientSound::default();
        let actions = ambient.select("forest");
        assert_eq!(actions, vec![AmbientAction::Play("forest".into())]);
        assert!(ambient.is_playing);
    }
}
