//! Hover-driven preview state for one card.
//!
//! A card shows its thumbnail until the pointer enters it, then attempts the
//! looping preview clip. Failures replace the preview with an unavailable
//! indicator until the pointer leaves; the next entry always starts fresh.

use serde::Serialize;

/// Which visual the card currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visual {
    Thumbnail,
    Preview,
    Unavailable,
}

/// Preview attempt phase. A single tagged value, so an active preview and a
/// recorded failure can never coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Active,
    Failed,
}

/// Focus and preview-load state of a single card instance. Created with the
/// card and never shared across cards.
///
/// Each focus entry opens a numbered session; load outcomes carry the session
/// they belong to and are dropped when it is no longer current, so a
/// straggling failure from an abandoned hover cannot poison a later one.
#[derive(Debug)]
pub struct PreviewState {
    focused: bool,
    phase: Phase,
    session: u64,
}

impl PreviewState {
    pub fn new() -> Self {
        Self {
            focused: false,
            phase: Phase::Idle,
            session: 0,
        }
    }

    /// Pointer entered the card. Clears any earlier failure unconditionally
    /// and returns the token outcome notifications must echo.
    pub fn focus_gained(&mut self) -> u64 {
        self.focused = true;
        self.phase = Phase::Idle;
        self.session += 1;
        self.session
    }

    /// Pointer left the card. Playback is discarded and the failure flag
    /// cleared; the session it belonged to is over.
    pub fn focus_lost(&mut self) {
        self.focused = false;
        self.phase = Phase::Idle;
    }

    /// The preview resource began rendering. Returns whether the state
    /// changed; stale sessions, unfocused cards, and sessions that already
    /// failed are ignored.
    pub fn load_succeeded(&mut self, session: u64) -> bool {
        if !self.focused || session != self.session || self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Active;
        true
    }

    /// The preview resource failed to load or play. One-shot per session:
    /// only the next focus cycle re-arms the attempt. Returns whether the
    /// state changed.
    pub fn load_failed(&mut self, session: u64) -> bool {
        if !self.focused || session != self.session || self.phase == Phase::Failed {
            return false;
        }
        self.phase = Phase::Failed;
        true
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Token of the current focus session.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Visual selection as a pure function of state. A load attempt in
    /// flight already shows the preview surface; playback starts the moment
    /// the resource is available, so loading is not a separate state.
    pub fn visual(&self) -> Visual {
        if !self.focused {
            Visual::Thumbnail
        } else if self.phase == Phase::Failed {
            Visual::Unavailable
        } else {
            Visual::Preview
        }
    }
}

impl Default for PreviewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{PreviewState, Visual};

    #[test]
    fn starts_unfocused_on_thumbnail() {
        let state = PreviewState::new();
        assert!(!state.focused());
        assert_eq!(state.visual(), Visual::Thumbnail);
    }

    #[test]
    fn focus_shows_preview_before_any_outcome() {
        let mut state = PreviewState::new();
        state.focus_gained();
        assert_eq!(state.visual(), Visual::Preview);
    }

    #[test]
    fn successful_load_activates_preview() {
        let mut state = PreviewState::new();
        let session = state.focus_gained();
        assert!(state.load_succeeded(session));
        assert_eq!(state.visual(), Visual::Preview);
    }

    #[test]
    fn failure_switches_to_unavailable_until_focus_leaves() {
        let mut state = PreviewState::new();
        let session = state.focus_gained();
        assert!(state.load_failed(session));
        assert_eq!(state.visual(), Visual::Unavailable);

        // No internal retry: a success signal in the failed session is ignored.
        assert!(!state.load_succeeded(session));
        assert_eq!(state.visual(), Visual::Unavailable);

        state.focus_lost();
        assert_eq!(state.visual(), Visual::Thumbnail);
    }

    #[test]
    fn refocus_after_failure_starts_fresh() {
        let mut state = PreviewState::new();
        let session = state.focus_gained();
        state.load_failed(session);
        state.focus_lost();

        let next = state.focus_gained();
        assert_ne!(session, next, "every focus entry opens a new session");
        assert_eq!(state.visual(), Visual::Preview);
        assert!(state.load_succeeded(next));
    }

    #[test]
    fn failure_can_interrupt_active_playback() {
        let mut state = PreviewState::new();
        let session = state.focus_gained();
        assert!(state.load_succeeded(session));
        assert!(state.load_failed(session));
        assert_eq!(state.visual(), Visual::Unavailable);
    }

    #[test]
    fn stale_outcome_after_focus_lost_is_ignored() {
        let mut state = PreviewState::new();
        let session = state.focus_gained();
        state.focus_lost();

        assert!(!state.load_failed(session));
        assert!(!state.load_succeeded(session));
        assert!(!state.focused());
        assert_eq!(state.visual(), Visual::Thumbnail);
    }

    #[test]
    fn outcome_from_previous_session_cannot_poison_current_one() {
        let mut state = PreviewState::new();
        let first = state.focus_gained();
        state.focus_lost();
        let second = state.focus_gained();

        assert!(!state.load_failed(first), "stale failure must be dropped");
        assert_eq!(state.visual(), Visual::Preview);

        assert!(state.load_succeeded(second));
        assert_eq!(state.visual(), Visual::Preview);
    }

    #[test]
    fn repeated_focus_without_leaving_keeps_current_session() {
        let mut state = PreviewState::new();
        let first = state.focus_gained();
        let second = state.focus_gained();
        assert_ne!(first, second);
        assert!(!state.load_failed(first));
        assert!(state.load_failed(second));
    }
}
