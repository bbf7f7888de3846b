/// Playback rates the UI exposes. Anything else is rejected rather than
/// silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Speed {
    Half,
    #[default]
    Normal,
    OneAndHalf,
    Double,
}

impl Speed {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::Normal => 1.0,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
        }
    }
}

impl TryFrom<f64> for Speed {
    type Error = f64;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        match value {
            v if v == 0.5 => Ok(Self::Half),
            v if v == 1.0 => Ok(Self::Normal),
            v if v == 1.5 => Ok(Self::OneAndHalf),
            v if v == 2.0 => Ok(Self::Double),
            other => Err(other),
        }
    }
}

/// Mirror of the video element. The element is the source of truth, this
/// struct only tracks what we last observed plus in-flight intent.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Percent of the way through, always in [0, 100].
    pub progress: f64,
    /// Seconds, 0 until metadata arrives.
    pub duration: f64,
    pub speed: Speed,
    pub is_muted: bool,
    pub is_full_screen: bool,

    play_generation: u64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            progress: 0.0,
            duration: 0.0,
            speed: Speed::Normal,
            is_muted: false,
            is_full_screen: false,
            play_generation: 0,
        }
    }
}

impl PlaybackState {
    /// Recompute progress from an observed time/duration pair. A zero or
    /// non-finite duration keeps the previous progress, it never goes
    /// NaN or infinite.
    pub fn tick(&mut self, current_time: f64, duration: f64) {
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }

        self.duration = duration;
        self.progress = (current_time / duration * 100.0).clamp(0.0, 100.0);
    }

    /// Optimistic seek to a percentage. Returns the absolute target in
    /// seconds when a duration is known, so the caller can forward it to
    /// the element.
    pub fn seek(&mut self, percent: f64) -> Option<f64> {
        let percent = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };

        self.progress = percent;

        (self.duration > 0.0).then(|| percent / 100.0 * self.duration)
    }

    /// A play intent. Bumps the generation so an earlier rejected play
    /// promise can no longer flip us back to paused.
    pub fn begin_play(&mut self) -> u64 {
        self.is_playing = true;
        self.play_generation += 1;
        self.play_generation
    }

    /// A play promise rejected. Only reverts if nothing newer was
    /// observed in the meantime. Returns whether state changed.
    pub fn play_rejected(&mut self, generation: u64) -> bool {
        if generation == self.play_generation && self.is_playing {
            self.is_playing = false;
            true
        } else {
            false
        }
    }

    /// Native play/playing event. Last observed native state wins.
    pub fn observe_playing(&mut self) {
        self.is_playing = true;
        self.play_generation += 1;
    }

    /// Native pause/ended event.
    pub fn observe_paused(&mut self) {
        self.is_playing = false;
        self.play_generation += 1;
    }
}

/// The volume to restore when unmuting. Unmuting a video whose volume is
/// zero would otherwise stay silent.
pub fn unmute_volume(volume: f64) -> f64 {
    if volume > 0.0 && volume.is_finite() {
        volume
    } else {
        1.0
    }
}

/// `MM:SS`, zero padded. Anything unrenderable is `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_owned();
    }

    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

const CONTROLS_HIDE_DELAY_MS: f64 = 3000.0;

/// Visibility of the on-screen controls. Pure, the caller supplies a
/// millisecond clock (`performance.now()` in the browser).
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsState {
    visible: bool,
    paused: bool,
    dragging: bool,
    hide_at: Option<f64>,
}

impl Default for ControlsState {
    fn default() -> Self {
        Self {
            visible: true,
            paused: true,
            dragging: false,
            hide_at: None,
        }
    }
}

impl ControlsState {
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Any pointer/touch interaction. Shows the controls and restarts
    /// the idle deadline. Returns whether visibility changed.
    pub fn interact(&mut self, now_ms: f64) -> bool {
        let changed = !self.visible;
        self.visible = true;
        self.hide_at = Some(now_ms + CONTROLS_HIDE_DELAY_MS);
        changed
    }

    pub fn set_paused(&mut self, now_ms: f64, paused: bool) -> bool {
        self.paused = paused;
        if paused {
            // pausing always brings the controls back
            self.interact(now_ms)
        } else {
            self.hide_at = Some(now_ms + CONTROLS_HIDE_DELAY_MS);
            false
        }
    }

    pub fn set_dragging(&mut self, now_ms: f64, dragging: bool) -> bool {
        self.dragging = dragging;
        self.interact(now_ms)
    }

    /// Milliseconds until the hide deadline, when one is armed.
    pub fn deadline_in(&self, now_ms: f64) -> Option<f64> {
        self.hide_at.map(|at| (at - now_ms).max(0.0))
    }

    /// Advances the clock. Hides the controls once the deadline passes,
    /// unless paused or dragging. Returns whether visibility changed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let Some(hide_at) = self.hide_at else {
            return false;
        };

        if now_ms < hide_at {
            return false;
        }

        // An expired deadline is disarmed either way. While paused or
        // dragging nothing hides, and a deadline left armed at zero
        // would have the caller waking up continuously; resuming and
        // releasing the drag both re-arm it.
        self.hide_at = None;

        if self.paused || self.dragging {
            return false;
        }

        let changed = self.visible;
        self.visible = false;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_conversion() {
        assert_eq!(Speed::try_from(0.5), Ok(Speed::Half));
        assert_eq!(Speed::try_from(1.0), Ok(Speed::Normal));
        assert_eq!(Speed::try_from(1.5), Ok(Speed::OneAndHalf));
        assert_eq!(Speed::try_from(2.0), Ok(Speed::Double));
        assert_eq!(Speed::try_from(1.25), Err(1.25));
        assert_eq!(Speed::try_from(f64::NAN).ok(), None);
        assert_eq!(Speed::Double.as_f64(), 2.0);
    }

    #[test]
    fn test_tick_progress() {
        let mut state = PlaybackState::default();
        state.tick(30.0, 120.0);
        assert_eq!(state.progress, 25.0);
        assert_eq!(state.duration, 120.0);

        state.tick(120.0, 120.0);
        assert_eq!(state.progress, 100.0);
    }

    #[test]
    fn test_tick_invalid_duration_keeps_progress() {
        let mut state = PlaybackState::default();
        state.tick(30.0, 120.0);
        assert_eq!(state.progress, 25.0);

        state.tick(5.0, 0.0);
        assert_eq!(state.progress, 25.0);

        state.tick(5.0, f64::NAN);
        assert_eq!(state.progress, 25.0);

        state.tick(5.0, f64::INFINITY);
        assert_eq!(state.progress, 25.0);

        assert!(state.progress.is_finite());
    }

    #[test]
    fn test_tick_never_exceeds_bounds() {
        let mut state = PlaybackState::default();
        state.tick(500.0, 120.0);
        assert_eq!(state.progress, 100.0);

        state.tick(-5.0, 120.0);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_seek_clamps_and_targets() {
        let mut state = PlaybackState::default();
        state.tick(0.0, 200.0);

        assert_eq!(state.seek(50.0), Some(100.0));
        assert_eq!(state.progress, 50.0);

        assert_eq!(state.seek(150.0), Some(200.0));
        assert_eq!(state.progress, 100.0);

        assert_eq!(state.seek(-20.0), Some(0.0));
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_seek_without_duration() {
        let mut state = PlaybackState::default();
        assert_eq!(state.seek(50.0), None);
        // progress still moves optimistically
        assert_eq!(state.progress, 50.0);
    }

    #[test]
    fn test_play_rejection_reverts_current_generation() {
        let mut state = PlaybackState::default();

        let generation = state.begin_play();
        assert!(state.is_playing);

        assert!(state.play_rejected(generation));
        assert!(!state.is_playing);
    }

    #[test]
    fn test_stale_play_rejection_is_ignored() {
        let mut state = PlaybackState::default();

        let stale = state.begin_play();
        state.begin_play();

        assert!(!state.play_rejected(stale));
        assert!(state.is_playing);
    }

    #[test]
    fn test_pause_before_promise_settles_ends_paused() {
        let mut state = PlaybackState::default();

        let generation = state.begin_play();
        // user hits pause before the play promise resolves
        state.observe_paused();
        assert!(!state.is_playing);

        state.play_rejected(generation);
        assert!(!state.is_playing);
    }

    #[test]
    fn test_native_play_survives_stale_rejection() {
        let mut state = PlaybackState::default();

        let generation = state.begin_play();
        state.observe_playing();

        assert!(!state.play_rejected(generation));
        assert!(state.is_playing);
    }

    #[test]
    fn test_unmute_volume() {
        assert_eq!(unmute_volume(0.0), 1.0);
        assert_eq!(unmute_volume(f64::NAN), 1.0);
        assert_eq!(unmute_volume(0.4), 0.4);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(-3.0), "00:00");
        assert_eq!(format_time(7.9), "00:07");
        assert_eq!(format_time(61.0), "01:01");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(3599.0), "59:59");
        assert_eq!(format_time(3600.0), "60:00");
    }

    #[test]
    fn test_controls_hide_after_idle() {
        let mut controls = ControlsState::default();
        controls.set_paused(0.0, false);

        assert!(controls.interact(1000.0) == false);
        assert!(controls.visible());

        assert!(!controls.poll(3000.0));
        assert!(controls.visible());

        assert!(controls.poll(4000.0));
        assert!(!controls.visible());
    }

    #[test]
    fn test_controls_interaction_restarts_deadline() {
        let mut controls = ControlsState::default();
        controls.set_paused(0.0, false);

        controls.interact(0.0);
        controls.interact(2000.0);

        assert!(!controls.poll(3500.0));
        assert!(controls.visible());

        assert!(controls.poll(5000.0));
        assert!(!controls.visible());
    }

    #[test]
    fn test_controls_stay_while_paused() {
        let mut controls = ControlsState::default();
        controls.set_paused(0.0, true);
        controls.interact(0.0);

        assert!(!controls.poll(10_000.0));
        assert!(controls.visible());

        // resuming re-arms the deadline
        controls.set_paused(10_000.0, false);
        assert!(controls.poll(13_000.0));
        assert!(!controls.visible());
    }

    #[test]
    fn test_controls_stay_while_dragging() {
        let mut controls = ControlsState::default();
        controls.set_paused(0.0, false);
        controls.set_dragging(0.0, true);

        assert!(!controls.poll(10_000.0));
        assert!(controls.visible());

        controls.set_dragging(10_000.0, false);
        assert!(controls.poll(13_000.0));
        assert!(!controls.visible());
    }

    #[test]
    fn test_expired_deadline_disarms_while_paused() {
        let mut controls = ControlsState::default();
        controls.set_paused(0.0, true);
        assert!(controls.deadline_in(0.0).is_some());

        // once the deadline has passed while paused, it must not keep
        // reporting an immediate wake-up on every poll
        assert!(!controls.poll(10_000.0));
        assert!(controls.visible());
        assert_eq!(controls.deadline_in(10_000.0), None);
        assert!(!controls.poll(10_001.0));
        assert_eq!(controls.deadline_in(10_001.0), None);

        // resuming re-arms a full idle window
        controls.set_paused(20_000.0, false);
        assert_eq!(controls.deadline_in(20_000.0), Some(CONTROLS_HIDE_DELAY_MS));
    }

    #[test]
    fn test_expired_deadline_disarms_while_dragging() {
        let mut controls = ControlsState::default();
        controls.set_paused(0.0, false);
        controls.set_dragging(0.0, true);

        assert!(!controls.poll(10_000.0));
        assert_eq!(controls.deadline_in(10_000.0), None);

        // releasing the drag counts as an interaction and re-arms
        controls.set_dragging(20_000.0, false);
        assert_eq!(controls.deadline_in(20_000.0), Some(CONTROLS_HIDE_DELAY_MS));
        assert!(controls.poll(20_000.0 + CONTROLS_HIDE_DELAY_MS));
        assert!(!controls.visible());
    }

    #[test]
    fn test_controls_reappear_on_interaction() {
        let mut controls = ControlsState::default();
        controls.set_paused(0.0, false);
        controls.interact(0.0);
        controls.poll(4000.0);
        assert!(!controls.visible());

        assert!(controls.interact(5000.0));
        assert!(controls.visible());
    }
}
