use std::time::{Duration, Instant};

use serde::Serialize;

/// Delay between press-in and the card arming (first haptic tick).
pub const ARM_DELAY: Duration = Duration::from_millis(200);

/// How long the card must stay armed before the download fires.
pub const HOLD_DURATION: Duration = Duration::from_millis(2500);

/// How long the success state stays visible before the card resets.
pub const SUCCESS_DISPLAY: Duration = Duration::from_millis(1500);

/// Presses longer than this never count as a tap.
pub const TAP_CUTOFF: Duration = Duration::from_millis(3000);

/// Long-press-to-download gesture state.
///
/// State transitions:
/// - Idle -> Pending (press in, gesture enabled)
/// - Pending -> Armed (after ARM_DELAY)
/// - Armed -> Success (after HOLD_DURATION, download fires)
/// - Success -> Idle (after SUCCESS_DISPLAY)
/// - Pending | Armed -> Idle (press out)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GestureState {
    Idle,
    Pending,
    Armed,
    Success,
}

/// Side effects the UI performs in response to the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GestureEvent {
    /// Light haptic and squeeze animation.
    Armed,
    /// Start the download and play the success haptic.
    DownloadTriggered,
    /// Spring the card back to rest.
    Reset,
}

/// What releasing the card means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Short press: open the preview.
    Tap,
    /// Released mid-gesture or after a download; nothing to open.
    Suppressed,
}

/// Clock-driven long-press tracker for a single grid card.
#[derive(Debug)]
pub struct LongPressGesture {
    state: GestureState,
    pressed_at: Option<Instant>,
    state_since: Instant,
}

impl LongPressGesture {
    pub fn new(now: Instant) -> Self {
        Self {
            state: GestureState::Idle,
            pressed_at: None,
            state_since: now,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    fn enter(&mut self, state: GestureState, at: Instant) {
        self.state = state;
        self.state_since = at;
    }

    /// Finger down. Does nothing beyond tap tracking when the gesture is disabled.
    pub fn press_in(&mut self, now: Instant, enabled: bool) {
        self.pressed_at = Some(now);
        if enabled && self.state == GestureState::Idle {
            self.enter(GestureState::Pending, now);
        }
    }

    /// Finger up.
    pub fn release(&mut self, now: Instant) -> (ReleaseOutcome, Option<GestureEvent>) {
        let held = self
            .pressed_at
            .take()
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or_default();

        let event = match self.state {
            GestureState::Pending => {
                self.enter(GestureState::Idle, now);
                None
            }
            GestureState::Armed => {
                self.enter(GestureState::Idle, now);
                Some(GestureEvent::Reset)
            }
            GestureState::Idle | GestureState::Success => None,
        };

        let outcome = if self.state != GestureState::Success && held < TAP_CUTOFF {
            ReleaseOutcome::Tap
        } else {
            ReleaseOutcome::Suppressed
        };
        (outcome, event)
    }

    /// Advance timers to `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        loop {
            let elapsed = now.saturating_duration_since(self.state_since);
            let (deadline, next, event) = match self.state {
                GestureState::Idle => break,
                GestureState::Pending => (ARM_DELAY, GestureState::Armed, GestureEvent::Armed),
                GestureState::Armed => (
                    HOLD_DURATION,
                    GestureState::Success,
                    GestureEvent::DownloadTriggered,
                ),
                GestureState::Success => (SUCCESS_DISPLAY, GestureState::Idle, GestureEvent::Reset),
            };
            if elapsed < deadline {
                break;
            }
            let at = self.state_since + deadline;
            self.enter(next, at);
            events.push(event);
        }
        events
    }
}
