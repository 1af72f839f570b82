use std::time::{Duration, Instant};

use serde::Serialize;

use crate::domain::{Color, Polarity, ThemeDefinition};

/// Overlay fade-in duration (covers the outgoing theme).
pub const FADE_IN_DURATION: Duration = Duration::from_millis(150);

/// Overlay fade-out duration (reveals the incoming theme).
pub const FADE_OUT_DURATION: Duration = Duration::from_millis(250);

/// Theme transition state machine.
///
/// State transitions:
/// - Idle -> FadeIn (polarity-changing request)
/// - FadeIn -> FadeOut (overlay fully opaque, colour table swapped)
/// - FadeOut -> Idle (overlay fully transparent)
///
/// FadeIn and FadeOut together form the `Transitioning` state. Requests
/// arriving while transitioning are dropped, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum TransitionPhase {
    Idle = 0,
    FadeIn = 1,
    FadeOut = 2,
}

impl TransitionPhase {
    /// Check if an overlay animation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !matches!(self, TransitionPhase::Idle)
    }
}

/// What a transition request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestOutcome {
    /// A transition was already running; the request was dropped.
    Ignored,
    /// Same polarity: the colour table was swapped without animation.
    Swapped,
    /// Polarity changed: the overlay animation started.
    Started,
}

/// Events emitted while a transition progresses.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ThemeEvent {
    /// Overlay started covering the screen.
    TransitionStarted {
        from: Polarity,
        to: Polarity,
        overlay_color: Color,
    },
    /// Active colour table changed.
    ThemeSwapped { theme: &'static str, polarity: Polarity },
    /// Overlay fully faded out; back to idle.
    TransitionFinished,
}

/// Full-screen, input-transparent overlay drawn above the UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overlay {
    pub opacity: f32,
    pub color: Color,
}

/// Quartic ease-in: slow start, fast finish.
pub fn ease_in_quart(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * t
}

/// Quartic ease-out: fast start, slow finish.
pub fn ease_out_quart(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv * inv
}

fn fraction(elapsed: Duration, total: Duration) -> f32 {
    (elapsed.as_secs_f32() / total.as_secs_f32()).min(1.0)
}

/// Clock-driven overlay transition between two theme definitions.
///
/// The caller supplies `now` on every call so the machine can be driven by
/// any frame loop (or by tests with synthetic instants).
#[derive(Debug)]
pub struct ThemeTransition {
    displayed: &'static ThemeDefinition,
    incoming: Option<&'static ThemeDefinition>,
    phase: TransitionPhase,
    phase_started: Instant,
    fade_progress: f32,
    overlay_color: Color,
}

impl ThemeTransition {
    /// Start idle with `initial` already displayed (no animation on first load).
    pub fn new(initial: &'static ThemeDefinition, now: Instant) -> Self {
        Self {
            displayed: initial,
            incoming: None,
            phase: TransitionPhase::Idle,
            phase_started: now,
            fade_progress: 0.0,
            overlay_color: initial.colors.background,
        }
    }

    pub fn displayed(&self) -> &'static ThemeDefinition {
        self.displayed
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }

    pub fn fade_progress(&self) -> f32 {
        self.fade_progress
    }

    pub fn overlay(&self) -> Overlay {
        Overlay {
            opacity: self.fade_progress,
            color: self.overlay_color,
        }
    }

    /// Ask for `target` to become the displayed theme.
    pub fn request(&mut self, target: &'static ThemeDefinition, now: Instant) -> RequestOutcome {
        if self.is_animating() {
            return RequestOutcome::Ignored;
        }

        if self.displayed.polarity == target.polarity {
            self.displayed = target;
            return RequestOutcome::Swapped;
        }

        self.overlay_color = self.displayed.colors.background;
        self.incoming = Some(target);
        self.phase = TransitionPhase::FadeIn;
        self.phase_started = now;
        self.fade_progress = 0.0;
        RequestOutcome::Started
    }

    /// Advance the animation to `now`, returning the events that fired.
    ///
    /// A single call may cross both phase boundaries if `now` jumped far
    /// enough; events are then returned in order.
    pub fn tick(&mut self, now: Instant) -> Vec<ThemeEvent> {
        let mut events = Vec::new();

        if self.phase == TransitionPhase::FadeIn {
            let elapsed = now.saturating_duration_since(self.phase_started);
            if elapsed < FADE_IN_DURATION {
                self.fade_progress = ease_in_quart(fraction(elapsed, FADE_IN_DURATION));
                return events;
            }

            self.fade_progress = 1.0;
            if let Some(incoming) = self.incoming.take() {
                self.displayed = incoming;
                events.push(ThemeEvent::ThemeSwapped {
                    theme: incoming.name,
                    polarity: incoming.polarity,
                });
            }
            self.phase = TransitionPhase::FadeOut;
            self.phase_started += FADE_IN_DURATION;
        }

        if self.phase == TransitionPhase::FadeOut {
            let elapsed = now.saturating_duration_since(self.phase_started);
            if elapsed < FADE_OUT_DURATION {
                self.fade_progress = 1.0 - ease_out_quart(fraction(elapsed, FADE_OUT_DURATION));
                return events;
            }

            self.fade_progress = 0.0;
            self.phase = TransitionPhase::Idle;
            events.push(ThemeEvent::TransitionFinished);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DARK_THEME, LIGHT_THEME};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_phase_is_animating() {
        assert!(!TransitionPhase::Idle.is_animating());
        assert!(TransitionPhase::FadeIn.is_animating());
        assert!(TransitionPhase::FadeOut.is_animating());
    }

    #[test]
    fn test_easing_endpoints_and_shape() {
        assert_eq!(ease_in_quart(0.0), 0.0);
        assert_eq!(ease_in_quart(1.0), 1.0);
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        // Accelerating curve lags the linear ramp; decelerating leads it.
        assert!(ease_in_quart(0.5) < 0.5);
        assert!(ease_out_quart(0.5) > 0.5);
    }

    #[test]
    fn test_initial_state_is_idle() {
        let machine = ThemeTransition::new(&DARK_THEME, Instant::now());
        assert_eq!(machine.phase(), TransitionPhase::Idle);
        assert_eq!(machine.displayed(), &DARK_THEME);
        assert_eq!(machine.overlay().opacity, 0.0);
    }

    #[test]
    fn test_polarity_change_runs_full_cycle() {
        let t0 = Instant::now();
        let mut machine = ThemeTransition::new(&LIGHT_THEME, t0);

        assert_eq!(machine.request(&DARK_THEME, t0), RequestOutcome::Started);
        assert!(machine.is_animating());
        assert_eq!(machine.overlay().color, LIGHT_THEME.colors.background);

        let events = machine.tick(t0 + ms(75));
        assert!(events.is_empty());
        let mid = machine.fade_progress();
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(machine.displayed(), &LIGHT_THEME);

        let events = machine.tick(t0 + ms(149));
        assert!(events.is_empty());
        assert!(machine.fade_progress() < 1.0);
        assert_eq!(machine.displayed(), &LIGHT_THEME);

        let events = machine.tick(t0 + ms(150));
        assert!(matches!(events.as_slice(), [ThemeEvent::ThemeSwapped { .. }]));
        assert_eq!(machine.fade_progress(), 1.0);
        assert_eq!(machine.displayed(), &DARK_THEME);
        assert_eq!(machine.phase(), TransitionPhase::FadeOut);
        // The overlay keeps the outgoing colour while revealing.
        assert_eq!(machine.overlay().color, LIGHT_THEME.colors.background);

        machine.tick(t0 + ms(275));
        let revealing = machine.fade_progress();
        assert!(revealing > 0.0 && revealing < 1.0);
        assert!(machine.is_animating());

        let events = machine.tick(t0 + ms(400));
        assert!(matches!(events.as_slice(), [ThemeEvent::TransitionFinished]));
        assert_eq!(machine.fade_progress(), 0.0);
        assert!(!machine.is_animating());
    }

    #[test]
    fn test_same_polarity_swaps_without_animation() {
        static ALT_LIGHT: ThemeDefinition = ThemeDefinition {
            name: "Alt Light",
            ..LIGHT_THEME
        };

        let t0 = Instant::now();
        let mut machine = ThemeTransition::new(&LIGHT_THEME, t0);

        assert_eq!(machine.request(&ALT_LIGHT, t0), RequestOutcome::Swapped);
        assert_eq!(machine.displayed().name, "Alt Light");
        assert!(!machine.is_animating());
        assert_eq!(machine.fade_progress(), 0.0);
        assert!(machine.tick(t0 + ms(500)).is_empty());
    }

    #[test]
    fn test_requests_during_transition_are_dropped() {
        let t0 = Instant::now();
        let mut machine = ThemeTransition::new(&LIGHT_THEME, t0);
        machine.request(&DARK_THEME, t0);

        assert_eq!(machine.request(&LIGHT_THEME, t0 + ms(50)), RequestOutcome::Ignored);
        assert_eq!(machine.request(&DARK_THEME, t0 + ms(200)), RequestOutcome::Ignored);

        machine.tick(t0 + ms(400));
        assert_eq!(machine.displayed(), &DARK_THEME);
        assert!(!machine.is_animating());

        // After settling, a new request is honoured.
        assert_eq!(machine.request(&LIGHT_THEME, t0 + ms(401)), RequestOutcome::Started);
        assert_eq!(machine.overlay().color, DARK_THEME.colors.background);
    }

    #[test]
    fn test_large_time_jump_emits_events_in_order() {
        let t0 = Instant::now();
        let mut machine = ThemeTransition::new(&DARK_THEME, t0);
        machine.request(&LIGHT_THEME, t0);

        let events = machine.tick(t0 + Duration::from_secs(5));
        assert!(matches!(
            events.as_slice(),
            [ThemeEvent::ThemeSwapped { polarity: Polarity::Light, .. }, ThemeEvent::TransitionFinished]
        ));
        assert_eq!(machine.phase(), TransitionPhase::Idle);
    }
}
