use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, info};

use crate::app::{EventBus, SettingsStore};
use crate::domain::{
    AppEvent, Overlay, Polarity, RequestOutcome, ThemeDefinition, ThemeEvent, ThemeMode,
    ThemeTransition,
};

/// Frame interval used by the background animator (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Who advances the overlay animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationDriver {
    /// A Tokio task ticks the animation every `frame` until it settles.
    Spawned { frame: Duration },
    /// The host's frame loop calls [`ThemeController::tick`].
    Manual,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        AnimationDriver::Spawned {
            frame: FRAME_INTERVAL,
        }
    }
}

/// Everything the UI needs to paint the current theme.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSnapshot {
    pub theme_mode: ThemeMode,
    pub theme: ThemeDefinition,
    pub overlay: Overlay,
    pub is_animating: bool,
}

/// Masks light/dark swaps behind a full-screen overlay fade.
///
/// Sits on top of the settings store: mode changes go through here so the
/// active colour table only changes while the overlay hides it.
pub struct ThemeController {
    settings: Arc<SettingsStore>,
    host_scheme: RwLock<Option<Polarity>>,
    machine: Arc<Mutex<ThemeTransition>>,
    events: EventBus,
    driver: AnimationDriver,
}

impl ThemeController {
    /// Resolve the initial theme; no animation on first load.
    pub fn new(
        settings: Arc<SettingsStore>,
        host_scheme: Option<Polarity>,
        events: EventBus,
        driver: AnimationDriver,
    ) -> Self {
        let initial = settings.resolved_theme(host_scheme);
        info!(theme = initial.name, "Theme resolved");

        Self {
            settings,
            host_scheme: RwLock::new(host_scheme),
            machine: Arc::new(Mutex::new(ThemeTransition::new(initial, Instant::now()))),
            events,
            driver,
        }
    }

    /// The colour table currently on screen.
    pub fn active_theme(&self) -> &'static ThemeDefinition {
        self.machine.lock().displayed()
    }

    pub fn overlay(&self) -> Overlay {
        self.machine.lock().overlay()
    }

    pub fn is_animating(&self) -> bool {
        self.machine.lock().is_animating()
    }

    pub fn fade_progress(&self) -> f32 {
        self.machine.lock().fade_progress()
    }

    pub fn host_scheme(&self) -> Option<Polarity> {
        *self.host_scheme.read()
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        let machine = self.machine.lock();
        ThemeSnapshot {
            theme_mode: self.settings.theme_mode(),
            theme: *machine.displayed(),
            overlay: machine.overlay(),
            is_animating: machine.is_animating(),
        }
    }

    /// Change the theme mode and, if the polarity flips, animate the swap.
    pub fn set_theme_mode(&self, mode: ThemeMode) -> RequestOutcome {
        self.settings.set_theme_mode(mode);
        self.reconcile(Instant::now())
    }

    /// The host reported a new colour scheme. Only matters in system mode.
    pub fn set_host_scheme(&self, scheme: Option<Polarity>) -> Option<RequestOutcome> {
        {
            let mut host = self.host_scheme.write();
            if *host == scheme {
                return None;
            }
            *host = scheme;
        }
        debug!(scheme = ?scheme, "Host colour scheme changed");

        if self.settings.theme_mode() == ThemeMode::System {
            Some(self.reconcile(Instant::now()))
        } else {
            None
        }
    }

    /// Advance the animation. Only needed with [`AnimationDriver::Manual`].
    pub fn tick(&self, now: Instant) -> Vec<ThemeEvent> {
        let fired = self.machine.lock().tick(now);
        publish_all(&self.events, &fired);
        fired
    }

    fn reconcile(&self, now: Instant) -> RequestOutcome {
        let target = self.settings.resolved_theme(self.host_scheme());

        let (outcome, started) = {
            let mut machine = self.machine.lock();
            let from = machine.displayed().polarity;
            let outcome = machine.request(target, now);
            let started = ThemeEvent::TransitionStarted {
                from,
                to: target.polarity,
                overlay_color: machine.overlay().color,
            };
            (outcome, started)
        };

        match outcome {
            RequestOutcome::Started => {
                info!(to = target.name, "Theme transition started");
                self.events.publish(AppEvent::Theme(started));
                if let AnimationDriver::Spawned { frame } = self.driver {
                    self.spawn_animator(frame);
                }
            }
            RequestOutcome::Swapped => {
                debug!(theme = target.name, "Theme swapped without transition");
                self.events.publish(AppEvent::Theme(ThemeEvent::ThemeSwapped {
                    theme: target.name,
                    polarity: target.polarity,
                }));
            }
            RequestOutcome::Ignored => {
                debug!(theme = target.name, "Transition in flight, request dropped");
            }
        }
        outcome
    }

    fn spawn_animator(&self, frame: Duration) {
        let machine = Arc::clone(&self.machine);
        let events = self.events.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(frame);
            loop {
                interval.tick().await;
                let (fired, animating) = {
                    let mut machine = machine.lock();
                    let fired = machine.tick(Instant::now());
                    (fired, machine.is_animating())
                };
                publish_all(&events, &fired);
                if !animating {
                    break;
                }
            }
            debug!("Theme animator finished");
        });
    }
}

fn publish_all(events: &EventBus, fired: &[ThemeEvent]) {
    for event in fired {
        events.publish(AppEvent::Theme(event.clone()));
    }
}
