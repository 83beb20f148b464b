use log::{info, warn};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::domain::events::{AppEvent, EventBus};
use crate::domain::models::theme::{ThemeMode, ThemeState};
use crate::storage::{DbConnection, PreferenceRepository};

/// Preference-store key holding the user's explicit theme choice.
pub const THEME_PREFERENCE_KEY: &str = "theme";

/// Source of the operating system's current appearance, if the platform
/// exposes one. `watch()` hands out a channel that fires on appearance
/// changes; implementations that cannot observe changes may simply never
/// send on it.
pub trait SystemThemeProvider: Send + Sync {
    fn current_mode(&self) -> Option<ThemeMode>;
    fn watch(&self) -> watch::Receiver<ThemeMode>;
}

/// Provider for platforms with no appearance API. Reports no preference
/// and a channel that never changes.
pub struct NoSystemTheme {
    tx: watch::Sender<ThemeMode>,
}

impl NoSystemTheme {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ThemeMode::Light);
        Self { tx }
    }
}

impl Default for NoSystemTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemThemeProvider for NoSystemTheme {
    fn current_mode(&self) -> Option<ThemeMode> {
        None
    }

    fn watch(&self) -> watch::Receiver<ThemeMode> {
        self.tx.subscribe()
    }
}

/// Service for the dark/light appearance of the app.
///
/// A saved preference always wins. Without one, the service follows the
/// OS appearance and keeps following it until the user toggles explicitly,
/// at which point the watcher stops applying OS changes.
#[derive(Clone)]
pub struct ThemeService {
    prefs: PreferenceRepository,
    events: EventBus,
    state: Arc<RwLock<ThemeState>>,
    watcher: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ThemeService {
    pub fn new(db: DbConnection, events: EventBus) -> Self {
        Self {
            prefs: PreferenceRepository::new(db),
            events,
            state: Arc::new(RwLock::new(ThemeState::default())),
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    /// Resolve the initial theme and start following OS changes when no
    /// explicit preference exists. Theme resolution is best effort: a
    /// failing preference store falls back to the provider/default path
    /// instead of erroring.
    pub async fn init(&self, provider: Arc<dyn SystemThemeProvider>) {
        let saved = match self.prefs.get(THEME_PREFERENCE_KEY).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Failed to read saved theme preference: {}", e);
                None
            }
        };

        let state = match saved.as_deref().and_then(ThemeMode::parse) {
            Some(mode) => {
                info!("Restoring saved theme: {}", mode.as_str());
                ThemeState {
                    dark_mode: mode.is_dark(),
                    explicit: true,
                }
            }
            None => {
                let mode = provider.current_mode().unwrap_or(ThemeMode::Light);
                info!("No saved theme, following system appearance: {}", mode.as_str());
                ThemeState {
                    dark_mode: mode.is_dark(),
                    explicit: false,
                }
            }
        };

        *self.state.write().await = state;

        // An explicit choice never follows the OS, so no watcher is needed
        if state.explicit {
            return;
        }

        let mut rx = provider.watch();
        let shared = Arc::clone(&self.state);
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let dark = rx.borrow().is_dark();
                let mut state = shared.write().await;
                // An explicit choice detaches the app from OS changes
                if state.explicit {
                    return;
                }
                if state.dark_mode != dark {
                    state.dark_mode = dark;
                    events.publish(AppEvent::ThemeChanged { dark_mode: dark });
                }
            }
        });

        let mut watcher = self.watcher.lock().await;
        if let Some(old) = watcher.replace(handle) {
            old.abort();
        }
    }

    pub async fn current(&self) -> ThemeState {
        *self.state.read().await
    }

    /// Flip dark/light and pin the result as an explicit choice.
    pub async fn toggle(&self) -> ThemeState {
        let state = {
            let mut state = self.state.write().await;
            state.dark_mode = !state.dark_mode;
            state.explicit = true;
            *state
        };

        let mode = if state.dark_mode {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };

        // Persistence is best effort; the in-memory theme already changed
        if let Err(e) = self.prefs.set(THEME_PREFERENCE_KEY, mode.as_str()).await {
            warn!("Failed to save theme preference: {}", e);
        }

        self.events.publish(AppEvent::ThemeChanged {
            dark_mode: state.dark_mode,
        });
        state
    }

    /// Stop the OS appearance watcher, if one is running.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.watcher.lock().await.take() {
            handle.abort();
        }
    }
}
