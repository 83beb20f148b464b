//! Application event bus.
//!
//! Services publish events here; UI collaborators subscribe. This replaces
//! the original client's toast layer and theme change notifications with a
//! single broadcast channel.

use tokio::sync::broadcast;

/// Default on-screen lifetime for a transient notice, in milliseconds.
pub const NOTICE_DURATION_MS: u64 = 4000;

const EVENT_BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient, dismissible message for the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ThemeChanged { dark_mode: bool },
    Notice(Notice),
}

/// Broadcast bus connecting domain services to their observers. Cloning is
/// cheap; all clones publish to the same subscribers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. A bus with no subscribers swallows it.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }

    /// Publish a transient notice with the default lifetime.
    pub fn notice(&self, level: NoticeLevel, message: impl Into<String>) {
        self.publish(AppEvent::Notice(Notice {
            level,
            message: message.into(),
            duration_ms: NOTICE_DURATION_MS,
        }));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
