//! Shell chrome state: sidebar, URL bar, toast, loading bar
//!
//! Timed behaviour is expressed as deadlines; [`Chrome::tick`] settles
//! whatever has expired.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum LoadingPhase {
    Idle,
    Loading,
    /// Bar ran to completion and fades out until `until`
    Finishing { until: DateTime<Utc> },
}

#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    phase: LoadingPhase,
    settle: Duration,
}

impl LoadingIndicator {
    pub fn new(settle: Duration) -> Self {
        Self {
            phase: LoadingPhase::Idle,
            settle,
        }
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    /// Restart the bar from zero, cancelling any pending reset
    pub fn start(&mut self) {
        self.phase = LoadingPhase::Loading;
    }

    /// Drop straight back to idle without the finishing animation
    pub fn reset(&mut self) {
        self.phase = LoadingPhase::Idle;
    }

    pub fn finish(&mut self, now: DateTime<Utc>) {
        self.phase = LoadingPhase::Finishing {
            until: now + self.settle,
        };
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.phase {
            LoadingPhase::Finishing { until } if now >= until => {
                self.phase = LoadingPhase::Idle;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastMessage {
    pub message: String,
    pub hide_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Toast {
    current: Option<ToastMessage>,
    duration: Duration,
}

impl Toast {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: None,
            duration,
        }
    }

    /// Show `message`, replacing whatever is up and restarting the timer
    pub fn show(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.current = Some(ToastMessage {
            message: message.into(),
            hide_at: now + self.duration,
        });
    }

    pub fn current(&self) -> Option<&ToastMessage> {
        self.current.as_ref()
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match &self.current {
            Some(toast) if now >= toast.hide_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Chrome {
    pub sidebar_visible: bool,
    /// Text shown in the URL bar
    pub address: String,
    pub toast: Toast,
    pub loading: LoadingIndicator,
}

impl Chrome {
    pub fn new(toast_duration: Duration, loading_settle: Duration) -> Self {
        Self {
            sidebar_visible: true,
            address: String::new(),
            toast: Toast::new(toast_duration),
            loading: LoadingIndicator::new(loading_settle),
        }
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let toast_changed = self.toast.tick(now);
        let loading_changed = self.loading.tick(now);
        toast_changed || loading_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_toast_expires() {
        let mut toast = Toast::new(Duration::milliseconds(3000));
        toast.show("URL copied to clipboard", at(0));

        assert!(!toast.tick(at(2999)));
        assert_eq!(toast.current().unwrap().message, "URL copied to clipboard");

        assert!(toast.tick(at(3000)));
        assert!(toast.current().is_none());
        assert!(!toast.tick(at(4000)));
    }

    #[test]
    fn test_toast_replacement_restarts_timer() {
        let mut toast = Toast::new(Duration::milliseconds(3000));
        toast.show("first", at(0));
        toast.show("second", at(2000));

        assert!(!toast.tick(at(3500)));
        assert_eq!(toast.current().unwrap().message, "second");
        assert!(toast.tick(at(5000)));
    }

    #[test]
    fn test_loading_settles_after_finish() {
        let mut loading = LoadingIndicator::new(Duration::milliseconds(700));
        loading.start();
        assert_eq!(loading.phase(), LoadingPhase::Loading);
        assert!(!loading.tick(at(10_000)));

        loading.finish(at(0));
        assert!(!loading.tick(at(699)));
        assert!(loading.tick(at(700)));
        assert_eq!(loading.phase(), LoadingPhase::Idle);
    }

    #[test]
    fn test_start_cancels_pending_reset() {
        let mut loading = LoadingIndicator::new(Duration::milliseconds(700));
        loading.finish(at(0));
        loading.start();

        assert!(!loading.tick(at(1000)));
        assert_eq!(loading.phase(), LoadingPhase::Loading);
    }

    #[test]
    fn test_chrome_defaults() {
        let chrome = Chrome::new(Duration::milliseconds(3000), Duration::milliseconds(700));
        assert!(chrome.sidebar_visible);
        assert!(chrome.address.is_empty());
        assert_eq!(chrome.loading.phase(), LoadingPhase::Idle);
    }
}
