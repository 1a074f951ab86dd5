//! Work for the host runtime
//!
//! The browser core never touches a view itself. Every side effect on the
//! embedding runtime is queued as a [`HostCommand`] and drained by the shell
//! once the state change is complete.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostCommand {
    /// Create a hidden content view for a tab and start loading `url`
    CreateView { tab_id: String, url: String },
    ShowView { tab_id: String },
    HideView { tab_id: String },
    LoadUrl { tab_id: String, url: String },
    Reload { tab_id: String },
    DestroyView { tab_id: String },
    WriteClipboard { text: String },
    /// Window control buttons follow the sidebar
    SetTrafficLightsVisible { visible: bool },
}

impl HostCommand {
    /// Tab the command targets, if any
    pub fn tab_id(&self) -> Option<&str> {
        match self {
            HostCommand::CreateView { tab_id, .. }
            | HostCommand::ShowView { tab_id }
            | HostCommand::HideView { tab_id }
            | HostCommand::LoadUrl { tab_id, .. }
            | HostCommand::Reload { tab_id }
            | HostCommand::DestroyView { tab_id } => Some(tab_id.as_str()),
            HostCommand::WriteClipboard { .. } | HostCommand::SetTrafficLightsVisible { .. } => {
                None
            }
        }
    }
}

/// FIFO of commands shared by every producer and a single executor
///
/// Producers push while they still hold the browser lock, so the queue order
/// is the order the browser issued them in. Only one [`Drain`] exists at a
/// time; commands pushed while it runs are picked up by the same drain.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Arc<Mutex<QueueInner>>,
}

#[derive(Debug, Default)]
struct QueueInner {
    commands: VecDeque<HostCommand>,
    draining: bool,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch; returns whether anything was added
    pub fn push_all(&self, commands: impl IntoIterator<Item = HostCommand>) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.commands.len();
        inner.commands.extend(commands);
        inner.commands.len() > before
    }

    pub fn len(&self) -> usize {
        self.inner.lock().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().commands.is_empty()
    }

    /// Claim the queue for execution. `None` while another drain is active.
    pub fn drain(&self) -> Option<Drain<'_>> {
        let mut inner = self.inner.lock();
        if inner.draining {
            return None;
        }
        inner.draining = true;
        Some(Drain { queue: self })
    }
}

/// Pops commands one at a time; the lock is never held while a command runs
#[derive(Debug)]
pub struct Drain<'a> {
    queue: &'a CommandQueue,
}

impl Iterator for Drain<'_> {
    type Item = HostCommand;

    fn next(&mut self) -> Option<HostCommand> {
        self.queue.inner.lock().commands.pop_front()
    }
}

impl Drop for Drain<'_> {
    fn drop(&mut self) {
        self.queue.inner.lock().draining = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn show(tab_id: &str) -> HostCommand {
        HostCommand::ShowView {
            tab_id: tab_id.to_string(),
        }
    }

    #[test]
    fn test_tab_id() {
        let command = HostCommand::LoadUrl {
            tab_id: "t1".to_string(),
            url: "https://example.com".to_string(),
        };
        assert_eq!(command.tab_id(), Some("t1"));
        assert_eq!(
            HostCommand::SetTrafficLightsVisible { visible: false }.tab_id(),
            None
        );
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(HostCommand::ShowView {
            tab_id: "t1".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "show_view", "tab_id": "t1"}));
    }

    #[test]
    fn test_queue_keeps_batches_in_push_order() {
        let queue = CommandQueue::new();
        // A create followed by a close of the same tab
        queue.push_all(vec![
            HostCommand::CreateView {
                tab_id: "x".to_string(),
                url: "https://example.com".to_string(),
            },
            HostCommand::HideView {
                tab_id: "y".to_string(),
            },
            show("x"),
        ]);
        queue.push_all(vec![
            HostCommand::DestroyView {
                tab_id: "x".to_string(),
            },
            show("y"),
        ]);

        let executed: Vec<_> = queue.drain().unwrap().collect();
        assert_eq!(executed.len(), 5);
        assert!(matches!(executed[0], HostCommand::CreateView { .. }));
        assert!(matches!(executed[3], HostCommand::DestroyView { .. }));
        assert_eq!(executed[4], show("y"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_only_one_drain_at_a_time() {
        let queue = CommandQueue::new();
        queue.push_all(vec![show("a"), show("b")]);

        let mut drain = queue.drain().unwrap();
        assert_eq!(drain.next(), Some(show("a")));

        // Work queued by a callback during execution joins the running drain
        assert!(queue.drain().is_none());
        queue.push_all(vec![show("c")]);
        assert_eq!(drain.collect::<Vec<_>>(), vec![show("b"), show("c")]);

        assert!(queue.drain().is_some());
    }

    #[test]
    fn test_push_all_reports_empty_batches() {
        let queue = CommandQueue::new();
        assert!(!queue.push_all(Vec::new()));
        assert!(queue.push_all(vec![show("a")]));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_concurrent_producers_keep_their_own_order() {
        let queue = CommandQueue::new();
        let producers: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|tab| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        queue.push_all(vec![HostCommand::LoadUrl {
                            tab_id: tab.to_string(),
                            url: format!("https://example.com/{}", i),
                        }]);
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        let executed: Vec<_> = queue.drain().unwrap().collect();
        assert_eq!(executed.len(), 100);
        for tab in ["a", "b"] {
            let urls: Vec<_> = executed
                .iter()
                .filter_map(|command| match command {
                    HostCommand::LoadUrl { tab_id, url } if tab_id == tab => Some(url.clone()),
                    _ => None,
                })
                .collect();
            let expected: Vec<_> = (0..50)
                .map(|i| format!("https://example.com/{}", i))
                .collect();
            assert_eq!(urls, expected);
        }
    }
}
