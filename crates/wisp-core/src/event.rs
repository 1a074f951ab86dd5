//! Events reported by a tab's content view

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentEvent {
    DidStartLoading,
    DidFinishLoad,
    DomReady,
    PageTitleUpdated { title: String },
    /// The view committed a navigation to `url`
    DidNavigate { url: String },
    /// Favicon candidates, best first
    FaviconUpdated { favicons: Vec<String> },
    DidFailLoad { error_code: i32, description: String },
    Crashed,
    ConsoleMessage { message: String },
    /// The page asked for a popup / new window
    NewWindowRequested { url: String },
}
