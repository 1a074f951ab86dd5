//! Wisp Navigation
//!
//! - URL-bar input → loadable URL
//! - What to do when a load fails or a content view crashes

mod error;
mod input;
mod recovery;

pub use error::NavigationError;
pub use input::{format_url, normalize_url};
pub use recovery::{error_name, RecoveryPolicy, CRASH_MESSAGE, ERR_ABORTED};

pub type Result<T> = std::result::Result<T, NavigationError>;
