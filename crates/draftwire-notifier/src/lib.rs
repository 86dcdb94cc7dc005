//! Draftwire Reviewer Notification
//!
//! Delivers approval requests to human reviewers through a messaging
//! bot. Delivery is best-effort fan-out: every configured reviewer
//! receives every request, a failure toward one reviewer is logged and
//! never blocks the others, and no failure surfaces to the caller.
//!
//! # Implementations
//!
//! - [`TelegramNotifier`]: Telegram Bot API (`sendMessage`,
//!   `answerCallbackQuery`)
//! - [`RecordingNotifier`]: in-memory double for tests

#![warn(missing_docs)]

pub mod recording;
pub mod telegram;

pub use recording::RecordingNotifier;
pub use telegram::TelegramNotifier;

use draftwire_domain::RowRef;

/// Build the reviewer-facing approval message for one draft
///
/// One formatted message per row, shared by every implementation so
/// the wording stays consistent across transports.
pub fn approval_message(row: RowRef, url: &str, summary: &str, post: &str) -> String {
    format!(
        "Post draft for approval (row {row}):\n\n\
         🔗 *URL*: {url}\n\n\
         *Summary*:\n{summary}\n\n\
         *Post*:\n{post}"
    )
}
