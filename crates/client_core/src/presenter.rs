use shared::protocol::{Board, Comment};

use crate::machine::DisplayState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Callbacks into whatever draws the board. Implementations must not block;
/// they are invoked from the client's async tasks.
pub trait Presenter: Send + Sync {
    fn render_comment_list(&self, comments: &[Comment]);
    fn show_empty_state(&self);
    /// `board` is the board the new state displays, `None` on landing.
    fn transition_to_display_state(&self, state: DisplayState, board: Option<&Board>);
    fn notify_user(&self, message: &str, kind: NoticeKind);
}
