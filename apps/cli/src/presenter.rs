use client_core::{DisplayState, NoticeKind, Presenter};
use shared::protocol::{Board, Comment};

/// Prints board pages and comment lists to stdout.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

pub fn format_timestamp(comment: &Comment) -> String {
    comment
        .timestamp()
        .map(|at| at.format("%b %d, %H:%M").to_string())
        .unwrap_or_else(|| "Just now".to_string())
}

pub fn format_comment(comment: &Comment) -> String {
    format!(
        "  [{}] {} ({}): {}",
        format_timestamp(comment),
        comment.author,
        comment.color,
        comment.message
    )
}

fn banner(state: DisplayState, board: Option<&Board>) -> String {
    match (state, board) {
        (DisplayState::Landing, _) | (_, None) => {
            "== kudoboard == create <aesthetic> <recipient> | join <code> | open <link>".to_string()
        }
        (DisplayState::Board, Some(board)) => format!(
            "== {} board for {} == {}\n   name <author> | color <hex> | post <message>",
            board.aesthetic.display_name(),
            board.recipient_name,
            board.aesthetic.tagline()
        ),
        (DisplayState::View, Some(board)) => format!(
            "== Messages for {} == refreshing automatically",
            board.recipient_name
        ),
    }
}

impl Presenter for TerminalPresenter {
    fn render_comment_list(&self, comments: &[Comment]) {
        println!("-- {} message(s)", comments.len());
        for comment in comments {
            println!("{}", format_comment(comment));
        }
    }

    fn show_empty_state(&self) {
        println!("-- No messages yet. Be the first to share some love!");
    }

    fn transition_to_display_state(&self, state: DisplayState, board: Option<&Board>) {
        println!("{}", banner(state, board));
    }

    fn notify_user(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Success => println!("ok: {message}"),
            NoticeKind::Error => eprintln!("error: {message}"),
        }
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
