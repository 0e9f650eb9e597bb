//! The single authoritative record of the board this client has open.

use shared::{
    domain::{Aesthetic, BoardId, CommentColor, JoinCode, Role},
    protocol::{Board, Comment, NewComment, ANONYMOUS_AUTHOR},
};
use tracing::info;
use url::Url;

use crate::{
    error::{ClientError, Result},
    resolver::{CONTRIBUTE_KEY, VIEW_KEY},
    store::RemoteStore,
    themes::ThemeCatalog,
};

const SHARE_PAGE: &str = "/index.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBoard {
    pub board: Board,
    pub role: Role,
    pub palette: Vec<CommentColor>,
    pub pending_color: CommentColor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub contributor: Url,
    pub view: Option<Url>,
    pub join_code: JoinCode,
}

#[derive(Debug, Default)]
pub struct BoardSession {
    current: Option<OpenBoard>,
}

impl BoardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previously open board. The role is fixed until the next
    /// `open` or `reset`.
    pub fn open(&mut self, board: Board, role: Role, themes: &dyn ThemeCatalog) -> &OpenBoard {
        let palette = themes.comment_palette(board.aesthetic);
        let pending_color = themes.default_comment_color(board.aesthetic);
        info!(
            board_id = %board.id,
            role = ?role,
            aesthetic = %board.aesthetic,
            "session: board opened"
        );
        self.current.insert(OpenBoard {
            board,
            role,
            palette,
            pending_color,
        })
    }

    pub fn reset(&mut self) -> Option<OpenBoard> {
        let previous = self.current.take();
        if let Some(previous) = &previous {
            info!(board_id = %previous.board.id, "session: board closed");
        }
        previous
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&OpenBoard> {
        self.current.as_ref()
    }

    pub fn board(&self) -> Option<&Board> {
        self.current.as_ref().map(|open| &open.board)
    }

    pub fn board_id(&self) -> Option<&BoardId> {
        self.board().map(|board| &board.id)
    }

    pub fn role(&self) -> Option<Role> {
        self.current.as_ref().map(|open| open.role)
    }

    pub fn aesthetic(&self) -> Option<Aesthetic> {
        self.board().map(|board| board.aesthetic)
    }

    pub fn pending_color(&self) -> Option<&CommentColor> {
        self.current.as_ref().map(|open| &open.pending_color)
    }

    /// True when an open board accepts comments from this client.
    pub fn can_contribute(&self) -> bool {
        self.role().is_some_and(Role::can_contribute)
    }

    pub fn select_color(&mut self, color: CommentColor) -> Result<()> {
        let open = self
            .current
            .as_mut()
            .ok_or_else(|| ClientError::validation("No board selected!"))?;
        let Some(choice) = open.palette.iter().find(|entry| entry.matches(&color)) else {
            return Err(ClientError::validation(format!(
                "color {color} is not part of the {} palette",
                open.board.aesthetic
            )));
        };
        open.pending_color = choice.clone();
        Ok(())
    }

    /// Validates a comment without touching the network. The message is sent
    /// as typed; only blankness is judged on the trimmed text.
    pub fn compose_comment(&self, author: &str, message: &str) -> Result<(BoardId, NewComment)> {
        if message.trim().is_empty() {
            return Err(ClientError::validation("Please write a message!"));
        }
        let open = self
            .current
            .as_ref()
            .ok_or_else(|| ClientError::validation("No board selected!"))?;
        if !open.role.can_contribute() {
            return Err(ClientError::validation(
                "This board was opened read-only; use a contributor link to post.",
            ));
        }

        let author = match author.trim() {
            "" => ANONYMOUS_AUTHOR,
            author => author,
        };
        Ok((
            open.board.id.clone(),
            NewComment {
                author: author.to_string(),
                message: message.to_string(),
                color: open.pending_color.clone(),
            },
        ))
    }

    /// Issues exactly one create-comment call on success of validation. The
    /// posted comment is not appended locally; the next view refresh picks it
    /// up from the store.
    pub async fn post_comment(
        &self,
        store: &dyn RemoteStore,
        author: &str,
        message: &str,
    ) -> Result<Comment> {
        let (board_id, comment) = self.compose_comment(author, message)?;
        let posted = store.add_comment(&board_id, &comment).await?;
        info!(
            %board_id,
            comment_id = %posted.id,
            color = %posted.color,
            "session: comment posted"
        );
        Ok(posted)
    }

    /// Contributor/view links and the join code, only for the creator.
    pub fn share_links(&self, base: &Url) -> Option<ShareLinks> {
        let open = self.current.as_ref().filter(|open| open.role == Role::Creator)?;
        let board = &open.board;
        let contributor = share_link(
            base,
            board.contributor_link.as_deref(),
            CONTRIBUTE_KEY,
            board.id.as_str(),
        )?;
        let view = match (&board.view_link, &board.view_token) {
            (Some(path), _) => share_link(base, Some(path.as_str()), VIEW_KEY, ""),
            (None, Some(token)) => share_link(base, None, VIEW_KEY, token.as_str()),
            (None, None) => None,
        };
        Some(ShareLinks {
            contributor,
            view,
            join_code: board.join_code.clone(),
        })
    }
}

fn share_link(base: &Url, provided: Option<&str>, key: &str, value: &str) -> Option<Url> {
    if let Some(path) = provided {
        return base.join(path).ok();
    }
    let mut url = base.join(SHARE_PAGE).ok()?;
    url.query_pairs_mut().clear().append_pair(key, value);
    Some(url)
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
