//! In-memory board service and recording presenter shared by the core tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use shared::{
    domain::{Aesthetic, BoardId, CommentId, JoinCode, ViewToken},
    protocol::{Board, Comment, NewComment},
};
use tokio::sync::{oneshot, Notify};

use crate::{
    error::{ClientError, Result},
    machine::DisplayState,
    presenter::{NoticeKind, Presenter},
    store::RemoteStore,
};

#[derive(Default)]
pub struct ScriptedStore {
    boards: Mutex<Vec<Board>>,
    comments: Mutex<HashMap<BoardId, Vec<Comment>>>,
    pub create_calls: AtomicUsize,
    pub lookup_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    fail_next_add: Mutex<Option<ClientError>>,
    fail_lists: AtomicBool,
    unreachable: AtomicBool,
    list_gate: Mutex<Option<oneshot::Receiver<()>>>,
    redirects: Mutex<HashMap<BoardId, BoardId>>,
    pub list_started: Notify,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_board(&self, aesthetic: Aesthetic, recipient_name: &str) -> Board {
        let n = self.boards.lock().expect("boards").len() + 1;
        let board = Board {
            id: BoardId::new(uuid::Uuid::new_v4().to_string()),
            join_code: JoinCode::new(format!("abc{n:03}")),
            view_token: Some(ViewToken::new(uuid::Uuid::new_v4().to_string())),
            aesthetic,
            recipient_name: recipient_name.to_string(),
            created_at: Some("2024-05-01T09:00:00".to_string()),
            contributor_link: None,
            view_link: None,
        };
        self.boards.lock().expect("boards").push(board.clone());
        board
    }

    pub fn seed_comment(&self, board_id: &BoardId, author: &str, message: &str) -> Comment {
        let mut comments = self.comments.lock().expect("comments");
        let list = comments.entry(board_id.clone()).or_default();
        let comment = Comment {
            id: CommentId::new(uuid::Uuid::new_v4().to_string()),
            author: author.to_string(),
            message: message.to_string(),
            color: Default::default(),
            created_at: format!("2024-05-01T10:00:{:02}", list.len()),
        };
        list.push(comment.clone());
        comment
    }

    pub fn comments_for(&self, board_id: &BoardId) -> Vec<Comment> {
        self.comments
            .lock()
            .expect("comments")
            .get(board_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Id lookups for `from` answer with the board stored under `to`.
    pub fn redirect(&self, from: BoardId, to: BoardId) {
        self.redirects.lock().expect("redirects").insert(from, to);
    }

    pub fn fail_next_add(&self, err: ClientError) {
        *self.fail_next_add.lock().expect("fail flag") = Some(err);
    }

    pub fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// The next `list_comments` call parks until the returned sender fires.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.list_gate.lock().expect("gate") = Some(rx);
        tx
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn adds(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection refused".into()));
        }
        Ok(())
    }

    fn find(&self, predicate: impl Fn(&Board) -> bool) -> Result<Board> {
        self.boards
            .lock()
            .expect("boards")
            .iter()
            .find(|board| predicate(board))
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Board not found".into()))
    }
}

#[async_trait]
impl RemoteStore for ScriptedStore {
    async fn create_board(&self, aesthetic: Aesthetic, recipient_name: &str) -> Result<Board> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(self.seed_board(aesthetic, recipient_name))
    }

    async fn get_board_by_join_code(&self, code: &JoinCode) -> Result<Board> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        let mut board = self.find(|board| &board.join_code == code)?;
        board.view_token = None;
        Ok(board)
    }

    async fn get_board_by_id(&self, id: &BoardId) -> Result<Board> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        let target = self
            .redirects
            .lock()
            .expect("redirects")
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.clone());
        self.find(|board| board.id == target)
    }

    async fn get_board_by_view_token(&self, token: &ViewToken) -> Result<Board> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        self.find(|board| board.view_token.as_ref() == Some(token))
    }

    async fn add_comment(&self, board_id: &BoardId, comment: &NewComment) -> Result<Comment> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if let Some(err) = self.fail_next_add.lock().expect("fail flag").take() {
            return Err(err);
        }
        self.find(|board| &board.id == board_id)?;
        let mut comments = self.comments.lock().expect("comments");
        let list = comments.entry(board_id.clone()).or_default();
        let stored = Comment {
            id: CommentId::new(uuid::Uuid::new_v4().to_string()),
            author: comment.author.clone(),
            message: comment.message.clone(),
            color: comment.color.clone(),
            created_at: format!("2024-05-01T11:00:{:02}", list.len()),
        };
        list.push(stored.clone());
        Ok(stored)
    }

    async fn list_comments(&self, board_id: &BoardId) -> Result<Vec<Comment>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_started.notify_one();
        let gate = self.list_gate.lock().expect("gate").take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.check_reachable()?;
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("HTTP error! status: 502".into()));
        }
        Ok(self.comments_for(board_id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Rendered(Vec<Comment>),
    Empty,
    Display(DisplayState, Option<BoardId>),
    Notice(String, NoticeKind),
}

#[derive(Default)]
pub struct RecordingPresenter {
    calls: Mutex<Vec<PresenterCall>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().expect("calls").clone()
    }

    pub fn renders(&self) -> Vec<PresenterCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, PresenterCall::Rendered(_) | PresenterCall::Empty))
            .collect()
    }

    pub fn displays(&self) -> Vec<DisplayState> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PresenterCall::Display(state, _) => Some(state),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<(String, NoticeKind)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PresenterCall::Notice(message, kind) => Some((message, kind)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: PresenterCall) {
        self.calls.lock().expect("calls").push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn render_comment_list(&self, comments: &[Comment]) {
        self.push(PresenterCall::Rendered(comments.to_vec()));
    }

    fn show_empty_state(&self) {
        self.push(PresenterCall::Empty);
    }

    fn transition_to_display_state(&self, state: DisplayState, board: Option<&Board>) {
        self.push(PresenterCall::Display(
            state,
            board.map(|board| board.id.clone()),
        ));
    }

    fn notify_user(&self, message: &str, kind: NoticeKind) {
        self.push(PresenterCall::Notice(message.to_string(), kind));
    }
}
