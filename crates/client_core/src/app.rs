//! Coordinator wiring the resolver, session, state machine and synchronizer
//! to a store and a presenter.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Aesthetic, BoardId, CommentColor, JoinCode, Role, ViewToken},
    protocol::{Board, Comment},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::{ClientError, Result},
    machine::{self, Context, DisplayState, Effect, Event},
    presenter::{NoticeKind, Presenter},
    resolver::{self, LaunchAction, LaunchParams},
    session::{BoardSession, ShareLinks},
    store::RemoteStore,
    sync::{ViewSynchronizer, DEFAULT_POLL_INTERVAL},
    themes::{BuiltinThemes, ThemeCatalog},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppOptions {
    pub poll_interval: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Launch,
    Create,
    Join,
    Post,
}

pub struct BoardApp {
    store: Arc<dyn RemoteStore>,
    themes: Arc<dyn ThemeCatalog>,
    presenter: Arc<dyn Presenter>,
    session: BoardSession,
    state: DisplayState,
    display: watch::Sender<DisplayState>,
    sync: ViewSynchronizer,
}

impl BoardApp {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        presenter: Arc<dyn Presenter>,
        options: AppOptions,
    ) -> Self {
        Self::with_themes(store, Arc::new(BuiltinThemes), presenter, options)
    }

    pub fn with_themes(
        store: Arc<dyn RemoteStore>,
        themes: Arc<dyn ThemeCatalog>,
        presenter: Arc<dyn Presenter>,
        options: AppOptions,
    ) -> Self {
        let (display, display_rx) = watch::channel(DisplayState::Landing);
        let sync = ViewSynchronizer::new(
            Arc::clone(&store),
            Arc::clone(&presenter),
            display_rx,
            options.poll_interval,
        );
        Self {
            store,
            themes,
            presenter,
            session: BoardSession::new(),
            state: DisplayState::Landing,
            display,
            sync,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn session(&self) -> &BoardSession {
        &self.session
    }

    pub fn synchronizer(&self) -> &ViewSynchronizer {
        &self.sync
    }

    pub fn subscribe_display(&self) -> watch::Receiver<DisplayState> {
        self.display.subscribe()
    }

    pub fn palette(&self) -> Vec<CommentColor> {
        self.session
            .current()
            .map(|open| open.palette.clone())
            .unwrap_or_default()
    }

    pub fn share_links(&self, base: &Url) -> Option<ShareLinks> {
        self.session.share_links(base)
    }

    /// Resolves launch parameters and performs the single fetch the chosen
    /// action needs. On failure nothing is opened and the state is unchanged.
    pub async fn launch(&mut self, params: &LaunchParams) -> Result<DisplayState> {
        let action = resolver::resolve(params);
        info!(?action, "app: launch");
        match action {
            LaunchAction::LoadAsCreator { board_id } => {
                self.load_as_creator(&board_id).await?;
            }
            LaunchAction::JoinByCode { join_code } => {
                self.join_by_code(join_code.as_str()).await?;
            }
            LaunchAction::LoadAsContributor { board_id } => {
                self.load_for_contribution(&board_id).await?;
            }
            LaunchAction::LoadByViewToken { view_token } => {
                self.load_by_view_token(&view_token).await?;
            }
            LaunchAction::ShowLanding => {}
        }
        Ok(self.state)
    }

    pub async fn create_board(&mut self, aesthetic: Aesthetic, recipient_name: &str) -> Result<Board> {
        let recipient_name = recipient_name.trim();
        if recipient_name.is_empty() {
            return Err(self.reject(ClientError::validation("Please enter a recipient name!")));
        }
        let board = self
            .store
            .create_board(aesthetic, recipient_name)
            .await
            .map_err(|err| self.report(Operation::Create, err))?;
        self.open(board.clone(), Role::Creator);
        self.presenter
            .notify_user("Board created successfully!", NoticeKind::Success);
        Ok(board)
    }

    pub async fn join_by_code(&mut self, code: &str) -> Result<Board> {
        let code = JoinCode::new(code);
        if code.is_empty() {
            return Err(self.reject(ClientError::validation("Please enter a join code!")));
        }
        let board = self
            .store
            .get_board_by_join_code(&code)
            .await
            .map_err(|err| self.report(Operation::Join, err))?;
        self.open(board.clone(), Role::Contributor);
        self.presenter
            .notify_user("Board joined successfully!", NoticeKind::Success);
        Ok(board)
    }

    /// The creator role is granted only when the store answers with the very
    /// board the private link named.
    pub async fn load_as_creator(&mut self, board_id: &BoardId) -> Result<Board> {
        let board = self
            .store
            .get_board_by_id(board_id)
            .await
            .map_err(|err| self.report(Operation::Launch, err))?;
        let role = if &board.id == board_id {
            Role::Creator
        } else {
            Role::Contributor
        };
        self.open(board.clone(), role);
        Ok(board)
    }

    pub async fn load_for_contribution(&mut self, board_id: &BoardId) -> Result<Board> {
        let board = self
            .store
            .get_board_by_id(board_id)
            .await
            .map_err(|err| self.report(Operation::Launch, err))?;
        self.open(board.clone(), Role::Contributor);
        Ok(board)
    }

    pub async fn load_by_view_token(&mut self, view_token: &ViewToken) -> Result<Board> {
        let board = self
            .store
            .get_board_by_view_token(view_token)
            .await
            .map_err(|err| self.report(Operation::Launch, err))?;
        self.open(board.clone(), Role::Viewer);
        Ok(board)
    }

    pub fn select_color(&mut self, color: CommentColor) -> Result<()> {
        self.session
            .select_color(color)
            .map_err(|err| self.reject(err))
    }

    /// Posting is only offered on the board page. Validation failures never
    /// reach the store; store failures leave the board page untouched and can
    /// be retried by calling again.
    pub async fn post_comment(&mut self, author: &str, message: &str) -> Result<Comment> {
        if self.state != DisplayState::Board {
            return Err(self.reject(ClientError::validation(
                "Messages can only be posted from the board page.",
            )));
        }
        let posted = match self
            .session
            .post_comment(self.store.as_ref(), author, message)
            .await
        {
            Ok(posted) => posted,
            Err(err @ ClientError::Validation(_)) => return Err(self.reject(err)),
            Err(err) => return Err(self.report(Operation::Post, err)),
        };

        self.presenter
            .notify_user("Message posted successfully!", NoticeKind::Success);
        if let Some(board_id) = self.session.board_id().cloned() {
            self.dispatch(Event::CommentPosted { board_id });
        }
        Ok(posted)
    }

    /// Returns `true` when the view was left for the board page.
    pub fn return_to_board(&mut self) -> bool {
        let from = self.state;
        from == DisplayState::View && self.dispatch(Event::ReturnToBoard) == DisplayState::Board
    }

    pub fn reset(&mut self) {
        self.dispatch(Event::Reset);
        self.session.reset();
    }

    fn open(&mut self, board: Board, role: Role) {
        if self.state != DisplayState::Landing {
            self.dispatch(Event::Reset);
        }
        let board_id = board.id.clone();
        self.session.open(board, role, self.themes.as_ref());
        let event = if role.can_contribute() {
            Event::BoardOpened
        } else {
            Event::ViewTokenLoaded { board_id }
        };
        self.dispatch(event);
    }

    fn dispatch(&mut self, event: Event) -> DisplayState {
        let ctx = Context {
            board_session_open: self.session.can_contribute(),
        };
        let transition = machine::transition(self.state, &event, ctx);
        if transition.is_noop() {
            debug!(state = %self.state, ?event, "machine: ignored event");
            return self.state;
        }
        debug!(from = %self.state, to = %transition.next, ?event, "machine: transition");
        self.state = transition.next;
        for effect in transition.effects {
            self.execute(effect);
        }
        self.state
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::StopSync => self.sync.stop(),
            Effect::StartSync { board_id } => {
                self.sync.start(board_id);
            }
            Effect::Show(state) => {
                self.display.send_replace(state);
                let board = match state {
                    DisplayState::Landing => None,
                    DisplayState::Board | DisplayState::View => self.session.board(),
                };
                self.presenter.transition_to_display_state(state, board);
            }
        }
    }

    fn reject(&self, err: ClientError) -> ClientError {
        self.presenter.notify_user(&err.to_string(), NoticeKind::Error);
        err
    }

    fn report(&self, operation: Operation, err: ClientError) -> ClientError {
        warn!(?operation, %err, "app: request failed");
        let message = match (&err, operation) {
            (ClientError::NotFound(_), Operation::Join) => {
                "Invalid code! Please check and try again."
            }
            (ClientError::NotFound(_), _) => "Board not found. Please check the link.",
            (_, Operation::Post) => "Error posting message! Please try again.",
            _ => "Cannot connect to the server. Please check your connection and try again.",
        };
        self.presenter.notify_user(message, NoticeKind::Error);
        err
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
