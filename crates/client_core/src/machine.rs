//! Display-state transitions as a pure function. Side effects are returned
//! as data and executed by the caller.

use std::fmt;

use shared::domain::BoardId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayState {
    #[default]
    Landing,
    Board,
    View,
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisplayState::Landing => "landing",
            DisplayState::Board => "board",
            DisplayState::View => "view",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A board was created, joined by code, or loaded for contribution.
    BoardOpened,
    ViewTokenLoaded { board_id: BoardId },
    CommentPosted { board_id: BoardId },
    ReturnToBoard,
    Reset,
}

/// Facts about the session the transition table depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    /// A creator or contributor session is open.
    pub board_session_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StopSync,
    StartSync { board_id: BoardId },
    Show(DisplayState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: DisplayState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: DisplayState) -> Self {
        Self {
            next: state,
            effects: Vec::new(),
        }
    }

    fn to(from: DisplayState, next: DisplayState) -> Self {
        let mut effects = Vec::new();
        if from == DisplayState::View && next != DisplayState::View {
            effects.push(Effect::StopSync);
        }
        effects.push(Effect::Show(next));
        Self { next, effects }
    }

    fn into_view(board_id: BoardId) -> Self {
        Self {
            next: DisplayState::View,
            effects: vec![
                Effect::Show(DisplayState::View),
                Effect::StartSync { board_id },
            ],
        }
    }

    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Unlisted `(state, event)` pairs leave the state untouched and produce no
/// effects. Entering `View` always shows the view before sync starts so the
/// first poll sees it as active.
pub fn transition(state: DisplayState, event: &Event, ctx: Context) -> Transition {
    use DisplayState::{Board, Landing, View};

    match (state, event) {
        (Landing, Event::BoardOpened) => Transition::to(Landing, Board),
        (Landing, Event::ViewTokenLoaded { board_id }) => Transition::into_view(board_id.clone()),
        (Board, Event::CommentPosted { board_id }) => Transition::into_view(board_id.clone()),
        (View, Event::ReturnToBoard) if ctx.board_session_open => Transition::to(View, Board),
        (Landing, Event::Reset) => Transition {
            next: Landing,
            effects: vec![Effect::StopSync],
        },
        (from, Event::Reset) => {
            let mut reset = Transition::to(from, Landing);
            if !reset.effects.contains(&Effect::StopSync) {
                reset.effects.insert(0, Effect::StopSync);
            }
            reset
        }
        (state, _) => Transition::stay(state),
    }
}

#[cfg(test)]
#[path = "tests/machine_tests.rs"]
mod tests;
