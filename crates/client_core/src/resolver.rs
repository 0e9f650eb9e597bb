//! Launch-link inspection: decides the initial role and board identity.

use shared::domain::{BoardId, JoinCode, ViewToken};
use url::Url;

pub const BOARD_KEY: &str = "board";
pub const JOIN_CODE_KEY: &str = "code";
pub const CONTRIBUTE_KEY: &str = "contribute";
pub const VIEW_KEY: &str = "view";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    pub board_id: Option<String>,
    pub join_code: Option<String>,
    pub contribute_id: Option<String>,
    pub view_token: Option<String>,
}

impl LaunchParams {
    /// Reads the four recognized keys from a query string (with or without
    /// the leading `?`). Unknown keys are ignored; the first occurrence of a
    /// repeated key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                BOARD_KEY => &mut params.board_id,
                JOIN_CODE_KEY => &mut params.join_code,
                CONTRIBUTE_KEY => &mut params.contribute_id,
                VIEW_KEY => &mut params.view_token,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchAction {
    LoadAsCreator { board_id: BoardId },
    JoinByCode { join_code: JoinCode },
    LoadAsContributor { board_id: BoardId },
    LoadByViewToken { view_token: ViewToken },
    ShowLanding,
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Precedence when several keys are present is fixed:
/// `board` > `code` > `contribute` > `view`.
pub fn resolve(params: &LaunchParams) -> LaunchAction {
    if let Some(id) = present(&params.board_id) {
        LaunchAction::LoadAsCreator {
            board_id: BoardId::new(id),
        }
    } else if let Some(code) = present(&params.join_code) {
        LaunchAction::JoinByCode {
            join_code: JoinCode::new(code),
        }
    } else if let Some(id) = present(&params.contribute_id) {
        LaunchAction::LoadAsContributor {
            board_id: BoardId::new(id),
        }
    } else if let Some(token) = present(&params.view_token) {
        LaunchAction::LoadByViewToken {
            view_token: ViewToken::new(token),
        }
    } else {
        LaunchAction::ShowLanding
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
