//! Request/response boundary to the remote board service.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Aesthetic, BoardId, JoinCode, ViewToken},
    error::ApiErrorBody,
    protocol::{Board, Comment, CreateBoardRequest, NewComment},
};
use tracing::debug;

use crate::error::{ClientError, Result};

#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn create_board(&self, aesthetic: Aesthetic, recipient_name: &str) -> Result<Board>;
    async fn get_board_by_join_code(&self, code: &JoinCode) -> Result<Board>;
    async fn get_board_by_id(&self, id: &BoardId) -> Result<Board>;
    async fn get_board_by_view_token(&self, token: &ViewToken) -> Result<Board>;
    async fn add_comment(&self, board_id: &BoardId, comment: &NewComment) -> Result<Comment>;
    async fn list_comments(&self, board_id: &BoardId) -> Result<Vec<Comment>>;
}

/// JSON-over-HTTP client for the board service.
pub struct HttpRemoteStore {
    http: Client,
    api_url: String,
}

impl HttpRemoteStore {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_url)
    }

    pub fn with_client(http: Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { http, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.api_url);
        debug!(%url, "store: GET");
        let response = self.http.get(&url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.json::<ApiErrorBody>().await.ok();
    match (status, body) {
        (StatusCode::NOT_FOUND, Some(body)) => Err(ClientError::NotFound(body.error)),
        (StatusCode::NOT_FOUND, None) => Err(ClientError::NotFound("Board not found".into())),
        (_, Some(body)) => Err(ClientError::Transport(format!(
            "{} (status {})",
            body.error,
            status.as_u16()
        ))),
        (_, None) => Err(ClientError::Transport(format!(
            "HTTP error! status: {}",
            status.as_u16()
        ))),
    }
}

/// Encodes one path segment so tokens and ids cannot escape their slot.
fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn create_board(&self, aesthetic: Aesthetic, recipient_name: &str) -> Result<Board> {
        let response = self
            .http
            .post(format!("{}/boards", self.api_url))
            .json(&CreateBoardRequest {
                aesthetic,
                recipient_name: recipient_name.to_string(),
            })
            .send()
            .await?;
        decode(response).await
    }

    async fn get_board_by_join_code(&self, code: &JoinCode) -> Result<Board> {
        self.get_json(&format!("/boards/code/{}", segment(code.as_str())))
            .await
    }

    async fn get_board_by_id(&self, id: &BoardId) -> Result<Board> {
        self.get_json(&format!("/boards/{}", segment(id.as_str())))
            .await
    }

    async fn get_board_by_view_token(&self, token: &ViewToken) -> Result<Board> {
        self.get_json(&format!("/boards/view/{}", segment(token.as_str())))
            .await
    }

    async fn add_comment(&self, board_id: &BoardId, comment: &NewComment) -> Result<Comment> {
        let response = self
            .http
            .post(format!(
                "{}/boards/{}/comments",
                self.api_url,
                segment(board_id.as_str())
            ))
            .json(comment)
            .send()
            .await?;
        decode(response).await
    }

    async fn list_comments(&self, board_id: &BoardId) -> Result<Vec<Comment>> {
        self.get_json(&format!("/boards/{}/comments", segment(board_id.as_str())))
            .await
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
