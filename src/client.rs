//! HTTP client for the Q-sort API.
//!
//! Drives the same workflow as the browser: list teams, list versions, load
//! cards into a [`SortSession`], place them and submit.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::SessionError;
use crate::models::*;
use crate::session::{Placement, SortSession};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone)]
pub struct QsortClient {
    base_url: String,
    client: Client,
}

impl QsortClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a success body, or turn the `{ error }` body into a ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        match status {
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(message)),
            _ => Err(ClientError::Server(format!("{}: {}", status, message))),
        }
    }

    pub async fn teams(&self) -> Result<Vec<String>, ClientError> {
        let response = self.client.get(self.url("/get-teams")).send().await?;
        let body: TeamsResponse = self.handle_response(response).await?;
        Ok(body.teams)
    }

    pub async fn versions(&self, team: &str) -> Result<Vec<VersionInfo>, ClientError> {
        let response = self
            .client
            .get(self.url("/get-qsort-details"))
            .query(&[("team", team)])
            .send()
            .await?;
        let body: VersionsResponse = self.handle_response(response).await?;
        Ok(body.versions)
    }

    pub async fn cards(&self, team: &str, version: &str) -> Result<Vec<Card>, ClientError> {
        let response = self
            .client
            .get(self.url("/get-version-data"))
            .query(&[("version", version), ("team", team)])
            .send()
            .await?;
        let body: CardsResponse = self.handle_response(response).await?;
        Ok(body.cards)
    }

    /// Post a submission and return its sequence number.
    pub async fn submit(&self, submission: &Submission) -> Result<u32, ClientError> {
        let response = self
            .client
            .post(self.url("/submit"))
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        let body: SubmitResponse = response.json().await?;
        match (body.success, body.submission) {
            (true, Some(number)) => Ok(number),
            _ => {
                let message = body.error.unwrap_or_else(|| status.to_string());
                if status == StatusCode::BAD_REQUEST {
                    Err(ClientError::BadRequest(message))
                } else {
                    Err(ClientError::Server(message))
                }
            }
        }
    }

    /// Load a fresh session for a team and version.
    pub async fn start_session(
        &self,
        team: &str,
        version: &str,
    ) -> Result<SortSession, ClientError> {
        let cards = self.cards(team, version).await?;
        let mut session = SortSession::new();
        session.load(team, version, cards)?;
        Ok(session)
    }

    /// Apply an arrangement, submit it under `name` and reset the session.
    ///
    /// Nothing is sent unless the session accepts every placement and is
    /// complete.
    pub async fn sort_and_submit(
        &self,
        session: &mut SortSession,
        placements: &[Placement],
        name: &str,
    ) -> Result<u32, ClientError> {
        session.apply(placements)?;
        let submission = session.try_submit(name)?;
        let number = self.submit(&submission).await?;
        session.reset();
        Ok(number)
    }
}
