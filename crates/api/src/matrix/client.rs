//! Minimal client for the Matrix client-server API (`/_matrix/client/v3`).

use std::sync::atomic::{AtomicU64, Ordering};

use cyarika_core::types::DbId;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::MatrixConfig;

#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    #[error("invalid homeserver URL: {0}")]
    InvalidUrl(String),

    #[error("request to homeserver failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("homeserver returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// A text message from a room timeline.
#[derive(Debug, Clone, Serialize)]
pub struct RoomMessage {
    pub event_id: String,
    pub sender: String,
    pub body: String,
    pub origin_server_ts: i64,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    chunk: Vec<TimelineEvent>,
}

#[derive(Deserialize)]
struct TimelineEvent {
    #[serde(rename = "type")]
    kind: String,
    event_id: String,
    sender: String,
    #[serde(default)]
    origin_server_ts: i64,
    #[serde(default)]
    content: serde_json::Value,
}

#[derive(Deserialize)]
struct SendResponse {
    event_id: String,
}

/// One user's connection to the homeserver.
pub struct MatrixClient {
    http: reqwest::Client,
    homeserver: Url,
    access_token: String,
    user_id: DbId,
    txn_counter: AtomicU64,
}

impl MatrixClient {
    pub fn new(config: &MatrixConfig, user_id: DbId) -> Result<Self, MatrixError> {
        let homeserver = Url::parse(&config.homeserver_url)
            .map_err(|e| MatrixError::InvalidUrl(e.to_string()))?;
        if homeserver.cannot_be_a_base() {
            return Err(MatrixError::InvalidUrl(config.homeserver_url.clone()));
        }

        Ok(Self {
            http: reqwest::Client::builder().build()?,
            homeserver,
            access_token: config.access_token.clone(),
            user_id,
            txn_counter: AtomicU64::new(0),
        })
    }

    pub fn user_id(&self) -> DbId {
        self.user_id
    }

    /// `{homeserver}/_matrix/client/v3/rooms/{room_id}/{rest..}` with each
    /// segment percent-encoded.
    fn room_endpoint(&self, room_id: &str, rest: &[&str]) -> Url {
        let mut url = self.homeserver.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["_matrix", "client", "v3", "rooms", room_id])
                .extend(rest);
        }
        url
    }

    /// Most recent `limit` text messages, newest first.
    pub async fn room_messages(
        &self,
        room_id: &str,
        limit: u32,
    ) -> Result<Vec<RoomMessage>, MatrixError> {
        let url = self.room_endpoint(room_id, &["messages"]);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("dir", "b".to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        let page: MessagesResponse = check_status(response).await?.json().await?;

        Ok(page
            .chunk
            .into_iter()
            .filter(|event| event.kind == "m.room.message")
            .filter_map(|event| {
                let body = event.content.get("body")?.as_str()?.to_string();
                Some(RoomMessage {
                    event_id: event.event_id,
                    sender: event.sender,
                    body,
                    origin_server_ts: event.origin_server_ts,
                })
            })
            .collect())
    }

    /// Send a plain-text message, returning the new event id.
    pub async fn send_text(&self, room_id: &str, body: &str) -> Result<String, MatrixError> {
        let txn_id = self.next_txn_id();
        let url = self.room_endpoint(room_id, &["send", "m.room.message", &txn_id]);
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "msgtype": "m.text", "body": body }))
            .send()
            .await?;
        let sent: SendResponse = check_status(response).await?.json().await?;
        Ok(sent.event_id)
    }

    /// Transaction ids must be unique per access token; the homeserver
    /// de-duplicates retries that reuse one.
    fn next_txn_id(&self) -> String {
        let n = self.txn_counter.fetch_add(1, Ordering::Relaxed);
        format!(
            "cyarika-{}-{}-{n}",
            self.user_id,
            chrono::Utc::now().timestamp_millis()
        )
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, MatrixError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MatrixError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> MatrixConfig {
        MatrixConfig {
            homeserver_url: url.to_string(),
            access_token: "tok".to_string(),
            client_idle_secs: 60,
        }
    }

    #[test]
    fn room_ids_are_percent_encoded() {
        let client = MatrixClient::new(&config("https://matrix.example"), 1).unwrap();
        let url = client.room_endpoint("!abc:matrix.example", &["messages"]);
        assert_eq!(
            url.as_str(),
            "https://matrix.example/_matrix/client/v3/rooms/!abc:matrix.example/messages"
        );

        let url = client.room_endpoint("!a/b c", &["messages"]);
        assert!(url.as_str().ends_with("/rooms/!a%2Fb%20c/messages"));
    }

    #[test]
    fn homeserver_with_path_prefix() {
        let client = MatrixClient::new(&config("https://example.com/matrix"), 1).unwrap();
        let url = client.room_endpoint("!r:example.com", &["send", "m.room.message", "t1"]);
        assert_eq!(
            url.path(),
            "/matrix/_matrix/client/v3/rooms/!r:example.com/send/m.room.message/t1"
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            MatrixClient::new(&config("not a url"), 1),
            Err(MatrixError::InvalidUrl(_))
        ));
    }

    #[test]
    fn txn_ids_are_unique() {
        let client = MatrixClient::new(&config("https://matrix.example"), 7).unwrap();
        let a = client.next_txn_id();
        let b = client.next_txn_id();
        assert_ne!(a, b);
        assert!(a.starts_with("cyarika-7-"));
    }
}
