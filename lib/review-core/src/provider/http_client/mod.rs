pub mod reqwest_client;

#[cfg(test)]
mod test;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::Display;
use thiserror::Error;

/// Transport towards the verification-request backend.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> RequestBuilder;
    fn patch(&self, url: &str) -> RequestBuilder;

    async fn send(&self, request: &Request) -> Result<Response, Error>;
}

pub type Headers = HashMap<String, String>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    pub fn is_not_found(&self) -> bool {
        self.0 == 404
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum Method {
    #[strum(serialize = "GET")]
    Get,
    #[strum(serialize = "PATCH")]
    Patch,
}

#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub url: String,
}

impl Response {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Trimmed `message` of a JSON error body, when the backend sent one.
    pub fn backend_message(&self) -> Option<String> {
        serde_json::from_slice::<Value>(&self.body)
            .ok()?
            .get("message")?
            .as_str()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(ToOwned::to_owned)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Backend unreachable: {0}")]
    Transport(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid header `{0}`")]
    InvalidHeader(String),
    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

pub struct RequestBuilder {
    client: Arc<dyn HttpClient>,
    request: Request,
}

impl RequestBuilder {
    pub fn new(client: Arc<dyn HttpClient>, method: Method, url: &str) -> Self {
        Self {
            client,
            request: Request {
                method,
                url: url.to_owned(),
                headers: Headers::default(),
                body: None,
            },
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.request
            .headers
            .insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn bearer_auth(self, token: &str) -> Self {
        self.header(AUTHORIZATION, &format!("Bearer {token}"))
    }

    pub fn json<T: Serialize>(mut self, value: T) -> Result<Self, Error> {
        self.request.body = Some(serde_json::to_vec(&value)?);
        Ok(self.header("Content-Type", "application/json"))
    }

    pub async fn send(self) -> Result<Response, Error> {
        let Self { client, request } = self;
        trace_request(&request);

        match client.send(&request).await {
            Ok(response) => {
                trace_response(&request, &response);
                Ok(response)
            }
            Err(error) => {
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    %error,
                    "Backend call failed"
                );
                Err(error)
            }
        }
    }
}

const AUTHORIZATION: &str = "Authorization";

fn trace_request(request: &Request) {
    tracing::debug!(method = %request.method, url = %request.url, "Calling backend");
    tracing::trace!(
        headers = %format_headers(&request.headers),
        body = %format_body(request.body.as_deref()),
        "Backend request"
    );
}

fn trace_response(request: &Request, response: &Response) {
    tracing::debug!(
        method = %request.method,
        url = %request.url,
        status = %response.status,
        "Backend responded"
    );
    tracing::trace!(body = %format_body(Some(response.body.as_slice())), "Backend response");
}

/// The bearer token never reaches the logs.
fn format_headers(headers: &Headers) -> String {
    if headers.is_empty() {
        return "<none>".to_owned();
    }

    headers
        .iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(key, value)| {
            if key.eq_ignore_ascii_case(AUTHORIZATION) {
                format!("{key}: <redacted>")
            } else {
                format!("{key}: {value}")
            }
        })
        .join(", ")
}

fn format_body(body: Option<&[u8]>) -> String {
    match body {
        None => "<none>".to_owned(),
        Some(body) => String::from_utf8_lossy(body).into_owned(),
    }
}
