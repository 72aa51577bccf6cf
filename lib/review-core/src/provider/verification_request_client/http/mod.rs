use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use shared_types::VerificationRequestId;
use url::Url;

use super::error::TransportError;
use super::{RawPage, VerificationRequestClient};
use crate::model::list_query::ListQuery;
use crate::model::verification_request::StatusUpdate;
use crate::provider::http_client::{HttpClient, RequestBuilder};

mod dto;


use dto::{
    ListRequestsQueryRestDTO, ListRequestsResponseRestDTO, UpdateStatusRequestRestDTO,
    fallback_meta,
};

const REQUESTS_PATH: &str = "companies/requests";

pub struct HttpVerificationRequestClient {
    http_client: Arc<dyn HttpClient>,
    base_url: Url,
    bearer_token: Option<SecretString>,
}

impl HttpVerificationRequestClient {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: Url,
        bearer_token: Option<SecretString>,
    ) -> Self {
        Self {
            http_client,
            base_url,
            bearer_token,
        }
    }

    fn url(&self, suffix: Option<VerificationRequestId>) -> Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let url = match suffix {
            None => format!("{base}/{REQUESTS_PATH}"),
            Some(id) => format!("{base}/{REQUESTS_PATH}/{id}"),
        };

        Ok(Url::parse(&url)?)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, TransportError> {
        let request = request.header("Accept", "application/json");
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;

        if !response.status.is_success() {
            let message = response.backend_message();
            tracing::error!(
                status = %response.status,
                url = %response.url,
                message = message.as_deref().unwrap_or("<none>"),
                "Backend request failed"
            );
            return Err(TransportError::Status {
                status: response.status,
                message,
            });
        }

        response
            .json::<Value>()
            .map_err(|e| TransportError::InvalidBody(e.to_string()))
    }
}

#[async_trait::async_trait]
impl VerificationRequestClient for HttpVerificationRequestClient {
    async fn list(&self, query: &ListQuery) -> Result<RawPage, TransportError> {
        let mut url = self.url(None)?;
        let query_string = serde_urlencoded::to_string(ListRequestsQueryRestDTO::from(query))?;
        url.set_query(Some(&query_string));

        let body = self.execute(self.http_client.get(url.as_str())).await?;

        let response: ListRequestsResponseRestDTO =
            serde_json::from_value(body).map_err(|e| TransportError::InvalidBody(e.to_string()))?;

        Ok(match response {
            ListRequestsResponseRestDTO::Paginated(page) => {
                let items = page.data.len();
                let meta = match page.meta {
                    Some(meta) => meta.into_meta(query, items),
                    None => fallback_meta(query, items),
                };
                RawPage {
                    data: page.data,
                    meta,
                }
            }
            ListRequestsResponseRestDTO::Bare(data) => RawPage {
                meta: fallback_meta(query, data.len()),
                data,
            },
        })
    }

    async fn get(&self, id: VerificationRequestId) -> Result<Value, TransportError> {
        let url = self.url(Some(id))?;

        self.execute(self.http_client.get(url.as_str()))
            .await
            .map(unwrap_data)
    }

    async fn update(
        &self,
        id: VerificationRequestId,
        update: &StatusUpdate,
    ) -> Result<Value, TransportError> {
        let url = self.url(Some(id))?;

        let request = self
            .http_client
            .patch(url.as_str())
            .json(UpdateStatusRequestRestDTO::from(update))?;

        self.execute(request).await.map(unwrap_data)
    }
}

/// Single records may come wrapped as `{ "data": { ... } }`.
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut object) if !object.contains_key("id") && object.contains_key("data") => {
            match object.remove("data") {
                Some(data @ Value::Object(_)) => data,
                Some(other) => {
                    object.insert("data".to_string(), other);
                    Value::Object(object)
                }
                None => Value::Object(object),
            }
        }
        other => other,
    }
}
