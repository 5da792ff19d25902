use reqwest::{
    Client, Method, RequestBuilder, Response,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::{config::Config, error::ApiError};

/// Shared JSON-over-HTTP transport for every resource client.
///
/// Each call takes a [`CancellationToken`]; once it fires the call settles
/// with [`ApiError::Cancelled`] and the in-flight request is dropped.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
    prefix: Vec<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let base = Url::parse(&config.api_url).map_err(|e| ApiError::Transport {
            status: None,
            message: format!("invalid API url {:?}: {e}", config.api_url),
            detail: None,
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Transport {
                status: None,
                message: format!("API url {:?} cannot be a base", config.api_url),
                detail: None,
            });
        }

        Ok(Self {
            client: builder.build()?,
            base,
            prefix: config
                .api_prefix
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    /// Absolute URL of `segments` under the API prefix. Segments are
    /// percent-encoded, so user-assigned ids may hold any character.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(self.prefix.iter().map(String::as_str));
            path.extend(segments);
        }
        url
    }

    pub async fn get(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
        cancel: &CancellationToken,
    ) -> Result<Value, ApiError> {
        let request = self.request(Method::GET, segments).query(query);
        self.execute(send(request), cancel).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<Value, ApiError> {
        let request = self.request(Method::POST, segments).json(body);
        self.execute(send(request), cancel).await
    }

    /// Only the status of a delete matters; whatever body comes back is
    /// ignored, JSON or not.
    pub async fn delete(&self, segments: &[&str], cancel: &CancellationToken) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, segments);
        self.execute(send_discarding_body(request), cancel).await
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, path = url.path(), "Sending API request");
        self.client.request(method, url)
    }

    async fn execute<T>(
        &self,
        call: impl Future<Output = Result<T, ApiError>>,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("API request cancelled before it settled");
                Err(ApiError::Cancelled)
            }
            result = call => result,
        }
    }
}

async fn send(request: RequestBuilder) -> Result<Value, ApiError> {
    let body = checked(request).await?.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&body).map_err(|e| ApiError::InvalidResponseShape {
        expected: "JSON body",
        found: e.to_string(),
    })
}

async fn send_discarding_body(request: RequestBuilder) -> Result<(), ApiError> {
    checked(request).await.map(|_| ())
}

/// A 2xx response, body unread. Anything else is classified from its
/// status and body.
async fn checked(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await?;
    debug!(status = status.as_u16(), "API request failed");
    Err(ApiError::from_status(status.as_u16(), &body))
}
