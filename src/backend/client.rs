use std::time::Duration;

use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::customer::CustomerRecord;
use crate::gateway::VerifyQuery;
use crate::requests::{NewRequest, RequestStatus, SupportRequest};

use super::SupportBackend;
use super::error::BackendError;
use super::wire::{
    CreateRequestBody, Created, Envelope, RequestList, Toggled, VerifiedCustomer, VerifyUserBody,
    excerpt, server_message,
};

const EXCERPT_LEN: usize = 100;
const CREATE_FALLBACK: &str = "failed to create request";
const TOGGLE_FALLBACK: &str = "failed to toggle status";

/// Client for the remote support service.
///
/// Every call is a single attempt: no retries, no caching. Retrying is left to
/// the operator.
#[derive(Debug, Clone)]
pub struct HttpSupportClient {
    http: Client,
    base_url: Url,
    api_token: Option<String>,
}

/// Status, content type, and body text of a completed response.
struct RawResponse {
    status: StatusCode,
    content_type: String,
    body: String,
}

impl RawResponse {
    async fn read(resp: Response) -> Result<Self, BackendError> {
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let body = resp.text().await?;
        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    fn is_json(&self) -> bool {
        self.content_type
            .split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
    }

    fn message(&self) -> Option<String> {
        server_message(&self.body)
    }

    fn envelope<T: DeserializeOwned>(&self) -> Result<Envelope<T>, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

impl HttpSupportClient {
    pub fn new(
        base_url: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("invalid backend url {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("backend url {base_url} cannot carry a path");
        }
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("support-console/1.0")
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url,
            api_token,
        })
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Self::new(&cfg.backend_url, cfg.api_token.clone(), cfg.request_timeout)
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut builder = self.http.request(method, self.endpoint(segments));
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<RawResponse, BackendError> {
        let resp = builder.send().await?;
        RawResponse::read(resp).await
    }
}

impl SupportBackend for HttpSupportClient {
    #[tracing::instrument(skip(self, query), fields(user_type = %query.user_type, method = ?query.method), err)]
    async fn verify_user(&self, query: &VerifyQuery) -> Result<CustomerRecord, BackendError> {
        let builder = self
            .request(Method::POST, &["users", "verify-user"])
            .json(&VerifyUserBody::from(query));
        let raw = self.send(builder).await?;

        if !raw.status.is_success() {
            return Err(BackendError::NotFound(
                raw.message().unwrap_or_else(|| "customer not found".into()),
            ));
        }
        let envelope: Envelope<VerifiedCustomer> = raw
            .envelope()
            .map_err(|e| BackendError::Malformed(e.to_string()))?;
        match envelope {
            Envelope {
                success: true,
                data: Some(customer),
                ..
            } => customer.into_record(query.user_type),
            Envelope { message, .. } => Err(BackendError::NotFound(
                message.unwrap_or_else(|| "customer not found".into()),
            )),
        }
    }

    #[tracing::instrument(skip(self, request), fields(request_type = %request.request_type()), err)]
    async fn create_request(
        &self,
        customer_id: &str,
        request: &NewRequest,
    ) -> Result<String, BackendError> {
        if customer_id.trim().is_empty() {
            return Err(BackendError::MissingCustomerId);
        }
        let builder = self
            .request(Method::POST, &["customer-requests", "create", customer_id])
            .json(&CreateRequestBody::from(request));
        let raw = self.send(builder).await?;

        if !raw.status.is_success() {
            return Err(BackendError::Rejected(
                raw.message().unwrap_or_else(|| CREATE_FALLBACK.into()),
            ));
        }
        match raw.envelope::<Created>() {
            Ok(Envelope {
                success: true,
                data: Some(created),
                ..
            }) if !created.reference_id.trim().is_empty() => {
                tracing::info!(reference_id = %created.reference_id, "support request created");
                Ok(created.reference_id)
            }
            Ok(envelope) => Err(BackendError::Rejected(
                envelope.message.unwrap_or_else(|| CREATE_FALLBACK.into()),
            )),
            Err(e) => {
                tracing::warn!(error = %e, "create response did not parse");
                Err(BackendError::Rejected(CREATE_FALLBACK.into()))
            }
        }
    }

    #[tracing::instrument(skip(self), err)]
    async fn list_requests(&self, customer_id: &str) -> Result<Vec<SupportRequest>, BackendError> {
        if customer_id.trim().is_empty() {
            return Err(BackendError::MissingCustomerId);
        }
        let builder = self.request(
            Method::GET,
            &["customer-requests", "my-requests", customer_id],
        );
        let raw = self.send(builder).await?;

        if raw.status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound("customer not found".into()));
        }
        if raw.status.is_server_error() {
            return Err(BackendError::Server {
                status: raw.status.as_u16(),
                detail: raw.message().unwrap_or_else(|| excerpt(&raw.body, EXCERPT_LEN)),
            });
        }
        if !raw.status.is_success() {
            let detail = raw.message().unwrap_or_else(|| raw.status.to_string());
            return Err(BackendError::Rejected(format!(
                "failed to fetch requests: {detail}"
            )));
        }

        let envelope: Envelope<RequestList> = raw
            .envelope()
            .map_err(|e| BackendError::Rejected(format!("failed to fetch requests: {e}")))?;
        match envelope {
            Envelope {
                success: true,
                data,
                ..
            } => Ok(data.map(|list| list.requests).unwrap_or_default()),
            Envelope { message, .. } => Err(BackendError::Rejected(format!(
                "failed to fetch requests: {}",
                message.unwrap_or_else(|| "request was not successful".into())
            ))),
        }
    }

    #[tracing::instrument(skip(self), err)]
    async fn toggle_status(
        &self,
        reference_id: &str,
        customer_id: &str,
    ) -> Result<RequestStatus, BackendError> {
        if customer_id.trim().is_empty() {
            return Err(BackendError::MissingCustomerId);
        }
        let builder = self.request(
            Method::PUT,
            &["customer-requests", reference_id, "toggle-status", customer_id],
        );
        let raw = self.send(builder).await?;

        if !raw.is_json() {
            return Err(BackendError::Protocol {
                content_type: raw.content_type.clone(),
                excerpt: excerpt(&raw.body, EXCERPT_LEN),
            });
        }
        if raw.status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(
                raw.message().unwrap_or_else(|| "request not found".into()),
            ));
        }
        if !raw.status.is_success() {
            return Err(BackendError::Rejected(
                raw.message().unwrap_or_else(|| TOGGLE_FALLBACK.into()),
            ));
        }

        let envelope: Envelope<Toggled> = raw
            .envelope()
            .map_err(|e| BackendError::Malformed(e.to_string()))?;
        match envelope {
            Envelope {
                success: true,
                data: Some(toggled),
                ..
            } => {
                tracing::info!(status = %toggled.status, "request status toggled");
                Ok(toggled.status)
            }
            Envelope { message, .. } => Err(BackendError::Rejected(
                message.unwrap_or_else(|| TOGGLE_FALLBACK.into()),
            )),
        }
    }
}
