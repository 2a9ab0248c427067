use http::header::AUTHORIZATION;
use http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::{GatewayError, UpstreamFailure};
use crate::helpers::time::get_instant;
use crate::observability::metrics::{get_metrics, ERROR_MSG, SUCCESS_MSG, UNAUTHORIZED_MSG};
use crate::provider::request::ProviderRequest;
use crate::sources::issuer::IssueToken;
use crate::sources::token_manager::TokenManager;

/// Outcome of a single HTTP attempt.
enum Attempt {
    Unauthorized(UpstreamFailure),
    Failed(UpstreamFailure),
}

impl Attempt {
    fn into_failure(self) -> UpstreamFailure {
        match self {
            Attempt::Unauthorized(f) | Attempt::Failed(f) => f,
        }
    }
}

/// Issues provider data calls with a managed bearer token.
///
/// A 401 answer triggers exactly one token re-issuance and one immediate retry.
#[derive(Debug)]
pub struct ProviderGateway<I> {
    client: Client,
    api_url: String,
    tokens: TokenManager<I>,
}

impl<I> ProviderGateway<I>
where
    I: IssueToken + Send + Sync,
{
    pub fn new(client: Client, api_url: impl Into<String>, tokens: TokenManager<I>) -> Self {
        Self { client, api_url: api_url.into(), tokens }
    }

    pub fn tokens(&self) -> &TokenManager<I> {
        &self.tokens
    }

    pub async fn call(&self, request: &ProviderRequest) -> Result<Value, GatewayError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        let operation = request.operation.as_str();

        let result = self.call_with_single_retry(request).await;

        metrics
            .provider_duration
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());
        let outcome = match &result {
            Ok(_) => SUCCESS_MSG,
            Err(err) if err.status() == StatusCode::UNAUTHORIZED.as_u16() => UNAUTHORIZED_MSG,
            Err(_) => ERROR_MSG,
        };
        metrics.provider_requests.with_label_values(&[operation, outcome]).inc();
        result
    }

    async fn call_with_single_retry(&self, request: &ProviderRequest) -> Result<Value, GatewayError> {
        let context = failure_context(&request.operation);
        let token = self.tokens.get_token().await?;

        match self.send_once(&token, request, &context).await {
            Ok(body) => Ok(body),
            Err(Attempt::Failed(failure)) => Err(GatewayError::Provider(failure)),
            Err(Attempt::Unauthorized(failure)) => {
                warn!(operation = %request.operation, "{}; refreshing token and retrying once", failure.message);
                get_metrics()
                    .await
                    .provider_retries
                    .with_label_values(&[request.operation.as_str()])
                    .inc();

                self.tokens.invalidate().await;
                let token = self
                    .tokens
                    .get_token()
                    .await
                    .map_err(|err| GatewayError::Provider(UpstreamFailure::without_status(&context, &err.failure().message)))?;

                self.send_once(&token, request, &context)
                    .await
                    .map_err(|attempt| GatewayError::Provider(attempt.into_failure()))
            }
        }
    }

    async fn send_once(&self, token: &str, request: &ProviderRequest, context: &str) -> Result<Value, Attempt> {
        debug!(operation = %request.operation, "calling provider");
        let response = self
            .client
            .get(&self.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|err| Attempt::Failed(UpstreamFailure::from_transport(context, &err)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| Attempt::Failed(UpstreamFailure::from_transport(context, &err)))?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(Attempt::Unauthorized(UpstreamFailure::from_response(context, status, &body)));
        }
        if !status.is_success() {
            return Err(Attempt::Failed(UpstreamFailure::from_response(context, status, &body)));
        }

        let value = serde_json::from_str::<Value>(&body)
            .map_err(|err| Attempt::Failed(UpstreamFailure::malformed(context, status, err, &body)))?;
        info!(operation = %request.operation, status = status.as_u16(), "provider call succeeded");
        Ok(value)
    }
}

fn failure_context(operation: &str) -> String {
    format!("FatSecret request failed for method {}", operation)
}
