use futures_util::StreamExt;
use reqwest::header::HeaderValue;
use storefront_config::HttpConfig;
use storefront_link::{Forward, Link, LinkError, LinkFuture};
use storefront_types::{GraphQLResponse, Operation};
use url::Url;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Build the HTTP client shared by every [`HttpLink`].
pub fn http_client(config: HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// Terminating link: sends the operation as a JSON POST and decodes the
/// `{ data, errors }` envelope.
///
/// GraphQL-level `errors` are returned to the caller inside the response;
/// only transport failures, non-2xx statuses, and undecodable bodies become
/// [`LinkError`]s.
#[derive(Debug, Clone)]
pub struct HttpLink {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpLink {
    pub const NAME: &'static str = "http";

    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Link for HttpLink {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn request(&self, operation: Operation, _forward: Forward<'_>) -> LinkFuture {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&operation.body());

        for (name, value) in operation.headers().iter() {
            // from_bytes keeps non-ASCII token bytes intact (obs-text).
            match HeaderValue::from_bytes(value.as_bytes()) {
                Ok(value) => request = request.header(name, value),
                Err(_) => tracing::warn!(
                    operation = operation.display_name(),
                    header = name,
                    "Dropping header with a value that cannot be sent"
                ),
            }
        }

        let operation_name = operation.display_name().to_string();
        Box::pin(async move {
            let response = request.send().await.map_err(LinkError::transport)?;
            let status = response.status();
            if !status.is_success() {
                let body = read_capped_error_body(response).await;
                tracing::warn!(
                    operation = %operation_name,
                    status = status.as_u16(),
                    "GraphQL request failed"
                );
                return Err(LinkError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let bytes = response.bytes().await.map_err(LinkError::transport)?;
            let decoded: GraphQLResponse =
                serde_json::from_slice(&bytes).map_err(LinkError::decode)?;
            if decoded.has_errors() {
                tracing::debug!(
                    operation = %operation_name,
                    errors = decoded.errors.len(),
                    "GraphQL response carried errors"
                );
            }
            Ok(decoded)
        })
    }
}

async fn read_capped_error_body(response: reqwest::Response) -> String {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
