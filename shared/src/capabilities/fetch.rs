use crux_http::{Http, HttpError, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Outcome of a single JSON GET once the shell's answer has been classified.
pub type FetchOutcome = Result<Value, FetchError>;

/// What `crux_http` hands back for a GET sent without a typed body.
pub type HttpOutcome = crux_http::Result<Response<Vec<u8>>>;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchError {
    #[error("client error: HTTP {status}")]
    ClientError { status: u16 },

    #[error("server error: HTTP {status}")]
    ServerError { status: u16 },

    #[error("network error: {cause}")]
    NetworkError { cause: String },

    #[error("invalid JSON body: {reason}")]
    ParseError { reason: String },

    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// Only failures that might go away on their own are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::ServerError { .. } | FetchError::NetworkError { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::ClientError { status }
            | FetchError::ServerError { status }
            | FetchError::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}

/// Turn a `crux_http` result into a parsed JSON value or a [`FetchError`].
///
/// Depending on the middleware in play a non-2xx answer arrives either as a
/// response or as `HttpError::Http`; both are classified by status code.
pub fn classify(result: HttpOutcome) -> FetchOutcome {
    match result {
        Ok(mut response) => {
            let status = u16::from(response.status());
            let body = response.take_body().unwrap_or_default();
            classify_status(status, &body)
        }
        Err(HttpError::Http { code, .. }) => classify_status(u16::from(code), &[]),
        Err(other) => Err(FetchError::NetworkError {
            cause: other.to_string(),
        }),
    }
}

fn classify_status(status: u16, body: &[u8]) -> FetchOutcome {
    match status {
        200..=299 => serde_json::from_slice(body).map_err(|e| FetchError::ParseError {
            reason: e.to_string(),
        }),
        400..=499 => Err(FetchError::ClientError { status }),
        500..=599 => Err(FetchError::ServerError { status }),
        _ => Err(FetchError::UnexpectedStatus { status }),
    }
}

/// GET `url` through `http`, classify the answer and hand it to `make_event`.
///
/// Returns the request id sent in [`REQUEST_ID_HEADER`] so callers can
/// correlate their logs with the shell's.
pub fn get_json<Ev, F>(http: &Http<Ev>, url: &str, make_event: F) -> String
where
    Ev: Send + 'static,
    F: FnOnce(FetchOutcome) -> Ev + Send + 'static,
{
    let request_id = uuid::Uuid::new_v4().to_string();

    http.get(url)
        .header(REQUEST_ID_HEADER, &request_id)
        .send(move |result| make_event(classify(result)));

    request_id
}
