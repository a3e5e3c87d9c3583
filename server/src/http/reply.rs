use histcache::CacheError;
use log::warn;
use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

pub type CacheReply = WithStatus<Json>;

/// `{success, data?, error?}` body shared by every cache response.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn with_data<T: Serialize>(outcome: Result<T, CacheError>) -> CacheReply {
    match outcome {
        Ok(data) => ok(Some(data)),
        Err(err) => failure(&err),
    }
}

pub fn empty(outcome: Result<(), CacheError>) -> CacheReply {
    match outcome {
        Ok(()) => ok(None::<()>),
        Err(err) => failure(&err),
    }
}

fn ok<T: Serialize>(data: Option<T>) -> CacheReply {
    let body = Envelope {
        success: true,
        data,
        error: None,
    };
    warp::reply::with_status(warp::reply::json(&body), StatusCode::OK)
}

pub fn failure(err: &CacheError) -> CacheReply {
    if err.is_client_error() {
        error(StatusCode::BAD_REQUEST, err.to_string())
    } else {
        // Cause already logged by the service; keep paths out of the response.
        error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "cache storage failure".to_string(),
        )
    }
}

pub fn error(status: StatusCode, message: String) -> CacheReply {
    let body: Envelope<()> = Envelope {
        success: false,
        data: None,
        error: Some(message),
    };
    warp::reply::with_status(warp::reply::json(&body), status)
}

/// Decodes a JSON request body, turning parse errors into a client error.
pub fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, CacheError> {
    serde_json::from_slice(body).map_err(|err| {
        warn!("malformed request body: {}", err);
        CacheError::MalformedBody(err.to_string())
    })
}
