use super::reply::{empty, error, parse_body, with_data, CacheReply};
use histcache::dispatch::{DeleteRequest, ReadRequest, ReplaceRequest, UpsertRequest};
use histcache::CacheService;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reject::{
    InvalidHeader, InvalidQuery, LengthRequired, MethodNotAllowed, PayloadTooLarge,
};
use warp::{Filter, Rejection, Reply};

/// Largest request body buffered in memory.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// `/api/cache` verbs plus `/healthz`.
pub fn routes(
    service: Arc<CacheService>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let service_filter = warp::any().map(move || service.clone());

    let read = warp::path!("api" / "cache")
        .and(warp::get())
        .and(warp::query::<ReadRequest>())
        .and(service_filter.clone())
        .and_then(read_handler);

    let replace = warp::path!("api" / "cache")
        .and(warp::post())
        .and(json_body())
        .and(service_filter.clone())
        .and_then(replace_handler);

    let upsert = warp::path!("api" / "cache")
        .and(warp::put())
        .and(json_body())
        .and(service_filter.clone())
        .and_then(upsert_handler);

    let delete = warp::path!("api" / "cache")
        .and(warp::delete())
        .and(warp::query::<DeleteRequest>())
        .and(json_body().or(no_body()).unify())
        .and(service_filter.clone())
        .and_then(delete_handler);

    let health = warp::path!("healthz")
        .and(warp::get())
        .and(service_filter)
        .map(|service: Arc<CacheService>| {
            warp::reply::json(&json!({
                "status": "ok",
                "storageRoot": service.storage_root().display().to_string(),
                "metrics": service.metrics(),
            }))
        });

    read.or(replace)
        .or(upsert)
        .or(delete)
        .or(health)
        .recover(rejection_reply)
        .with(warp::log("cacheserver::http"))
}

fn json_body() -> impl Filter<Extract = (Bytes,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::bytes())
}

/// Matches requests that declare no body at all, such as a bare DELETE.
fn no_body() -> impl Filter<Extract = (Bytes,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length").and_then(|length: Option<u64>| async move {
        match length {
            None => Ok(Bytes::new()),
            Some(_) => Err(warp::reject::not_found()),
        }
    })
}

/// Wraps warp's own rejections in the `{success:false,error}` envelope.
async fn rejection_reply(rejection: Rejection) -> Result<CacheReply, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(err) = rejection.find::<InvalidQuery>() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if let Some(err) = rejection.find::<InvalidHeader>() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if rejection.find::<PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("request body exceeds {MAX_BODY_BYTES} bytes"),
        )
    } else if rejection.find::<LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "content-length required".to_string())
    } else if rejection.find::<MethodNotAllowed>().is_some() {
        // Sibling routes report this for every mismatched verb, so it ranks last.
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        log::error!("unhandled rejection: {:?}", rejection);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    };
    Ok(error(status, message))
}

async fn read_handler(
    request: ReadRequest,
    service: Arc<CacheService>,
) -> Result<CacheReply, Infallible> {
    Ok(with_data(service.read(request).await))
}

async fn replace_handler(body: Bytes, service: Arc<CacheService>) -> Result<CacheReply, Infallible> {
    let outcome = match parse_body::<ReplaceRequest>(&body) {
        Ok(request) => service.replace(request).await,
        Err(err) => Err(err),
    };
    Ok(empty(outcome))
}

async fn upsert_handler(body: Bytes, service: Arc<CacheService>) -> Result<CacheReply, Infallible> {
    let outcome = match parse_body::<UpsertRequest>(&body) {
        Ok(request) => service.upsert(request).await,
        Err(err) => Err(err),
    };
    Ok(with_data(outcome))
}

/// Query parameters take precedence; the JSON body is optional.
async fn delete_handler(
    query: DeleteRequest,
    body: Bytes,
    service: Arc<CacheService>,
) -> Result<CacheReply, Infallible> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        Ok(DeleteRequest::default())
    } else {
        parse_body::<DeleteRequest>(&body)
    };
    let outcome = match from_body {
        Ok(fallback) => service.delete(query.or(fallback)).await,
        Err(err) => Err(err),
    };
    Ok(empty(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn setup() -> (tempfile::TempDir, Arc<CacheService>) {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(CacheService::new(dir.path().join("cache")));
        (dir, service)
    }

    fn body(response: &warp::http::Response<Bytes>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    async fn put_peak_a(service: &Arc<CacheService>) -> warp::http::Response<Bytes> {
        warp::test::request()
            .method("PUT")
            .path("/api/cache")
            .json(&json!({
                "type": "roi",
                "histogramId": "h1",
                "roiId": "r1",
                "data": {
                    "name": "Peak A", "low": 10, "high": 20, "integral": 0,
                    "color": "#ff0000", "enabled": true
                }
            }))
            .reply(&routes(service.clone()))
            .await
    }

    #[tokio::test]
    async fn roi_put_then_get() {
        let (_dir, service) = setup();
        let response = put_peak_a(&service).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response)["data"]["id"], "r1");

        let response = warp::test::request()
            .method("GET")
            .path("/api/cache?type=rois")
            .reply(&routes(service.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let rois = &body(&response)["data"]["h1"];
        assert_eq!(rois.as_array().unwrap().len(), 1);
        assert_eq!(rois[0]["name"], "Peak A");
        assert_eq!(rois[0]["low"].as_f64(), Some(10.0));
        assert_eq!(rois[0]["high"].as_f64(), Some(20.0));
        assert_eq!(rois[0]["color"], "#ff0000");
        assert_eq!(rois[0]["enabled"], true);
    }

    #[tokio::test]
    async fn post_with_singular_roi_type_is_invalid() {
        let (_dir, service) = setup();
        let response = warp::test::request()
            .method("POST")
            .path("/api/cache")
            .json(&json!({"type": "roi", "data": {}}))
            .reply(&routes(service))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let reply = body(&response);
        assert_eq!(reply["success"], false);
        assert!(reply["error"].as_str().unwrap().contains("invalid type"));
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_client_error() {
        let (_dir, service) = setup();
        let response = warp::test::request()
            .method("POST")
            .path("/api/cache")
            .body("{not json")
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&response)["success"], false);
    }

    #[tokio::test]
    async fn get_without_type_returns_roi_collection() {
        let (_dir, service) = setup();
        let response = warp::test::request()
            .method("GET")
            .path("/api/cache")
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response), json!({"success": true, "data": {}}));
    }

    #[tokio::test]
    async fn get_unknown_type_is_rejected() {
        let (_dir, service) = setup();
        let response = warp::test::request()
            .method("GET")
            .path("/api/cache?type=everything")
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn post_replace_returns_no_data() {
        let (_dir, service) = setup();
        let response = warp::test::request()
            .method("POST")
            .path("/api/cache")
            .json(&json!({"type": "rois", "data": {"h3": []}}))
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response), json!({"success": true}));
    }

    #[tokio::test]
    async fn delete_histogram_reads_id_from_query() {
        let (_dir, service) = setup();
        put_peak_a(&service).await;

        let response = warp::test::request()
            .method("DELETE")
            .path("/api/cache?type=histogram&id=h1")
            .reply(&routes(service.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = warp::test::request()
            .method("GET")
            .path("/api/cache?type=rois")
            .reply(&routes(service))
            .await;
        assert_eq!(body(&response)["data"], json!({}));
    }

    #[tokio::test]
    async fn delete_histogram_without_id_is_missing_parameter() {
        let (_dir, service) = setup();
        let response = warp::test::request()
            .method("DELETE")
            .path("/api/cache")
            .json(&json!({"type": "histogram"}))
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body(&response)["error"]
            .as_str()
            .unwrap()
            .contains("id"));
    }

    #[tokio::test]
    async fn corrupt_collection_hides_cause_from_client() {
        let (_dir, service) = setup();
        std::fs::create_dir_all(service.storage_root()).unwrap();
        std::fs::write(service.storage_root().join("settings.json"), b"nope").unwrap();

        let response = warp::test::request()
            .method("GET")
            .path("/api/cache?type=settings")
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body(&response),
            json!({"success": false, "error": "cache storage failure"})
        );
    }

    #[tokio::test]
    async fn healthz_reports_counters() {
        let (_dir, service) = setup();
        put_peak_a(&service).await;

        let response = warp::test::request()
            .method("GET")
            .path("/healthz")
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let reply = body(&response);
        assert_eq!(reply["status"], "ok");
        assert_eq!(reply["metrics"]["upserts"], 1);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_envelope() {
        let (_dir, service) = setup();
        let response = warp::test::request()
            .method("POST")
            .path("/api/cache")
            .body(vec![b' '; MAX_BODY_BYTES as usize + 1])
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body(&response)["success"], false);
    }

    #[tokio::test]
    async fn unsupported_method_gets_envelope() {
        let (_dir, service) = setup();
        let response = warp::test::request()
            .method("PATCH")
            .path("/api/cache")
            .json(&json!({"type": "rois"}))
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body(&response),
            json!({"success": false, "error": "method not allowed"})
        );
    }

    #[tokio::test]
    async fn malformed_query_gets_envelope() {
        let (_dir, service) = setup();
        let response = warp::test::request()
            .method("GET")
            .path("/api/cache?type=rois&type=settings")
            .reply(&routes(service))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&response)["success"], false);
    }

    #[tokio::test]
    async fn bare_delete_resets_everything() {
        let (_dir, service) = setup();
        put_peak_a(&service).await;

        let response = warp::test::request()
            .method("DELETE")
            .path("/api/cache")
            .reply(&routes(service.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = warp::test::request()
            .method("GET")
            .path("/api/cache?type=rois")
            .reply(&routes(service))
            .await;
        assert_eq!(body(&response)["data"], json!({}));
    }
}
