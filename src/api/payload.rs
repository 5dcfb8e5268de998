use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde_json::Value;

use crate::api::error::ApiError;

/// Axum extractor for an untyped JSON request body
///
/// Write endpoints take their payload through this extractor so that:
/// - a missing or non-JSON `Content-Type` is rejected with 415
/// - a body that is not well-formed JSON is rejected with 400
///
/// Field-level validation happens afterwards in the model layer.
#[derive(Debug, Clone)]
pub struct JsonPayload(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        check_content_type(req.headers())?;

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        let value = serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Request body is not valid JSON: {}", e)))?;

        Ok(JsonPayload(value))
    }
}

/// Require `application/json`, ignoring parameters such as `charset`
fn check_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(content_type) = extract_header_value(headers, header::CONTENT_TYPE.as_str()) else {
        return Err(ApiError::UnsupportedMediaType(
            "Content-Type must be application/json".to_string(),
        ));
    };

    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case("application/json") {
        Ok(())
    } else {
        Err(ApiError::UnsupportedMediaType(format!(
            "Content-Type must be application/json, got {}",
            content_type
        )))
    }
}

/// Extract header value as string
fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http, http::HeaderValue};

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_content_type_check() {
        assert!(check_content_type(&headers_with("application/json")).is_ok());
        assert!(check_content_type(&headers_with("application/json; charset=utf-8")).is_ok());
        assert!(matches!(
            check_content_type(&headers_with("text/plain")),
            Err(ApiError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            check_content_type(&HeaderMap::new()),
            Err(ApiError::UnsupportedMediaType(_))
        ));
    }

    #[tokio::test]
    async fn test_extracts_json_body() {
        let req = http::Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"user_id": 1}"#))
            .unwrap();
        let JsonPayload(value) = JsonPayload::from_request(req, &()).await.unwrap();
        assert_eq!(value["user_id"], 1);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let req = http::Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let err = JsonPayload::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
