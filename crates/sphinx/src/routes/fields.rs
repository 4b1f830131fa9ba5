//! Lenient request bodies for the HTML-facing POST endpoints.
//!
//! Browsers post either JSON (fetch) or `application/x-www-form-urlencoded`
//! (plain forms). Both decode into one flat field map. Scalars are read as
//! text, and null or missing fields read as absent.

use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde_json::{Map, Value};
use sphinx_common::SphinxError;

use crate::error::ApiError;

/// Top-level fields of a JSON object or urlencoded form body
#[derive(Debug, Default)]
pub struct SubmittedFields(Map<String, Value>);

impl SubmittedFields {
    /// Field as text: strings verbatim, other scalars in their JSON form
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

impl<S> FromRequest<S> for SubmittedFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| {
                    tracing::debug!(error = %e, "Rejecting form body");
                    SphinxError::invalid_body()
                })?;

            let fields = pairs
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            return Ok(Self(fields));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read request body");
            SphinxError::invalid_body()
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(_) => Err(SphinxError::invalid_body().into()),
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting malformed JSON body");
                Err(SphinxError::invalid_body().into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &str) -> Result<SubmittedFields, ApiError> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        SubmittedFields::from_request(req, &()).await
    }

    #[test]
    fn test_text_coerces_scalars() {
        let Value::Object(map) = json!({
            "answer": 5040,
            "flag": true,
            "name": "Ann",
            "email": null,
        }) else {
            unreachable!()
        };
        let fields = SubmittedFields(map);

        assert_eq!(fields.text("answer").as_deref(), Some("5040"));
        assert_eq!(fields.text("flag").as_deref(), Some("true"));
        assert_eq!(fields.text("name").as_deref(), Some("Ann"));
        assert_eq!(fields.text("email"), None);
        assert_eq!(fields.text("missing"), None);
    }

    #[tokio::test]
    async fn test_json_and_form_bodies() {
        let fields = extract(Some("application/json"), r#"{"answer":"stack"}"#)
            .await
            .unwrap();
        assert_eq!(fields.text("answer").as_deref(), Some("stack"));

        let fields = extract(
            Some("application/x-www-form-urlencoded"),
            "name=Ann&message=hello+there%21",
        )
        .await
        .unwrap();
        assert_eq!(fields.text("name").as_deref(), Some("Ann"));
        assert_eq!(fields.text("message").as_deref(), Some("hello there!"));

        // No content type and no body reads as no fields
        let fields = extract(None, "").await.unwrap();
        assert_eq!(fields.text("answer"), None);
    }

    #[tokio::test]
    async fn test_rejects_malformed_bodies() {
        for body in ["{", "[1,2]", "\"just a string\""] {
            let err = extract(Some("application/json"), body).await.unwrap_err();
            assert_eq!(err.0.code(), "invalid-body");
        }
    }
}
