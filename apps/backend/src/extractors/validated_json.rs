use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::{Error as JsonError, Value};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::middleware::request_trace;
use crate::validation::{validate, Validate};

/// Upper bound on request bodies; every action fits in a few hundred bytes.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// JSON body extractor that validates field presence and shape before
/// binding, turning any failure into `RequestMalformed`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(_req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        Box::pin(async move {
            let trace_id = request_trace::trace_id();

            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(trace_id = %trace_id, error = %e, "Failed to read request body chunk");
                    DomainError::malformed("Failed to read request body")
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    return Err(DomainError::malformed("Request body too large").into());
                }
                body.extend_from_slice(&chunk);
            }

            let value: Value = serde_json::from_slice(&body).map_err(|e| {
                debug!(trace_id = %trace_id, error = %e, body_size = body.len(), "JSON parsing failed");
                DomainError::malformed(classify_json_error(&e))
            })?;

            validate(&value, T::FIELDS)?;

            let parsed = serde_json::from_value::<T>(value)
                .map_err(|e| DomainError::malformed(classify_json_error(&e)))?;

            Ok(ValidatedJson(parsed))
        })
    }
}

/// Sanitized message for a serde_json failure.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            let line = error.line();
            format!("Invalid JSON at line {line}")
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            "Invalid JSON: wrong types for one or more fields".to_string()
        }
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}
