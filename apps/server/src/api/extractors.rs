//! Custom Axum extractors.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use mongodb::bson::Document;
use serde_json::Value as JsonValue;

use crate::{api::json::json_to_document, Error};

/// A JSON object request body converted to a BSON document.
///
/// Rejects empty bodies, malformed JSON and non-object values with 400.
pub struct JsonDocument(pub Document);

/// Search criteria posted as a JSON object.
///
/// A missing or blank body means no criteria and yields an empty document.
pub struct SearchBody(pub Document);

#[async_trait]
impl<S> FromRequest<S> for JsonDocument
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        read_document(req, state)
            .await?
            .map(JsonDocument)
            .ok_or_else(|| Error::Validation("No data provided".into()))
    }
}

#[async_trait]
impl<S> FromRequest<S> for SearchBody
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let doc = read_document(req, state).await?.unwrap_or_default();
        Ok(SearchBody(doc))
    }
}

/// Reads the body as a JSON object; `None` when the body is blank.
async fn read_document<S>(req: Request, state: &S) -> Result<Option<Document>, Error>
where
    S: Send + Sync,
{
    let bytes = Bytes::from_request(req, state)
        .await
        .map_err(|e| Error::Validation(format!("Failed to read request body: {}", e)))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: JsonValue = serde_json::from_slice(&bytes)
        .map_err(|e| Error::Validation(format!("Invalid JSON in request body: {}", e)))?;

    json_to_document(value).map(Some)
}
