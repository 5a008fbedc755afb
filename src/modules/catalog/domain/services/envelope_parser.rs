//! Classifies catalog API responses.
//!
//! Recognized envelopes:
//! 1. `{status, data: {items, params: {pagination}}}`
//! 2. `{status, data: {items, pagination}}`
//! 3. `{status, items, pagination}`
//! 4. `{status, data: {items}}` (pagination derived from the item count)
//! 5. a bare array, or `{status, data: [...]}`
//!
//! Everything else is a `ShapeError`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::modules::catalog::domain::entities::ResourcePage;
use crate::modules::catalog::domain::value_objects::ResourceConfig;
use crate::shared::application::{Pagination, RawPagination};
use crate::shared::errors::{AppError, AppResult};

pub fn parse_page<T: DeserializeOwned>(
    body: Value,
    config: &ResourceConfig,
    requested_page: u32,
) -> AppResult<ResourcePage<T>> {
    let envelope = match body {
        Value::Array(items) => return build_page(items, None, config, requested_page),
        Value::Object(envelope) => envelope,
        other => {
            return Err(AppError::ShapeError(format!(
                "{} response is a {} instead of an object",
                config.kind,
                json_type(&other)
            )))
        }
    };

    if !config.discriminator.accepts(envelope.get("status")) {
        let message = envelope
            .get("msg")
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to fetch {}", config.kind));
        return Err(AppError::ApiError(message));
    }

    let (items, pagination) = locate_items(envelope, config)?;
    build_page(items, pagination, config, requested_page)
}

fn locate_items(
    mut envelope: Map<String, Value>,
    config: &ResourceConfig,
) -> AppResult<(Vec<Value>, Option<Value>)> {
    match envelope.remove("data") {
        Some(Value::Array(items)) => Ok((items, None)),
        Some(Value::Object(mut data)) => {
            let Some(Value::Array(items)) = data.remove("items") else {
                return Err(AppError::ShapeError(format!(
                    "{} response is missing data.items",
                    config.kind
                )));
            };
            let pagination = data
                .remove("params")
                .and_then(|mut params| params.get_mut("pagination").map(Value::take))
                .or_else(|| data.remove("pagination"));
            Ok((items, pagination))
        }
        Some(other) => Err(AppError::ShapeError(format!(
            "{} response data is a {}",
            config.kind,
            json_type(&other)
        ))),
        None => match envelope.remove("items") {
            Some(Value::Array(items)) => Ok((items, envelope.remove("pagination"))),
            _ => Err(AppError::ShapeError(format!(
                "{} response has neither data nor items",
                config.kind
            ))),
        },
    }
}

fn build_page<T: DeserializeOwned>(
    items: Vec<Value>,
    pagination: Option<Value>,
    config: &ResourceConfig,
    requested_page: u32,
) -> AppResult<ResourcePage<T>> {
    let count = items.len();
    let items: Vec<T> = serde_json::from_value(Value::Array(items)).map_err(|e| {
        AppError::ShapeError(format!("{} items are malformed: {}", config.kind, e))
    })?;

    let pagination = match pagination {
        Some(Value::Null) | None => Pagination::derived(count, requested_page, config.page_size),
        Some(raw) => serde_json::from_value::<RawPagination>(raw)
            .map_err(|e| {
                AppError::ShapeError(format!("{} pagination is malformed: {}", config.kind, e))
            })?
            .normalize(requested_page, config.page_size),
    };

    Ok(ResourcePage::new(items, pagination))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
