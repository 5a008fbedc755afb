use serde_json::Value;
use std::time::Duration;

use super::filters::Filters;
use crate::modules::cache::CachePolicy;
use crate::shared::config::AppConfig;
use crate::shared::domain::ResourceKind;
use crate::shared::errors::{AppError, AppResult};

/// How an envelope's `status` field signals success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDiscriminator {
    /// Any truthy value: `true`, a non-empty string, a non-zero number
    Truthy,
    /// Exactly this string (the search endpoint answers `"success"`)
    Literal(&'static str),
}

impl StatusDiscriminator {
    pub fn accepts(&self, status: Option<&Value>) -> bool {
        match self {
            StatusDiscriminator::Truthy => status.is_some_and(is_truthy),
            StatusDiscriminator::Literal(expected) => {
                status.and_then(Value::as_str) == Some(*expected)
            }
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Everything a `ResourceStore` needs to know about one resource kind
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceConfig {
    pub kind: ResourceKind,
    /// Path relative to the API base URL; `{name}` segments are filled from filters
    pub endpoint: &'static str,
    pub fixed_query: Vec<(&'static str, String)>,
    pub discriminator: StatusDiscriminator,
    pub cache_policy: CachePolicy,
    /// Fallback when the server omits `totalItemsPerPage`
    pub page_size: u32,
}

impl ResourceConfig {
    /// Configuration for a paginated resource kind.
    ///
    /// `MovieDetail` is not paginated and is rejected.
    pub fn for_kind(kind: ResourceKind, config: &AppConfig) -> AppResult<Self> {
        let list = CachePolicy::session(config.list_cache_ttl());

        let resource = match kind {
            ResourceKind::LatestMovies => Self {
                kind,
                endpoint: "/danh-sach/phim-moi-cap-nhat-v3",
                fixed_query: Vec::new(),
                discriminator: StatusDiscriminator::Truthy,
                cache_policy: list,
                page_size: 10,
            },
            ResourceKind::Anime => Self {
                kind,
                endpoint: "/v1/api/danh-sach/hoat-hinh",
                fixed_query: vec![("limit", "20".to_string())],
                discriminator: StatusDiscriminator::Truthy,
                cache_policy: list,
                page_size: 20,
            },
            ResourceKind::KoreanSeries => Self {
                kind,
                endpoint: "/v1/api/danh-sach/phim-bo",
                fixed_query: vec![
                    ("country", "han-quoc".to_string()),
                    ("limit", "8".to_string()),
                ],
                discriminator: StatusDiscriminator::Truthy,
                cache_policy: list,
                page_size: 8,
            },
            ResourceKind::Categories => Self {
                kind,
                endpoint: "/the-loai",
                fixed_query: Vec::new(),
                discriminator: StatusDiscriminator::Truthy,
                cache_policy: CachePolicy::durable(config.category_cache_ttl()),
                page_size: 100,
            },
            ResourceKind::Search => Self {
                kind,
                endpoint: "/v1/api/tim-kiem",
                fixed_query: vec![("limit", "20".to_string())],
                discriminator: StatusDiscriminator::Literal("success"),
                cache_policy: list,
                page_size: 20,
            },
            ResourceKind::SearchSuggestions => Self {
                kind,
                endpoint: "/v1/api/tim-kiem",
                fixed_query: vec![("limit", "10".to_string())],
                discriminator: StatusDiscriminator::Literal("success"),
                cache_policy: list,
                page_size: 10,
            },
            ResourceKind::Related => Self {
                kind,
                endpoint: "/v1/api/the-loai/{category}",
                fixed_query: vec![("limit", "50".to_string())],
                discriminator: StatusDiscriminator::Truthy,
                cache_policy: list,
                page_size: 50,
            },
            ResourceKind::MovieDetail => {
                return Err(AppError::InvalidInput(format!(
                    "{} is not a paginated resource",
                    kind
                )))
            }
        };

        Ok(resource)
    }

    /// `{kind}:page={n}` plus the canonical filter string when there is one
    pub fn cache_key(&self, page: u32, filters: &Filters) -> String {
        if filters.is_empty() {
            format!("{}:page={}", self.kind, page)
        } else {
            format!("{}:page={}:{}", self.kind, page, filters.canonical())
        }
    }

    /// Full request URL for `page` with `filters` applied.
    ///
    /// Path placeholders consume their filter; the rest become query
    /// parameters, overriding fixed values of the same name.
    pub fn build_url(&self, base_url: &str, page: u32, filters: &Filters) -> AppResult<String> {
        let mut path = String::with_capacity(self.endpoint.len());
        let mut consumed = Vec::new();
        let mut rest = self.endpoint;

        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            let value = filters
                .get(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    AppError::InvalidInput(format!("{} requires the '{}' filter", self.kind, name))
                })?;

            path.push_str(&rest[..start]);
            path.push_str(&urlencoding::encode(value));
            consumed.push(name);
            rest = &rest[start + len + 1..];
        }
        path.push_str(rest);

        let mut query = vec![format!("page={}", page)];
        for (name, value) in &self.fixed_query {
            let value = filters.get(name).unwrap_or(value.as_str());
            query.push(format!("{}={}", name, urlencoding::encode(value)));
        }
        for (name, value) in filters.iter() {
            let fixed = self.fixed_query.iter().any(|(fixed, _)| *fixed == name);
            if !fixed && !consumed.contains(&name) {
                query.push(format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                ));
            }
        }

        Ok(format!(
            "{}{}?{}",
            base_url.trim_end_matches('/'),
            path,
            query.join("&")
        ))
    }
}
