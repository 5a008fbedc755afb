use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::modules::catalog::domain::{Category, StatusDiscriminator, TmdbInfo};
use crate::shared::errors::{AppError, AppResult};

/// One playable episode on a server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_default")]
    pub link_embed: String,
    #[serde(default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_default")]
    pub link_m3u8: String,
}

impl Episode {
    pub fn has_stream(&self) -> bool {
        !self.link_m3u8.trim().is_empty()
    }
}

/// A streaming source and its episode list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(rename = "server_name", default)]
    pub name: String,
    #[serde(rename = "server_data", default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_empty")]
    pub episodes: Vec<Episode>,
}

impl Server {
    pub fn new(name: impl Into<String>, episodes: Vec<Episode>) -> Self {
        Self {
            name: name.into(),
            episodes,
        }
    }
}

/// Full movie record from `/phim/{slug}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub origin_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "type")]
    pub movie_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub thumb_url: String,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub episode_current: Option<String>,
    #[serde(default)]
    pub episode_total: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_empty")]
    pub actor: Vec<String>,
    #[serde(default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_empty")]
    pub director: Vec<String>,
    #[serde(default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_empty")]
    pub category: Vec<Category>,
    #[serde(default, deserialize_with = "crate::modules::catalog::domain::entities::null_as_empty")]
    pub country: Vec<Category>,
    #[serde(default)]
    pub tmdb: Option<TmdbInfo>,
}

impl MovieDetail {
    /// TMDB vote average, 0 when unrated
    pub fn rating(&self) -> f64 {
        self.tmdb.as_ref().map_or(0.0, |tmdb| tmdb.vote_average)
    }

    /// First category, used to look up related titles
    pub fn primary_category(&self) -> Option<&Category> {
        self.category.first()
    }
}

/// Parse `{status, msg?, movie, episodes}` into the movie and its servers
pub fn parse_movie_detail(body: Value) -> AppResult<(MovieDetail, Vec<Server>)> {
    let Value::Object(mut envelope) = body else {
        return Err(AppError::ShapeError(
            "movie detail response is not an object".to_string(),
        ));
    };

    if !StatusDiscriminator::Truthy.accepts(envelope.get("status")) {
        let message = envelope
            .get("msg")
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .unwrap_or("Failed to fetch movie detail")
            .to_string();
        return Err(AppError::ApiError(message));
    }

    let movie = match envelope.remove("movie") {
        Some(movie @ Value::Object(_)) => serde_json::from_value::<MovieDetail>(movie)
            .map_err(|e| AppError::ShapeError(format!("Invalid movie data structure: {}", e)))?,
        _ => {
            return Err(AppError::ShapeError(
                "Invalid movie data structure".to_string(),
            ))
        }
    };

    let servers = match envelope.remove("episodes") {
        None | Some(Value::Null) => Vec::new(),
        Some(episodes) => serde_json::from_value::<Vec<Server>>(episodes)
            .map_err(|e| AppError::ShapeError(format!("Invalid episode list: {}", e)))?,
    };

    Ok((movie, servers))
}
