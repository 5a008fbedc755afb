use serde::{Deserialize, Serialize};

use super::category::Category;

/// TMDB metadata attached to a catalog entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TmdbInfo {
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

/// Movie as it appears in list endpoints (latest, anime, search, related)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieItem {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub origin_name: String,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub thumb_url: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, rename = "type")]
    pub movie_type: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub episode_current: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub category: Vec<Category>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub country: Vec<Category>,
    #[serde(default)]
    pub tmdb: Option<TmdbInfo>,
}

impl MovieItem {
    pub fn has_category(&self, slug: &str) -> bool {
        self.category.iter().any(|category| category.slug == slug)
    }

    /// Animation entries, recognized by category name or slug
    pub fn is_animation(&self) -> bool {
        self.category.iter().any(|category| {
            let name = category.name.to_lowercase();
            name.contains("hoạt hình") || name.contains("anime") || category.slug == "hoat-hinh"
        })
    }

    pub fn rating(&self) -> f64 {
        self.tmdb.as_ref().map_or(0.0, |tmdb| tmdb.vote_average)
    }
}
