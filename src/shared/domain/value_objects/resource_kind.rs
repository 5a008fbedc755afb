use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog resources served by the phimapi API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Recently updated movies (home page list)
    #[serde(rename = "latest-movies")]
    LatestMovies,
    /// Animation listing
    #[serde(rename = "anime")]
    Anime,
    /// Korean drama series
    #[serde(rename = "korean-series")]
    KoreanSeries,
    /// Genre list; near-static
    #[serde(rename = "categories")]
    Categories,
    /// Keyword search results
    #[serde(rename = "search")]
    Search,
    /// Autocomplete suggestions for the search box
    #[serde(rename = "search-suggestions")]
    SearchSuggestions,
    /// Movies sharing a category with the one being viewed
    #[serde(rename = "related")]
    Related,
    /// Single movie with its episode servers
    #[serde(rename = "movie-detail")]
    MovieDetail,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::LatestMovies => "latest-movies",
            ResourceKind::Anime => "anime",
            ResourceKind::KoreanSeries => "korean-series",
            ResourceKind::Categories => "categories",
            ResourceKind::Search => "search",
            ResourceKind::SearchSuggestions => "search-suggestions",
            ResourceKind::Related => "related",
            ResourceKind::MovieDetail => "movie-detail",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
