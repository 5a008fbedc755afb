/// Test data factories using builder pattern
///
/// Provides catalog items and API envelopes with sensible defaults
use phim_lib::modules::catalog::{Category, MovieItem, TmdbInfo};
use phim_lib::modules::watch::{Episode, Server};
use serde_json::{json, Value};

pub struct MovieFactory {
    id: String,
    name: String,
    slug: String,
    origin_name: String,
    year: Option<i32>,
    categories: Vec<Category>,
    vote_average: Option<f64>,
}

impl Default for MovieFactory {
    fn default() -> Self {
        let n = rand::random::<u32>() % 1_000_000;
        Self {
            id: format!("id-{}", n),
            name: "Test Movie".to_string(),
            slug: format!("test-movie-{}", n),
            origin_name: "Test Movie Origin".to_string(),
            year: Some(2024),
            categories: Vec::new(),
            vote_average: None,
        }
    }
}

impl MovieFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Movie whose id, name and slug all derive from `slug`
    pub fn slug(slug: &str) -> Self {
        Self::default()
            .with_slug(slug)
            .with_id(&format!("id-{}", slug))
            .with_name(&slug.replace('-', " "))
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = slug.to_string();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_category(mut self, name: &str, slug: &str) -> Self {
        self.categories.push(Category::new(name, slug));
        self
    }

    pub fn with_rating(mut self, vote_average: f64) -> Self {
        self.vote_average = Some(vote_average);
        self
    }

    pub fn build(self) -> MovieItem {
        MovieItem {
            id: self.id,
            name: self.name,
            slug: self.slug,
            origin_name: self.origin_name,
            year: self.year,
            category: self.categories,
            tmdb: self.vote_average.map(|vote_average| TmdbInfo {
                vote_average,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// The movie as the API would send it
    pub fn json(self) -> Value {
        serde_json::to_value(self.build()).unwrap_or(Value::Null)
    }
}

pub fn movies_json(slugs: &[&str]) -> Vec<Value> {
    slugs.iter().map(|slug| MovieFactory::slug(slug).json()).collect()
}

/// `{status: true, data: {items, params: {pagination}}}`
pub fn listing(items: Vec<Value>, current_page: u32, total_items: u64, per_page: u32) -> Value {
    json!({
        "status": true,
        "data": {
            "items": items,
            "params": {
                "pagination": {
                    "totalItems": total_items,
                    "totalItemsPerPage": per_page,
                    "currentPage": current_page,
                    "totalPages": (total_items as f64 / per_page as f64).ceil() as u32
                }
            }
        }
    })
}

/// Search envelopes answer `"success"` instead of `true`
pub fn search_listing(items: Vec<Value>, current_page: u32, total_items: u64) -> Value {
    let mut body = listing(items, current_page, total_items, 20);
    body["status"] = json!("success");
    body
}

pub fn categories_json(slugs: &[(&str, &str)]) -> Value {
    Value::Array(
        slugs
            .iter()
            .map(|(name, slug)| json!({"_id": slug, "name": name, "slug": slug}))
            .collect(),
    )
}

pub fn episode(slug: &str) -> Episode {
    Episode {
        name: slug.to_uppercase(),
        slug: slug.to_string(),
        filename: format!("{}.mp4", slug),
        link_embed: format!("https://embed.example/{}", slug),
        link_m3u8: format!("https://cdn.example/{}/index.m3u8", slug),
    }
}

pub fn server(name: &str, episodes: &[&str]) -> Server {
    Server::new(name, episodes.iter().map(|slug| episode(slug)).collect())
}

/// `/phim/{slug}` response
pub fn movie_detail_body(slug: &str, servers: &[Server]) -> Value {
    json!({
        "status": true,
        "msg": "",
        "movie": {
            "_id": format!("id-{}", slug),
            "name": slug,
            "slug": slug,
            "content": "Plot",
            "category": [{"_id": "c1", "name": "Hành Động", "slug": "hanh-dong"}],
            "tmdb": {"type": "movie", "id": "42", "vote_average": 7.2, "vote_count": 10}
        },
        "episodes": servers
    })
}
