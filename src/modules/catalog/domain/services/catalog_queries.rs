//! Local queries over lists a store already holds. None of these hit the network.

use crate::modules::catalog::domain::entities::{Category, MovieItem};

pub const POPULAR_CATEGORY_SLUGS: [&str; 6] = [
    "hanh-dong",
    "hai-huoc",
    "tinh-cam",
    "kinh-di",
    "phieu-luu",
    "vo-thuat",
];

const FEATURED_LIMIT: usize = 10;
const FEATURED_MIN_ANIMATION: usize = 5;

pub fn movies_by_category<'a>(movies: &'a [MovieItem], category_slug: &str) -> Vec<&'a MovieItem> {
    movies
        .iter()
        .filter(|movie| movie.has_category(category_slug))
        .collect()
}

pub fn movies_by_year(movies: &[MovieItem], year: i32) -> Vec<&MovieItem> {
    movies
        .iter()
        .filter(|movie| movie.year == Some(year))
        .collect()
}

/// Case-insensitive match on name or original name; a blank query matches everything
pub fn search_local<'a>(movies: &'a [MovieItem], query: &str) -> Vec<&'a MovieItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return movies.iter().collect();
    }

    movies
        .iter()
        .filter(|movie| {
            movie.name.to_lowercase().contains(&query)
                || movie.origin_name.to_lowercase().contains(&query)
        })
        .collect()
}

pub fn category_by_slug<'a>(categories: &'a [Category], slug: &str) -> Option<&'a Category> {
    categories.iter().find(|category| category.slug == slug)
}

pub fn popular_categories(categories: &[Category]) -> Vec<&Category> {
    categories
        .iter()
        .filter(|category| POPULAR_CATEGORY_SLUGS.contains(&category.slug.as_str()))
        .collect()
}

/// Carousel selection: animation first, topped up with other titles when
/// fewer than five animation entries are available.
pub fn featured(movies: &[MovieItem]) -> Vec<MovieItem> {
    let (animation, others): (Vec<&MovieItem>, Vec<&MovieItem>) =
        movies.iter().partition(|movie| movie.is_animation());

    let selection: Vec<&MovieItem> = if animation.len() < FEATURED_MIN_ANIMATION {
        animation.into_iter().chain(others).collect()
    } else {
        animation
    };

    selection
        .into_iter()
        .take(FEATURED_LIMIT)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(slug: &str, name: &str, year: i32, categories: &[(&str, &str)]) -> MovieItem {
        MovieItem {
            id: slug.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            origin_name: format!("{} origin", name),
            year: Some(year),
            category: categories
                .iter()
                .map(|(name, slug)| Category::new(*name, *slug))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn filters_by_category_and_year() {
        let movies = vec![
            movie("a", "Alpha", 2023, &[("Hành Động", "hanh-dong")]),
            movie("b", "Beta", 2024, &[("Hài Hước", "hai-huoc")]),
        ];

        assert_eq!(movies_by_category(&movies, "hanh-dong")[0].slug, "a");
        assert_eq!(movies_by_year(&movies, 2024)[0].slug, "b");
        assert!(movies_by_year(&movies, 1999).is_empty());
    }

    #[test]
    fn local_search_matches_origin_name_case_insensitively() {
        let movies = vec![movie("a", "Alpha", 2023, &[]), movie("b", "Beta", 2024, &[])];

        let found = search_local(&movies, "  BETA ORIGIN ");
        assert_eq!(found.len(), 1);
        assert_eq!(search_local(&movies, "").len(), 2);
    }

    #[test]
    fn popular_categories_keep_only_known_slugs() {
        let categories = vec![
            Category::new("Hành Động", "hanh-dong"),
            Category::new("Tài Liệu", "tai-lieu"),
        ];

        let popular = popular_categories(&categories);
        assert_eq!(popular.len(), 1);
        assert_eq!(category_by_slug(&categories, "tai-lieu").unwrap().name, "Tài Liệu");
    }

    #[test]
    fn featured_tops_up_scarce_animation() {
        let anime = [("Hoạt Hình", "hoat-hinh")];
        let mut movies: Vec<MovieItem> = (0..12)
            .map(|i| movie(&format!("m{}", i), "Movie", 2024, &[]))
            .collect();
        movies.push(movie("anime", "Anime", 2024, &anime));

        let picked = featured(&movies);
        assert_eq!(picked.len(), 10);
        assert_eq!(picked[0].slug, "anime");
    }

    #[test]
    fn featured_prefers_animation_when_plentiful() {
        let anime = [("Hoạt Hình", "hoat-hinh")];
        let mut movies: Vec<MovieItem> = vec![movie("plain", "Plain", 2024, &[])];
        movies.extend((0..6).map(|i| movie(&format!("a{}", i), "Anime", 2024, &anime)));

        let picked = featured(&movies);
        assert_eq!(picked.len(), 6);
        assert!(picked.iter().all(MovieItem::is_animation));
    }
}
