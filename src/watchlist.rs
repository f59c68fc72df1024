//! Search, sort and review editing over an in-memory watchlist.

use std::cmp::Ordering;

use jiff::Timestamp;

use crate::models::{Movie, Review};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOrder {
    /// Newest first, by id.
    #[default]
    Date,
    TitleAsc,
    TitleDesc,
    RatingHigh,
    RatingLow,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Date,
        SortOrder::TitleAsc,
        SortOrder::TitleDesc,
        SortOrder::RatingHigh,
        SortOrder::RatingLow,
    ];

    pub fn as_code(self) -> &'static str {
        match self {
            SortOrder::Date => "date",
            SortOrder::TitleAsc => "title-asc",
            SortOrder::TitleDesc => "title-desc",
            SortOrder::RatingHigh => "rating-high",
            SortOrder::RatingLow => "rating-low",
        }
    }

    /// Unknown codes fall back to [`SortOrder::Date`].
    pub fn from_code(code: &str) -> Self {
        Self::ALL.into_iter().find(|o| o.as_code() == code).unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Date => "Sort by Date",
            SortOrder::TitleAsc => "Title (A-Z)",
            SortOrder::TitleDesc => "Title (Z-A)",
            SortOrder::RatingHigh => "Rating (High-Low)",
            SortOrder::RatingLow => "Rating (Low-High)",
        }
    }

    pub fn compare(self, a: &Movie, b: &Movie) -> Ordering {
        match self {
            SortOrder::Date => b.id.cmp(&a.id),
            SortOrder::TitleAsc => a.title.cmp(&b.title),
            SortOrder::TitleDesc => b.title.cmp(&a.title),
            SortOrder::RatingHigh => b.rating.total_cmp(&a.rating),
            SortOrder::RatingLow => a.rating.total_cmp(&b.rating),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ViewMode {
    #[default]
    Poster,
    List,
}

impl ViewMode {
    pub fn as_code(self) -> &'static str {
        match self {
            ViewMode::Poster => "poster",
            ViewMode::List => "list",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "poster" => Some(ViewMode::Poster),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }
}

/// Case-insensitive substring match against title, actors or description.
pub fn matches(movie: &Movie, term: &str) -> bool {
    let term = term.to_lowercase();
    [&movie.title, &movie.actors, &movie.description]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Movies matching `term`, ordered by `order`. The sort is stable, so ties
/// keep the order the API returned them in.
pub fn filter_and_sort<'a>(movies: &'a [Movie], term: &str, order: SortOrder) -> Vec<&'a Movie> {
    let term = term.trim();
    let mut out: Vec<&Movie> =
        movies.iter().filter(|m| term.is_empty() || matches(m, term)).collect();
    out.sort_by(|a, b| order.compare(a, b));
    out
}

/// The record with a new review appended, stamped with `now` in the same
/// millisecond UTC form a browser produces. `None` for blank text.
pub fn append_review(movie: &Movie, text: &str, now: Timestamp) -> Option<Movie> {
    if text.trim().is_empty() {
        return None;
    }
    let mut updated = movie.clone();
    updated.reviews.push(Review { text: text.to_string(), date: format!("{now:.3}") });
    Some(updated)
}

/// The record without the review at `index`; unchanged if out of range.
pub fn remove_review(movie: &Movie, index: usize) -> Movie {
    let mut updated = movie.clone();
    if index < updated.reviews.len() {
        updated.reviews.remove(index);
    }
    updated
}

pub fn actor_names(actors: &str) -> Vec<&str> {
    actors.split(',').map(str::trim).filter(|name| !name.is_empty()).collect()
}

/// Letter shown on the gradient placeholder when a movie has no poster.
pub fn poster_initial(title: &str) -> String {
    title.chars().next().map(String::from).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i32, title: &str, rating: f64) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            description: String::new(),
            plot: String::new(),
            actors: String::new(),
            rating,
            reviews: Vec::new(),
            poster_url: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn ids(movies: &[&Movie]) -> Vec<i32> {
        movies.iter().map(|m| m.id).collect()
    }

    fn sample() -> Vec<Movie> {
        vec![
            movie(3, "alien", 8.5),
            movie(2, "Zodiac", 7.7),
            movie(1, "Blade Runner", 10.0),
            movie(4, "Arrival", 9.0),
        ]
    }

    #[test]
    fn date_order_is_id_descending() {
        let movies = sample();
        assert_eq!(ids(&filter_and_sort(&movies, "", SortOrder::Date)), vec![4, 3, 2, 1]);
    }

    #[test]
    fn title_order_is_lexicographic() {
        let movies = sample();
        let asc = filter_and_sort(&movies, "", SortOrder::TitleAsc);
        let titles: Vec<&str> = asc.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Arrival", "Blade Runner", "Zodiac", "alien"]);

        let desc = filter_and_sort(&movies, "", SortOrder::TitleDesc);
        assert_eq!(ids(&desc), vec![3, 2, 1, 4]);
    }

    #[test]
    fn rating_order_is_numeric() {
        // 10.0 sorts above 9.0 even though "10" < "9" as text.
        let movies = sample();
        assert_eq!(ids(&filter_and_sort(&movies, "", SortOrder::RatingHigh)), vec![1, 4, 3, 2]);
        assert_eq!(ids(&filter_and_sort(&movies, "", SortOrder::RatingLow)), vec![2, 3, 4, 1]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let movies = vec![movie(5, "Same", 7.0), movie(9, "Same", 7.0), movie(1, "Same", 7.0)];
        assert_eq!(ids(&filter_and_sort(&movies, "", SortOrder::TitleAsc)), vec![5, 9, 1]);
        assert_eq!(ids(&filter_and_sort(&movies, "", SortOrder::RatingHigh)), vec![5, 9, 1]);
    }

    #[test]
    fn search_covers_title_actors_and_description() {
        let mut movies = sample();
        movies[1].actors = "Jake Gyllenhaal, Mark Ruffalo".into();
        movies[2].description = "Replicants on the RUN".into();

        assert_eq!(ids(&filter_and_sort(&movies, "ALIEN", SortOrder::Date)), vec![3]);
        assert_eq!(ids(&filter_and_sort(&movies, "ruffalo", SortOrder::Date)), vec![2]);
        assert_eq!(ids(&filter_and_sort(&movies, "run", SortOrder::Date)), vec![1]);
        assert!(filter_and_sort(&movies, "nothing like this", SortOrder::Date).is_empty());
        assert_eq!(filter_and_sort(&movies, "   ", SortOrder::Date).len(), 4);
    }

    #[test]
    fn sort_codes() {
        for order in SortOrder::ALL {
            assert_eq!(SortOrder::from_code(order.as_code()), order);
        }
        assert_eq!(SortOrder::from_code("bogus"), SortOrder::Date);
        assert_eq!(ViewMode::from_code("list"), Some(ViewMode::List));
        assert_eq!(ViewMode::from_code("grid"), None);
    }

    #[test]
    fn appending_a_review_stamps_it() {
        let now: Timestamp = "2024-01-01T00:00:00Z".parse().unwrap();
        let updated = append_review(&movie(1, "Dune", 8.5), "Great", now).unwrap();
        assert_eq!(
            updated.reviews,
            vec![Review { text: "Great".into(), date: "2024-01-01T00:00:00.000Z".into() }]
        );
        assert!(append_review(&updated, "  \n", now).is_none());
    }

    #[test]
    fn removing_a_review_by_position() {
        let mut m = movie(1, "Dune", 8.5);
        m.reviews = ["a", "b", "c"]
            .into_iter()
            .map(|t| Review { text: t.into(), date: String::new() })
            .collect();

        let removed = remove_review(&m, 1);
        let texts: Vec<&str> = removed.reviews.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert_eq!(remove_review(&m, 3), m);
    }

    #[test]
    fn cast_and_placeholder() {
        assert_eq!(
            actor_names(" Zendaya ,Timothée Chalamet,, "),
            vec!["Zendaya", "Timothée Chalamet"]
        );
        assert!(actor_names("").is_empty());
        assert_eq!(poster_initial("Élite"), "É");
        assert_eq!(poster_initial(""), "");
    }
}
