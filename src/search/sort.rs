use std::str::FromStr;

/// Requested result ordering. Unknown keys fall back to relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Relevance,
    Rating,
    MinutesAsc,
    MinutesDesc,
    Popularity,
}

impl SortKey {
    /// Lenient, case-insensitive parse; never fails.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse::<SortKey>().ok())
            .unwrap_or_default()
    }

    /// The single ORDER BY key. Relevance sorts ascending because bm25
    /// scores are negative with the best match lowest.
    pub fn order_clause(self) -> &'static str {
        match self {
            SortKey::Rating => "r.rating DESC",
            SortKey::MinutesAsc => "r.minutes ASC",
            SortKey::MinutesDesc => "r.minutes DESC",
            SortKey::Popularity => "r.popularity DESC",
            SortKey::Relevance => "score ASC",
        }
    }
}

impl FromStr for SortKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rating" => Ok(SortKey::Rating),
            "minutes-asc" => Ok(SortKey::MinutesAsc),
            "minutes-desc" => Ok(SortKey::MinutesDesc),
            "popularity" => Ok(SortKey::Popularity),
            "relevance" => Ok(SortKey::Relevance),
            _ => Err(()),
        }
    }
}
