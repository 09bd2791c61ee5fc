//! Free-text query normalization into an FTS5 match expression.

use super::sql::{SqlFragment, SqlParam};

/// Terms beyond this many are dropped before matching.
pub const MAX_QUERY_TERMS: usize = 6;

/// Token window for the proximity branch of a multi-term query.
pub const NEAR_DISTANCE: usize = 10;

/// A sanitized full-text query. No terms means no text filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextQuery {
    terms: Vec<String>,
}

impl TextQuery {
    /// Trim, split on whitespace, keep the first `MAX_QUERY_TERMS` tokens,
    /// strip double quotes, and drop tokens left empty.
    pub fn parse(raw: &str) -> Self {
        let terms = raw
            .split_whitespace()
            .take(MAX_QUERY_TERMS)
            .map(|token| token.replace('"', ""))
            .filter(|token| !token.is_empty())
            .collect();
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The FTS5 expression for these terms.
    ///
    /// One term is a plain quoted string. Several terms require all of them
    /// and add a `NEAR` group so rows with the terms close together score
    /// higher under bm25.
    pub fn match_expression(&self) -> Option<String> {
        let quoted: Vec<String> = self.terms.iter().map(|t| format!("\"{t}\"")).collect();
        match quoted.len() {
            0 => None,
            1 => Some(quoted[0].clone()),
            _ => Some(format!(
                "NEAR({}, {NEAR_DISTANCE}) OR ({})",
                quoted.join(" "),
                quoted.join(" AND ")
            )),
        }
    }

    /// `<fts_table> MATCH ?` with the expression bound, or `None` when the
    /// query matches everything.
    pub fn to_fragment(&self, fts_table: &str) -> Option<SqlFragment> {
        self.match_expression().map(|expr| {
            SqlFragment::new(format!("{fts_table} MATCH ?"), vec![SqlParam::Text(expr)])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_match_everything() {
        assert!(TextQuery::parse("").is_empty());
        assert!(TextQuery::parse("   \t\n ").is_empty());
        assert_eq!(TextQuery::parse("  ").match_expression(), None);
        assert!(TextQuery::parse("").to_fragment("recipes_fts").is_none());
    }

    #[test]
    fn test_single_term_is_quoted() {
        let q = TextQuery::parse("  pasta ");
        assert_eq!(q.match_expression().unwrap(), "\"pasta\"");
    }

    #[test]
    fn test_quotes_are_stripped() {
        assert_eq!(TextQuery::parse("\"pasta\""), TextQuery::parse("pasta"));
        assert_eq!(TextQuery::parse("pa\"st\"a").terms(), ["pasta"]);
    }

    #[test]
    fn test_only_quotes_is_empty() {
        let q = TextQuery::parse("\" \"\" \"\"\"");
        assert!(q.is_empty());
        assert!(q.match_expression().is_none());
    }

    #[test]
    fn test_truncates_to_six_terms() {
        let q = TextQuery::parse("a b c d e f g h");
        assert_eq!(q.terms(), ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(q, TextQuery::parse("a b c d e f zzz"));
    }

    #[test]
    fn test_multi_term_builds_proximity_expression() {
        let q = TextQuery::parse("chicken pasta");
        assert_eq!(
            q.match_expression().unwrap(),
            "NEAR(\"chicken\" \"pasta\", 10) OR (\"chicken\" AND \"pasta\")"
        );
    }

    #[test]
    fn test_fragment_binds_expression() {
        let fragment = TextQuery::parse("garlic bread").to_fragment("recipes_fts").unwrap();
        assert_eq!(fragment.sql, "recipes_fts MATCH ?");
        assert_eq!(fragment.params.len(), 1);
        match &fragment.params[0] {
            SqlParam::Text(expr) => assert!(expr.contains("\"garlic\"")),
            other => panic!("expected text param, got {other:?}"),
        }
    }

    #[test]
    fn test_fts_operators_stay_inside_quotes() {
        let expr = TextQuery::parse("OR NOT *").match_expression().unwrap();
        assert!(expr.starts_with("NEAR(\"OR\" \"NOT\" \"*\""));
    }
}
