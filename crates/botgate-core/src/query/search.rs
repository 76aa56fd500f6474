//! Free-text search term normalization.
//!
//! Search compares lexemes, not substrings: the raw term is split on every
//! non-alphanumeric character and lowercased, and a row matches when its name
//! contains every lexeme. The storage layer indexes names with the same
//! tokenization.

/// Normalized search criterion for a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Empty input: every row matches.
    Any,
    /// Lexemes that must all appear in the name. An empty list (input made
    /// only of separators) matches nothing.
    Lexemes(Vec<String>),
}

impl SearchTerm {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return SearchTerm::Any;
        }

        let lexemes = raw
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect();

        SearchTerm::Lexemes(lexemes)
    }

    /// Whether this term can match any row at all.
    pub fn is_satisfiable(&self) -> bool {
        match self {
            SearchTerm::Any => true,
            SearchTerm::Lexemes(lexemes) => !lexemes.is_empty(),
        }
    }

    /// Full-text match expression with each lexeme quoted as a literal token,
    /// or `None` when no expression applies.
    ///
    /// Lexemes are alphanumeric only, so quoting cannot be broken out of.
    pub fn match_expression(&self) -> Option<String> {
        match self {
            SearchTerm::Any => None,
            SearchTerm::Lexemes(lexemes) if lexemes.is_empty() => None,
            SearchTerm::Lexemes(lexemes) => Some(
                lexemes
                    .iter()
                    .map(|l| format!("\"{l}\""))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matches_everything() {
        assert_eq!(SearchTerm::parse(""), SearchTerm::Any);
        assert!(SearchTerm::Any.is_satisfiable());
        assert_eq!(SearchTerm::Any.match_expression(), None);
    }

    #[test]
    fn test_tokenizes_and_lowercases() {
        let term = SearchTerm::parse("Weather-Bot  Alerts");
        assert_eq!(
            term,
            SearchTerm::Lexemes(vec![
                "weather".to_string(),
                "bot".to_string(),
                "alerts".to_string()
            ])
        );
        assert_eq!(
            term.match_expression().as_deref(),
            Some("\"weather\" \"bot\" \"alerts\"")
        );
    }

    #[test]
    fn test_strips_query_syntax() {
        let term = SearchTerm::parse("name\" OR 1=1 --");
        assert_eq!(
            term.match_expression().as_deref(),
            Some("\"name\" \"or\" \"1\" \"1\"")
        );
    }

    #[test]
    fn test_separators_only_matches_nothing() {
        let term = SearchTerm::parse("  --- ");
        assert!(!term.is_satisfiable());
        assert_eq!(term.match_expression(), None);
    }
}
