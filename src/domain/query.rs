use std::fmt;

/// A case-insensitive search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    text: String,
    needle: String,
}

impl Term {
    /// Creates a term from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQuery`] if nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self, EmptyQuery> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(EmptyQuery);
        }
        Ok(Self {
            text: text.to_string(),
            needle: text.to_lowercase(),
        })
    }

    /// Parses a comma separated list of terms.
    ///
    /// Blank entries are dropped, so `"gin,, lime"` yields two terms.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQuery`] if the list holds no non-blank entries.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, EmptyQuery> {
        let terms: Vec<_> = raw.split(',').filter_map(|t| Self::new(t).ok()).collect();
        if terms.is_empty() {
            return Err(EmptyQuery);
        }
        Ok(terms)
    }

    /// The term as entered, minus surrounding whitespace.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The lowercase form used for matching.
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A search was attempted with nothing to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search term must not be empty")]
pub struct EmptyQuery;

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn term_is_trimmed_and_lowercased() {
        let term = Term::new("  White RUM ").unwrap();
        assert_eq!(term.as_str(), "White RUM");
        assert_eq!(term.needle(), "white rum");
    }

    #[test]
    fn blank_term_is_rejected() {
        assert_eq!(Term::new(" \t"), Err(EmptyQuery));
    }

    #[test_case("gin,lime", &["gin", "lime"]; "simple")]
    #[test_case(" gin , lime ", &["gin", "lime"]; "padded")]
    #[test_case("gin,,lime,", &["gin", "lime"]; "blank entries dropped")]
    #[test_case("Gin", &["Gin"]; "single")]
    fn parses_lists(raw: &str, expected: &[&str]) {
        let terms = Term::parse_list(raw).unwrap();
        let texts: Vec<_> = terms.iter().map(Term::as_str).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn list_of_blanks_is_rejected() {
        assert_eq!(Term::parse_list(" , ,"), Err(EmptyQuery));
    }
}
