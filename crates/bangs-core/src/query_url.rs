//! URL templates with a query placeholder.
//!
//! A [`QueryUrl`] is a plain string such as `https://github.com/search?q={}`.
//! It is not validated when constructed; [`QueryUrl::augment`] parses it and
//! substitutes the user's query into the path, query string and fragment,
//! escaping it for each of those components. Scheme, host and user-info are
//! never templated.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::{Url, form_urlencoded};

use crate::{Error, Result};

/// Literal token marking where the query is inserted.
pub const PLACEHOLDER: &str = "{}";

/// The placeholder as the URL parser leaves it in a path.
const PATH_PLACEHOLDER: &str = "%7B%7D";

/// Characters escaped in a single path segment.
///
/// Unreserved characters plus `$&+:=@` stay literal; `/`, `;`, `,` and `?`
/// are escaped so the query stays inside one segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// A URL template containing zero or more [`PLACEHOLDER`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryUrl(String);

impl QueryUrl {
    /// Wrap a template string.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The raw template.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute `query` into the template.
    ///
    /// Every placeholder in the path is replaced with the path-segment
    /// escaped query; every placeholder in the raw query string and the
    /// fragment is replaced with the form-encoded query (space becomes `+`).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if the template does not parse.
    /// - [`Error::NoPlaceholder`] if none of path, query or fragment holds
    ///   the placeholder.
    ///
    /// ```rust
    /// use bangs_core::QueryUrl;
    ///
    /// let url = QueryUrl::from("https://www.google.com/search?q={}")
    ///     .augment("rust lang")?;
    /// assert_eq!(url.as_str(), "https://www.google.com/search?q=rust+lang");
    /// # Ok::<(), bangs_core::Error>(())
    /// ```
    pub fn augment(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&self.0)?;
        let mut found = false;

        let path = url.path();
        if path.contains(PATH_PLACEHOLDER) || path.contains(PLACEHOLDER) {
            let escaped = utf8_percent_encode(query, PATH_SEGMENT).to_string();
            let replaced = path
                .replace(PATH_PLACEHOLDER, &escaped)
                .replace(PLACEHOLDER, &escaped);
            url.set_path(&replaced);
            found = true;
        }

        if let Some(raw_query) = url.query().filter(|q| q.contains(PLACEHOLDER)) {
            let replaced = raw_query.replace(PLACEHOLDER, &form_escape(query));
            url.set_query(Some(&replaced));
            found = true;
        }

        if let Some(fragment) = url.fragment().filter(|f| f.contains(PLACEHOLDER)) {
            let replaced = fragment.replace(PLACEHOLDER, &form_escape(query));
            url.set_fragment(Some(&replaced));
            found = true;
        }

        if !found {
            return Err(Error::NoPlaceholder);
        }

        Ok(url)
    }
}

fn form_escape(query: &str) -> String {
    form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

impl fmt::Display for QueryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueryUrl {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for QueryUrl {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_augment_query_string() {
        let url = QueryUrl::from("https://www.google.com/search?q={}")
            .augment("test query")
            .unwrap();
        assert_eq!(url.as_str(), "https://www.google.com/search?q=test+query");
    }

    #[test]
    fn test_augment_escapes_query_specials() {
        let url = QueryUrl::from("https://example.com/?q={}&lang=en")
            .augment("a&b=c+d")
            .unwrap();
        assert_eq!(url.query(), Some("q=a%26b%3Dc%2Bd&lang=en"));
    }

    #[test]
    fn test_augment_path() {
        let url = QueryUrl::from("https://pkg.go.dev/{}")
            .augment("net/http")
            .unwrap();
        assert_eq!(url.as_str(), "https://pkg.go.dev/net%2Fhttp");

        let url = QueryUrl::from("https://en.wikipedia.org/wiki/{}")
            .augment("Rust language")
            .unwrap();
        assert_eq!(url.path(), "/wiki/Rust%20language");
    }

    #[test]
    fn test_augment_fragment() {
        let url = QueryUrl::from("https://doc.rust-lang.org/std/#{}")
            .augment("vec new")
            .unwrap();
        assert_eq!(url.fragment(), Some("vec+new"));
    }

    #[test]
    fn test_augment_all_components_and_repeats() {
        // Given: placeholders in every templated component, one repeated
        let template = QueryUrl::from("https://example.com/{}/x?a={}&b={}#{}");

        // When
        let url = template.augment("q r").unwrap();

        // Then: every occurrence receives the same escaped query
        assert_eq!(url.path(), "/q%20r/x");
        assert_eq!(url.query(), Some("a=q+r&b=q+r"));
        assert_eq!(url.fragment(), Some("q+r"));
    }

    #[test]
    fn test_augment_no_placeholder() {
        let err = QueryUrl::from("https://example.com/search")
            .augment("x")
            .unwrap_err();
        assert!(matches!(err, Error::NoPlaceholder));
    }

    #[test]
    fn test_augment_placeholder_in_userinfo_or_host_is_rejected() {
        for template in ["https://{}@example.com/", "https://{}.example.com/search"] {
            let err = QueryUrl::from(template).augment("x").unwrap_err();
            assert!(
                matches!(err, Error::NoPlaceholder),
                "{template} should not be templated, got {err:?}"
            );
        }
    }

    #[test]
    fn test_augment_parse_error_is_distinct() {
        let err = QueryUrl::from("not a url {}").augment("x").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err = QueryUrl::from("").augment("x").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_augment_empty_query() {
        let url = QueryUrl::from("https://example.com/?q={}")
            .augment("")
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/?q=");
    }

    #[test]
    fn test_serde_is_transparent() {
        let url: QueryUrl = serde_json::from_str("\"https://x.dev/?q={}\"").unwrap();
        assert_eq!(url.as_str(), "https://x.dev/?q={}");
        assert_eq!(
            serde_json::to_string(&url).unwrap(),
            "\"https://x.dev/?q={}\""
        );
    }

    proptest! {
        #[test]
        fn prop_query_component_round_trips(query in r"\PC{0,40}") {
            let url = QueryUrl::from("https://example.com/search?q={}")
                .augment(&query)
                .unwrap();
            let decoded = url
                .query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.into_owned());
            prop_assert_eq!(decoded, Some(query));
        }

        #[test]
        fn prop_augment_is_idempotent(query in r"\PC{0,40}") {
            let template = QueryUrl::from("https://example.com/s/{}?q={}#{}");
            let first = template.augment(&query).unwrap();
            let second = template.augment(&query).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(template.as_str(), "https://example.com/s/{}?q={}#{}");
        }

        #[test]
        fn prop_userinfo_placeholder_never_templated(query in r"\PC{0,40}") {
            let result = QueryUrl::from("https://{}:{}@example.com/path").augment(&query);
            prop_assert!(matches!(result, Err(Error::NoPlaceholder)));
        }
    }
}
