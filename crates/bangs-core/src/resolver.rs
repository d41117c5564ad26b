//! Parsing raw search input into bang entries and a residual query.
//!
//! ```text
//! "!gh+so borrow checker"  ->  [GitHub, StackOverflow], "borrow checker"
//! "!dev lifetimes"         ->  alias dev = "gh+so", same as above
//! ".plain search"          ->  StartsWithIgnore (caller strips '.' and uses the default)
//! "plain search"           ->  NoBang (caller uses the default)
//! ```

use tracing::debug;

use crate::{Entry, Error, Forward, Registry, Result, forward};

/// Marker that starts a bang expression.
pub const BANG_MARKER: char = '!';

/// Separator between bangs in a multi-bang expression.
pub const MULTI_BANG_SEPARATOR: char = '+';

/// Prefix that sends the rest of the input straight to the default.
pub const FORCE_DEFAULT_PREFIX: &str = "##";

/// Per-request resolution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Treat input without a leading `!` as `bang query`, and unresolvable
    /// bangs as "no bang" instead of an error.
    pub allow_no_bang: bool,
    /// Whether fan-out to several destinations is advertised. Resolution
    /// never consults it: a `+` expression or a multi-target alias always
    /// resolves to every entry it names.
    pub allow_multi_bang: bool,
    /// Leading character that skips bang parsing entirely.
    pub ignore_char: Option<char>,
}

impl ResolvePolicy {
    /// Build a policy; only the first character of `ignore_char` is used and
    /// an empty string disables it.
    pub fn new(allow_no_bang: bool, allow_multi_bang: bool, ignore_char: &str) -> Self {
        Self {
            allow_no_bang,
            allow_multi_bang,
            ignore_char: ignore_char.chars().next(),
        }
    }
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            allow_no_bang: false,
            allow_multi_bang: false,
            ignore_char: Some('.'),
        }
    }
}

/// Outcome of [`Registry::prepare_input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared<'r> {
    /// One or more resolved entries, in expression order, plus the query.
    /// Never empty.
    Bangs {
        /// Resolved entries.
        entries: Vec<&'r Entry>,
        /// Free text after the bang expression.
        query: String,
    },
    /// The input carries no usable bang; forward the whole input to the
    /// default destination.
    NoBang,
    /// The input starts with the ignore character; strip it and forward to
    /// the default destination.
    StartsWithIgnore,
}

impl Registry {
    /// Resolve raw search input against this registry.
    ///
    /// # Errors
    ///
    /// - [`Error::InputTooShort`] for input under 2 characters (empty input
    ///   always; 1 character only without `allow_no_bang`).
    /// - [`Error::MissingQuery`] when `!bang` has no following space and
    ///   `allow_no_bang` is off.
    /// - [`Error::UnknownBang`] for a token not in the table while
    ///   `allow_no_bang` is off.
    pub fn prepare_input(&self, input: &str, policy: &ResolvePolicy) -> Result<Prepared<'_>> {
        let mut chars = input.chars();
        let Some(first) = chars.next() else {
            return Err(Error::InputTooShort);
        };
        if !policy.allow_no_bang && chars.next().is_none() {
            return Err(Error::InputTooShort);
        }

        if policy.ignore_char == Some(first) {
            return Ok(Prepared::StartsWithIgnore);
        }

        let rest = if first == BANG_MARKER {
            &input[BANG_MARKER.len_utf8()..]
        } else if policy.allow_no_bang {
            input
        } else {
            return Ok(Prepared::NoBang);
        };

        let (raw_bang, query) = match rest.split_once(' ') {
            Some((bang, query)) => (bang, query),
            None if policy.allow_no_bang => ("", rest),
            None => return Err(Error::MissingQuery),
        };

        let expression = match self.aliases().get(raw_bang) {
            Some(target) => {
                debug!(alias = raw_bang, target = %target, "Resolved alias");
                target.as_str()
            },
            None => raw_bang,
        };

        let tokens: Vec<&str> = expression.split(MULTI_BANG_SEPARATOR).map(str::trim).collect();
        debug!(bangs = ?tokens, "Parsed bangs");
        let mut entries = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.bangs().lookup(token) {
                Some(entry) => entries.push(entry),
                None if policy.allow_no_bang => return Ok(Prepared::NoBang),
                None => return Err(Error::UnknownBang(token.to_string())),
            }
        }

        Ok(Prepared::Bangs {
            entries,
            query: query.to_string(),
        })
    }

    /// Resolve a search box query all the way to a redirect.
    ///
    /// Input starting with `##` skips bang parsing and goes to the default.
    /// [`Prepared::NoBang`] forwards the whole input to the default and
    /// [`Prepared::StartsWithIgnore`] forwards it minus its first character.
    pub fn search(&self, input: &str, policy: &ResolvePolicy) -> Result<Forward> {
        if let Some(rest) = input.strip_prefix(FORCE_DEFAULT_PREFIX) {
            debug!(query = rest, "Forced default prefix, forwarding to default");
            return self.default_forward(rest);
        }

        match self.prepare_input(input, policy)? {
            Prepared::Bangs { entries, query } => forward(&entries, &query),
            Prepared::NoBang => {
                debug!(query = input, "No bang found in input, forwarding to default");
                self.default_forward(input)
            },
            Prepared::StartsWithIgnore => {
                let mut chars = input.chars();
                chars.next();
                let rest = chars.as_str();
                debug!(query = rest, "Input starts with ignore character, forwarding to default");
                self.default_forward(rest)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry() -> Registry {
        Registry::from_yaml_str(
            r#"
default: "https://duckduckgo.com/?q={}"
aliases:
  dev: "gh+so"
  hub: "gh"
  chain: "dev"
Google:
  bang: g
  url: "https://www.google.com/search?q={}"
GitHub:
  bang: gh
  url: "https://github.com/search?q={}"
StackOverflow:
  bang: so
  url: "https://stackoverflow.com/search?q={}"
"#,
        )
        .unwrap()
    }

    const STRICT: ResolvePolicy = ResolvePolicy {
        allow_no_bang: false,
        allow_multi_bang: false,
        ignore_char: Some('.'),
    };

    const PERMISSIVE: ResolvePolicy = ResolvePolicy {
        allow_no_bang: true,
        allow_multi_bang: true,
        ignore_char: Some('.'),
    };

    fn bangs_of<'a, 'r>(prepared: &'a Prepared<'r>) -> (Vec<&'r str>, &'a str) {
        match prepared {
            Prepared::Bangs { entries, query } => (
                entries.iter().map(|e| e.bang.as_str()).collect(),
                query.as_str(),
            ),
            other => panic!("expected resolved bangs, got {other:?}"),
        }
    }

    #[test]
    fn test_single_bang() {
        let registry = registry();
        let prepared = registry.prepare_input("!g hello world", &STRICT).unwrap();
        assert_eq!(bangs_of(&prepared), (vec!["g"], "hello world"));
    }

    #[test]
    fn test_multi_bang_keeps_order() {
        let registry = registry();
        let prepared = registry.prepare_input("!g+gh search", &STRICT).unwrap();
        assert_eq!(bangs_of(&prepared), (vec!["g", "gh"], "search"));
    }

    #[test]
    fn test_multi_bang_resolves_under_default_policy() {
        // Given: the out-of-the-box policy
        let registry = registry();
        let policy = ResolvePolicy::default();

        // When/Then: `+` expressions and multi-target aliases fan out
        let prepared = registry.prepare_input("!g+gh search", &policy).unwrap();
        assert_eq!(bangs_of(&prepared), (vec!["g", "gh"], "search"));

        let prepared = registry.prepare_input("!dev x", &policy).unwrap();
        assert_eq!(bangs_of(&prepared), (vec!["gh", "so"], "x"));

        let prepared = registry.prepare_input("!gh+so search", &policy).unwrap();
        assert_eq!(bangs_of(&prepared), (vec!["gh", "so"], "search"));
    }

    #[test]
    fn test_alias_expands_to_multi_bang() {
        let registry = registry();
        let prepared = registry.prepare_input("!dev x", &STRICT).unwrap();
        assert_eq!(bangs_of(&prepared), (vec!["gh", "so"], "x"));

        let prepared = registry.prepare_input("!hub x y", &STRICT).unwrap();
        assert_eq!(bangs_of(&prepared), (vec!["gh"], "x y"));
    }

    #[test]
    fn test_alias_is_one_level_only() {
        let registry = registry();
        let err = registry.prepare_input("!chain x", &STRICT).unwrap_err();
        assert!(matches!(err, Error::UnknownBang(token) if token == "dev"));
    }

    #[test]
    fn test_ignore_char() {
        let registry = registry();
        assert_eq!(
            registry.prepare_input(".ignored text", &STRICT).unwrap(),
            Prepared::StartsWithIgnore
        );
        assert_eq!(
            registry.prepare_input(".ignored text", &PERMISSIVE).unwrap(),
            Prepared::StartsWithIgnore
        );

        let no_ignore = ResolvePolicy::new(false, true, "");
        assert_eq!(
            registry.prepare_input(".ignored text", &no_ignore).unwrap(),
            Prepared::NoBang
        );
    }

    #[test]
    fn test_no_bang_marker() {
        let registry = registry();
        assert_eq!(
            registry.prepare_input("plain text", &STRICT).unwrap(),
            Prepared::NoBang
        );
    }

    #[test]
    fn test_too_short() {
        let registry = registry();
        assert!(matches!(
            registry.prepare_input("!", &STRICT),
            Err(Error::InputTooShort)
        ));
        assert!(matches!(
            registry.prepare_input("", &PERMISSIVE),
            Err(Error::InputTooShort)
        ));
        // A single character is a valid query when bangs are optional
        assert_eq!(registry.prepare_input("x", &PERMISSIVE).unwrap(), Prepared::NoBang);
    }

    #[test]
    fn test_missing_query() {
        let registry = registry();
        assert!(matches!(
            registry.prepare_input("!gh", &STRICT),
            Err(Error::MissingQuery)
        ));
    }

    #[test]
    fn test_unknown_bang() {
        let registry = registry();
        let err = registry.prepare_input("!zz query", &STRICT).unwrap_err();
        assert!(matches!(err, Error::UnknownBang(token) if token == "zz"));

        let err = registry.prepare_input("!g+ query", &STRICT).unwrap_err();
        assert!(matches!(err, Error::UnknownBang(token) if token.is_empty()));
    }

    #[test]
    fn test_allow_no_bang() {
        let registry = registry();

        // Leading bang word without '!'
        let prepared = registry.prepare_input("gh borrow checker", &PERMISSIVE).unwrap();
        assert_eq!(bangs_of(&prepared), (vec!["gh"], "borrow checker"));

        // Unknown first word falls back to the default
        assert_eq!(
            registry.prepare_input("plain text", &PERMISSIVE).unwrap(),
            Prepared::NoBang
        );
        // So does a typo'd bang
        assert_eq!(
            registry.prepare_input("!zz text", &PERMISSIVE).unwrap(),
            Prepared::NoBang
        );
        // And a lone word
        assert_eq!(
            registry.prepare_input("rustlang", &PERMISSIVE).unwrap(),
            Prepared::NoBang
        );
    }

    #[test]
    fn test_multibyte_input() {
        let registry = registry();
        assert_eq!(registry.prepare_input("é", &PERMISSIVE).unwrap(), Prepared::NoBang);
        let prepared = registry.prepare_input("!g ünïcödé", &STRICT).unwrap();
        assert_eq!(bangs_of(&prepared), (vec!["g"], "ünïcödé"));
    }

    fn redirect(forward: Forward) -> String {
        match forward {
            Forward::Redirect(url) => url.to_string(),
            Forward::MultiTab(urls) => panic!("expected redirect, got {} urls", urls.len()),
        }
    }

    #[test]
    fn test_search_routes_to_bang_or_default() {
        let registry = registry();

        assert_eq!(
            redirect(registry.search("!gh arc swap", &STRICT).unwrap()),
            "https://github.com/search?q=arc+swap"
        );
        // No bang: the whole input goes to the default
        assert_eq!(
            redirect(registry.search("arc swap", &STRICT).unwrap()),
            "https://duckduckgo.com/?q=arc+swap"
        );
        // Ignore character is stripped
        assert_eq!(
            redirect(registry.search(".!gh arc", &STRICT).unwrap()),
            "https://duckduckgo.com/?q=%21gh+arc"
        );
        // Forced default
        assert_eq!(
            redirect(registry.search("##!gh arc", &STRICT).unwrap()),
            "https://duckduckgo.com/?q=%21gh+arc"
        );
    }

    #[test]
    fn test_search_multi_and_errors() {
        let registry = registry();

        match registry.search("!dev lifetimes", &STRICT).unwrap() {
            Forward::MultiTab(urls) => assert_eq!(urls.len(), 2),
            Forward::Redirect(url) => panic!("expected multi-tab, got {url}"),
        }
        assert!(matches!(
            registry.search("!nope lifetimes", &STRICT),
            Err(Error::UnknownBang(_))
        ));
        // Typo'd bang under allow-no-bang goes to the default with the raw input
        assert_eq!(
            redirect(registry.search("!nope lifetimes", &PERMISSIVE).unwrap()),
            "https://duckduckgo.com/?q=%21nope+lifetimes"
        );
    }

    proptest! {
        #[test]
        fn prop_resolved_bangs_are_never_empty(input in r"[!.a-z+ ]{0,16}", no_bang in any::<bool>()) {
            let registry = registry();
            let policy = ResolvePolicy { allow_no_bang: no_bang, ..STRICT };
            if let Ok(Prepared::Bangs { entries, .. }) = registry.prepare_input(&input, &policy) {
                prop_assert!(!entries.is_empty());
            }
        }
    }
}
