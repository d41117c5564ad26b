//! Error types and handling for bangs-core operations.
//!
//! One error enum covers loading the bang file, templating URLs and
//! resolving user input. Each variant carries enough context to produce a
//! plain-text HTTP response, and [`Error::status_code`] maps it to the status
//! the redirect service commits to.
//!
//! ## Error Categories
//!
//! - **Load errors**: I/O, YAML, missing fields, empty or duplicate bangs
//! - **Template errors**: unparsable URL, no placeholder
//! - **Input errors**: input too short, no query, unknown bang
//! - **Default errors**: the server-controlled default names an unknown bang
//!
//! "No bang" and "starts with the ignore character" are not errors. They are
//! variants of [`crate::Prepared`] that callers must branch on.
//!
//! ```rust
//! use bangs_core::{Error, QueryUrl};
//!
//! let template = QueryUrl::from("https://example.com/");
//! match template.augment("rust") {
//!     Err(e @ Error::NoPlaceholder) => assert_eq!(e.status_code(), 400),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use thiserror::Error;

/// The main error type for bangs-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the bang definition file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The bang definition file is not valid YAML or has the wrong shape.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A bang entry (or the top level) lacks a required field.
    #[error("missing {field} field for entry '{name}'")]
    MissingField {
        /// Logical name of the entry, or `<root>` for top-level keys.
        name: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A bang entry has a bang token that is empty after trimming.
    #[error("bang field is empty for entry '{name}'")]
    EmptyBang {
        /// Logical name of the offending entry.
        name: String,
    },

    /// Two entries share the same (trimmed) bang token.
    #[error("duplicate bang '{bang}' for '{name}', already used by '{existing}'")]
    DuplicateBang {
        /// The shared bang token.
        bang: String,
        /// Entry that was being inserted.
        name: String,
        /// Entry that already owns the token.
        existing: String,
    },

    /// Any other structural problem in the bang file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A URL template could not be parsed as a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A URL template has no placeholder in path, query or fragment.
    #[error("no placeholder found in path, query, or fragment")]
    NoPlaceholder,

    /// Input is too short to hold a bang and a query.
    #[error("input is shorter than 2 characters, which is not valid")]
    InputTooShort,

    /// Input has a bang but no space separating it from a query.
    #[error("input does not contain a bang and a query")]
    MissingQuery,

    /// The user referenced a bang that is not in the table.
    #[error("unknown bang: '{0}'")]
    UnknownBang(String),

    /// The configured default references a bang that does not resolve.
    #[error("default reference error: {0}")]
    DefaultReference(String),
}

impl Error {
    /// Whether the failure was caused by what the user typed rather than by
    /// the server's configuration.
    ///
    /// ```rust
    /// use bangs_core::Error;
    ///
    /// assert!(Error::UnknownBang("zz".into()).is_user_error());
    /// assert!(!Error::DefaultReference("zz".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NoPlaceholder
                | Self::InputTooShort
                | Self::MissingQuery
                | Self::UnknownBang(_)
        )
    }

    /// Whether the failure happened while parsing the search input itself,
    /// before any template was touched.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputTooShort | Self::MissingQuery | Self::UnknownBang(_)
        )
    }

    /// Stable category identifier for log fields.
    ///
    /// - `"io"`, `"yaml"`, `"config"` - loading the bang file
    /// - `"template"` - URL templating
    /// - `"input"` - user input
    /// - `"default"` - default destination resolution
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Yaml(_) => "yaml",
            Self::MissingField { .. }
            | Self::EmptyBang { .. }
            | Self::DuplicateBang { .. }
            | Self::Config(_) => "config",
            Self::InvalidUrl(_) | Self::NoPlaceholder => "template",
            Self::InputTooShort
            | Self::MissingQuery
            | Self::UnknownBang(_) => "input",
            Self::DefaultReference(_) => "default",
        }
    }

    /// HTTP status code used when this error ends a redirect request.
    ///
    /// `UnknownBang` maps to 404, which is what a direct path-style lookup
    /// reports; the query route downgrades it to 400 itself.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NoPlaceholder | Self::InputTooShort | Self::MissingQuery => 400,
            Self::UnknownBang(_) => 404,
            Self::Io(_)
            | Self::Yaml(_)
            | Self::MissingField { .. }
            | Self::EmptyBang { .. }
            | Self::DuplicateBang { .. }
            | Self::Config(_)
            | Self::InvalidUrl(_)
            | Self::DefaultReference(_) => 500,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Convenience type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
