//! # bangs-core
//!
//! The bang-resolution engine behind the `bangs` redirector.
//!
//! A "bang" is a short token such as `!gh` at the start of a search query.
//! This crate resolves it to a destination URL template, substitutes the rest
//! of the query into that template, and describes the redirect the HTTP
//! layer should send.
//!
//! ## Architecture
//!
//! - **Templates** ([`QueryUrl`]): placeholder substitution with per-component escaping
//! - **Bang table** ([`BangList`]): entries indexed by name and by bang token
//! - **Registry** ([`Registry`]): default destination, aliases and bang table from one file
//! - **Resolver** ([`Registry::prepare_input`]): raw input to entries plus query
//! - **Forwarder** ([`forward()`], [`Registry::default_forward`]): entries to redirects
//! - **Manager** ([`BangsManager`]): the active registry and atomic reloads
//!
//! ## Quick Start
//!
//! ```rust
//! use bangs_core::{Forward, Prepared, Registry, ResolvePolicy, forward};
//!
//! let registry = Registry::from_yaml_str(r#"
//! default: "https://duckduckgo.com/?q={}"
//! GitHub:
//!   bang: gh
//!   url: "https://github.com/search?q={}"
//! "#)?;
//!
//! let policy = ResolvePolicy::default();
//! let redirect = match registry.prepare_input("!gh arc swap", &policy)? {
//!     Prepared::Bangs { entries, query } => forward(&entries, &query)?,
//!     Prepared::NoBang | Prepared::StartsWithIgnore => registry.default_forward("arc swap")?,
//! };
//!
//! assert_eq!(
//!     redirect,
//!     Forward::Redirect("https://github.com/search?q=arc+swap".parse().unwrap())
//! );
//! # Ok::<(), bangs_core::Error>(())
//! ```

/// Bang entries and the bang table
pub mod bangs;
/// Error types and result aliases
pub mod error;
/// Redirect instructions for resolved entries
pub mod forward;
/// Active registry ownership and reloads
pub mod manager;
/// URL templates and query substitution
pub mod query_url;
/// The loaded bang configuration
pub mod registry;
/// Input parsing and bang resolution
pub mod resolver;

pub use bangs::{BangList, Entry};
pub use error::{Error, Result};
pub use forward::{Forward, forward};
pub use manager::BangsManager;
pub use query_url::{PLACEHOLDER, QueryUrl};
pub use registry::{DefaultTarget, Registry, RegistryDiff};
pub use resolver::{Prepared, ResolvePolicy};
