//! The loaded bang configuration.
//!
//! A [`Registry`] is built in one go from a bang file and never mutated
//! afterwards. Reloading builds a new one; [`Registry::diff`] describes what
//! changed so the reload can be logged.
//!
//! ## File format
//!
//! ```yaml
//! default: "https://duckduckgo.com/?q={}"   # or a bang reference: "g", "g+gh"
//! aliases:
//!   dev: "gh+so"
//! Google:
//!   bang: "g"
//!   url: "https://www.google.com/search?q={}"
//!   description: "Web search"
//!   category: "Search"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::forward::{Forward, forward};
use crate::{BangList, Entry, Error, QueryUrl, Result};

/// Separator between a scheme and the rest of a URL; its presence makes the
/// default a literal template.
const SCHEME_SEPARATOR: &str = "://";

/// The fallback destination used when input carries no usable bang.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultTarget {
    /// A literal URL template.
    Template(QueryUrl),
    /// One bang token or a `+`-joined list, each possibly an alias.
    Bangs(String),
}

impl DefaultTarget {
    /// Classify a raw `default` value.
    pub fn parse(raw: &str) -> Self {
        if raw.contains(SCHEME_SEPARATOR) {
            Self::Template(QueryUrl::from(raw))
        } else {
            Self::Bangs(raw.to_string())
        }
    }

    /// The raw configured value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Template(url) => url.as_str(),
            Self::Bangs(expr) => expr,
        }
    }
}

impl Default for DefaultTarget {
    fn default() -> Self {
        Self::Bangs(String::new())
    }
}

impl fmt::Display for DefaultTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated bang configuration.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    default: DefaultTarget,
    aliases: BTreeMap<String, String>,
    bangs: BangList,
}

impl Registry {
    /// Assemble a registry from already-built parts.
    pub const fn new(
        default: DefaultTarget,
        aliases: BTreeMap<String, String>,
        bangs: BangList,
    ) -> Self {
        Self {
            default,
            aliases,
            bangs,
        }
    }

    /// Read and parse a bang file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let registry = Self::from_yaml_str(&data)?;
        info!(
            file = %path.display(),
            bangs = registry.bangs.len(),
            aliases = registry.aliases.len(),
            "Loaded bang registry"
        );
        Ok(registry)
    }

    /// Parse a bang file's contents.
    ///
    /// Requires a top-level mapping with a string `default`. `aliases` is
    /// optional and must map strings to strings.
    pub fn from_yaml_str(data: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(data)?;
        let Value::Mapping(root) = root else {
            return Err(Error::Config(
                "bang file must be a mapping of names to entries".to_string(),
            ));
        };

        let default = root
            .get("default")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingField {
                name: "<root>".to_string(),
                field: "default",
            })?;

        let aliases = parse_aliases(&root)?;
        let bangs = BangList::from_mapping(&root)?;

        Ok(Self::new(DefaultTarget::parse(default), aliases, bangs))
    }

    /// The configured default destination.
    pub const fn default_target(&self) -> &DefaultTarget {
        &self.default
    }

    /// The alias table.
    pub const fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// The bang table.
    pub const fn bangs(&self) -> &BangList {
        &self.bangs
    }

    /// All entries keyed by logical name.
    pub const fn list_all_bangs(&self) -> &BTreeMap<String, Entry> {
        self.bangs.entries()
    }

    /// Resolve the default destination for `query`.
    ///
    /// A literal template is augmented directly. A bang reference is split on
    /// `+`, each token expanded through one level of aliases and looked up;
    /// any miss is [`Error::DefaultReference`] since the default is
    /// server-controlled.
    pub fn default_forward(&self, query: &str) -> Result<Forward> {
        match &self.default {
            DefaultTarget::Template(url) => Ok(Forward::Redirect(url.augment(query)?)),
            DefaultTarget::Bangs(expr) => {
                let entries = self.resolve_default_bangs(expr)?;
                debug!(
                    count = entries.len(),
                    bangs = ?entries.iter().map(|e| e.bang.as_str()).collect::<Vec<_>>(),
                    "Default bang resolution complete"
                );
                forward(&entries, query)
            },
        }
    }

    /// Check that a bang-reference default resolves against this registry.
    pub fn check_default(&self) -> Result<()> {
        match &self.default {
            DefaultTarget::Template(_) => Ok(()),
            DefaultTarget::Bangs(expr) => self.resolve_default_bangs(expr).map(|_| ()),
        }
    }

    fn resolve_default_bangs(&self, expr: &str) -> Result<Vec<&Entry>> {
        let mut entries = Vec::new();

        for token in expr.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            if let Some(target) = self.aliases.get(token) {
                debug!(alias = token, target = %target, "Resolved alias in default");
                for alias_token in target.split('+').map(str::trim).filter(|t| !t.is_empty()) {
                    let entry = self.bangs.lookup(alias_token).ok_or_else(|| {
                        Error::DefaultReference(format!(
                            "default alias '{token}' target bang '{alias_token}' not found"
                        ))
                    })?;
                    entries.push(entry);
                }
            } else {
                let entry = self.bangs.lookup(token).ok_or_else(|| {
                    Error::DefaultReference(format!("default bang reference '{token}' not found"))
                })?;
                entries.push(entry);
            }
        }

        if entries.is_empty() {
            return Err(Error::DefaultReference(
                "no valid bang references found in default".to_string(),
            ));
        }
        Ok(entries)
    }

    /// Describe how `new` differs from `self`.
    pub fn diff(&self, new: &Self) -> RegistryDiff {
        let default_changed = (self.default != new.default)
            .then(|| (self.default.to_string(), new.default.to_string()));

        let (added, changed, removed) = diff_maps(self.list_all_bangs(), new.list_all_bangs());
        let (aliases_added, aliases_changed, aliases_removed) =
            diff_maps(&self.aliases, &new.aliases);

        RegistryDiff {
            default_changed,
            added,
            changed,
            removed,
            aliases_added,
            aliases_changed,
            aliases_removed,
        }
    }
}

fn parse_aliases(root: &Mapping) -> Result<BTreeMap<String, String>> {
    let Some(value) = root.get("aliases") else {
        return Ok(BTreeMap::new());
    };
    match value {
        Value::Null => Ok(BTreeMap::new()),
        Value::Mapping(_) => Ok(serde_yaml::from_value(value.clone())?),
        _ => Err(Error::Config(
            "aliases must be a mapping of alias to bang expression".to_string(),
        )),
    }
}

fn diff_maps<V: PartialEq>(
    old: &BTreeMap<String, V>,
    new: &BTreeMap<String, V>,
) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut added = Vec::new();
    let mut changed = Vec::new();
    for (key, new_value) in new {
        match old.get(key) {
            None => added.push(key.clone()),
            Some(old_value) if old_value != new_value => changed.push(key.clone()),
            Some(_) => {},
        }
    }
    let removed = old
        .keys()
        .filter(|key| !new.contains_key(*key))
        .cloned()
        .collect();
    (added, changed, removed)
}

/// Changes between two registries, by logical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryDiff {
    /// `(old, new)` default values when the default changed.
    pub default_changed: Option<(String, String)>,
    /// Bang entries present only in the new registry.
    pub added: Vec<String>,
    /// Bang entries whose definition changed.
    pub changed: Vec<String>,
    /// Bang entries present only in the old registry.
    pub removed: Vec<String>,
    /// Aliases present only in the new registry.
    pub aliases_added: Vec<String>,
    /// Aliases whose target changed.
    pub aliases_changed: Vec<String>,
    /// Aliases present only in the old registry.
    pub aliases_removed: Vec<String>,
}

impl RegistryDiff {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.default_changed.is_none()
            && self.added.is_empty()
            && self.changed.is_empty()
            && self.removed.is_empty()
            && self.aliases_added.is_empty()
            && self.aliases_changed.is_empty()
            && self.aliases_removed.is_empty()
    }

    /// Emit the diff through `tracing`.
    pub fn log(&self) {
        if let Some((old, new)) = &self.default_changed {
            info!(%old, %new, "Default bang changed");
        }
        for name in &self.added {
            debug!(%name, "Added bang entry");
        }
        for name in &self.changed {
            debug!(%name, "Changed bang entry");
        }
        for name in &self.removed {
            debug!(%name, "Removed bang entry");
        }
        for alias in &self.aliases_added {
            debug!(%alias, "Added alias");
        }
        for alias in &self.aliases_changed {
            debug!(%alias, "Changed alias");
        }
        for alias in &self.aliases_removed {
            debug!(%alias, "Removed alias");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    const BANGS: &str = r#"
default: "https://duckduckgo.com/?q={}"
aliases:
  dev: "gh+so"
Google:
  bang: g
  url: "https://www.google.com/search?q={}"
GitHub:
  bang: gh
  url: "https://github.com/search?q={}"
StackOverflow:
  bang: so
  url: "https://stackoverflow.com/search?q={}"
"#;

    fn registry_with_default(default: &str) -> Registry {
        let mut registry = Registry::from_yaml_str(BANGS).unwrap();
        registry.default = DefaultTarget::parse(default);
        registry
    }

    fn redirect_url(forward: Forward) -> String {
        match forward {
            Forward::Redirect(url) => url.to_string(),
            Forward::MultiTab(urls) => panic!("expected redirect, got {} urls", urls.len()),
        }
    }

    #[test]
    fn test_from_yaml_str() {
        let registry = Registry::from_yaml_str(BANGS).unwrap();

        assert_eq!(
            registry.default_target(),
            &DefaultTarget::Template(QueryUrl::from("https://duckduckgo.com/?q={}"))
        );
        assert_eq!(registry.aliases().get("dev").map(String::as_str), Some("gh+so"));
        assert_eq!(registry.list_all_bangs().len(), 3);
        assert_eq!(registry.bangs().lookup("gh").unwrap().name, "GitHub");
    }

    #[test]
    fn test_from_yaml_str_requires_default() {
        let err = Registry::from_yaml_str("Google:\n  bang: g\n  url: \"https://g.co/?q={}\"\n")
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "default", .. }));
    }

    #[test]
    fn test_from_yaml_str_rejects_non_mapping() {
        assert!(matches!(
            Registry::from_yaml_str("- a\n- b\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Registry::from_yaml_str("default: [unclosed"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn test_from_yaml_str_rejects_bad_aliases() {
        let err = Registry::from_yaml_str("default: g\naliases: nope\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_target_parse() {
        assert!(matches!(
            DefaultTarget::parse("https://example.com/?q={}"),
            DefaultTarget::Template(_)
        ));
        assert_eq!(DefaultTarget::parse("g+gh"), DefaultTarget::Bangs("g+gh".to_string()));
    }

    #[test]
    fn test_default_forward_template() {
        let registry = registry_with_default("https://www.google.com/search?q={}");
        let url = redirect_url(registry.default_forward("test query").unwrap());
        assert_eq!(url, "https://www.google.com/search?q=test+query");
    }

    #[test]
    fn test_default_forward_single_bang() {
        let registry = registry_with_default("g");
        let url = redirect_url(registry.default_forward("test query").unwrap());
        assert_eq!(url, "https://www.google.com/search?q=test+query");
    }

    #[test]
    fn test_default_forward_multi_bang_with_spaces() {
        let registry = registry_with_default("g + gh + so");
        match registry.default_forward("test query").unwrap() {
            Forward::MultiTab(urls) => {
                let hosts: Vec<_> = urls.iter().filter_map(|u| u.host_str()).collect();
                assert_eq!(hosts, ["www.google.com", "github.com", "stackoverflow.com"]);
            },
            Forward::Redirect(url) => panic!("expected multi-tab, got {url}"),
        }
    }

    #[test]
    fn test_default_forward_alias_expands_inline() {
        let registry = registry_with_default("g+dev");
        match registry.default_forward("x").unwrap() {
            Forward::MultiTab(urls) => assert_eq!(urls.len(), 3),
            Forward::Redirect(url) => panic!("expected multi-tab, got {url}"),
        }
    }

    #[test]
    fn test_default_forward_unknown_bang_is_server_error() {
        let registry = registry_with_default("invalid");
        let err = registry.default_forward("test query").unwrap_err();
        assert!(matches!(err, Error::DefaultReference(_)));
        assert_eq!(err.status_code(), 500);
        assert!(registry.check_default().is_err());
    }

    #[test]
    fn test_default_forward_empty_reference() {
        let registry = registry_with_default(" + ");
        assert!(matches!(
            registry.default_forward("q"),
            Err(Error::DefaultReference(_))
        ));
    }

    #[test]
    fn test_default_forward_template_without_placeholder() {
        let registry = registry_with_default("https://example.com/");
        let err = registry.default_forward("q").unwrap_err();
        assert!(matches!(err, Error::NoPlaceholder));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_diff() {
        // Given: a new registry that changes one entry, adds one, removes one
        let old = Registry::from_yaml_str(BANGS).unwrap();
        let new = Registry::from_yaml_str(
            r#"
default: g
aliases:
  dev: "gh"
  docs: "rs"
Google:
  bang: g
  url: "https://www.google.com/search?q={}"
GitHub:
  bang: gh
  url: "https://github.com/search?type=code&q={}"
Docs:
  bang: rs
  url: "https://docs.rs/{}"
"#,
        )
        .unwrap();

        // When
        let diff = old.diff(&new);

        // Then
        assert_eq!(
            diff.default_changed,
            Some(("https://duckduckgo.com/?q={}".to_string(), "g".to_string()))
        );
        assert_eq!(diff.added, ["Docs"]);
        assert_eq!(diff.changed, ["GitHub"]);
        assert_eq!(diff.removed, ["StackOverflow"]);
        assert_eq!(diff.aliases_added, ["docs"]);
        assert_eq!(diff.aliases_changed, ["dev"]);
        assert!(diff.aliases_removed.is_empty());
        assert!(!diff.is_empty());
        assert!(old.diff(&old).is_empty());
    }
}
