//! Bang entries and the bang table.
//!
//! The table is indexed twice: by logical name (the key in the bang file,
//! used for listing) and by bang token (used for every lookup on the request
//! path). Both indices hold the same immutable [`Entry`] values.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::{Error, QueryUrl, Result};

/// Top-level keys of the bang file that are configuration, not bangs.
pub const RESERVED_KEYS: [&str; 2] = ["default", "aliases"];

/// A single bang definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Logical name, the key of the entry in the bang file.
    pub name: String,
    /// Trimmed, non-empty token typed after `!`.
    pub bang: String,
    /// Destination template.
    pub url: QueryUrl,
    /// Free-form description shown in listings.
    #[serde(default)]
    pub description: String,
    /// Free-form grouping shown in listings.
    #[serde(default)]
    pub category: String,
}

impl Entry {
    /// Create an entry with empty description and category.
    pub fn new(name: impl Into<String>, bang: impl Into<String>, url: impl Into<QueryUrl>) -> Self {
        Self {
            name: name.into(),
            bang: bang.into(),
            url: url.into(),
            description: String::new(),
            category: String::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// The bang table.
#[derive(Debug, Clone, Default)]
pub struct BangList {
    by_name: BTreeMap<String, Entry>,
    by_bang: HashMap<String, Entry>,
}

impl BangList {
    /// Build a table from ready-made entries.
    ///
    /// Bang tokens are trimmed. Fails on an empty token or a token already
    /// used by an earlier entry.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self> {
        let mut list = Self::default();
        for entry in entries {
            list.insert(entry)?;
        }
        Ok(list)
    }

    /// Build a table from the top-level mapping of a bang file.
    ///
    /// The reserved keys `default` and `aliases` are skipped, as is any value
    /// that is not itself a mapping, since aliases share the top-level
    /// namespace with bangs.
    pub fn from_mapping(mapping: &Mapping) -> Result<Self> {
        let mut list = Self {
            by_name: BTreeMap::new(),
            by_bang: HashMap::with_capacity(mapping.len()),
        };

        for (key, value) in mapping {
            let name = key
                .as_str()
                .ok_or_else(|| Error::Config(format!("entry key {key:?} is not a string")))?;
            if RESERVED_KEYS.contains(&name) {
                continue;
            }
            let Value::Mapping(fields) = value else {
                continue;
            };

            let bang = string_field(fields, "bang").ok_or_else(|| Error::MissingField {
                name: name.to_string(),
                field: "bang",
            })?;
            let url = string_field(fields, "url").ok_or_else(|| Error::MissingField {
                name: name.to_string(),
                field: "url",
            })?;

            let entry = Entry {
                name: name.to_string(),
                bang: bang.to_string(),
                url: QueryUrl::from(url),
                description: string_field(fields, "description").unwrap_or_default().to_string(),
                category: string_field(fields, "category").unwrap_or_default().to_string(),
            };
            list.insert(entry)?;
        }

        Ok(list)
    }

    /// Trim the bang token and add the entry to both indices.
    fn insert(&mut self, mut entry: Entry) -> Result<()> {
        let bang = entry.bang.trim();
        if bang.is_empty() {
            return Err(Error::EmptyBang { name: entry.name });
        }
        if let Some(existing) = self.by_bang.get(bang) {
            return Err(Error::DuplicateBang {
                bang: bang.to_string(),
                name: entry.name,
                existing: existing.name.clone(),
            });
        }
        if self.by_name.contains_key(&entry.name) {
            return Err(Error::Config(format!("duplicate entry name '{}'", entry.name)));
        }
        entry.bang = bang.to_string();

        self.by_bang.insert(entry.bang.clone(), entry.clone());
        self.by_name.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Look up an entry by bang token through the hash index.
    pub fn lookup(&self, bang: &str) -> Option<&Entry> {
        self.by_bang.get(bang)
    }

    /// Look up an entry by bang token with a linear scan over all entries.
    ///
    /// Baseline for the lookup benchmark; the hash index wins even for small
    /// tables, so nothing on the request path uses this.
    pub fn lookup_linear(&self, bang: &str) -> Option<&Entry> {
        self.by_name.values().find(|entry| entry.bang == bang)
    }

    /// Look up an entry by logical name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.by_name.get(name)
    }

    /// All entries keyed by logical name.
    pub const fn entries(&self) -> &BTreeMap<String, Entry> {
        &self.by_name
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.by_name.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn string_field<'a>(fields: &'a Mapping, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}
