//! MCP resources for bangs
//!
//! Exposes the live registry via the custom `bangs://` URI scheme, with a
//! `resource://bangs/...` fallback for clients that reject custom schemes.

pub mod categories;
pub mod registry;

pub use categories::{CATEGORIES_URI, handle_categories_resource};
pub use registry::{REGISTRY_URI, handle_registry_resource};
