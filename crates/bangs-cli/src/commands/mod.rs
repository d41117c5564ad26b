//! Command implementations for the bangs CLI

mod check;
mod list;
mod resolve;
mod serve;

pub use check::execute as check_file;
pub use list::execute as list_bangs;
pub use resolve::execute as resolve_query;
pub use serve::execute as serve;
