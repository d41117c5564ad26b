//! MCP tools for bangs

pub mod category;
pub mod execute;

pub use category::{
    BangInfo, CategoryOutput, GetBangsByCategoryParams, handle_get_bangs_by_category,
};
pub use execute::{
    BangResult, ExecuteBangParams, ExecuteMultiBangParams, MultiBangOutput, handle_execute_bang,
    handle_execute_multi_bang,
};
