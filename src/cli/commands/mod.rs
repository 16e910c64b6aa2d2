//! One module per subcommand, each exposing an `execute` function.

pub mod add;
pub mod clear;
pub mod completions;
pub mod delete;
pub mod get;
pub mod list;
pub mod vault_create;
pub mod vault_delete;
pub mod vault_list;
