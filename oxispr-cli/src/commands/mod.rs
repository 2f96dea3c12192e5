//! Command implementations for OxiSpr CLI.

pub mod extract;
pub mod info;
pub mod list;
pub mod pack;

pub use extract::{ExtractOptions, cmd_extract};
pub use info::cmd_info;
pub use list::cmd_list;
pub use pack::cmd_pack;
pub use test::cmd_test;
