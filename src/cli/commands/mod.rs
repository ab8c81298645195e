//! One module per subcommand.

pub mod add;
pub mod delete;
pub mod generate;
pub mod init;
pub mod list;
pub mod reset;
pub mod view;
