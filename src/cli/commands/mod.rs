pub mod build;
mod command_result;
pub mod extract;
pub mod helper;
pub mod init;
pub mod merge;

pub use command_result::*;
