//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes configuration, catalogs and translation to AI assistants over
//! stdio.
//!
//! ## Module Structure
//!
//! - `server`: Tool router and server entry point
//! - `types`: Tool parameter and result types

mod server;
pub mod types;

pub use server::{PoglotMcpServer, run_server};
