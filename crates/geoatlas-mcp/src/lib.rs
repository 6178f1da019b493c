//! MCP (Model Context Protocol) server for static map rendering
//!
//! This module provides a stdio-based MCP server that exposes map tile
//! math, static map rendering, and place-category lookups to AI
//! assistants via the Model Context Protocol.
//!
//! # Architecture
//!
//! The MCP server is organized into the following submodules:
//! - `server`: Main server state, collaborators, and lifecycle management
//! - `tools`: Tool implementations (render_map, tile_coverage, list_place_categories)
//! - `resources`: Resource implementations (style catalogue, zoom scale, category status)
//! - `types`: Serializable tool inputs and outputs with JSON Schema derivation
//! - `error`: Error types and RFC 9457 problem details
//!
//! # Transport
//!
//! The server communicates via stdio using JSON-RPC 2.0 message format
//! as specified by the MCP specification. All logging is redirected to
//! stderr to prevent stdout protocol corruption.

pub mod error;
pub mod resources;
pub mod server;
pub mod tools;
pub mod types;

pub use error::{Error, Result};
pub use server::ServerState;
pub use tools::{ListCategoriesTool, RenderMapTool, TileCoverageTool};
