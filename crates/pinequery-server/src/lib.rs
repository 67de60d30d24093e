//! PineQuery HTTP Server
//!
//! Exposes query parsing, filtered record search and RAG answers over HTTP.

mod handlers;
mod protocol;
mod server;

pub use protocol::{
    DocumentSearchResponse, ErrorResponse, QueryParsedResponse, QueryRequest, RagResponse,
    SearchRequest,
};
pub use server::{router, start_server, AppState};
