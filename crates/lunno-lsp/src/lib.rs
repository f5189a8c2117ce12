//! Lunno Language Server Protocol implementation.
//!
//! - **Diagnostics**: lexical, syntax and type errors published on open and
//!   change
//! - **Completion**: declared names, built-ins and keywords
//!
//! The server speaks JSON-RPC over stdin/stdout via `tower-lsp`.

pub mod analysis;
pub mod completion;
pub mod server;

use tower_lsp::{LspService, Server};

use server::LunnoBackend;

/// Run the Lunno LSP server on stdin/stdout until the client disconnects.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(LunnoBackend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
