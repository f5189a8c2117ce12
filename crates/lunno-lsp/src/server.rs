//! Tower-lsp backend for the Lunno language server.
//!
//! Implements:
//! - textDocument/didOpen, didChange, didClose (diagnostics)
//! - textDocument/completion (declared names, built-ins, keywords)

use std::collections::HashMap;
use std::sync::Mutex;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::analysis;
use crate::completion;

/// The Lunno LSP backend.
///
/// Documents are stored as their latest full text, keyed by URI. Every
/// request re-runs the pipeline on that text.
pub struct LunnoBackend {
    client: Client,
    documents: Mutex<HashMap<String, String>>,
}

impl LunnoBackend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Store the new text, analyze it, and publish diagnostics.
    async fn analyze_and_publish(&self, uri: Url, source: String) {
        let uri_str = uri.to_string();
        let diagnostics = analysis::analyze_document(&uri_str, &source).diagnostics;

        match self.documents.lock() {
            Ok(mut docs) => {
                docs.insert(uri_str, source);
            }
            Err(_) => log::warn!("Document store poisoned; change to {} not recorded", uri),
        }

        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }

    fn document(&self, uri: &Url) -> Option<String> {
        let docs = self.documents.lock().ok()?;
        docs.get(uri.as_str()).cloned()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LunnoBackend {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: None,
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "lunno-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Lunno LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let source = params.text_document.text;
        self.analyze_and_publish(uri, source).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        // Full sync: the first change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().next() {
            self.analyze_and_publish(uri, change.text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        if let Ok(mut docs) = self.documents.lock() {
            docs.remove(params.text_document.uri.as_str());
        }
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(source) = self.document(uri) else {
            return Ok(None);
        };
        let analysis = analysis::analyze_document(uri.as_str(), &source);
        let items = completion::compute_completions(&source, &analysis.program, &position);
        if items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CompletionResponse::Array(items)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn server_capabilities() {
        let (service, _) = tower_lsp::LspService::new(LunnoBackend::new);
        let server = service.inner();
        let result = server
            .initialize(InitializeParams::default())
            .await
            .unwrap();

        let caps = result.capabilities;
        assert_eq!(
            caps.text_document_sync,
            Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL))
        );
        assert!(caps.completion_provider.is_some());
        assert!(caps.hover_provider.is_none());
        assert_eq!(
            result.server_info.map(|info| info.name),
            Some("lunno-lsp".to_string())
        );
    }

    #[tokio::test]
    async fn completion_for_unknown_document_is_empty() {
        let (service, _) = tower_lsp::LspService::new(LunnoBackend::new);
        let server = service.inner();
        let params = CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier {
                    uri: Url::parse("file:///missing.ln").unwrap(),
                },
                position: Position::new(0, 0),
            },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: None,
        };
        assert_eq!(server.completion(params).await.unwrap(), None);
    }
}
