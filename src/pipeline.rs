use anyhow::Result;
use std::fmt::Write;
use std::sync::Arc;

use crate::config::{LlmConfig, RetrievalConfig};
use crate::llm::{completion, embeddings};
use crate::models::ScoredDocument;
use crate::store::DocumentStore;

/// Instructional template filled with the context block and the question.
/// Domain framing stays in Portuguese: the corpus and the users are both
/// CEMIG technicians working with REN 1000/2021.
const PROMPT_TEMPLATE: &str = "[INSTRUÇÕES]

Contexto:
- Você é especialista em regulamentação da REN 1000/2021 e tarifas de energia.
- Explique com clareza, adaptando a resposta para técnicos da CEMIG com conhecimento não especializado.

Documentos:
{context}

Pergunta:
{query}

Resposta:
";

/// The fixed answer pipeline: retrieve, format, prompt, complete.
///
/// Constructed once at startup, only when both the document store and the
/// completion provider are available. Read-only afterwards.
pub struct RagPipeline {
    store: Arc<DocumentStore>,
    http_client: reqwest::Client,
    llm: LlmConfig,
    retrieval: RetrievalConfig,
}

impl RagPipeline {
    pub fn new(
        store: Arc<DocumentStore>,
        http_client: reqwest::Client,
        llm: LlmConfig,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            http_client,
            llm,
            retrieval,
        }
    }

    /// Answer one question. Every failure along the chain propagates to the
    /// caller; the connection handler is the only error boundary.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let query_embedding =
            embeddings::embed_single(&self.http_client, &self.llm, question).await?;

        let hits = self.store.search(
            &query_embedding,
            self.retrieval.top_k,
            self.retrieval.min_score,
        );
        tracing::debug!("Retrieved {} documents for question", hits.len());

        let context = format_documents(&hits);
        let prompt = fill_template(&context, question);

        completion::complete(&self.http_client, &self.llm, &prompt).await
    }
}

/// Concatenate retrieved documents into the context block, one
/// source/content pair per document, separated by blank lines.
pub fn format_documents(hits: &[ScoredDocument]) -> String {
    let mut out = String::new();
    for (i, hit) in hits.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        write!(
            out,
            "Fonte: {}\nConteúdo: {}",
            hit.document.source_label(),
            hit.document.content
        )
        .unwrap();
    }
    out
}

fn fill_template(context: &str, question: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{context}", context)
        .replace("{query}", question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;

    fn hit(content: &str, source: Option<&str>) -> ScoredDocument {
        ScoredDocument {
            document: Document {
                content: content.into(),
                source: source.map(String::from),
            },
            score: 0.9,
        }
    }

    // ─── Context block ───────────────────────────────────

    #[test]
    fn test_format_single_document() {
        let ctx = format_documents(&[hit("texto do artigo", Some("REN 1000/2021, art. 5"))]);
        assert_eq!(ctx, "Fonte: REN 1000/2021, art. 5\nConteúdo: texto do artigo");
    }

    #[test]
    fn test_format_separates_with_blank_lines() {
        let ctx = format_documents(&[hit("a", Some("f1")), hit("b", Some("f2"))]);
        assert_eq!(ctx, "Fonte: f1\nConteúdo: a\n\nFonte: f2\nConteúdo: b");
    }

    #[test]
    fn test_format_missing_source_uses_sentinel() {
        let ctx = format_documents(&[hit("sem origem", None)]);
        assert!(ctx.contains("Fonte: desconhecida"));
    }

    #[test]
    fn test_format_empty_hits() {
        assert_eq!(format_documents(&[]), "");
    }

    // ─── Template ────────────────────────────────────────

    #[test]
    fn test_fill_template_substitutes_both_slots() {
        let prompt = fill_template("CONTEXTO AQUI", "qual a tarifa branca?");
        assert!(prompt.contains("CONTEXTO AQUI"));
        assert!(prompt.contains("qual a tarifa branca?"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{query}"));
    }

    #[test]
    fn test_template_keeps_domain_framing() {
        let prompt = fill_template("", "");
        assert!(prompt.contains("REN 1000/2021"));
        assert!(prompt.contains("CEMIG"));
    }
}
