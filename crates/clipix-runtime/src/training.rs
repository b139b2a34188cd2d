use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use clipix_memory::ingest::{Document, read_document, scan_documents};

use crate::assistant::Assistant;

/// Outcome of training on one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub category: String,
    pub facts: usize,
    /// Set when the document could not be read; its facts count is 0.
    pub error: Option<String>,
}

/// Outcome of a document training run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrainingReport {
    pub documents: Vec<DocumentReport>,
    pub facts_added: usize,
}

impl Assistant {
    /// Documents found in the training folder.
    pub fn training_documents(&self) -> clipix_core::Result<Vec<Document>> {
        scan_documents(self.documents_dir())
    }

    /// Extract facts from every document in the training folder and save.
    pub fn train_from_documents(&self) -> clipix_core::Result<TrainingReport> {
        let docs = self.training_documents()?;
        self.train_documents(&docs, |_| {})
    }

    /// Extract facts from `docs`, calling `progress` after each one, then
    /// save once. A document that fails to read is reported and skipped.
    pub fn train_documents(
        &self,
        docs: &[Document],
        mut progress: impl FnMut(&DocumentReport),
    ) -> clipix_core::Result<TrainingReport> {
        let mut report = TrainingReport::default();

        for doc in docs {
            let entry = match read_document(doc) {
                Ok(facts) => {
                    let added = self
                        .store_mut()
                        .insert_many(&doc.category, facts.iter().map(String::as_str));
                    report.facts_added += added;
                    DocumentReport {
                        path: doc.path.clone(),
                        category: doc.category.clone(),
                        facts: added,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(path = %doc.path.display(), error = %e, "skipping document");
                    DocumentReport {
                        path: doc.path.clone(),
                        category: doc.category.clone(),
                        facts: 0,
                        error: Some(e.to_string()),
                    }
                }
            };
            progress(&entry);
            report.documents.push(entry);
        }

        if !docs.is_empty() {
            self.store_mut().save()?;
        }
        info!(
            documents = report.documents.len(),
            facts = report.facts_added,
            "training complete"
        );
        Ok(report)
    }
}
