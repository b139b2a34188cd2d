//! Turning text documents into facts.
//!
//! Documents live under a training folder; the folder a file sits in names
//! its category (`documents/science/physics.md` → `science`).

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

use clipix_core::ClipixError;

/// Category folders created by [`setup_folders`].
pub const DEFAULT_FOLDERS: &[&str] = &[
    "technology",
    "science",
    "history",
    "mathematics",
    "literature",
    "general",
];

const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md"];

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

/// A training file and the category its facts go under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub category: String,
}

/// Whether a candidate is worth storing: 20 to 500 characters and at least
/// five words.
pub fn is_meaningful(text: &str) -> bool {
    let len = text.chars().count();
    (20..=500).contains(&len) && text.split_whitespace().count() >= 5
}

/// Pull facts out of a document body.
///
/// Paragraphs are separated by blank lines. Paragraphs under 50 characters
/// are skipped; ones over 200 are split into sentences, each judged on its
/// own.
pub fn extract_facts(content: &str) -> Vec<String> {
    let mut facts = Vec::new();
    for paragraph in PARAGRAPH_BREAK.split(content) {
        let paragraph = paragraph.trim();
        let len = paragraph.chars().count();
        if len < 50 {
            continue;
        }
        if len > 200 {
            facts.extend(
                SENTENCE_END
                    .split(paragraph)
                    .map(str::trim)
                    .filter(|s| is_meaningful(s))
                    .map(String::from),
            );
        } else if is_meaningful(paragraph) {
            facts.push(paragraph.to_string());
        }
    }
    facts
}

/// Find every `.txt` and `.md` file under `dir`, sorted by path.
///
/// A missing directory yields no documents. Symlinked directories are
/// skipped.
pub fn scan_documents(dir: &Path) -> clipix_core::Result<Vec<Document>> {
    let mut docs = Vec::new();
    if dir.is_dir() {
        walk(dir, &mut docs)?;
    }
    docs.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(dir = %dir.display(), count = docs.len(), "scanned documents");
    Ok(docs)
}

fn walk(dir: &Path, docs: &mut Vec<Document>) -> clipix_core::Result<()> {
    let category = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(&path, docs)?;
            continue;
        }
        let is_document = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| DOCUMENT_EXTENSIONS.contains(&e));
        if is_document {
            docs.push(Document {
                path,
                category: category.clone(),
            });
        }
    }
    Ok(())
}

/// Read one document and extract its facts.
pub fn read_document(doc: &Document) -> clipix_core::Result<Vec<String>> {
    let content = std::fs::read_to_string(&doc.path).map_err(|e| ClipixError::Ingest {
        path: doc.path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(extract_facts(&content))
}

/// Create the training folder and its default category folders.
pub fn setup_folders(dir: &Path) -> clipix_core::Result<()> {
    std::fs::create_dir_all(dir)?;
    for folder in DEFAULT_FOLDERS {
        std::fs::create_dir_all(dir.join(folder))?;
    }
    Ok(())
}
