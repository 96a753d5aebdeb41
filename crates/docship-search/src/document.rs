//! Search document extraction from generated JSON page fragments.
//!
//! The site generator's JSON builder writes one `.fjson` file per page.
//! Each fragment with a title becomes one [`SearchDocument`]; untitled
//! fragments (generated index pages, orphans) are skipped. Extraction is
//! streaming: documents are yielded one at a time so an arbitrarily large
//! build never sits in memory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SearchError;
use crate::html::heading_texts;

/// File extension of the generator's per-page JSON fragments.
const FRAGMENT_EXT: &str = "fjson";

/// One flat, indexable document derived from a page fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Version slug the page belongs to.
    pub version: String,
    /// Page title.
    pub title: String,
    /// Title of the first breadcrumb ancestor, empty for top-level pages.
    pub parent_title: String,
    /// Page location relative to the version root, e.g. "guide/install.html".
    pub slug: String,
    /// Raw body HTML.
    pub html: String,
    /// Plain text of `<h1>` headings.
    #[serde(default)]
    pub h1: Vec<String>,
    /// Plain text of `<h2>` headings.
    #[serde(default)]
    pub h2: Vec<String>,
    /// Plain text of `<h3>` headings.
    #[serde(default)]
    pub h3: Vec<String>,
}

/// The fields docship reads from a page fragment.
#[derive(Debug, Deserialize)]
struct Fragment {
    #[serde(default)]
    title: Option<String>,
    current_page_name: String,
    #[serde(default)]
    parents: Vec<FragmentParent>,
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
struct FragmentParent {
    title: String,
}

impl Fragment {
    fn into_document(self, version: &str) -> Option<SearchDocument> {
        let title = match self.title {
            Some(title) if !title.is_empty() => title,
            _ => return None,
        };

        let parent_title = self
            .parents
            .first()
            .map(|parent| parent.title.clone())
            .unwrap_or_default();

        Some(SearchDocument {
            version: version.to_owned(),
            title,
            parent_title,
            slug: format!("{}.html", self.current_page_name),
            h1: heading_texts(&self.body, 1),
            h2: heading_texts(&self.body, 2),
            h3: heading_texts(&self.body, 3),
            html: self.body,
        })
    }
}

/// Stream every indexable document under a build folder.
///
/// Walks the tree lazily; fragments without a title are skipped with a
/// debug log, unreadable or malformed fragments surface as errors.
pub fn build_documents(version: &str, build_folder: &Path) -> DocumentIter {
    DocumentIter {
        version: version.to_owned(),
        pending_dirs: vec![build_folder.to_path_buf()],
        pending_files: Vec::new(),
    }
}

/// Lazy iterator over a build folder's search documents.
pub struct DocumentIter {
    version: String,
    pending_dirs: Vec<PathBuf>,
    pending_files: Vec<PathBuf>,
}

impl DocumentIter {
    /// Queue one directory's entries, fragments and subdirectories alike.
    fn read_dir(&mut self, dir: &Path) -> Result<(), SearchError> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                self.pending_dirs.push(path);
            } else if path.extension().is_some_and(|ext| ext == FRAGMENT_EXT) {
                self.pending_files.push(path);
            }
        }
        Ok(())
    }

    fn parse(&self, path: &Path) -> Result<Option<SearchDocument>, SearchError> {
        let content = fs::read_to_string(path)?;
        let fragment: Fragment = serde_json::from_str(&content)?;
        let document = fragment.into_document(&self.version);
        if document.is_none() {
            debug!("skipping untitled fragment {}", path.display());
        }
        Ok(document)
    }
}

impl Iterator for DocumentIter {
    type Item = Result<SearchDocument, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(file) = self.pending_files.pop() {
                match self.parse(&file) {
                    Ok(Some(document)) => return Some(Ok(document)),
                    Ok(None) => {}
                    Err(err) => return Some(Err(err)),
                }
            } else if let Some(dir) = self.pending_dirs.pop() {
                if let Err(err) = self.read_dir(&dir) {
                    return Some(Err(err));
                }
            } else {
                return None;
            }
        }
    }
}
