//! # Feedback Store
//!
//! The in-memory document plus its persistence. All reads hand out
//! clones; all writes go through [`FeedbackStore::mutate`], which owns
//! the clone-apply-persist-commit sequence.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use verdex_core::{Correction, CorrectionId, CorrectionKind, CorrectionStatus, NewCorrection};

use crate::error::FeedbackError;

/// On-disk shape of the feedback file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackDocument {
    /// Entries of kind `correction` only. This list feeds evaluation
    /// prompts once entries reach `implemented`.
    #[serde(default)]
    pub corrections: Vec<Correction>,
    /// Every submission, regardless of kind.
    #[serde(default)]
    pub feedback: Vec<Correction>,
    /// When the document was last persisted. `null` until first write.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Correction store backed by one JSON file.
pub struct FeedbackStore {
    path: PathBuf,
    document: Mutex<FeedbackDocument>,
}

impl FeedbackStore {
    /// Open the store. A missing file starts an empty document; a file
    /// that exists but cannot be parsed is an error, because starting
    /// empty over it would discard review history on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::Io`] for unreadable files and
    /// [`FeedbackError::Malformed`] for unparseable ones.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FeedbackError> {
        let path = path.into();
        let document = match fs::read_to_string(&path) {
            Ok(text) => {
                serde_json::from_str(&text).map_err(|source| FeedbackError::Malformed {
                    path: path.clone(),
                    source,
                })?
            }
            Err(source) if source.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "feedback file absent, starting empty");
                FeedbackDocument::default()
            }
            Err(source) => {
                return Err(FeedbackError::Io { path, source });
            }
        };

        tracing::info!(
            path = %path.display(),
            entries = document.feedback.len(),
            corrections = document.corrections.len(),
            "feedback store opened"
        );
        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    // ── Writes ──────────────────────────────────────────────────────────

    /// Record a validated submission: fresh id, `pending` status,
    /// appended to `feedback` always and to `corrections` when the kind
    /// is `correction`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError`] when persisting fails; the in-memory
    /// document is left unchanged in that case.
    pub fn submit(&self, new: NewCorrection) -> Result<Correction, FeedbackError> {
        let record = Correction::from_submission(new);
        let stored = record.clone();
        self.mutate(move |doc| {
            if record.kind == CorrectionKind::Correction {
                doc.corrections.push(record.clone());
            }
            doc.feedback.push(record);
            Some(())
        })?;
        tracing::info!(
            id = %stored.id,
            kind = %stored.kind,
            feature = %stored.feature_name,
            law = %stored.law_title,
            "feedback recorded"
        );
        Ok(stored)
    }

    /// Move an entry to a new review status, in both lists. Returns
    /// whether any entry matched; a no-match is not an error and does
    /// not rewrite the file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError`] when persisting fails.
    pub fn set_status(
        &self,
        id: CorrectionId,
        status: CorrectionStatus,
    ) -> Result<bool, FeedbackError> {
        let applied = self.mutate(|doc| {
            let mut matched = false;
            for entry in doc
                .corrections
                .iter_mut()
                .chain(doc.feedback.iter_mut())
                .filter(|entry| entry.id == id)
            {
                entry.status = status;
                matched = true;
            }
            matched.then_some(())
        })?;
        if applied.is_none() {
            tracing::warn!(%id, "status update matched no feedback entry");
        }
        Ok(applied.is_some())
    }

    /// Remove an entry from both lists. Returns whether anything was
    /// removed; a no-match is not an error and does not rewrite the
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError`] when persisting fails.
    pub fn delete(&self, id: CorrectionId) -> Result<bool, FeedbackError> {
        let applied = self.mutate(|doc| {
            let before = doc.feedback.len() + doc.corrections.len();
            doc.corrections.retain(|entry| entry.id != id);
            doc.feedback.retain(|entry| entry.id != id);
            (doc.feedback.len() + doc.corrections.len() < before).then_some(())
        })?;
        if applied.is_none() {
            tracing::warn!(%id, "delete matched no feedback entry");
        }
        Ok(applied.is_some())
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Every submission, any kind, any status.
    #[must_use]
    pub fn all(&self) -> Vec<Correction> {
        self.document.lock().feedback.clone()
    }

    /// Submissions about one exact feature name, any kind, any status.
    #[must_use]
    pub fn for_feature(&self, feature_name: &str) -> Vec<Correction> {
        self.document
            .lock()
            .feedback
            .iter()
            .filter(|entry| entry.feature_name == feature_name)
            .cloned()
            .collect()
    }

    /// Submissions about one exact law title, any kind, any status.
    #[must_use]
    pub fn for_law(&self, law_title: &str) -> Vec<Correction> {
        self.document
            .lock()
            .feedback
            .iter()
            .filter(|entry| entry.law_title == law_title)
            .cloned()
            .collect()
    }

    /// Submissions about one exact (feature, law) pair, any kind, any
    /// status.
    #[must_use]
    pub fn for_pair(&self, feature_name: &str, law_title: &str) -> Vec<Correction> {
        self.document
            .lock()
            .feedback
            .iter()
            .filter(|entry| entry.is_for_pair(feature_name, law_title))
            .cloned()
            .collect()
    }

    /// The entries that feed evaluation prompts: kind `correction`,
    /// status `implemented`, exact pair match.
    #[must_use]
    pub fn implemented_for(&self, feature_name: &str, law_title: &str) -> Vec<Correction> {
        self.document
            .lock()
            .corrections
            .iter()
            .filter(|entry| {
                entry.status == CorrectionStatus::Implemented
                    && entry.is_for_pair(feature_name, law_title)
            })
            .cloned()
            .collect()
    }

    /// Total submissions on record.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.document.lock().feedback.len()
    }

    /// When the document was last persisted.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.document.lock().last_updated
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Clone-apply-persist-commit. The closure mutates a draft and
    /// returns `Some` to commit or `None` to declare the mutation a
    /// no-op (nothing is written, the draft is discarded).
    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut FeedbackDocument) -> Option<T>,
    ) -> Result<Option<T>, FeedbackError> {
        let mut guard = self.document.lock();
        let mut draft = guard.clone();
        let Some(out) = apply(&mut draft) else {
            return Ok(None);
        };
        draft.last_updated = Some(Utc::now());
        persist(&self.path, &draft)?;
        *guard = draft;
        Ok(Some(out))
    }
}

/// Write the document to a temp file in the target directory and rename
/// it over the real file.
fn persist(path: &Path, document: &FeedbackDocument) -> Result<(), FeedbackError> {
    let json = serde_json::to_vec_pretty(document)
        .map_err(|source| FeedbackError::Encode { source })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io = |source| FeedbackError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io)?;
    tmp.write_all(&json).map_err(io)?;
    tmp.persist(path).map_err(|e| io(e.error))?;
    Ok(())
}
