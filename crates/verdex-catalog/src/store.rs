//! # Catalog Store
//!
//! In-memory law and feature tables behind `parking_lot` read-write
//! locks. Reads hand out cloned snapshots so callers never hold a lock
//! across an await point or a model call. The only mutations are the
//! validated feature append and the wholesale reload; both keep the
//! in-memory table consistent with the backing file by touching the
//! file first and memory only after the write succeeded.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use verdex_core::{feature::normalized, Feature, Law};

use crate::error::CatalogError;
use crate::table::{format_row, parse_table};

const FEATURES_HEADER: &str = "name,description";

/// Minimum fields a law row must carry: id, title, description,
/// jurisdiction.
const LAW_MIN_FIELDS: usize = 4;
/// Minimum fields a feature row must carry: name, description.
const FEATURE_MIN_FIELDS: usize = 2;

struct Loaded<T> {
    rows: Vec<T>,
    ready: bool,
}

impl<T> Loaded<T> {
    fn empty() -> Self {
        Self {
            rows: Vec::new(),
            ready: false,
        }
    }
}

/// Law and feature catalog backed by two delimited files.
pub struct CatalogStore {
    laws_path: PathBuf,
    features_path: PathBuf,
    delimiter: char,
    laws: RwLock<Loaded<Law>>,
    features: RwLock<Loaded<Feature>>,
}

impl CatalogStore {
    /// Load both tables, failing soft: a table whose file cannot be
    /// read stays empty and not ready, the error is logged, and the
    /// store is still returned. Use [`CatalogStore::is_ready`] to gate
    /// on load success.
    pub fn load(
        laws_path: impl Into<PathBuf>,
        features_path: impl Into<PathBuf>,
        delimiter: char,
    ) -> Self {
        let laws_path = laws_path.into();
        let features_path = features_path.into();

        let laws = match read_laws(&laws_path, delimiter) {
            Ok(rows) => {
                tracing::info!(path = %laws_path.display(), count = rows.len(), "loaded laws");
                Loaded { rows, ready: true }
            }
            Err(error) => {
                tracing::error!(path = %laws_path.display(), %error, "failed to load laws");
                Loaded::empty()
            }
        };

        let features = match read_features(&features_path, delimiter) {
            Ok(rows) => {
                tracing::info!(
                    path = %features_path.display(),
                    count = rows.len(),
                    "loaded features"
                );
                Loaded { rows, ready: true }
            }
            Err(error) => {
                tracing::error!(
                    path = %features_path.display(),
                    %error,
                    "failed to load features"
                );
                Loaded::empty()
            }
        };

        Self {
            laws_path,
            features_path,
            delimiter,
            laws: RwLock::new(laws),
            features: RwLock::new(features),
        }
    }

    /// Re-read both files and swap the tables in atomically. Unlike the
    /// startup load this is strict: on failure the previous snapshot
    /// stays in place and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] when either file cannot be read.
    pub fn reload(&self) -> Result<(usize, usize), CatalogError> {
        let laws = read_laws(&self.laws_path, self.delimiter)?;
        let features = read_features(&self.features_path, self.delimiter)?;
        let counts = (laws.len(), features.len());

        *self.laws.write() = Loaded {
            rows: laws,
            ready: true,
        };
        *self.features.write() = Loaded {
            rows: features,
            ready: true,
        };
        tracing::info!(laws = counts.0, features = counts.1, "catalog reloaded");
        Ok(counts)
    }

    /// Both tables loaded successfully at startup or on the last
    /// successful reload.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.laws.read().ready && self.features.read().ready
    }

    /// Per-table load state, `(laws, features)`.
    #[must_use]
    pub fn tables_ready(&self) -> (bool, bool) {
        (self.laws.read().ready, self.features.read().ready)
    }

    /// Cloned snapshot of the law table.
    #[must_use]
    pub fn laws(&self) -> Vec<Law> {
        self.laws.read().rows.clone()
    }

    /// Cloned snapshot of the feature table.
    #[must_use]
    pub fn features(&self) -> Vec<Feature> {
        self.features.read().rows.clone()
    }

    /// Number of loaded laws.
    #[must_use]
    pub fn law_count(&self) -> usize {
        self.laws.read().rows.len()
    }

    /// Number of loaded features.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.read().rows.len()
    }

    /// Exact-title lookup (query side trimmed).
    #[must_use]
    pub fn find_law_by_title(&self, title: &str) -> Option<Law> {
        self.laws
            .read()
            .rows
            .iter()
            .find(|law| law.matches_title(title))
            .cloned()
    }

    /// Case-insensitive, trimmed name lookup.
    #[must_use]
    pub fn find_feature_by_name(&self, name: &str) -> Option<Feature> {
        self.features
            .read()
            .rows
            .iter()
            .find(|feature| feature.matches_name(name))
            .cloned()
    }

    /// Validate and append a feature: the row is written to the
    /// features file first, and the in-memory table is extended only
    /// after the write succeeded, so a failed write leaves memory and
    /// disk agreeing.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] for blank or quote-bearing input
    /// - [`CatalogError::DuplicateFeature`] when the name is already
    ///   taken under case-insensitive comparison
    /// - [`CatalogError::NotReady`] when the feature table never loaded
    /// - [`CatalogError::Io`] when the file write fails
    pub fn append_feature(&self, name: &str, description: &str) -> Result<Feature, CatalogError> {
        let feature = Feature::new(name, description)?;

        let mut table = self.features.write();
        if !table.ready {
            return Err(CatalogError::NotReady { table: "features" });
        }
        if let Some(existing) = table.rows.iter().find(|f| f.matches_name(&feature.name)) {
            return Err(CatalogError::DuplicateFeature {
                name: existing.name.clone(),
            });
        }

        self.write_feature_row(&feature)
            .map_err(|source| CatalogError::Io {
                path: self.features_path.clone(),
                source,
            })?;

        tracing::info!(name = %feature.name, "feature appended to catalog");
        table.rows.push(feature.clone());
        Ok(feature)
    }

    /// Append one feature row, creating the file with its header when
    /// it does not exist yet.
    fn write_feature_row(&self, feature: &Feature) -> std::io::Result<()> {
        let row = format_row(&[&feature.name, &feature.description], self.delimiter);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.features_path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{FEATURES_HEADER}")?;
        }
        writeln!(file, "{row}")?;
        Ok(())
    }
}

fn read_to_string(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_laws(path: &Path, delimiter: char) -> Result<Vec<Law>, CatalogError> {
    let text = read_to_string(path)?;
    let mut laws = Vec::new();
    for row in parse_table(&text, delimiter, LAW_MIN_FIELDS) {
        if row[1].is_empty() {
            tracing::warn!(id = %row[0], "skipping law row with empty title");
            continue;
        }
        laws.push(Law {
            id: row[0].clone(),
            title: row[1].clone(),
            description: row[2].clone(),
            jurisdiction: row[3].clone(),
        });
    }
    Ok(laws)
}

fn read_features(path: &Path, delimiter: char) -> Result<Vec<Feature>, CatalogError> {
    let text = read_to_string(path)?;
    let mut features: Vec<Feature> = Vec::new();
    for row in parse_table(&text, delimiter, FEATURE_MIN_FIELDS) {
        if row[0].is_empty() {
            tracing::warn!("skipping feature row with empty name");
            continue;
        }
        if features.iter().any(|f| f.matches_name(&row[0])) {
            tracing::warn!(name = %row[0], "skipping duplicate feature row");
            continue;
        }
        features.push(Feature {
            name: row[0].clone(),
            description: row[1].clone(),
        });
    }
    Ok(features)
}
