//! Disk-backed memoization of similarity matrices.
//!
//! Each artifact is a flat text grid: one matrix row per line, cells as
//! comma-separated decimals, no header. Rows and columns follow the reviewer
//! ordering that produced the key, so the file name carries a digest of that
//! ordering and of every reviewer's product set. A changed population maps to
//! a different file instead of silently reusing a stale grid.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::{SimilarityMatrix, UserProducts};
use crate::error::{RevgraphError, RevgraphResult};

const FILE_PREFIX: &str = "similarities-";
const FILE_SUFFIX: &str = ".txt";
/// Appended to an artifact name while it is being written.
const PARTIAL_SUFFIX: &str = ".partial";

/// Hex digits of the digest kept in file names.
const KEY_LEN: usize = 16;

/// Similarity cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct SimilarityCache {
    dir: PathBuf,
}

impl SimilarityCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Content-derived key for `users` (in matrix order) and their product sets.
    pub fn key_for(input: &UserProducts, users: &[String]) -> String {
        let mut hasher = Sha256::new();
        for user in users {
            hasher.update(user.as_bytes());
            hasher.update(b"\x1f");
            if let Some(products) = input.products(user) {
                for product in products {
                    hasher.update(product.as_bytes());
                    hasher.update(b"\x1e");
                }
            }
            hasher.update(b"\x1d");
        }
        let digest = hex::encode(hasher.finalize());
        digest[..KEY_LEN].to_string()
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{key}{FILE_SUFFIX}"))
    }

    /// Return the cached matrix for this input, computing and persisting it
    /// on a miss. An unreadable or wrongly sized artifact is recomputed.
    pub fn load_or_compute(
        &self,
        input: &UserProducts,
        users: &[String],
    ) -> RevgraphResult<SimilarityMatrix> {
        let path = self.path_for(&Self::key_for(input, users));

        if path.exists() {
            match read_grid(&path, users) {
                Ok(matrix) => {
                    info!(path = %path.display(), dimension = matrix.dimension(), "Loaded similarities from cache");
                    return Ok(matrix);
                }
                Err(e) => warn!(error = %e, "Discarding unusable similarity cache"),
            }
        }

        let matrix = SimilarityMatrix::compute(input, users)?;
        self.store(&path, &matrix)?;
        info!(path = %path.display(), dimension = matrix.dimension(), "Computed and cached similarities");
        Ok(matrix)
    }

    /// Write to a sibling partial file, then rename over the artifact. Only
    /// complete grids ever appear under the artifact name.
    fn store(&self, path: &Path, matrix: &SimilarityMatrix) -> RevgraphResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| RevgraphError::cache_io(&self.dir, e))?;
        let partial = partial_path(path);
        std::fs::write(&partial, format_grid(matrix)).map_err(|e| RevgraphError::cache_io(&partial, e))?;
        std::fs::rename(&partial, path).map_err(|e| RevgraphError::cache_io(path, e))?;
        debug!(path = %path.display(), "Wrote similarity grid");
        Ok(())
    }

    /// Delete every cache artifact in the directory. Returns how many were removed.
    pub fn clear(&self) -> RevgraphResult<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| RevgraphError::cache_io(&self.dir, e))?;
        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(|e| RevgraphError::cache_io(&self.dir, e))?.path();
            let is_artifact = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| {
                    n.starts_with(FILE_PREFIX)
                        && (n.ends_with(FILE_SUFFIX) || n.ends_with(PARTIAL_SUFFIX))
                });
            if is_artifact {
                std::fs::remove_file(&path).map_err(|e| RevgraphError::cache_io(&path, e))?;
                removed += 1;
            }
        }

        info!(removed, dir = %self.dir.display(), "Cleared similarity cache");
        Ok(removed)
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

fn format_grid(matrix: &SimilarityMatrix) -> String {
    matrix
        .rows()
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

fn read_grid(path: &Path, users: &[String]) -> RevgraphResult<SimilarityMatrix> {
    let raw = std::fs::read_to_string(path).map_err(|e| RevgraphError::cache_io(path, e))?;

    let values = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            line.split(',')
                .map(|cell| {
                    cell.trim().parse::<f64>().map_err(|_| {
                        RevgraphError::cache_format(path, format!("row {}: bad cell '{}'", i, cell))
                    })
                })
                .collect::<RevgraphResult<Vec<f64>>>()
        })
        .collect::<RevgraphResult<Vec<_>>>()?;

    SimilarityMatrix::from_values(users.to_vec(), values)
        .map_err(|e| RevgraphError::cache_format(path, e.to_string()))
}
