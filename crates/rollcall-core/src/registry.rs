//! Durable registry of known identities.
//!
//! Two parallel sequences (embeddings, names); index i in each is one
//! identity-embedding pair. A name may own several embeddings, one per
//! registration event; embeddings are never deduplicated by value.
//! Persisted wholesale as a versioned bincode blob.

use crate::collaborators::{EncoderError, FaceEncoder};
use crate::types::{Embedding, Frame};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

const STORAGE_VERSION: u32 = 1;

/// File extensions recognized in the seed directory.
const SEED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec: {0}")]
    Codec(#[from] bincode::Error),
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
    #[error("encoder: {0}")]
    Encoder(#[from] EncoderError),
}

#[derive(Serialize, Deserialize)]
struct StoredRegistry {
    version: u32,
    embeddings: Vec<Embedding>,
    names: Vec<String>,
}

/// In-memory known-face registry.
#[derive(Debug, Default)]
pub struct Registry {
    embeddings: Vec<Embedding>,
    names: Vec<String>,
}

impl Registry {
    /// Load the persisted registry (empty when the file is absent), then
    /// enroll every labeled image found in `seed_dir`.
    pub fn load<E: FaceEncoder>(
        path: &Path,
        seed_dir: &Path,
        encoder: &mut E,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::load_file(path)?;
        let seeded = registry.seed_from_dir(seed_dir, encoder)?;
        tracing::info!(
            identities = registry.len(),
            seeded,
            path = %path.display(),
            "registry loaded"
        );
        Ok(registry)
    }

    /// Load only the persisted blob; an absent file yields an empty registry.
    pub fn load_file(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path)?;
        let stored: StoredRegistry = bincode::deserialize(&bytes)?;
        debug_assert_eq!(stored.embeddings.len(), stored.names.len());
        Ok(Self {
            embeddings: stored.embeddings,
            names: stored.names,
        })
    }

    /// Scan a directory of labeled images and register one embedding per
    /// image that contains a face. The filename stem before the first `.`
    /// becomes the name; images with no detectable face are skipped.
    pub fn seed_from_dir<E: FaceEncoder>(
        &mut self,
        seed_dir: &Path,
        encoder: &mut E,
    ) -> Result<usize, RegistryError> {
        if !seed_dir.is_dir() {
            return Ok(0);
        }

        let mut seeded = 0;
        let mut entries: Vec<_> = fs::read_dir(seed_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        entries.sort();

        for path in entries {
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !SEED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                continue;
            }
            let Some(name) = path
                .file_name()
                .and_then(|f| f.to_str())
                .and_then(|f| f.split('.').next())
            else {
                continue;
            };

            let gray = image::open(&path)?.into_luma8();
            let frame = Frame {
                width: gray.width(),
                height: gray.height(),
                data: gray.into_raw(),
            };

            match encoder.encode(&frame)? {
                Some(embedding) => {
                    self.register(embedding, name);
                    seeded += 1;
                }
                None => {
                    tracing::debug!(image = %path.display(), "no face in seed image, skipping");
                }
            }
        }

        Ok(seeded)
    }

    /// Append one identity-embedding pair. Duplicate names with different
    /// embeddings are permitted and both match.
    pub fn register(&mut self, embedding: Embedding, name: &str) {
        self.embeddings.push(embedding);
        self.names.push(name.to_string());
    }

    /// Remove every embedding owned by `name`. Returns how many were removed.
    pub fn remove_name(&mut self, name: &str) -> usize {
        let before = self.names.len();
        let mut kept_embeddings = Vec::with_capacity(before);
        let mut kept_names = Vec::with_capacity(before);
        for (embedding, owner) in self.embeddings.drain(..).zip(self.names.drain(..)) {
            if owner != name {
                kept_embeddings.push(embedding);
                kept_names.push(owner);
            }
        }
        self.embeddings = kept_embeddings;
        self.names = kept_names;
        before - self.names.len()
    }

    /// Serialize the full pair, overwriting any prior file. Idempotent.
    pub fn persist(&self, path: &Path) -> Result<(), RegistryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredRegistry {
            version: STORAGE_VERSION,
            embeddings: self.embeddings.clone(),
            names: self.names.clone(),
        };
        let bytes = bincode::serialize(&stored)?;
        fs::write(path, bytes)?;
        tracing::debug!(identities = self.len(), path = %path.display(), "registry persisted");
        Ok(())
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Embedding)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.embeddings.iter())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
