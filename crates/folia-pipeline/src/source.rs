//! JSON directory source
//!
//! Reads a dump of the catalog database laid out as one JSON array per
//! collection: `works.json`, `persons.json`, ..., `types.json`,
//! `relations.json`, `relationtypes.json` and `users.json`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use folia_config::SourceConfig;
use folia_core::{EntityKind, RawDataset, RecordSource, SourceError};

const RELATIONS: &str = "relations";
const RELATION_TYPES: &str = "relationtypes";
const USERS: &str = "users";

/// A [`RecordSource`] over a directory of exported collections.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
    name: String,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let name = format!("json:{}", dir.display());
        Self { dir, name }
    }

    /// Source for `<data_dir>/<database>` when that directory exists,
    /// otherwise `<data_dir>` itself.
    pub fn from_config(config: &SourceConfig) -> Self {
        let nested = config.data_dir.join(&config.database);
        if nested.is_dir() {
            Self::new(nested)
        } else {
            Self::new(config.data_dir.clone())
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    /// Documents of one collection. A missing file reads as empty.
    async fn read_collection<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, SourceError> {
        let path = self.collection_path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(collection, "Collection file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(SourceError::Io {
                    collection: collection.to_string(),
                    message: e.to_string(),
                })
            }
        };
        let docs: Vec<T> = serde_json::from_slice(&bytes).map_err(|e| SourceError::Malformed {
            collection: collection.to_string(),
            message: e.to_string(),
        })?;
        debug!(collection, count = docs.len(), "Read collection");
        Ok(docs)
    }
}

#[async_trait]
impl RecordSource for JsonDirSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<RawDataset, SourceError> {
        if !self.dir.is_dir() {
            return Err(SourceError::Unavailable(format!(
                "data directory {} does not exist",
                self.dir.display()
            )));
        }

        let mut dataset = RawDataset::new();
        for kind in EntityKind::COLLECTIONS {
            let docs = self.read_collection(kind.collection()).await?;
            dataset.collections.insert(kind, docs);
        }
        dataset.relations = self.read_collection(RELATIONS).await?;
        dataset.relation_types = self.read_collection(RELATION_TYPES).await?;
        dataset.users = self.read_collection(USERS).await?;
        Ok(dataset)
    }
}
