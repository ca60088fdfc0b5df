//! Persistence engine: write, read, clear and wipe typed records.
//!
//! Every operation:
//!
//! 1. resolves the Type Identifier from the [`TypeDescriptor`]
//! 2. runs on the background runtime
//! 3. touches the disk only while holding the engine-wide lock
//! 4. applies the strict/non-strict policy to whatever went wrong
//!
//! Internally each operation produces a `Result`; the strict flag decides at
//! the public boundary whether an error is returned or swallowed in favor of
//! the fallback (`item` for write, `default` for read, `()` for clear).

mod builder;
mod callback;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::Level;

use crate::codec::{Codec, JsonCodec};
use crate::config::PersistaConfig;
use crate::descriptor::TypeDescriptor;
use crate::dispatch::Dispatcher;
use crate::error::{PersistaError, Result};
use crate::logging::Logger;
use crate::storage::DirectoryManager;

pub use builder::PersistaBuilder;

/// Raw outcome of loading a record, before any fallback is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<T> {
    Found(T),
    /// Never written, or cleared/wiped since.
    Absent,
}

impl<T> Record<T> {
    /// The stored value, or `default` if there is none.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Record::Found(value) => value,
            Record::Absent => default,
        }
    }
}

/// Handle to a store. Cheap to clone; clones share the lock and the folder.
pub struct Persista<C: Codec = JsonCodec> {
    inner: Arc<Inner<C>>,
}

impl<C: Codec> Clone for Persista<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<C> {
    /// Engine-wide lock. Every filesystem operation goes through the guard.
    store: Mutex<DirectoryManager>,
    store_dir: PathBuf,
    codec: C,
    logger: Option<Arc<dyn Logger>>,
    strict_mode: bool,
    background: Handle,
    foreground: Arc<dyn Dispatcher>,
}

impl Persista<JsonCodec> {
    /// Engine with default settings storing under `data_path/persista`.
    pub fn new(data_path: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(data_path).build()
    }

    pub fn builder(data_path: impl Into<PathBuf>) -> PersistaBuilder<JsonCodec> {
        PersistaBuilder::new(data_path)
    }

    /// Engine configured from a [`PersistaConfig`].
    pub fn from_config(config: &PersistaConfig) -> Result<Self> {
        let codec = if config.pretty_json {
            JsonCodec::pretty()
        } else {
            JsonCodec::new()
        };
        Self::builder(config.data_path.clone())
            .strict_mode(config.strict_mode)
            .codec(codec)
            .build()
    }
}

impl<C: Codec> Persista<C> {
    /// The folder holding the records (`<data_path>/persista`).
    pub fn store_dir(&self) -> &Path {
        &self.inner.store_dir
    }

    pub fn is_strict(&self) -> bool {
        self.inner.strict_mode
    }

    /// Persist `item` as the record for its type and hand it back.
    ///
    /// Non-strict: any failure is logged and `item` is returned unchanged.
    /// Strict: the failure is logged and returned.
    pub async fn write<T>(&self, item: T, ty: TypeDescriptor<T>) -> Result<T>
    where
        T: Serialize + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        self.inner
            .background
            .spawn(async move { inner.write(item, ty).await })
            .await?
    }

    /// Load the record for `T`, or `default` if there is none.
    ///
    /// A missing record is never an error, not even in strict mode.
    pub async fn read<T>(&self, default: T, ty: TypeDescriptor<T>) -> Result<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        self.inner
            .background
            .spawn(async move { inner.read(default, ty).await })
            .await?
    }

    /// Load the record for `T` without applying any fallback or policy.
    ///
    /// Failures are returned (and not logged) whatever the strict flag says.
    pub async fn load<T>(&self, ty: TypeDescriptor<T>) -> Result<Record<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        self.inner
            .background
            .spawn(async move { inner.load(&ty).await })
            .await?
    }

    /// Delete the record for `T`. Clearing an absent record is a no-op.
    pub async fn clear<T>(&self, ty: TypeDescriptor<T>) -> Result<()>
    where
        T: 'static,
    {
        let inner = Arc::clone(&self.inner);
        self.inner
            .background
            .spawn(async move { inner.clear(ty).await })
            .await?
    }

    /// Delete every record of every type. The store stays usable.
    pub async fn wipe_everything(&self) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        self.inner
            .background
            .spawn(async move { inner.wipe_everything().await })
            .await?
    }

    /// Identifiers of the records currently on disk, sorted.
    ///
    /// Diagnostic only: always returns failures, whatever the strict flag says.
    pub async fn stored_ids(&self) -> Result<Vec<String>> {
        let inner = Arc::clone(&self.inner);
        self.inner
            .background
            .spawn(async move { inner.store.lock().await.list_records().await })
            .await?
    }
}

impl<C: Codec> Inner<C> {
    async fn write<T>(&self, item: T, ty: TypeDescriptor<T>) -> Result<T>
    where
        T: Serialize + Send,
    {
        let encoded = self.encode(&item, &ty);
        let outcome = match encoded {
            Ok((type_id, bytes)) => {
                let store = self.store.lock().await;
                let path = store.path_for(type_id);
                store.write_record(&path, &bytes).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => Ok(item),
            Err(e) => self.recover("write", e, item),
        }
    }

    fn encode<'a, T: Serialize>(
        &self,
        item: &T,
        ty: &'a TypeDescriptor<T>,
    ) -> Result<(&'a str, Vec<u8>)> {
        let type_id = require_id(ty)?;
        let bytes = self
            .codec
            .encode(item)
            .map_err(|e| PersistaError::encode(type_id, e))?;

        self.log(Level::DEBUG, &format!("writing {type_id}"), None);
        self.log_payload(&bytes);
        Ok((type_id, bytes))
    }

    async fn read<T>(&self, default: T, ty: TypeDescriptor<T>) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        match self.load(&ty).await {
            Ok(Record::Found(value)) => Ok(value),
            Ok(Record::Absent) => {
                self.log(
                    Level::WARN,
                    &format!(
                        "no record for {}, returning the default (expected on first run; \
                         otherwise check the type descriptor matches the one used to write)",
                        ty.type_id().unwrap_or(ty.type_name())
                    ),
                    None,
                );
                Ok(default)
            }
            Err(e) => self.recover("read", e, default),
        }
    }

    async fn load<T: DeserializeOwned>(&self, ty: &TypeDescriptor<T>) -> Result<Record<T>> {
        let type_id = require_id(ty)?;
        self.log(Level::DEBUG, &format!("reading {type_id}"), None);

        let bytes = {
            let store = self.store.lock().await;
            let path = store.path_for(type_id);
            store.read_record(&path).await?
        };

        let Some(bytes) = bytes else {
            return Ok(Record::Absent);
        };
        self.log_payload(&bytes);

        self.codec
            .decode(&bytes)
            .map(Record::Found)
            .map_err(|e| PersistaError::decode(type_id, e))
    }

    async fn clear<T>(&self, ty: TypeDescriptor<T>) -> Result<()> {
        let outcome = match require_id(&ty) {
            Ok(type_id) => {
                self.log(Level::DEBUG, &format!("clearing {type_id}"), None);
                let store = self.store.lock().await;
                let path = store.path_for(type_id);
                store.remove_record(&path).await.map(|_| ())
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(e) => self.recover("clear", e, ()),
        }
    }

    async fn wipe_everything(&self) -> Result<()> {
        self.log(Level::DEBUG, "wiping everything", None);
        let outcome = self.store.lock().await.wipe().await;
        match outcome {
            Ok(()) => Ok(()),
            Err(e) => self.recover("wipe", e, ()),
        }
    }

    /// Log the failure, then return it (strict) or the fallback.
    fn recover<T>(&self, operation: &str, error: PersistaError, fallback: T) -> Result<T> {
        self.log(Level::ERROR, &format!("{operation} failed"), Some(&error));
        if self.strict_mode {
            Err(error)
        } else {
            Ok(fallback)
        }
    }

    fn log(&self, level: Level, message: &str, cause: Option<&(dyn Error + 'static)>) {
        if let Some(logger) = &self.logger {
            logger.log(level, message, cause);
        }
    }

    fn log_payload(&self, bytes: &[u8]) {
        if !self.codec.is_text() {
            return;
        }
        if let Ok(text) = std::str::from_utf8(bytes) {
            self.log(Level::DEBUG, text, None);
        }
    }
}

fn require_id<T>(ty: &TypeDescriptor<T>) -> Result<&str> {
    ty.type_id().ok_or(PersistaError::Configuration {
        type_name: ty.type_name(),
    })
}
