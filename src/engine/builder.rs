//! Builder for [`Persista`].

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tokio::runtime::{Handle, Runtime};
use tokio::sync::Mutex;

use super::{Inner, Persista};
use crate::codec::{Codec, JsonCodec};
use crate::dispatch::Dispatcher;
use crate::error::{PersistaError, Result};
use crate::logging::{Logger, TracingLogger};
use crate::storage::DirectoryManager;

/// Worker threads of the fallback runtime.
const IO_WORKER_THREADS: usize = 2;

static IO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Configures and builds a [`Persista`].
///
/// Only the data path is required. Defaults:
///
/// - background: the runtime `build` is called from, or a shared
///   `persista-io` runtime when there is none
/// - foreground: the background runtime
/// - logger: [`TracingLogger`]
/// - strict mode: off
/// - codec: [`JsonCodec`]
pub struct PersistaBuilder<C = JsonCodec> {
    data_path: PathBuf,
    background: Option<Handle>,
    foreground: Option<Arc<dyn Dispatcher>>,
    logger: Option<Arc<dyn Logger>>,
    strict_mode: bool,
    codec: C,
}

impl PersistaBuilder<JsonCodec> {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            background: None,
            foreground: None,
            logger: Some(Arc::new(TracingLogger)),
            strict_mode: false,
            codec: JsonCodec::new(),
        }
    }
}

impl<C: Codec> PersistaBuilder<C> {
    /// Runtime that performs the file I/O.
    pub fn background(mut self, handle: Handle) -> Self {
        self.background = Some(handle);
        self
    }

    /// Where completion callbacks run.
    pub fn foreground(mut self, dispatcher: impl Dispatcher) -> Self {
        self.foreground = Some(Arc::new(dispatcher));
        self
    }

    pub fn logger(mut self, logger: impl Logger) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Share one logger between several engines.
    pub fn shared_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// No logger at all.
    pub fn silent(mut self) -> Self {
        self.logger = None;
        self
    }

    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn codec<D: Codec>(self, codec: D) -> PersistaBuilder<D> {
        PersistaBuilder {
            data_path: self.data_path,
            background: self.background,
            foreground: self.foreground,
            logger: self.logger,
            strict_mode: self.strict_mode,
            codec,
        }
    }

    /// Create the store folder and the engine.
    ///
    /// Fails if the folder can't be created.
    pub fn build(self) -> Result<Persista<C>> {
        let store = DirectoryManager::init(&self.data_path)?;
        let store_dir = store.dir().to_path_buf();

        let background = match self.background {
            Some(handle) => handle,
            None => default_background()?,
        };
        let foreground: Arc<dyn Dispatcher> = match self.foreground {
            Some(dispatcher) => dispatcher,
            None => Arc::new(background.clone()),
        };

        Ok(Persista {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                store_dir,
                codec: self.codec,
                logger: self.logger,
                strict_mode: self.strict_mode,
                background,
                foreground,
            }),
        })
    }
}

fn default_background() -> Result<Handle> {
    if let Ok(handle) = Handle::try_current() {
        return Ok(handle);
    }
    if let Some(runtime) = IO_RUNTIME.get() {
        return Ok(runtime.handle().clone());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(IO_WORKER_THREADS)
        .thread_name("persista-io")
        .enable_all()
        .build()
        .map_err(|e| PersistaError::Runtime(format!("starting persista-io runtime: {e}")))?;
    Ok(IO_RUNTIME.get_or_init(|| runtime).handle().clone())
}
