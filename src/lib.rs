//! # Persista
//!
//! Persist single instances of typed state to disk, one file per type.
//!
//! Persista keeps a handful of independently evolving state snapshots
//! (settings, a dashboard, a wallet...) on disk and hands them back on the
//! next run, falling back to a caller-supplied default when nothing was
//! ever saved.
//!
//! ## Key Features
//!
//! - **One record per type**: stored at `<data_path>/persista/<TypeIdentifier>`
//! - **Typed**: serde picks the codec from the [`TypeDescriptor`], generics
//!   and tagged enums included
//! - **Crash-safe**: records are replaced atomically, never truncated
//! - **Concurrent**: one engine-wide lock, file I/O on a background runtime
//! - **Forgiving by default**: failures are logged and the fallback value is
//!   returned; strict mode returns the error instead
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use persista::{Persista, TypeDescriptor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Dashboard {
//!     id: u32,
//!     name: String,
//! }
//!
//! # async fn example() -> persista::Result<()> {
//! let persista = Persista::new("/tmp/my-app")?;
//!
//! persista
//!     .write(Dashboard { id: 1, name: "erdo".into() }, TypeDescriptor::of())
//!     .await?;
//!
//! let dashboard = persista
//!     .read(Dashboard { id: 0, name: String::new() }, TypeDescriptor::of())
//!     .await?;
//! assert_eq!(dashboard.id, 1);
//! # Ok(())
//! # }
//! ```
//!
//! `TypeDescriptor::of()` keys the record on the type's Rust path as reported
//! by [`std::any::type_name`], which may change with the compiler version or
//! a refactor. Records keyed that way would then read back as the default.
//! Long-lived state should pin its key with
//! [`TypeDescriptor::named`](descriptor::TypeDescriptor::named):
//!
//! ```rust,no_run
//! # use persista::{Persista, TypeDescriptor};
//! # #[derive(serde::Serialize, serde::Deserialize)]
//! # struct Dashboard { id: u32 }
//! # async fn example(persista: Persista) -> persista::Result<()> {
//! persista
//!     .write(Dashboard { id: 1 }, TypeDescriptor::named("dashboard.v1"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod descriptor;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod logging;
pub mod storage;

// Re-exports for convenience
pub use codec::{BincodeCodec, Codec, CodecError, JsonCodec};
pub use config::PersistaConfig;
pub use descriptor::TypeDescriptor;
pub use dispatch::{Dispatcher, ForegroundLoop, ForegroundQueue, Inline};
pub use engine::{Persista, PersistaBuilder, Record};
pub use error::{PersistaError, Result};
pub use logging::{init_tracing, Logger, TracingLogger};
