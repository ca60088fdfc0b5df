//! Callback API: fire an operation, get the result on the foreground.
//!
//! Each method spawns the matching async operation on the background runtime
//! and, once it has finished (file written, read or deleted), dispatches the
//! completion callback to the foreground [`Dispatcher`](crate::Dispatcher).
//! Results are identical to the async API; only where they show up differs.
//! Operations can't be cancelled: dropping interest in the callback still
//! lets the file operation finish.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Persista;
use crate::codec::Codec;
use crate::descriptor::TypeDescriptor;
use crate::error::Result;

impl<C: Codec> Persista<C> {
    /// Callback form of [`write`](Persista::write).
    pub fn write_with<T, F>(&self, item: T, ty: TypeDescriptor<T>, complete: F)
    where
        T: Serialize + Send + 'static,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let this = self.clone();
        self.spawn_then(async move { this.write(item, ty).await }, complete);
    }

    /// Callback form of [`read`](Persista::read).
    pub fn read_with<T, F>(&self, default: T, ty: TypeDescriptor<T>, complete: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let this = self.clone();
        self.spawn_then(async move { this.read(default, ty).await }, complete);
    }

    /// Callback form of [`clear`](Persista::clear).
    pub fn clear_with<T, F>(&self, ty: TypeDescriptor<T>, complete: F)
    where
        T: 'static,
        F: FnOnce(Result<()>) + Send + 'static,
    {
        let this = self.clone();
        self.spawn_then(async move { this.clear(ty).await }, complete);
    }

    /// Callback form of [`wipe_everything`](Persista::wipe_everything).
    pub fn wipe_everything_with<F>(&self, complete: F)
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        let this = self.clone();
        self.spawn_then(async move { this.wipe_everything().await }, complete);
    }

    fn spawn_then<R, Fut, F>(&self, operation: Fut, complete: F)
    where
        Fut: Future<Output = R> + Send + 'static,
        R: Send + 'static,
        F: FnOnce(R) + Send + 'static,
    {
        let foreground = Arc::clone(&self.inner.foreground);
        self.inner.background.spawn(async move {
            let result = operation.await;
            foreground.dispatch(Box::new(move || complete(result)));
        });
    }
}
