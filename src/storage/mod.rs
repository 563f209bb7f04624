// Package storage provides persistence for refreshable values across restarts.
//
// Storage is an optimization only: every backend may fail on get or put and the
// refresher treats those failures as "no stored value" and "persist skipped".

pub mod file;
pub mod memory;


use anyhow::Result;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::model::Refreshable;

// Re-export main types
pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Storage interface for persisting a refreshable value.
#[async_trait::async_trait]
pub trait Storage<T>: Send + Sync {
    /// Retrieves the stored refreshable.
    async fn get(&self, ctx: CancellationToken) -> Result<Refreshable<T>>;

    /// Stores the refreshable.
    async fn put(&self, ctx: CancellationToken, value: Arc<Refreshable<T>>) -> Result<()>;
}

/// Storage which runs caller-supplied get/put functions.
pub struct FnStorage<T, G, P> {
    get_fn: G,
    put_fn: P,
    _marker: PhantomData<fn() -> T>,
}

#[async_trait::async_trait]
impl<T, G, GF, P, PF> Storage<T> for FnStorage<T, G, P>
where
    T: Send + Sync + 'static,
    G: Fn(CancellationToken) -> GF + Send + Sync,
    GF: Future<Output = Result<Refreshable<T>>> + Send + 'static,
    P: Fn(CancellationToken, Arc<Refreshable<T>>) -> PF + Send + Sync,
    PF: Future<Output = Result<()>> + Send + 'static,
{
    async fn get(&self, ctx: CancellationToken) -> Result<Refreshable<T>> {
        (self.get_fn)(ctx).await
    }

    async fn put(&self, ctx: CancellationToken, value: Arc<Refreshable<T>>) -> Result<()> {
        (self.put_fn)(ctx, value).await
    }
}

/// Builds a storage from a get and a put function.
pub fn from_fns<T, G, GF, P, PF>(get_fn: G, put_fn: P) -> FnStorage<T, G, P>
where
    G: Fn(CancellationToken) -> GF + Send + Sync,
    GF: Future<Output = Result<Refreshable<T>>> + Send + 'static,
    P: Fn(CancellationToken, Arc<Refreshable<T>>) -> PF + Send + Sync,
    PF: Future<Output = Result<()>> + Send + 'static,
{
    FnStorage {
        get_fn,
        put_fn,
        _marker: PhantomData,
    }
}
