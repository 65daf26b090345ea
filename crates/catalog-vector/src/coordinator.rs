//! Index cache coordinator.
//!
//! Owns at most one built [`DenseIndex`] and the raw records it was packed
//! from. Builds are coalesced: while a load-and-build is in flight every
//! caller awaits that same build, and its result (success or error) is
//! delivered to all of them. A failed build never replaces a cached index.
//!
//! Builds run as spawned tasks, so a caller that drops its future does not
//! stall or cancel the build for anyone else.

use std::sync::atomic::{AtomicU64, Ordering};
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Instant;

use catalog_storage::{CatalogSource, CatalogVersion, StorageError};
use catalog_types::CatalogEntity;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::VectorError;
use crate::index::DenseIndex;
use crate::norm::NormCheck;

type BuildResult = Result<Arc<DenseIndex>, VectorError>;
type BuildFuture = Shared<BoxFuture<'static, BuildResult>>;

struct InFlight {
    id: u64,
    dim: usize,
    future: BuildFuture,
}

#[derive(Default)]
struct CacheState {
    index: Option<Arc<DenseIndex>>,
    records: Option<Arc<Vec<CatalogEntity>>>,
    /// Catalog version the cached records were loaded at
    loaded_at: Option<CatalogVersion>,
    in_flight: Option<InFlight>,
    next_build_id: u64,
    /// Bumped by invalidation; builds started under an older generation
    /// still answer their waiters but are not cached
    generation: u64,
}

impl CacheState {
    /// Free the in-flight slot if it still belongs to build `id`.
    fn release(&mut self, id: u64) {
        if self.in_flight.as_ref().is_some_and(|flight| flight.id == id) {
            self.in_flight = None;
        }
    }
}

struct Inner {
    source: Arc<dyn CatalogSource>,
    norm_check: NormCheck,
    state: Mutex<CacheState>,
    /// Serializes catalog loads
    load_gate: Mutex<()>,
    loads: AtomicU64,
}

/// Lazily builds, caches, and shares the dense index.
///
/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct IndexCoordinator {
    inner: Arc<Inner>,
}

impl IndexCoordinator {
    pub fn new(source: Arc<dyn CatalogSource>, norm_check: NormCheck) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                norm_check,
                state: Mutex::new(CacheState::default()),
                load_gate: Mutex::new(()),
                loads: AtomicU64::new(0),
            }),
        }
    }

    pub fn norm_check(&self) -> NormCheck {
        self.inner.norm_check
    }

    /// Number of catalog loads performed so far.
    pub fn load_count(&self) -> u64 {
        self.inner.loads.load(Ordering::SeqCst)
    }

    /// Cached index, if any, without building.
    pub async fn cached_index(&self) -> Option<Arc<DenseIndex>> {
        self.inner.state.lock().await.index.clone()
    }

    /// Return the cached index for `dim`, or load the catalog and build one.
    ///
    /// A cache hit does no I/O. A dimension change forces a full reload.
    pub async fn get_or_build_index(&self, dim: usize) -> Result<Arc<DenseIndex>, VectorError> {
        if dim == 0 {
            return Err(VectorError::EmptyDimension);
        }

        loop {
            let (future, build_dim) = {
                let mut state = self.inner.state.lock().await;

                if let Some(index) = state.index.as_ref().filter(|i| i.dimension() == dim) {
                    debug!(dim, rows = index.len(), "Index cache hit");
                    return Ok(Arc::clone(index));
                }

                let joined = state
                    .in_flight
                    .as_ref()
                    .map(|flight| (flight.future.clone(), flight.dim));
                match joined {
                    Some((future, building)) => {
                        debug!(dim, building, "Waiting on in-flight index build");
                        (future, building)
                    }
                    None => (self.start_build(&mut state, dim), dim),
                }
            };

            let result = future.await;
            if build_dim == dim {
                return result;
            }
            // That build was for another dimension; it is finished now.
        }
    }

    fn start_build(&self, state: &mut CacheState, dim: usize) -> BuildFuture {
        let generation = state.generation;
        let inner = Arc::clone(&self.inner);
        self.spawn_build(state, dim, move |id| inner.run_build(id, dim, generation))
    }

    /// Spawn `build` and publish it as the in-flight build.
    ///
    /// If the task dies without producing a result, the slot is freed so the
    /// next request starts over instead of rejoining the dead build.
    fn spawn_build<F, Fut>(&self, state: &mut CacheState, dim: usize, build: F) -> BuildFuture
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = BuildResult> + Send + 'static,
    {
        let id = state.next_build_id;
        state.next_build_id += 1;

        let handle = tokio::spawn(build(id));
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let future = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(dim, error = %e, "Index build task aborted");
                    if let Some(inner) = inner.upgrade() {
                        inner.state.lock().await.release(id);
                    }
                    Err(VectorError::BuildTask(e.to_string()))
                }
            }
        }
        .boxed()
        .shared();

        state.in_flight = Some(InFlight {
            id,
            dim,
            future: future.clone(),
        });
        future
    }

    /// Raw records of the catalog, loaded once and then served from cache.
    pub async fn records(&self) -> Result<Arc<Vec<CatalogEntity>>, VectorError> {
        if let Some(records) = self.inner.state.lock().await.records.clone() {
            return Ok(records);
        }

        let _gate = self.inner.load_gate.lock().await;
        let generation = {
            let state = self.inner.state.lock().await;
            if let Some(records) = state.records.clone() {
                return Ok(records);
            }
            state.generation
        };

        let (version, records) = self.inner.fetch().await?;
        let records = Arc::new(records);

        let mut state = self.inner.state.lock().await;
        if state.generation == generation && state.records.is_none() {
            state.records = Some(Arc::clone(&records));
            state.loaded_at = Some(version);
        }
        Ok(records)
    }

    /// Rebuild the index for `dim` from cached records without touching the
    /// catalog. Falls back to [`IndexCoordinator::get_or_build_index`] when
    /// no records are cached.
    pub async fn repack(&self, dim: usize) -> Result<Arc<DenseIndex>, VectorError> {
        if dim == 0 {
            return Err(VectorError::EmptyDimension);
        }

        let Some(records) = self.inner.state.lock().await.records.clone() else {
            return self.get_or_build_index(dim).await;
        };

        let index = Arc::new(DenseIndex::build_with(&records, dim, self.inner.norm_check)?);

        let mut state = self.inner.state.lock().await;
        if state
            .records
            .as_ref()
            .is_some_and(|cached| Arc::ptr_eq(cached, &records))
        {
            state.index = Some(Arc::clone(&index));
        }
        info!(dim, rows = index.len(), "Repacked index from cached records");
        Ok(index)
    }

    /// Drop the cached index and records; the next request reloads.
    ///
    /// A build already in flight still answers the callers waiting on it, but
    /// later requests do not join it.
    pub async fn invalidate(&self) {
        let mut state = self.inner.state.lock().await;
        state.index = None;
        state.records = None;
        state.loaded_at = None;
        state.in_flight = None;
        state.generation += 1;
        info!(generation = state.generation, "Invalidated index cache");
    }

    /// Invalidate if the catalog changed since the cached records were
    /// loaded. Returns whether anything was invalidated.
    pub async fn refresh_if_stale(&self) -> Result<bool, VectorError> {
        let Some(loaded_at) = self.inner.state.lock().await.loaded_at else {
            return Ok(false);
        };

        let source = Arc::clone(&self.inner.source);
        let current = tokio::task::spawn_blocking(move || source.version())
            .await
            .map_err(|e| VectorError::BuildTask(e.to_string()))??;

        if current == loaded_at {
            debug!("Index cache is current");
            return Ok(false);
        }

        info!(?loaded_at, ?current, "Catalog changed since last load");
        self.invalidate().await;
        Ok(true)
    }
}

impl Inner {
    async fn run_build(self: Arc<Self>, id: u64, dim: usize, generation: u64) -> BuildResult {
        let started = Instant::now();

        let outcome = {
            let _gate = self.load_gate.lock().await;
            self.fetch().await
        }
        .and_then(|(version, records)| {
            let index = DenseIndex::build_with(&records, dim, self.norm_check)?;
            Ok((Arc::new(index), Arc::new(records), version))
        });

        let mut state = self.state.lock().await;
        state.release(id);

        match outcome {
            Ok((index, records, version)) => {
                if state.generation == generation {
                    state.index = Some(Arc::clone(&index));
                    state.records = Some(records);
                    state.loaded_at = Some(version);
                } else {
                    debug!(dim, "Cache invalidated during build, result not cached");
                }
                info!(
                    dim,
                    rows = index.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Built dense index"
                );
                Ok(index)
            }
            Err(e) => {
                warn!(dim, error = %e, "Index build failed, previous cache kept");
                Err(e)
            }
        }
    }

    /// Load version and records on a blocking thread. Callers hold `load_gate`.
    async fn fetch(&self) -> Result<(CatalogVersion, Vec<CatalogEntity>), VectorError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let source = Arc::clone(&self.source);
        let loaded = tokio::task::spawn_blocking(move || {
            let version = source.version()?;
            let records = source.load_all()?;
            Ok::<_, StorageError>((version, records))
        })
        .await
        .map_err(|e| VectorError::BuildTask(e.to_string()))??;
        Ok(loaded)
    }
}
