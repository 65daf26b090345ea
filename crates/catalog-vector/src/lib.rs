//! # catalog-vector
//!
//! Dense embedding index and gated nearest-match search over the catalog.
//!
//! Every catalog vector is packed into one contiguous row-major `N x D`
//! matrix, so a query is scored against the whole catalog with a single
//! matrix-vector product. Results are ranked by a stable full sort and then
//! passed through a two-factor acceptance gate (absolute score and margin
//! over the runner-up).
//!
//! ## Features
//! - Exact linear-scan similarity (no approximate index structures)
//! - Lazily built, shared, immutable index snapshots
//! - At most one catalog load and build in flight; waiters share its result
//! - Explicit invalidation keyed on the catalog's change marker
//! - Optional unit-norm validation or normalization

pub mod coordinator;
pub mod error;
pub mod gate;
pub mod index;
pub mod matcher;
pub mod norm;
pub mod search;

pub use coordinator::IndexCoordinator;
pub use error::VectorError;
pub use gate::{decide, GateDecision, GatePolicy};
pub use index::{DenseIndex, IndexStats};
pub use matcher::CatalogMatcher;
pub use norm::{l2_norm, normalize_in_place, NormCheck};
pub use search::{dot, gemv, search, SearchResult};
