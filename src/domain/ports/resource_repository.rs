//! Resource repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ResolvedResource, SearchMatch};

/// Read access to the hierarchical knowledge repository.
///
/// The decision engine only ever resolves locations and runs similarity
/// searches; it never mutates the repository. Implementations must tolerate
/// concurrent callers, since distinct pursuits may share one repository.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Resolve a location to a listing or a resource.
    ///
    /// Returns `Ok(None)` when nothing lives at `location`.
    async fn resolve(&self, location: &str) -> DomainResult<Option<ResolvedResource>>;

    /// Rank resources by similarity to `query`, closest first.
    ///
    /// `scope` restricts results to one top-level aspect.
    async fn similarity_search(
        &self,
        query: &str,
        scope: Option<&str>,
        limit: usize,
    ) -> DomainResult<Vec<SearchMatch>>;
}
