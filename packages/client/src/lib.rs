//! Data-fetching layer for backoffice screens.
//!
//! Lists are addressed by [`QueryKey`]s, cached for [`STALE_TIME`] in a
//! [`QueryCache`] and paged through an [`InfiniteQuery`] that follows the
//! server's continuation cursor.

pub mod cache;
pub mod fetcher;
pub mod infinite;
pub mod key;
pub mod resource;

pub use cache::{QueryCache, STALE_TIME};
pub use fetcher::{ApiClient, HttpResource, PageFetcher, QueryError};
pub use infinite::{InfiniteQuery, QueryState};
pub use key::{KeySegment, QueryKey};
pub use resource::ResourceQueries;
