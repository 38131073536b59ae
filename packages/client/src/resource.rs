use std::fmt;

use serde::de::DeserializeOwned;

use crate::cache::QueryCache;
use crate::fetcher::{ApiClient, HttpResource, QueryError};
use crate::infinite::InfiniteQuery;
use crate::key::QueryKey;

/// Keys and queries for one resource, e.g. `ResourceQueries::new(&client, "shop_order", "shop/orders")`.
#[derive(Debug, Clone)]
pub struct ResourceQueries {
    name: String,
    endpoint: HttpResource,
}

impl ResourceQueries {
    /// `name` scopes the cache keys; `path` is the endpoint below the API base.
    pub fn new(client: &ApiClient, name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoint: client.resource(path),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn all_key(&self) -> QueryKey {
        QueryKey::all(&self.name)
    }

    pub fn list_key<K, V, I>(&self, params: I) -> QueryKey
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        QueryKey::list(&self.name, params)
    }

    pub fn detail_key(&self, id: impl fmt::Display) -> QueryKey {
        QueryKey::detail(&self.name, id)
    }

    /// Paged list query over this endpoint with `params` as base filters.
    pub fn infinite<T, K, V, I>(&self, params: I) -> InfiniteQuery<T, HttpResource>
    where
        T: DeserializeOwned + Clone + Send + 'static,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        InfiniteQuery::new(self.list_key(params), self.endpoint.clone())
    }

    /// One row, served from `cache` while fresh.
    pub async fn detail<T>(
        &self,
        cache: &mut QueryCache<T>,
        id: impl fmt::Display,
    ) -> Result<T, QueryError>
    where
        T: DeserializeOwned + Clone,
    {
        let key = self.detail_key(&id);
        if let Some(value) = cache.get_fresh(&key) {
            return Ok(value.clone());
        }

        let value: T = self.endpoint.detail(&id).await?;
        cache.insert(key, value.clone());
        Ok(value)
    }

    /// Drop every cached list and detail of this resource, after a mutation.
    pub fn invalidate<V>(&self, cache: &mut QueryCache<V>) -> usize {
        cache.invalidate(&self.all_key())
    }
}
