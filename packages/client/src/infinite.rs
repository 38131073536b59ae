use std::collections::BTreeMap;

use backoffice_common::CursorPage;
use tracing::warn;

use crate::cache::QueryCache;
use crate::fetcher::{PageFetcher, QueryError};
use crate::key::QueryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    /// Nothing loaded yet.
    Idle,
    Fetching,
    /// The last page carried a continuation cursor.
    HasMore,
    Exhausted,
}

/// A list query that grows page by page by following `next_cursor`.
///
/// Pages are appended in fetch order. A failed fetch leaves the loaded pages
/// and the previous state in place and keeps the error until the next fetch.
pub struct InfiniteQuery<T, F> {
    key: QueryKey,
    fetcher: F,
    pages: Vec<CursorPage<T>>,
    state: QueryState,
    settled: QueryState,
    error: Option<QueryError>,
}

impl<T, F> InfiniteQuery<T, F>
where
    T: Clone,
    F: PageFetcher<T>,
{
    /// `key` must be a list key; its parameters are sent with every page request.
    pub fn new(key: QueryKey, fetcher: F) -> Self {
        Self {
            key,
            fetcher,
            pages: Vec::new(),
            state: QueryState::Idle,
            settled: QueryState::Idle,
            error: None,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn pages(&self) -> &[CursorPage<T>] {
        &self.pages
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|p| p.items.iter())
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    pub fn has_next_page(&self) -> bool {
        self.state == QueryState::HasMore
    }

    /// Load the first page, served from `cache` while it is fresh.
    ///
    /// Returns `true` when a request was made. Either way the query restarts
    /// from that single page.
    pub async fn fetch_first_page(
        &mut self,
        cache: &mut QueryCache<CursorPage<T>>,
    ) -> Result<bool, QueryError> {
        if let Some(page) = cache.get_fresh(&self.key) {
            let page = page.clone();
            self.pages.clear();
            self.error = None;
            self.settle_with(page);
            return Ok(false);
        }

        let page = self.request(None).await?;
        cache.insert(self.key.clone(), page.clone());
        self.pages.clear();
        self.settle_with(page);
        Ok(true)
    }

    /// Append the page after the last one loaded.
    ///
    /// Returns `false` without a request once the list is exhausted.
    pub async fn fetch_next_page(&mut self) -> Result<bool, QueryError> {
        let cursor = match self.settled {
            QueryState::Exhausted => return Ok(false),
            QueryState::Idle => None,
            _ => self.pages.last().and_then(|p| p.next_cursor.clone()),
        };

        let page = self.request(cursor.as_deref()).await?;
        self.settle_with(page);
        Ok(true)
    }

    /// Forget every loaded page.
    pub fn reset(&mut self) {
        self.pages.clear();
        self.state = QueryState::Idle;
        self.settled = QueryState::Idle;
        self.error = None;
    }

    async fn request(&mut self, cursor: Option<&str>) -> Result<CursorPage<T>, QueryError> {
        self.state = QueryState::Fetching;
        let empty = BTreeMap::new();
        let params = self.key.params().unwrap_or(&empty);

        match self.fetcher.fetch_page(params, cursor).await {
            Ok(page) => {
                self.error = None;
                Ok(page)
            }
            Err(e) => {
                warn!(key = ?self.key, error = %e, "page fetch failed");
                self.state = self.settled;
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn settle_with(&mut self, page: CursorPage<T>) {
        self.settled = if page.has_more() {
            QueryState::HasMore
        } else {
            QueryState::Exhausted
        };
        self.state = self.settled;
        self.pages.push(page);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;

    type Call = (BTreeMap<String, String>, Option<String>);

    /// Replays queued responses and records every request.
    #[derive(Default)]
    struct ScriptedFetcher {
        responses: Mutex<VecDeque<Result<CursorPage<u32>, QueryError>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedFetcher {
        fn page(self, items: &[u32], next: Option<&str>) -> Self {
            self.responses.lock().unwrap().push_back(Ok(CursorPage {
                items: items.to_vec(),
                next_cursor: next.map(str::to_string),
                limit: 2,
            }));
            self
        }

        fn failure(self) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(QueryError::Transport("connection reset".into())));
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher<u32> for ScriptedFetcher {
        async fn fetch_page(
            &self,
            params: &BTreeMap<String, String>,
            cursor: Option<&str>,
        ) -> Result<CursorPage<u32>, QueryError> {
            self.calls
                .lock()
                .unwrap()
                .push((params.clone(), cursor.map(str::to_string)));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected page request")
        }
    }

    fn key() -> QueryKey {
        QueryKey::list("config", [("search", "mail")])
    }

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let fetcher = ScriptedFetcher::default()
            .page(&[5, 4], Some("c1"))
            .page(&[3, 2], Some("c2"))
            .page(&[1], None);
        let mut query = InfiniteQuery::new(key(), fetcher);
        assert_eq!(query.state(), QueryState::Idle);

        assert!(query.fetch_next_page().await.unwrap());
        assert_eq!(query.state(), QueryState::HasMore);
        assert!(query.fetch_next_page().await.unwrap());
        assert!(query.fetch_next_page().await.unwrap());
        assert_eq!(query.state(), QueryState::Exhausted);
        assert!(!query.has_next_page());

        let items: Vec<u32> = query.items().copied().collect();
        assert_eq!(items, [5, 4, 3, 2, 1]);

        let calls = query.fetcher.calls();
        let cursors: Vec<Option<&str>> = calls.iter().map(|(_, c)| c.as_deref()).collect();
        assert_eq!(cursors, [None, Some("c1"), Some("c2")]);
        assert!(calls.iter().all(|(params, _)| params["search"] == "mail"));
    }

    #[tokio::test]
    async fn exhausted_query_makes_no_request() {
        let fetcher = ScriptedFetcher::default().page(&[1], None);
        let mut query = InfiniteQuery::new(key(), fetcher);

        query.fetch_next_page().await.unwrap();
        assert!(!query.fetch_next_page().await.unwrap());
        assert_eq!(query.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn failure_restores_the_previous_state() {
        let fetcher = ScriptedFetcher::default()
            .page(&[5, 4], Some("c1"))
            .failure()
            .page(&[3], None);
        let mut query = InfiniteQuery::new(key(), fetcher);

        query.fetch_next_page().await.unwrap();
        let err = query.fetch_next_page().await.unwrap_err();
        assert!(matches!(err, QueryError::Transport(_)));
        assert_eq!(query.state(), QueryState::HasMore);
        assert_eq!(query.error(), Some(&err));
        assert_eq!(query.pages().len(), 1);

        // The retry resumes from the same cursor.
        query.fetch_next_page().await.unwrap();
        assert_eq!(query.error(), None);
        assert_eq!(query.state(), QueryState::Exhausted);
        let cursors: Vec<Option<String>> =
            query.fetcher.calls().into_iter().map(|(_, c)| c).collect();
        assert_eq!(cursors, [None, Some("c1".to_string()), Some("c1".to_string())]);
    }

    #[tokio::test]
    async fn first_failure_returns_to_idle() {
        let fetcher = ScriptedFetcher::default().failure();
        let mut query = InfiniteQuery::new(key(), fetcher);

        assert!(query.fetch_next_page().await.is_err());
        assert_eq!(query.state(), QueryState::Idle);
        assert!(query.error().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn first_page_is_served_from_a_fresh_cache() {
        let fetcher = ScriptedFetcher::default()
            .page(&[5, 4], Some("c1"))
            .page(&[9, 5], Some("c2"));
        let mut cache = QueryCache::new();
        let mut query = InfiniteQuery::new(key(), fetcher);

        assert!(query.fetch_first_page(&mut cache).await.unwrap());
        assert!(!query.fetch_first_page(&mut cache).await.unwrap());
        assert_eq!(query.fetcher.calls().len(), 1);
        assert_eq!(query.state(), QueryState::HasMore);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(query.fetch_first_page(&mut cache).await.unwrap());
        let items: Vec<u32> = query.items().copied().collect();
        assert_eq!(items, [9, 5]);
    }

    #[tokio::test]
    async fn reset_starts_over_without_a_cursor() {
        let fetcher = ScriptedFetcher::default()
            .page(&[1], None)
            .page(&[2], None);
        let mut query = InfiniteQuery::new(key(), fetcher);

        query.fetch_next_page().await.unwrap();
        query.reset();
        assert_eq!(query.state(), QueryState::Idle);
        assert!(query.fetch_next_page().await.unwrap());

        let cursors: Vec<Option<String>> =
            query.fetcher.calls().into_iter().map(|(_, c)| c).collect();
        assert_eq!(cursors, [None, None]);
    }
}
