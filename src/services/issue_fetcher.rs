use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::domain::error::FetchError;
use crate::domain::models::{Issue, RepoSlug};
use crate::domain::ports::{IssuePage, IssueTracker};

/// Largest `rel="last"` page number fetched in parallel; beyond it the
/// fetcher follows `rel="next"` instead
pub const MAX_CONCURRENT_PAGES: u32 = 1000;

/// How issue pages are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Follow `rel="next"` one page at a time
    Sequential,
    /// Discover the last page from page one, then request the rest in parallel
    Concurrent { max_in_flight: usize },
}

/// Paginated retrieval of a repository's issues
///
/// Both modes return pages in page order. Any failed page aborts the whole
/// repository fetch.
pub struct IssueFetcher {
    tracker: Arc<dyn IssueTracker>,
    mode: FetchMode,
}

impl IssueFetcher {
    pub fn new(tracker: Arc<dyn IssueTracker>, mode: FetchMode) -> Self {
        Self { tracker, mode }
    }

    pub const fn mode(&self) -> FetchMode {
        self.mode
    }

    /// Fetch every issue of `repo`
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn fetch(&self, repo: &RepoSlug) -> Result<Vec<Issue>, FetchError> {
        let first_url = self.tracker.issues_url(repo);
        let first = self.fetch_page(repo, &first_url).await?;

        let issues = match self.mode {
            FetchMode::Sequential => self.follow_next(repo, first).await?,
            FetchMode::Concurrent { max_in_flight } => {
                self.fetch_remaining_concurrently(repo, first, max_in_flight)
                    .await?
            }
        };

        debug!(count = issues.len(), "fetched issues");
        Ok(issues)
    }

    async fn follow_next(&self, repo: &RepoSlug, first: IssuePage) -> Result<Vec<Issue>, FetchError> {
        let mut issues = first.issues;
        let mut next = first.links.next;

        while let Some(url) = next {
            let page = self.fetch_page(repo, &url).await?;
            issues.extend(page.issues);
            next = page.links.next;
        }

        Ok(issues)
    }

    async fn fetch_remaining_concurrently(
        &self,
        repo: &RepoSlug,
        first: IssuePage,
        max_in_flight: usize,
    ) -> Result<Vec<Issue>, FetchError> {
        let parsed = first.links.last.as_deref().and_then(LastPage::parse);
        let last = match parsed {
            Some(last) if last.number > MAX_CONCURRENT_PAGES => {
                warn!(
                    last = last.number,
                    max = MAX_CONCURRENT_PAGES,
                    "last page out of range, following next links"
                );
                return self.follow_next(repo, first).await;
            }
            Some(last) if last.number > 1 && !first.issues.is_empty() => last,
            // Nothing usable to parallelise.
            _ => return self.follow_next(repo, first).await,
        };

        let limit = max_in_flight.max(1);
        debug!(pages = last.number, limit, "fetching remaining pages concurrently");

        // `buffered` yields in input order, restoring page order.
        let pages: Vec<IssuePage> = stream::iter(2..=last.number)
            .map(|number| {
                let url = last.url_for(number);
                async move { self.fetch_page(repo, &url).await }
            })
            .buffered(limit)
            .try_collect()
            .await?;

        let mut issues = first.issues;
        for page in pages {
            issues.extend(page.issues);
        }
        Ok(issues)
    }

    async fn fetch_page(&self, repo: &RepoSlug, url: &str) -> Result<IssuePage, FetchError> {
        debug!(url, "fetching issue page");
        self.tracker.fetch_issue_page(url).await.map_err(|err| {
            error!(error = %err, url, "could not list issues");
            FetchError::from_tracker(repo, err)
        })
    }
}

/// `rel="last"` URL with its page number
struct LastPage {
    url: Url,
    number: u32,
}

impl LastPage {
    fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw).ok()?;
        let number = url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())?;
        Some(Self { url, number })
    }

    /// Same URL with its `page` parameter replaced
    fn url_for(&self, page: u32) -> String {
        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "page" {
                    page.to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();

        let mut url = self.url.clone();
        url.query_pairs_mut().clear().extend_pairs(&pairs);
        url.to_string()
    }
}
