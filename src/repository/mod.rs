use anyhow::Result;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::adapter::Adapter;
use crate::builder::{CatalogPayload, MovieBuilder};
use crate::movie::{Movie, NotFoundError};

/// Which backend resource family lookups target. One repository instance
/// holds one mode; toggling never does I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Movies,
    Shows,
}

impl SearchMode {
    fn segment(self) -> &'static str {
        match self {
            SearchMode::Movies => "movie",
            SearchMode::Shows => "show",
        }
    }
}

/// Lookup orchestration against the catalog backend: issues one adapter
/// call per operation, builds Movie aggregates from the raw results and
/// applies title/year selection. Adapter failures propagate untouched;
/// the only error minted here is NotFoundError.
pub struct MovieRepository<A> {
    adapter: A,
    builder: MovieBuilder,
    mode: SearchMode,
}

impl<A: Adapter> MovieRepository<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            builder: MovieBuilder::new(),
            mode: SearchMode::default(),
        }
    }

    pub fn search_for_movies(&mut self) {
        self.mode = SearchMode::Movies;
    }

    pub fn search_for_shows(&mut self) {
        self.mode = SearchMode::Shows;
    }

    /// Exact-title search. Zero results is a success, not an error.
    #[instrument(skip(self))]
    pub async fn many_with_title(&self, title: &str) -> Result<Vec<Movie>> {
        self.search(title, "exact").await
    }

    /// Substring/fuzzy search. Match semantics belong to the backend;
    /// this side only picks the path suffix.
    #[instrument(skip(self))]
    pub async fn many_with_title_like(&self, title: &str) -> Result<Vec<Movie>> {
        self.search(title, "fuzzy").await
    }

    #[instrument(skip(self))]
    pub async fn one_of_id(&self, id: &str) -> Result<Movie> {
        let path = format!("{}/{}", self.mode.segment(), id);
        let body = self.adapter.get(&path).await?;

        // an empty or id-less body means the record does not exist
        if body.get("id").map_or(true, Value::is_null) {
            return Err(NotFoundError::id(id).into());
        }

        let payload: CatalogPayload = serde_json::from_value(body)?;
        Ok(self.builder.from_catalog(payload))
    }

    /// Exact-title lookup with year disambiguation: no year takes the
    /// first result in backend order, a year takes the first result from
    /// that year.
    #[instrument(skip(self))]
    pub async fn one_of_title(&self, title: &str, year: Option<i32>) -> Result<Movie> {
        let matches = self.many_with_title(title).await?;

        let selected = match year {
            None => matches.into_iter().next(),
            Some(year) => matches.into_iter().find(|movie| movie.year() == Some(year)),
        };

        selected.ok_or_else(|| NotFoundError::title(title, year).into())
    }

    async fn search(&self, title: &str, match_kind: &str) -> Result<Vec<Movie>> {
        let path = format!(
            "search/{}/title/{}/{}",
            self.mode.segment(),
            urlencoding::encode(title),
            match_kind
        );

        let mut body = self.adapter.get(&path).await?;
        let results: Vec<CatalogPayload> = match body.get_mut("results") {
            Some(results) => serde_json::from_value(results.take())?,
            None => Vec::new(),
        };
        debug!("Backend returned {} results", results.len());

        Ok(results
            .into_iter()
            .map(|payload| self.builder.from_catalog(payload))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Canned-response adapter: pops one queued body per get and records
    /// every requested path.
    struct StubAdapter {
        responses: Mutex<VecDeque<Value>>,
        paths: Mutex<Vec<String>>,
    }

    impl StubAdapter {
        fn returning(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                paths: Mutex::new(Vec::new()),
            }
        }

        fn requested_paths(&self) -> Vec<String> {
            self.paths.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Adapter for StubAdapter {
        async fn get(&self, path: &str) -> Result<Value> {
            self.paths.lock().unwrap().push(path.to_string());
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| json!({})))
        }
    }

    fn guardians_results() -> Value {
        json!({
            "results": [
                {
                    "id": 15,
                    "title": "Guardians of the Galaxy",
                    "release_year": 2014,
                    "poster_120x171": "www.movieposters.com",
                },
                {
                    "id": 16,
                    "title": "Guardians of the Galaxy",
                    "release_year": 2018,
                    "poster_120x171": "www.movieposters.com",
                },
            ]
        })
    }

    fn repository(responses: Vec<Value>) -> MovieRepository<StubAdapter> {
        MovieRepository::new(StubAdapter::returning(responses))
    }

    #[tokio::test]
    async fn many_with_title_returns_empty_vec_on_no_matches() {
        let repo = repository(vec![json!({"results": []})]);
        let movies = repo.many_with_title("Guardians").await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn many_with_title_builds_every_result() {
        let repo = repository(vec![guardians_results()]);
        let movies = repo.many_with_title("Guardians").await.unwrap();

        let ids: Vec<_> = movies.iter().map(Movie::identity).collect();
        assert_eq!(ids, vec!["15", "16"]);
    }

    #[tokio::test]
    async fn many_with_title_like_returns_empty_vec_on_no_matches() {
        let repo = repository(vec![json!({"results": []})]);
        let movies = repo.many_with_title_like("Guardians").await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn many_with_title_like_builds_every_result() {
        let repo = repository(vec![guardians_results()]);
        let movies = repo.many_with_title_like("Guardians").await.unwrap();
        assert_eq!(movies.len(), 2);
    }

    #[tokio::test]
    async fn one_of_id_errors_when_payload_is_empty() {
        let repo = repository(vec![json!({})]);
        let err = repo.one_of_id("15").await.unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }

    #[tokio::test]
    async fn one_of_id_builds_the_record() {
        let repo = repository(vec![json!({
            "id": 15,
            "title": "Guardians of the Galaxy",
            "release_year": 2014,
            "poster_120x171": "www.movieposters.com",
        })]);

        let movie = repo.one_of_id("15").await.unwrap();
        assert_eq!(movie.identity(), "15");
        assert_eq!(movie.title(), "Guardians of the Galaxy");
    }

    #[tokio::test]
    async fn one_of_title_without_year_takes_first_backend_result() {
        let repo = repository(vec![guardians_results()]);
        let movie = repo
            .one_of_title("Guardians of the Galaxy", None)
            .await
            .unwrap();
        assert_eq!(movie.identity(), "15");
    }

    #[tokio::test]
    async fn one_of_title_with_year_picks_matching_release() {
        let repo = repository(vec![guardians_results()]);
        let movie = repo
            .one_of_title("Guardians of the Galaxy", Some(2018))
            .await
            .unwrap();
        assert_eq!(movie.identity(), "16");
    }

    #[tokio::test]
    async fn one_of_title_with_unmatched_year_errors() {
        let repo = repository(vec![guardians_results()]);
        let err = repo
            .one_of_title("Guardians of the Galaxy", Some(2017))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }

    #[tokio::test]
    async fn one_of_title_with_no_results_errors() {
        let repo = repository(vec![json!({"results": []})]);
        let err = repo
            .one_of_title("Guardians of the Galaxy", None)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }

    #[tokio::test]
    async fn movie_mode_targets_movie_paths() {
        let mut repo = repository(vec![
            guardians_results(),
            guardians_results(),
            json!({"id": 15, "title": "Guardians of the Galaxy", "release_year": 2014}),
            guardians_results(),
        ]);
        repo.search_for_movies();

        repo.many_with_title("ghost").await.unwrap();
        repo.many_with_title_like("ghost").await.unwrap();
        repo.one_of_id("15").await.unwrap();
        repo.one_of_title("ghost", None).await.unwrap();

        let paths = repo.adapter.requested_paths();
        assert_eq!(paths.len(), 4);
        assert!(paths.iter().all(|path| path.contains("movie")));
    }

    #[tokio::test]
    async fn show_mode_targets_show_paths() {
        let mut repo = repository(vec![
            guardians_results(),
            guardians_results(),
            json!({"id": 15, "title": "Guardians of the Galaxy", "release_year": 2014}),
            guardians_results(),
        ]);
        repo.search_for_shows();

        repo.many_with_title("ghost").await.unwrap();
        repo.many_with_title_like("ghost").await.unwrap();
        repo.one_of_id("15").await.unwrap();
        repo.one_of_title("ghost", None).await.unwrap();

        let paths = repo.adapter.requested_paths();
        assert_eq!(paths.len(), 4);
        assert!(paths.iter().all(|path| path.contains("show")));
    }

    #[tokio::test]
    async fn titles_are_percent_encoded_into_the_path() {
        let repo = repository(vec![json!({"results": []})]);
        repo.many_with_title("Guardians of the Galaxy").await.unwrap();

        let paths = repo.adapter.requested_paths();
        assert_eq!(
            paths[0],
            "search/movie/title/Guardians%20of%20the%20Galaxy/exact"
        );
    }
}
