// Orchestration properties of get_doc against deterministic in-process
// search and fetch doubles.

use std::collections::HashMap;
use std::sync::Mutex;

use docs_lookup::catalog::Catalog;
use docs_lookup::error::{
    DocsError, INVALID_PARAMS, NO_CONTENT, NO_RESULTS, SEARCH_FAILED,
};
use docs_lookup::fetch::PageFetcher;
use docs_lookup::lookup::{DocLookup, LookupConfig};
use docs_lookup::search::{SearchHit, SearchProvider};

/// Search double returning a fixed outcome and recording every query
struct ScriptedSearch {
    outcome: Result<Vec<SearchHit>, DocsError>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl ScriptedSearch {
    fn hits(links: &[&str]) -> Self {
        Self {
            outcome: Ok(links.iter().map(|link| SearchHit::new(*link)).collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn failing(err: DocsError) -> Self {
        Self {
            outcome: Err(err),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

impl SearchProvider for ScriptedSearch {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, DocsError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), num_results));
        self.outcome.clone()
    }
}

/// Fetch double serving pages from a map; unknown links fail
struct MapFetcher {
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl MapFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(link, text)| (link.to_string(), text.to_string()))
                .collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl PageFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DocsError> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| DocsError::FetchFailed(format!("404 for {url}")))
    }
}

fn lookup(search: ScriptedSearch, fetcher: MapFetcher) -> DocLookup<ScriptedSearch, MapFetcher> {
    DocLookup::new(Catalog::builtin(), search, fetcher)
}

#[tokio::test]
async fn test_flutter_scenario_joins_both_pages() {
    let search = ScriptedSearch::hits(&["https://docs.flutter.dev/a", "https://docs.flutter.dev/b"]);
    let fetcher = MapFetcher::new(&[
        ("https://docs.flutter.dev/a", "GestureDetector detects taps."),
        ("https://docs.flutter.dev/b", "Handling gestures in Flutter."),
    ]);
    let lookup = lookup(search, fetcher);

    let envelope = lookup.get_doc("gesture detector", "flutter").await;

    assert!(envelope.error.is_none());
    assert_eq!(
        envelope.result.as_deref(),
        Some("GestureDetector detects taps. Handling gestures in Flutter.")
    );
}

#[tokio::test]
async fn test_search_receives_site_scoped_query() {
    let search = ScriptedSearch::hits(&["https://docs.flutter.dev/a"]);
    let fetcher = MapFetcher::new(&[("https://docs.flutter.dev/a", "text")]);
    let lookup = lookup(search, fetcher);

    lookup.get_doc("gesture detector", "flutter").await;

    let queries = lookup_queries(&lookup);
    assert_eq!(
        queries,
        vec![("site:docs.flutter.dev gesture detector".to_string(), 5)]
    );
}

#[tokio::test]
async fn test_unknown_library_never_searches() {
    let search = ScriptedSearch::hits(&["https://docs.flutter.dev/a"]);
    let fetcher = MapFetcher::new(&[]);
    let lookup = lookup(search, fetcher);

    for library in ["unknown-lib", "", "Flutter", "stackoverflow.com"] {
        let envelope = lookup.get_doc("anything", library).await;

        assert!(envelope.result.is_none());
        let error = envelope.error.expect("error envelope");
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(
            error.message,
            "Unsupported library. Choose from: flutter, stackoverflow"
        );
    }

    assert!(lookup_queries(&lookup).is_empty());
}

#[tokio::test]
async fn test_search_failure_is_propagated_unchanged() {
    let failure = DocsError::SearchFailed("HTTP status server error (500)".to_string());
    let search = ScriptedSearch::failing(failure.clone());
    let fetcher = MapFetcher::new(&[]);
    let lookup = lookup(search, fetcher);

    let envelope = lookup.get_doc("q", "stackoverflow").await;

    let error = envelope.error.expect("error envelope");
    assert_eq!(error.code, SEARCH_FAILED);
    assert_eq!(error.message, failure.to_string());
}

#[tokio::test]
async fn test_zero_results() {
    let lookup = lookup(ScriptedSearch::hits(&[]), MapFetcher::new(&[]));

    let envelope = lookup.get_doc("q", "flutter").await;

    assert!(envelope.result.is_none());
    let error = envelope.error.expect("error envelope");
    assert_eq!(error.code, NO_RESULTS);
    assert_eq!(error.message, "No results found");
}

#[tokio::test]
async fn test_all_fetches_fail_is_no_content() {
    let search = ScriptedSearch::hits(&["https://a.example/1", "https://a.example/2", ""]);
    let lookup = lookup(search, MapFetcher::new(&[]));

    let envelope = lookup.get_doc("q", "flutter").await;

    assert!(envelope.result.is_none());
    let error = envelope.error.expect("error envelope");
    assert_eq!(error.code, NO_CONTENT);
    assert_eq!(error.message, "Could not fetch any content");
}

#[tokio::test]
async fn test_empty_pages_count_as_failures() {
    let search = ScriptedSearch::hits(&["https://a.example/1"]);
    let fetcher = MapFetcher::new(&[("https://a.example/1", "")]);
    let lookup = lookup(search, fetcher);

    let envelope = lookup.get_doc("q", "flutter").await;
    assert_eq!(envelope.error.map(|e| e.code), Some(NO_CONTENT));
}

#[tokio::test]
async fn test_partial_failure_keeps_successes_in_order() {
    let search = ScriptedSearch::hits(&[
        "https://a.example/1",
        "https://a.example/broken",
        "https://a.example/3",
        "https://a.example/also-broken",
        "https://a.example/5",
    ]);
    let fetcher = MapFetcher::new(&[
        ("https://a.example/1", "one"),
        ("https://a.example/3", "three"),
        ("https://a.example/5", "five"),
    ]);
    let lookup = lookup(search, fetcher);

    let envelope = lookup.get_doc("q", "stackoverflow").await;

    assert!(envelope.error.is_none());
    assert_eq!(envelope.result.as_deref(), Some("one three five"));
}

#[tokio::test]
async fn test_every_link_is_attempted_in_order() {
    let links = [
        "https://a.example/1",
        "https://a.example/2",
        "https://a.example/3",
    ];
    let search = ScriptedSearch::hits(&links);
    let fetcher = MapFetcher::new(&[("https://a.example/2", "two")]);
    let lookup = lookup(search, fetcher);

    lookup.get_doc("q", "flutter").await;

    assert_eq!(lookup_fetched(&lookup), links.to_vec());
}

#[tokio::test]
async fn test_hits_without_links_are_skipped() {
    let search = ScriptedSearch {
        outcome: Ok(vec![
            SearchHit::default(),
            SearchHit::new(""),
            SearchHit::new("https://a.example/2"),
        ]),
        queries: Mutex::new(Vec::new()),
    };
    let fetcher = MapFetcher::new(&[("https://a.example/2", "two")]);
    let lookup = lookup(search, fetcher);

    let envelope = lookup.get_doc("q", "flutter").await;

    assert_eq!(envelope.result.as_deref(), Some("two"));
    assert_eq!(lookup_fetched(&lookup), vec!["https://a.example/2"]);
}

#[tokio::test]
async fn test_combined_output_truncated_to_exact_max() {
    let page = "x".repeat(6_000);
    let search = ScriptedSearch::hits(&["https://a.example/1", "https://a.example/2"]);
    let fetcher = MapFetcher::new(&[
        ("https://a.example/1", page.as_str()),
        ("https://a.example/2", page.as_str()),
    ]);
    let lookup = lookup(search, fetcher);

    let result = lookup.get_doc("q", "flutter").await.result.expect("success");

    assert_eq!(result.chars().count(), 10_000);
    assert_eq!(&result[..6_000], page);
    assert_eq!(&result[6_000..6_001], " ");
}

#[tokio::test]
async fn test_custom_output_limit_counts_characters() {
    let search = ScriptedSearch::hits(&["https://a.example/1", "https://a.example/2"]);
    let fetcher = MapFetcher::new(&[
        ("https://a.example/1", "ééééé"),
        ("https://a.example/2", "ààààà"),
    ]);
    let lookup = lookup(search, fetcher).with_config(LookupConfig {
        max_output_chars: 7,
        ..LookupConfig::default()
    });

    let result = lookup.get_doc("q", "flutter").await.result.expect("success");
    assert_eq!(result, "ééééé à");
}

#[tokio::test]
async fn test_short_output_is_not_padded_or_cut() {
    let search = ScriptedSearch::hits(&["https://a.example/1"]);
    let fetcher = MapFetcher::new(&[("https://a.example/1", "short")]);
    let lookup = lookup(search, fetcher);

    let envelope = lookup.get_doc("q", "flutter").await;
    assert_eq!(envelope.result.as_deref(), Some("short"));
}

#[tokio::test]
async fn test_identical_calls_yield_identical_output() {
    let search = ScriptedSearch::hits(&["https://a.example/1", "https://a.example/2"]);
    let fetcher = MapFetcher::new(&[("https://a.example/2", "stable text")]);
    let lookup = lookup(search, fetcher);

    let first = lookup.get_doc("gesture detector", "flutter").await;
    let second = lookup.get_doc("gesture detector", "flutter").await;

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_concurrent_fetching_preserves_order() {
    let links: Vec<String> = (1..=7).map(|i| format!("https://a.example/{i}")).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    let pages: Vec<(String, String)> = links
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 1)
        .map(|(i, link)| (link.clone(), format!("page{}", i + 1)))
        .collect();
    let page_refs: Vec<(&str, &str)> = pages
        .iter()
        .map(|(link, text)| (link.as_str(), text.as_str()))
        .collect();

    let sequential = lookup(
        ScriptedSearch::hits(&link_refs),
        MapFetcher::new(&page_refs),
    );
    let concurrent = lookup(
        ScriptedSearch::hits(&link_refs),
        MapFetcher::new(&page_refs),
    )
    .with_config(LookupConfig {
        fetch_concurrency: 3,
        ..LookupConfig::default()
    });

    let expected = "page1 page3 page4 page6 page7";
    assert_eq!(
        sequential.get_doc("q", "flutter").await.result.as_deref(),
        Some(expected)
    );
    assert_eq!(
        concurrent.get_doc("q", "flutter").await.result.as_deref(),
        Some(expected)
    );
}

#[tokio::test]
async fn test_num_results_is_forwarded() {
    let search = ScriptedSearch::hits(&["https://a.example/1"]);
    let fetcher = MapFetcher::new(&[("https://a.example/1", "text")]);
    let lookup = lookup(search, fetcher).with_config(LookupConfig {
        num_results: 3,
        ..LookupConfig::default()
    });

    lookup.get_doc("q", "stackoverflow").await;
    assert_eq!(
        lookup_queries(&lookup),
        vec![("site:stackoverflow.com q".to_string(), 3)]
    );
}

#[tokio::test]
async fn test_custom_catalog() {
    let catalog = Catalog::from_entries([("tokio", "docs.rs/tokio")]).unwrap();
    let search = ScriptedSearch::hits(&["https://docs.rs/tokio/latest"]);
    let fetcher = MapFetcher::new(&[("https://docs.rs/tokio/latest", "runtime docs")]);
    let lookup = DocLookup::new(catalog, search, fetcher);

    let envelope = lookup.get_doc("runtime", "tokio").await;
    assert_eq!(envelope.result.as_deref(), Some("runtime docs"));

    let envelope = lookup.get_doc("widgets", "flutter").await;
    let error = envelope.error.expect("error envelope");
    assert_eq!(error.message, "Unsupported library. Choose from: tokio");
}

fn lookup_queries(lookup: &DocLookup<ScriptedSearch, MapFetcher>) -> Vec<(String, usize)> {
    lookup.search_provider().queries()
}

fn lookup_fetched(lookup: &DocLookup<ScriptedSearch, MapFetcher>) -> Vec<String> {
    lookup.page_fetcher().fetched()
}
