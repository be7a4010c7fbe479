mod common;

use common::{
    FakeBackend, client_with, ids, init_test_tracing, next_data, record, records, search_page,
    timeline,
};
use realtime_twitter::{
    Cursor, Endpoint, MAX_INITIAL_RESULTS, RealtimeError, SearchOptions, SearchSession, SortBy,
};
use serde_json::json;

fn newest() -> SearchOptions {
    SearchOptions::default()
}

fn hottest() -> SearchOptions {
    SearchOptions {
        sort_by: SortBy::Hottest,
        ..Default::default()
    }
}

#[tokio::test]
async fn create_sorts_newest_first_and_sets_cursors() {
    init_test_tracing();
    let fake = FakeBackend::new();
    fake.push(
        "search",
        search_page(records(&[("a", 10), ("b", 30), ("c", 20)]), Some("crumb-1")),
    );

    let session = client_with(&fake).search("ラーメン", newest()).await.unwrap();

    assert_eq!(ids(session.results()), vec!["b", "c", "a"]);
    assert_eq!(session.crumb(), Some("crumb-1"));
    assert_eq!(session.cursor_more(), Some(&Cursor::OldestTweetId("a".into())));
    assert_eq!(session.cursor_latest(), Some(&Cursor::LatestTweetId("b".into())));
    assert_eq!(session.query(), "ラーメン");
    assert_eq!(
        fake.last_call(),
        Some(Endpoint::Search {
            query: "ラーメン".into(),
            sort_by: SortBy::Newest,
            search_media: false,
        })
    );
}

#[tokio::test]
async fn create_caps_results_and_drops_duplicates() {
    let fake = FakeBackend::new();
    let mut entries: Vec<_> = (0..50).map(|i| record(&format!("t{i}"), 1000 - i)).collect();
    entries.insert(3, record("t0", 1000));
    fake.push("search", search_page(entries, Some("c")));

    let session = client_with(&fake).search("q", newest()).await.unwrap();

    assert_eq!(session.results().len(), MAX_INITIAL_RESULTS);
    let mut unique = ids(session.results());
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), MAX_INITIAL_RESULTS);
    assert_eq!(session.results()[0].id, "t0");
    assert_eq!(session.cursor_more(), Some(&Cursor::OldestTweetId("t39".into())));
}

#[tokio::test]
async fn empty_first_page_leaves_only_the_head_cursor() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(vec![], Some("c")));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();

    assert!(session.results().is_empty());
    assert_eq!(session.cursor_more(), None);
    assert_eq!(session.cursor_latest(), Some(&Cursor::Head));
    assert!(session.get_more_tweets().await.unwrap().is_empty());
    assert_eq!(fake.calls_to("more"), 0);
}

#[tokio::test]
async fn missing_crumb_disables_pagination() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("a", 1)]), None));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();

    assert_eq!(session.crumb(), None);
    assert_eq!(session.cursor_more(), None);
    assert_eq!(session.cursor_latest(), None);
    assert!(session.get_more_tweets().await.unwrap().is_empty());
    assert!(session.get_latest_tweets().await.unwrap().is_empty());
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn empty_query_is_rejected_before_fetching() {
    let fake = FakeBackend::new();
    let err = client_with(&fake).search("  ", newest()).await.unwrap_err();
    assert!(matches!(err, RealtimeError::InvalidArgument(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn malformed_first_page_fails_create() {
    let fake = FakeBackend::new();
    fake.push(
        "search",
        search_page(vec![record("a", 1), json!({ "id": "b" })], Some("c")),
    );
    let err = client_with(&fake).search("q", newest()).await.unwrap_err();
    assert!(matches!(err, RealtimeError::MalformedRecord(_)));
}

#[tokio::test]
async fn more_tweets_returns_only_the_appended_delta() {
    init_test_tracing();
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("c", 30), ("b", 20)]), Some("k")));
    fake.push("more", timeline(records(&[("b", 20), ("a", 10), ("z", 5)])));

    let client = client_with(&fake);
    let mut session = client.search("q", newest()).await.unwrap();
    let delta = session.get_more_tweets().await.unwrap();

    assert_eq!(ids(&delta), vec!["a", "z"]);
    assert_eq!(ids(session.results()), vec!["c", "b", "a", "z"]);
    assert_eq!(session.cursor_more(), Some(&Cursor::OldestTweetId("z".into())));
    match fake.last_call() {
        Some(Endpoint::More { crumb, cursor, sort_by, .. }) => {
            assert_eq!(crumb, "k");
            assert_eq!(cursor, Cursor::OldestTweetId("b".into()));
            assert_eq!(sort_by, SortBy::Newest);
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn empty_more_page_exhausts_the_session() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("b", 2)]), Some("k")));
    fake.push("more", timeline(vec![]));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();
    assert!(session.get_more_tweets().await.unwrap().is_empty());
    assert_eq!(session.cursor_more(), None);

    // Exhausted sessions do not fetch again.
    assert!(session.get_more_tweets().await.unwrap().is_empty());
    assert_eq!(fake.calls_to("more"), 1);
    assert_eq!(ids(session.results()), vec!["b"]);
}

#[tokio::test]
async fn page_that_does_not_move_the_cursor_exhausts_the_session() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("b", 2)]), Some("k")));
    fake.push("more", timeline(records(&[("b", 2)])));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();
    assert!(session.get_more_tweets().await.unwrap().is_empty());
    assert_eq!(session.cursor_more(), None);
}

#[tokio::test]
async fn failed_more_leaves_the_session_untouched() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("b", 2)]), Some("k")));
    fake.push_fetch_error("more");
    fake.push("more", timeline(vec![record("a", 1), json!({ "displayText": "no id" })]));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();
    let before_cursor = session.cursor_more().cloned();

    let err = session.get_more_tweets().await.unwrap_err();
    assert!(matches!(err, RealtimeError::Fetch(_)));
    assert_eq!(session.cursor_more().cloned(), before_cursor);
    assert_eq!(ids(session.results()), vec!["b"]);

    let err = session.get_more_tweets().await.unwrap_err();
    assert!(matches!(err, RealtimeError::MalformedRecord(_)));
    assert_eq!(session.cursor_more().cloned(), before_cursor);
    assert_eq!(ids(session.results()), vec!["b"]);
}

#[tokio::test]
async fn error_body_on_more_keeps_the_cursor() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("b", 2)]), Some("k")));
    fake.push("more", json!({ "error": "invalid crumb" }));
    fake.push("more", timeline(records(&[("a", 1)])));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();

    let err = session.get_more_tweets().await.unwrap_err();
    assert!(matches!(err, RealtimeError::MalformedRecord(_)));
    assert_eq!(session.cursor_more(), Some(&Cursor::OldestTweetId("b".into())));

    // The session is still usable once the backend recovers.
    assert_eq!(ids(&session.get_more_tweets().await.unwrap()), vec!["a"]);
}

#[tokio::test]
async fn error_body_on_latest_keeps_the_cursor() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("b", 2)]), Some("k")));
    fake.push("latest", json!({ "timeline": {} }));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();

    let err = session.get_latest_tweets().await.unwrap_err();
    assert!(matches!(err, RealtimeError::MalformedRecord(_)));
    assert_eq!(session.cursor_latest(), Some(&Cursor::LatestTweetId("b".into())));
    assert_eq!(ids(session.results()), vec!["b"]);
}

#[tokio::test]
async fn search_page_without_page_data_or_timeline_fails() {
    let fake = FakeBackend::new();
    fake.push("search", json!({ "props": { "pageProps": { "statusCode": 500 } } }));
    fake.push("search", next_data(json!({ "pagination": { "params": { "crumb": "k" } } })));

    let client = client_with(&fake);
    for _ in 0..2 {
        let err = client.search("q", newest()).await.unwrap_err();
        assert!(matches!(err, RealtimeError::MalformedRecord(_)));
    }
}

#[tokio::test]
async fn more_tweets_times_stops_once_exhausted() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("d", 4)]), Some("k")));
    fake.push("more", timeline(records(&[("c", 3)])));
    fake.push("more", timeline(records(&[("b", 2)])));
    fake.push("more", timeline(vec![]));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();
    let got = session.get_more_tweets_times(10).await.unwrap();

    assert_eq!(ids(&got), vec!["c", "b"]);
    assert_eq!(fake.calls_to("more"), 3);
    assert_eq!(session.cursor_more(), None);
}

#[tokio::test]
async fn hottest_sessions_page_by_offset_and_keep_backend_order() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("x", 1), ("y", 9)]), Some("k")));
    fake.push("more", timeline(records(&[("p", 3), ("q", 7), ("r", 5)])));

    let mut session = client_with(&fake).search("q", hottest()).await.unwrap();
    assert_eq!(ids(session.results()), vec!["x", "y"]);
    assert_eq!(session.cursor_more(), Some(&Cursor::Offset(2)));
    assert_eq!(session.cursor_latest(), None);

    let delta = session.get_more_tweets().await.unwrap();
    assert_eq!(ids(&delta), vec!["p", "q", "r"]);
    assert_eq!(session.cursor_more(), Some(&Cursor::Offset(5)));
}

#[tokio::test]
async fn latest_tweets_require_newest_order() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("x", 1)]), Some("k")));

    let mut session = client_with(&fake).search("q", hottest()).await.unwrap();
    let before = session.results().to_vec();

    let err = session.get_latest_tweets().await.unwrap_err();
    assert!(matches!(err, RealtimeError::InvalidMode(SortBy::Hottest)));
    assert_eq!(session.results(), before.as_slice());
    assert_eq!(fake.calls_to("latest"), 0);
}

#[tokio::test]
async fn latest_tweets_append_in_backend_order_and_advance() {
    init_test_tracing();
    let fake = FakeBackend::new();
    fake.push("search", search_page(records(&[("b", 20), ("a", 10)]), Some("k")));
    fake.push("latest", timeline(records(&[("d", 40), ("c", 30), ("b", 20)])));
    fake.push("latest", timeline(vec![]));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();
    let delta = session.get_latest_tweets().await.unwrap();

    assert_eq!(ids(&delta), vec!["d", "c"]);
    assert_eq!(ids(session.results()), vec!["b", "a", "d", "c"]);
    assert_eq!(session.cursor_latest(), Some(&Cursor::LatestTweetId("d".into())));
    match fake.last_call() {
        Some(Endpoint::Latest { cursor, .. }) => {
            assert_eq!(cursor, Cursor::LatestTweetId("b".into()))
        }
        other => panic!("unexpected call {other:?}"),
    }

    // Nothing new: cursor stays put.
    assert!(session.get_latest_tweets().await.unwrap().is_empty());
    assert_eq!(session.cursor_latest(), Some(&Cursor::LatestTweetId("d".into())));
}

#[tokio::test]
async fn latest_from_an_empty_session_starts_at_head() {
    let fake = FakeBackend::new();
    fake.push("search", search_page(vec![], Some("k")));
    fake.push("latest", timeline(records(&[("n", 5)])));

    let mut session = client_with(&fake).search("q", newest()).await.unwrap();
    let delta = session.get_latest_tweets().await.unwrap();

    assert_eq!(ids(&delta), vec!["n"]);
    match fake.last_call() {
        Some(Endpoint::Latest { cursor, .. }) => assert_eq!(cursor, Cursor::Head),
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn session_can_be_created_directly() {
    let fake = FakeBackend::new();
    fake.push(
        "search",
        search_page(records(&[("a", 1)]), Some("k")),
    );
    let client = client_with(&fake);
    let session = SearchSession::create(&client, "q", true, SortBy::Newest)
        .await
        .unwrap();

    assert!(session.search_media());
    assert_eq!(session.sort_by(), SortBy::Newest);
    assert!(session.trend().is_empty());
    match fake.last_call() {
        Some(Endpoint::Search { search_media, .. }) => assert!(search_media),
        other => panic!("unexpected call {other:?}"),
    }
}
