use super::*;
use crate::scrapers::{MockResponse, MockScraper};

const LISTING: &str = include_str!("../../../tests/fixtures/forum_listing.html");
const THREAD: &str = include_str!("../../../tests/fixtures/forum_thread.html");

const LISTING_URL: &str =
    "https://www.biggerpockets.com/forums?conversion_id=8143&location=houston-texas";
const FIRST_THREAD: &str =
    "https://www.biggerpockets.com/forums/48/topics/1201-first-rental-in-houston-heights";
const SECOND_THREAD: &str = "https://www.biggerpockets.com/forums/52/topics/1202-cash-flow-in-katy";

#[test]
fn count_labels() {
    assert_eq!(parse_count("12 replies"), Some(12));
    assert_eq!(parse_count("1,204"), Some(1204));
    assert_eq!(parse_count("no replies yet"), None);
}

#[tokio::test]
async fn failed_thread_fetch_yields_empty_replies() {
    let mock = MockScraper::new(vec![
        (LISTING_URL, MockResponse::ok(LISTING)),
        (FIRST_THREAD, MockResponse::ok(THREAD)),
        (SECOND_THREAD, MockResponse::Fail("connection reset".into())),
    ]);
    let forum = ForumScraper::new(Box::new(mock.clone()), ForumConfig::default());

    let posts = forum.run().await.unwrap();

    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0].replies.as_ref().map(Vec::len), Some(3));
    assert_eq!(posts[1].replies, Some(Vec::new()));
    // No URL, so no thread visit and no replies key.
    assert!(posts[2].replies.is_none());

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].has_header("referer"));
    assert_eq!(
        mock.stats().get_stats().skipped_items.get("forum thread"),
        Some(&1)
    );
}

#[tokio::test]
async fn min_replies_and_max_posts_limit_thread_visits() {
    let mock = MockScraper::new(vec![
        (LISTING_URL, MockResponse::ok(LISTING)),
        (SECOND_THREAD, MockResponse::ok(THREAD)),
    ]);
    let config = ForumConfig {
        min_replies: Some(100),
        max_posts: Some(1),
        ..ForumConfig::default()
    };
    let forum = ForumScraper::new(Box::new(mock.clone()), config);

    let posts = forum.run().await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title.as_deref(), Some("Cash flow in Katy"));
    assert_eq!(mock.requests().len(), 2);
}

#[tokio::test]
async fn failed_listing_fetch_is_an_error() {
    let mock = MockScraper::new(vec![(LISTING_URL, MockResponse::Fail("dns".into()))]);
    let forum = ForumScraper::new(Box::new(mock), ForumConfig::default());

    assert!(forum.run().await.is_err());
}
