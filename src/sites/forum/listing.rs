use super::models::ForumPost;
use crate::config::ForumConfig;
use log::debug;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static CARD_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        "div.tw-bg-white.tw-divide-solid.tw-divide-neutral-200.tw-divide-y.tw-shadow\
         .tw-border-neutral-400.simplified-forums__card-wrapper-compact.tw-text-sm",
    )
});
static TOPIC: LazyLock<Selector> = LazyLock::new(|| selector("div[data-topic-id]"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| {
    selector("a.tw-font-semibold.tw-text-lg.tw-leading-none.tw-text-slate-bp-dark")
});
static AUTHOR_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("a.simplified-forums__user__profile-link"));
static POSTED_AT: LazyLock<Selector> =
    LazyLock::new(|| selector("time[data-timeago-datetime-value]"));
static REPLY_COUNT: LazyLock<Selector> =
    LazyLock::new(|| selector("span.simplified-forums__card__reply-count"));
static VOTE_COUNT: LazyLock<Selector> =
    LazyLock::new(|| selector("span.tw-text-gray-300.simplified-forums__vote__count"));
static CATEGORY_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("a.simplified-forums__topic-metadata__link"));
static LOCATION_CHIP: LazyLock<Selector> =
    LazyLock::new(|| selector("div.simplified-forums__tag-location"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));

/// Text of every descendant node, each piece trimmed, concatenated.
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Extracts topic cards from a forum listing page. Only topics inside a card
/// container are considered; cards with no recognisable field are dropped.
pub fn parse_forum_posts(html: &str, site: &ForumConfig) -> Vec<ForumPost> {
    let document = Html::parse_document(html);
    let mut posts = Vec::new();

    for container in document.select(&CARD_CONTAINER) {
        for topic in container.select(&TOPIC) {
            let post = parse_topic(topic, site);
            if post.is_empty() {
                debug!(
                    "Topic {:?} had no recognisable fields",
                    topic.value().attr("data-topic-id")
                );
                continue;
            }
            posts.push(post);
        }
    }

    debug!("Parsed {} forum posts", posts.len());
    posts
}

fn parse_topic(topic: ElementRef<'_>, site: &ForumConfig) -> ForumPost {
    let mut post = ForumPost::default();

    if let Some(link) = first(topic, &TITLE_LINK) {
        post.title = Some(stripped_text(link));
        post.url = Some(site.absolute(link.value().attr("href").unwrap_or_default()));
    }

    if let Some(link) = first(topic, &AUTHOR_LINK) {
        post.author = Some(stripped_text(link));
        post.author_url = Some(site.absolute(link.value().attr("href").unwrap_or_default()));
    }

    if let Some(time) = first(topic, &POSTED_AT) {
        post.posted_date = time
            .value()
            .attr("data-timeago-datetime-value")
            .map(str::to_string);
        post.posted_date_readable = Some(time.value().attr("title").unwrap_or_default().to_string());
    }

    post.reply_count = first(topic, &REPLY_COUNT).map(stripped_text);
    post.vote_count = first(topic, &VOTE_COUNT).map(stripped_text);
    post.category = first(topic, &CATEGORY_LINK).map(stripped_text);
    post.location = first(topic, &LOCATION_CHIP)
        .and_then(|chip| first(chip, &SPAN))
        .map(stripped_text);

    post
}
