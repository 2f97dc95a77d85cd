use super::models::Reply;
use log::{debug, warn};
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

static JSON_LD: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector")
});

const LIKE_ACTIONS: [&str; 2] = ["http://schema.org/LikeAction", "https://schema.org/LikeAction"];

/// Collects thread replies from the page's JSON-LD `WebPage` block.
///
/// Blocks that fail to parse are logged and skipped, as is any single
/// comment that is not shaped like one, so a broken page yields an empty
/// list rather than an error.
pub fn parse_post_replies(html: &str) -> Vec<Reply> {
    let document = Html::parse_document(html);
    let mut replies = Vec::new();

    for script in document.select(&JSON_LD) {
        let raw: String = script.text().collect();
        let json: Value = match serde_json::from_str(&raw) {
            Ok(json) => json,
            Err(e) => {
                warn!("Error parsing JSON from script tag: {}", e);
                continue;
            }
        };

        let objects = match json {
            Value::Array(items) => items,
            other => vec![other],
        };

        for object in &objects {
            let Some(comments) = page_comments(object) else {
                continue;
            };

            for comment in comments {
                match parse_comment(comment) {
                    Ok(reply) if !reply.is_empty() => replies.push(reply),
                    Ok(_) => {}
                    Err(e) => warn!("Error parsing individual comment: {}", e),
                }
            }
        }
    }

    debug!("Parsed {} replies", replies.len());
    replies
}

fn page_comments(object: &Value) -> Option<&Vec<Value>> {
    if object.get("@type").and_then(Value::as_str) != Some("WebPage") {
        return None;
    }
    object.get("mainEntity")?.get("comment")?.as_array()
}

fn parse_comment(comment: &Value) -> Result<Reply, String> {
    let comment = comment
        .as_object()
        .ok_or_else(|| format!("expected an object, got {}", kind(comment)))?;
    let mut reply = Reply::default();

    if let Some(author) = comment.get("author") {
        let author = author
            .as_object()
            .ok_or_else(|| format!("author is {}, not an object", kind(author)))?;
        reply.author = Some(string_or_empty(author.get("name")));
        reply.author_url = Some(string_or_empty(author.get("url")));
    }

    reply.content = comment.get("text").map(as_text);
    reply.posted_date = comment.get("dateCreated").map(as_text);
    reply.published_date = comment.get("datePublished").map(as_text);
    reply.modified_date = comment.get("dateModified").map(as_text);
    reply.reply_url = comment.get("url").map(as_text);

    if let Some(stats) = comment.get("interactionStatistic") {
        let stats = match stats {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            single => vec![single],
        };
        for stat in stats {
            let is_like = stat
                .get("interactionType")
                .and_then(Value::as_str)
                .is_some_and(|t| LIKE_ACTIONS.contains(&t));
            if is_like {
                let count = stat.get("userInteractionCount").unwrap_or(&Value::Null);
                reply.upvotes = Some(interaction_count(count)?);
            }
        }
    }

    Ok(reply)
}

fn interaction_count(value: &Value) -> Result<u64, String> {
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| format!("invalid interaction count {}", n)),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("invalid interaction count {:?}", s)),
        other => Err(format!("interaction count is {}", kind(other))),
    }
}

fn string_or_empty(value: Option<&Value>) -> String {
    value.map(as_text).unwrap_or_default()
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREAD: &str = include_str!("../../../tests/fixtures/forum_thread.html");

    #[test]
    fn reads_comments_from_webpage_block() {
        let replies = parse_post_replies(THREAD);

        assert_eq!(replies.len(), 3);

        let first = &replies[0];
        assert_eq!(first.author.as_deref(), Some("Sam Lender"));
        assert_eq!(
            first.author_url.as_deref(),
            Some("https://www.biggerpockets.com/users/samlender")
        );
        assert_eq!(
            first.content.as_deref(),
            Some("Run the numbers with a 25% vacancy buffer.")
        );
        assert_eq!(first.posted_date.as_deref(), Some("2025-06-30T15:00:00Z"));
        assert_eq!(first.published_date.as_deref(), Some("2025-06-30T15:00:01Z"));
        assert_eq!(first.modified_date.as_deref(), Some("2025-06-30T16:10:00Z"));
        assert_eq!(
            first.reply_url.as_deref(),
            Some("https://www.biggerpockets.com/forums/48/topics/1201#p1")
        );
        assert_eq!(first.upvotes, Some(4));
    }

    #[test]
    fn author_without_url_gets_empty_string() {
        let replies = parse_post_replies(THREAD);
        let second = &replies[1];
        assert_eq!(second.author.as_deref(), Some("Ana"));
        assert_eq!(second.author_url.as_deref(), Some(""));
        // LikeAction without a count counts as zero.
        assert_eq!(second.upvotes, Some(0));
    }

    #[test]
    fn malformed_comment_is_skipped_not_fatal() {
        let replies = parse_post_replies(THREAD);
        // The string comment and the comment with a string author are dropped.
        assert!(replies.iter().all(|r| r.author.as_deref() != Some("broken")));
        assert_eq!(replies[2].content.as_deref(), Some("Array-form JSON-LD reply"));
        assert_eq!(replies[2].upvotes, None);
    }

    #[test]
    fn malformed_json_ld_yields_empty_list() {
        let html = r#"<html><head>
            <script type="application/ld+json">{ "@type": "WebPage", "mainEntity": </script>
        </head><body></body></html>"#;
        assert!(parse_post_replies(html).is_empty());
    }

    #[test]
    fn non_webpage_blocks_are_ignored() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Organization", "mainEntity": {"comment": [{"text": "nope"}]}}
        </script>"#;
        assert!(parse_post_replies(html).is_empty());
    }

    #[test]
    fn empty_comment_object_is_dropped() {
        let html = r#"<script type="application/ld+json">
            {"@type": "WebPage", "mainEntity": {"comment": [{}, {"text": "kept"}]}}
        </script>"#;
        let replies = parse_post_replies(html);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content.as_deref(), Some("kept"));
    }
}
