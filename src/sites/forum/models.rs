use serde::Serialize;

/// One topic card from the forum listing. Fields the card did not carry are
/// left out of the JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForumPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_date_readable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Set once the thread page has been visited; only posts with a URL get one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<Reply>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u64>,
}

impl ForumPost {
    pub fn is_empty(&self) -> bool {
        *self == ForumPost::default()
    }

    /// Display label used in progress logs.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("<untitled>")
    }
}

impl Reply {
    pub fn is_empty(&self) -> bool {
        *self == Reply::default()
    }
}
