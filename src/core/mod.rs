pub mod cluster;

pub use cluster::ComplaintCluster;

use serde::{Deserialize, Serialize};

/// Where a complaint came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Post,
    Comment,
}

impl SourceKind {
    /// Prefix used when deriving complaint ids (`post-<id>`, `comment-<id>`).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

/// A top-level post with its comment tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default, alias = "content", alias = "selftext")]
    pub body: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub permalink: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_comments: Option<u64>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Title and body joined with a space; this is what the detector scores.
    pub fn analysis_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }

    /// Title, then the body on its own line when present; stored on complaints.
    pub fn display_text(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n{}", self.title, self.body)
        }
    }

    pub fn source_ref(&self) -> SourceRef {
        SourceRef {
            kind: SourceKind::Post,
            id: self.id.clone(),
            author: self.author.clone(),
            score: self.score,
            permalink: self.permalink.clone(),
            created_utc: self.created_utc,
        }
    }

    /// Total number of comments in the tree, replies included.
    pub fn comment_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Comment> = self.comments.iter().collect();
        while let Some(comment) = stack.pop() {
            count += 1;
            stack.extend(comment.replies.iter());
        }
        count
    }
}

/// A comment and its nested replies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn source_ref(&self) -> SourceRef {
        SourceRef {
            kind: SourceKind::Comment,
            id: self.id.clone(),
            author: self.author.clone(),
            score: self.score,
            permalink: self.permalink.clone(),
            created_utc: self.created_utc,
        }
    }
}

/// Provenance copied from the originating post or comment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub created_utc: f64,
}

/// Result of scoring a single piece of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub is_complaint: bool,
    pub confidence: f64,
    pub category: Option<String>,
    pub sentiment: f64,
    pub contains_negative_terms: bool,
}

impl Detection {
    /// The result for text that is too short or otherwise not a complaint.
    pub fn none() -> Self {
        Self {
            is_complaint: false,
            confidence: 0.0,
            category: None,
            sentiment: 0.0,
            contains_negative_terms: false,
        }
    }
}

/// A post or comment classified as a complaint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub sentiment: f64,
    #[serde(default)]
    pub contains_negative_terms: bool,
    pub source: SourceRef,
}

impl Complaint {
    /// Build a complaint from a detection and the unit it was made on.
    pub fn from_detection(text: String, source: SourceRef, detection: Detection) -> Self {
        Self {
            id: format!("{}-{}", source.kind.id_prefix(), source.id),
            text,
            score: source.score,
            confidence: detection.confidence,
            category: detection.category,
            sentiment: detection.sentiment,
            contains_negative_terms: detection.contains_negative_terms,
            source,
        }
    }
}

/// Input document accepted by the CLI: a bare array of posts or an object
/// that also names the subreddit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dataset {
    Posts(Vec<Post>),
    Subreddit {
        #[serde(default)]
        subreddit: Option<String>,
        posts: Vec<Post>,
    },
}

impl Dataset {
    pub fn subreddit(&self) -> Option<&str> {
        match self {
            Self::Posts(_) => None,
            Self::Subreddit { subreddit, .. } => subreddit.as_deref(),
        }
    }

    pub fn into_posts(self) -> Vec<Post> {
        match self {
            Self::Posts(posts) | Self::Subreddit { posts, .. } => posts,
        }
    }
}
