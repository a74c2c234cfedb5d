// Test utility module for complaintmap integration tests
#![allow(dead_code)]

use complaintmap::core::{Comment, Complaint, Post, SourceKind, SourceRef};
use complaintmap::io::load_dataset;
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Posts from `tests/fixtures/posts.json`.
pub fn fixture_posts() -> Vec<Post> {
    load_dataset(&fixture_path("posts.json"))
        .expect("Failed to load fixture dataset")
        .into_posts()
}

pub fn post(id: &str, title: &str, score: i64, comments: Vec<Comment>) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        score,
        comments,
        ..Default::default()
    }
}

pub fn comment(id: &str, body: &str, score: i64, replies: Vec<Comment>) -> Comment {
    Comment {
        id: id.to_string(),
        body: body.to_string(),
        score,
        replies,
        ..Default::default()
    }
}

/// A complaint built by hand, bypassing detection.
pub fn complaint(id: &str, text: &str, score: i64, sentiment: f64) -> Complaint {
    Complaint {
        id: id.to_string(),
        text: text.to_string(),
        score,
        confidence: 0.3,
        category: None,
        sentiment,
        contains_negative_terms: false,
        source: SourceRef {
            kind: SourceKind::Comment,
            id: id.to_string(),
            author: "tester".to_string(),
            score,
            permalink: String::new(),
            created_utc: 0.0,
        },
    }
}

pub fn ids<'a, I>(complaints: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Complaint>,
{
    complaints.into_iter().map(|c| c.id.clone()).collect()
}
