//! Reference lists from editor-shaped bodies

use crate::common::{CacheOp, date, post, setup, today};
use blog_core::body::Body;
use blog_core::{CitationParseError, extract};
use serde_json::json;

fn body(value: serde_json::Value) -> Body {
    serde_json::from_value(value).unwrap()
}

fn numbers(body: &Body) -> Vec<String> {
    extract(body)
        .citations()
        .map(|c| c.number.as_str().to_string())
        .collect()
}

#[test]
fn test_document_order_two_then_one() {
    let body = body(json!([
        {"type": "text", "value": {"text": [
            {"type": "text", "text": "Claim"},
            {"type": "citation", "number": "2", "text": "Later"},
            {"type": "text", "text": " and another"},
            {"type": "citation", "number": "1", "text": "Earlier"}
        ]}}
    ]));
    assert_eq!(numbers(&body), ["1", "2"]);
}

#[test]
fn test_duplicate_number_keeps_first_text() {
    let body = body(json!([
        {"type": "text", "value": {"text": [
            {"type": "citation", "number": "1", "text": "First text", "url": "https://a.example"}
        ]}},
        {"type": "text", "value": {"text": [
            {"type": "citation", "number": 1, "text": "Second text"}
        ]}}
    ]));
    let refs = extract(&body);
    assert_eq!(refs.len(), 1);
    let citation = &refs.entries[0].citation;
    assert_eq!(citation.text, "First text");
    assert_eq!(citation.url.as_deref(), Some("https://a.example"));
}

#[test]
fn test_mixed_numbers_and_labels() {
    let body = body(json!([
        {"type": "text", "value": {"text": [
            {"type": "citation", "number": "b", "text": "label b"},
            {"type": "citation", "number": "10", "text": "ten"},
            {"type": "citation", "number": "a", "text": "label a"},
            {"type": "citation", "number": 9, "text": "nine"}
        ]}}
    ]));
    assert_eq!(numbers(&body), ["9", "10", "a", "b"]);
}

#[test]
fn test_nested_and_bio_citations_found() {
    let body = body(json!([
        {"type": "heading", "value": {"text": "Intro"}},
        {"type": "text", "value": {"text": [
            {"type": "strong", "children": [
                {"type": "link", "href": "/x", "children": [
                    {"type": "citation", "number": "3", "text": "deep"}
                ]}
            ]}
        ]}},
        {"type": "author_bio", "value": {
            "author_name": "Ada",
            "bio": [{"type": "citation", "number": "1", "text": "bio source"}]
        }}
    ]));
    let refs = extract(&body);
    assert_eq!(numbers(&body), ["1", "3"]);
    assert_eq!(refs.get("3").unwrap().anchors.citation_id, "cite-3");
}

#[test]
fn test_malformed_marker_skipped() {
    let body = body(json!([
        {"type": "text", "value": {"text": [
            {"type": "citation", "number": "1"},
            {"type": "citation", "text": "no number"},
            {"type": "citation", "number": "1", "text": "usable"},
            {"type": "citation", "number": "2", "text": "fine"}
        ]}}
    ]));
    let refs = extract(&body);
    assert_eq!(numbers(&body), ["1", "2"]);
    assert_eq!(refs.get("1").unwrap().citation.text, "usable");
    assert_eq!(
        refs.skipped,
        [
            CitationParseError::MissingText {
                position: 0,
                number: "1".into(),
            },
            CitationParseError::MissingNumber { position: 1 },
        ]
    );
}

#[test]
fn test_mistyped_marker_skipped() {
    let body = body(json!([
        {"type": "text", "value": {"text": [
            {"type": "citation", "number": "1", "text": "ok"},
            {"type": "citation", "number": -2, "text": "bad"},
            {"type": "citation", "number": "3", "text": false}
        ]}}
    ]));
    let refs = extract(&body);
    assert_eq!(numbers(&body), ["1"]);
    assert_eq!(
        refs.skipped,
        [
            CitationParseError::MissingNumber { position: 1 },
            CitationParseError::MissingText {
                position: 2,
                number: "3".into(),
            },
        ]
    );
}

#[test]
fn test_references_cached_by_body_version() {
    let (blog, _, cache) = setup();
    let mut article = post("cited", date(2025, 1, 1), &[]);
    article.body = body(json!([
        {"type": "text", "value": {"text": [
            {"type": "citation", "number": "1", "text": "one"}
        ]}}
    ]));
    let article = blog.save_at(article, today()).unwrap();

    cache.clear_ops();
    let first = blog.references_for(&article);
    let second = blog.references_for(&article);
    assert_eq!(first, second);
    let sets = cache
        .ops()
        .into_iter()
        .filter(|op| matches!(op, CacheOp::Set(_)))
        .count();
    assert_eq!(sets, 1);

    let mut edited = article.clone();
    edited.body = body(json!([
        {"type": "text", "value": {"text": [
            {"type": "citation", "number": "1", "text": "one"},
            {"type": "citation", "number": "2", "text": "two"}
        ]}}
    ]));
    let edited = blog.save_at(edited, today()).unwrap();
    assert_eq!(blog.references_for(&edited).len(), 2);
}
