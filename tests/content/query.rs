//! Listing tests: ordering, limits, cache-first reads and degradation

use crate::common::{FailingCache, FlakyStore, date, post, setup, titles, today};
use blog_core::{Blog, BlogConfig, DateFilter};
use std::sync::Arc;

#[test]
fn test_featured_limit_newest_first() {
    let (blog, _, _) = setup();
    for day in [3, 9, 1, 7, 5] {
        let mut article = post(&format!("day-{day}"), date(2025, 6, day), &[]);
        article.featured = true;
        blog.save_at(article, today()).unwrap();
    }
    blog.save_at(post("plain", date(2025, 6, 30), &[]), today())
        .unwrap();

    let featured = blog.queries().get_featured(3);
    assert_eq!(titles(&featured), ["day-9", "day-7", "day-5"]);
    assert!(featured.iter().all(|a| a.featured));
}

#[test]
fn test_recent_ties_keep_creation_order() {
    let (blog, _, _) = setup();
    for title in ["first", "second", "third"] {
        blog.save_at(post(title, date(2025, 1, 1), &[]), today())
            .unwrap();
    }
    blog.save_at(post("newest", date(2025, 2, 1), &[]), today())
        .unwrap();

    assert_eq!(
        titles(&blog.queries().get_recent(10)),
        ["newest", "first", "second", "third"]
    );
}

#[test]
fn test_second_read_served_from_cache() {
    let (blog, store, _) = setup();
    blog.save_at(post("a", date(2025, 1, 1), &[]), today())
        .unwrap();

    let before = store.query_count();
    let first = blog.queries().get_recent(5);
    let second = blog.queries().get_recent(5);
    assert_eq!(first, second);
    assert_eq!(store.query_count(), before + 1);

    // A different limit is a different key
    blog.queries().get_recent(4);
    assert_eq!(store.query_count(), before + 2);
}

#[test]
fn test_cache_down_still_correct() {
    let store = Arc::new(FlakyStore::new());
    let blog = Blog::new(store.clone(), Arc::new(FailingCache), BlogConfig::default());
    blog.save_at(post("a", date(2025, 1, 1), &["rust"]), today())
        .unwrap();
    blog.save_at(post("b", date(2025, 2, 1), &["rust"]), today())
        .unwrap();

    assert_eq!(titles(&blog.queries().get_recent(5)), ["b", "a"]);
    assert_eq!(titles(&blog.queries().get_by_tag("rust", Some(1))), ["b"]);
}

#[test]
fn test_store_down_yields_empty_and_recovers() {
    let (blog, store, cache) = setup();
    blog.save_at(post("a", date(2025, 1, 1), &[]), today())
        .unwrap();

    store.set_down(true);
    assert!(blog.queries().get_recent(5).is_empty());
    assert!(!cache.contains("recent_posts_5"));

    store.set_down(false);
    assert_eq!(titles(&blog.queries().get_recent(5)), ["a"]);
}

#[test]
fn test_tag_listing_without_limit_returns_all() {
    let (blog, _, _) = setup();
    for day in 1..=12 {
        blog.save_at(post(&day.to_string(), date(2025, 3, day), &["rust"]), today())
            .unwrap();
    }
    blog.save_at(post("other", date(2025, 3, 20), &["go"]), today())
        .unwrap();

    assert_eq!(blog.queries().get_by_tag("rust", None).len(), 12);
    assert_eq!(blog.queries().get_by_tag("rust", Some(5)).len(), 5);
    assert!(blog.queries().get_by_tag("RUST", None).is_empty());
}

#[test]
fn test_archive_pages() {
    let (blog, _, _) = setup();
    for day in 1..=25 {
        blog.save_at(post(&day.to_string(), date(2025, 5, day), &[]), today())
            .unwrap();
    }
    blog.save_at(post("june", date(2025, 6, 1), &[]), today())
        .unwrap();

    let page = blog.queries().archive(DateFilter::month(2025, 5), 3);
    assert_eq!(page.total, 25);
    assert_eq!(page.num_pages, 3);
    assert_eq!(titles(&page.items), ["5", "4", "3", "2", "1"]);
    assert!(!page.has_next());
    assert!(page.has_previous());
}
