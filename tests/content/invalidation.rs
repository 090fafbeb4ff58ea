//! Save-time invalidation against a recording cache

use crate::common::{date, post, setup, titles, today};
use blog_core::keys;

#[test]
fn test_updated_excerpt_visible_in_recent() {
    let (blog, _, _) = setup();
    let a1 = blog
        .save_at(post("a1", date(2025, 1, 1), &[]), today())
        .unwrap();
    assert_eq!(blog.queries().get_recent(5)[0].excerpt, "About a1");

    let mut updated = a1.clone();
    updated.excerpt = "Rewritten intro".to_string();
    blog.save_at(updated, today()).unwrap();

    assert_eq!(blog.queries().get_recent(5)[0].excerpt, "Rewritten intro");
}

#[test]
fn test_exact_keys_deleted() {
    let (blog, _, cache) = setup();
    let article = blog
        .save_at(post("a", date(2025, 1, 1), &["rust", "cache"]), today())
        .unwrap();
    let other = blog
        .save_at(post("b", date(2025, 1, 2), &["python", "rust"]), today())
        .unwrap();

    blog.queries().get_recent(5);
    blog.queries().get_recent(10);
    blog.queries().get_featured(3);
    blog.queries().get_by_tag("rust", None);
    blog.queries().get_by_tag("cache", Some(2));
    blog.queries().get_by_tag("python", None);
    blog.relationships().related(&article, 3);
    blog.relationships().related(&other, 3);

    cache.clear_ops();
    blog.save_at(article.clone(), today()).unwrap();

    let mut deleted = cache.deletes();
    deleted.sort();
    let mut expected = vec![
        "featured_posts_3".to_string(),
        "posts_by_tag_cache_2".to_string(),
        "posts_by_tag_rust_all".to_string(),
        "recent_posts_10".to_string(),
        "recent_posts_5".to_string(),
        keys::related(article.id, 3),
    ];
    expected.sort();
    assert_eq!(deleted, expected);
    assert!(cache.contains("posts_by_tag_python_all"));
    assert!(cache.contains(&keys::related(other.id, 3)));
}

#[test]
fn test_removed_tag_listing_refreshed() {
    let (blog, _, _) = setup();
    let mut article = blog
        .save_at(post("a", date(2025, 1, 1), &["python"]), today())
        .unwrap();
    assert_eq!(titles(&blog.queries().get_by_tag("python", None)), ["a"]);

    article.tags.clear();
    blog.save_at(article, today()).unwrap();

    assert!(blog.queries().get_by_tag("python", None).is_empty());
}

#[test]
fn test_failed_deletes_do_not_fail_save() {
    let (blog, store, cache) = setup();
    let article = blog
        .save_at(post("a", date(2025, 1, 1), &[]), today())
        .unwrap();
    blog.queries().get_recent(5);

    cache.clear_ops();
    cache.fail_deletes(true);
    let mut updated = article.clone();
    updated.excerpt = "changed".to_string();
    let saved = blog.save_at(updated, today()).unwrap();

    assert_eq!(cache.deletes(), ["recent_posts_5"]);
    assert_eq!(blog.get(saved.id).unwrap().excerpt, "changed");
    assert_eq!(store.len(), 1);

    // Stale until the next successful invalidation
    assert_eq!(blog.queries().get_recent(5)[0].excerpt, "About a");
    cache.fail_deletes(false);
    blog.save_at(saved, today()).unwrap();
    assert_eq!(blog.queries().get_recent(5)[0].excerpt, "changed");
}

#[test]
fn test_unpublish_leaves_listings_immediately() {
    let (blog, _, _) = setup();
    let mut article = post("a", date(2025, 1, 1), &["rust"]);
    article.featured = true;
    let article = blog.save_at(article, today()).unwrap();
    assert_eq!(blog.queries().get_recent(5).len(), 1);
    assert_eq!(blog.queries().get_featured(3).len(), 1);
    assert_eq!(blog.queries().get_by_tag("rust", None).len(), 1);

    blog.unpublish(article.id).unwrap();

    assert!(blog.queries().get_recent(5).is_empty());
    assert!(blog.queries().get_featured(3).is_empty());
    assert!(blog.queries().get_by_tag("rust", None).is_empty());
}
