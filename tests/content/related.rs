//! Related-article ranking and its cache lifetime

use crate::common::{date, post, setup, titles, today};

#[test]
fn test_single_shared_tag() {
    let (blog, _, _) = setup();
    let a = blog
        .save_at(post("A", date(2025, 1, 1), &["python"]), today())
        .unwrap();
    blog.save_at(post("B", date(2025, 1, 2), &["python", "django"]), today())
        .unwrap();
    blog.save_at(post("C", date(2025, 1, 3), &["django"]), today())
        .unwrap();

    assert_eq!(titles(&blog.relationships().related(&a, 2)), ["B"]);
}

#[test]
fn test_never_contains_source_and_respects_limit() {
    let (blog, _, _) = setup();
    let source = blog
        .save_at(post("source", date(2025, 1, 1), &["rust"]), today())
        .unwrap();
    for day in 2..=8 {
        blog.save_at(post(&day.to_string(), date(2025, 1, day), &["rust"]), today())
            .unwrap();
    }

    let related = blog.relationships().related(&source, 4);
    assert_eq!(related.len(), 4);
    assert!(related.iter().all(|a| a.id != source.id));
    assert_eq!(titles(&related), ["8", "7", "6", "5"]);
    assert!(blog.relationships().related(&source, 0).is_empty());
}

#[test]
fn test_saving_source_refreshes_its_list() {
    let (blog, _, _) = setup();
    let mut source = blog
        .save_at(post("source", date(2025, 1, 1), &["rust"]), today())
        .unwrap();
    blog.save_at(post("rusty", date(2025, 1, 2), &["rust"]), today())
        .unwrap();
    blog.save_at(post("pythonic", date(2025, 1, 3), &["python"]), today())
        .unwrap();
    assert_eq!(titles(&blog.relationships().related(&source, 3)), ["rusty"]);

    source.tags = ["python".to_string()].into();
    let source = blog.save_at(source, today()).unwrap();
    assert_eq!(titles(&blog.relationships().related(&source, 3)), ["pythonic"]);
}

/// Tag edits on another article leave this article's cached list alone
/// until the TTL runs out.
#[test]
fn test_other_article_tag_change_is_ttl_bounded() {
    let (blog, _, _) = setup();
    let a = blog
        .save_at(post("A", date(2025, 1, 1), &["python"]), today())
        .unwrap();
    blog.save_at(post("B", date(2025, 1, 2), &["python"]), today())
        .unwrap();
    let mut c = blog
        .save_at(post("C", date(2025, 1, 3), &["django"]), today())
        .unwrap();
    assert_eq!(titles(&blog.relationships().related(&a, 3)), ["B"]);

    c.tags.insert("python".to_string());
    blog.save_at(c, today()).unwrap();

    assert_eq!(titles(&blog.relationships().related(&a, 3)), ["B"]);
    // An uncached limit sees the change
    assert_eq!(titles(&blog.relationships().related(&a, 2)), ["C", "B"]);
}

#[test]
fn test_unpublished_drop_out_after_save() {
    let (blog, _, _) = setup();
    let a = blog
        .save_at(post("A", date(2025, 1, 1), &["rust"]), today())
        .unwrap();
    let b = blog
        .save_at(post("B", date(2025, 1, 2), &["rust"]), today())
        .unwrap();

    blog.unpublish(b.id).unwrap();
    assert!(blog.relationships().related(&a, 3).is_empty());
}
