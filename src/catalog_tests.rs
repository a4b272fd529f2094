use super::*;

#[test]
fn seed_contains_standard_inventory() {
    let catalog = SharedCatalog::seeded();
    assert_eq!(catalog.len(), 10);
    let book = catalog.get_by_isbn("1").expect("seeded isbn 1");
    assert_eq!(book.author, "Chinua Achebe");
    assert_eq!(book.title, "Things Fall Apart");
    assert!(book.reviews.is_empty(), "seeded books start without reviews");
}

#[test]
fn list_all_on_empty_catalog_is_empty_map() {
    let catalog = SharedCatalog::new();
    assert!(catalog.is_empty());
    assert!(catalog.list_all().is_empty());
}

#[test]
fn isbn_lookup_hits_and_misses() {
    let catalog = SharedCatalog::seeded();
    assert!(catalog.get_by_isbn("8").is_ok());
    let err = catalog.get_by_isbn("99").unwrap_err();
    assert_eq!(err.http_status(), 404);
    assert_eq!(err.code_str(), "book_not_found");
}

#[test]
fn author_filter_is_case_insensitive_exact_match() {
    let catalog = SharedCatalog::seeded();
    let hits = catalog.get_by_author("jane austen").expect("case-folded author match");
    assert_eq!(hits.len(), 1);
    assert!(hits.contains_key("8"));

    // Partial author names do not match
    let err = catalog.get_by_author("austen").unwrap_err();
    assert_eq!(err.code_str(), "author_not_found");
    assert_eq!(err.http_status(), 404);
}

#[test]
fn author_filter_returns_all_matching_books() {
    let catalog = SharedCatalog::seeded();
    let hits = catalog.get_by_author("UNKNOWN").expect("several seeded books share the author");
    assert_eq!(hits.len(), 4);
    for isbn in ["4", "5", "6", "7"] {
        assert!(hits.contains_key(isbn), "expected isbn {} in author matches", isbn);
    }
}

#[test]
fn title_filter_is_case_insensitive_substring() {
    let catalog = SharedCatalog::new();
    catalog.insert("42", Book::new("F. Scott Fitzgerald", "The Great Gatsby"));
    let hits = catalog.get_by_title("great").expect("substring title match");
    assert_eq!(hits.len(), 1);
    assert!(hits.contains_key("42"));

    let err = catalog.get_by_title("nonexistent title").unwrap_err();
    assert_eq!(err.code_str(), "title_not_found");
    assert_eq!(err.http_status(), 404);
}

#[test]
fn title_filter_can_match_multiple_books() {
    let catalog = SharedCatalog::seeded();
    // "The" appears in several seeded titles
    let hits = catalog.get_by_title("the").expect("common word matches");
    assert!(hits.len() > 1, "expected more than one title containing 'the', got {}", hits.len());
}

#[test]
fn reviews_for_untouched_book_are_an_empty_map() {
    let catalog = SharedCatalog::seeded();
    let reviews = catalog.get_reviews("3").expect("book exists");
    assert!(reviews.is_empty());

    let err = catalog.get_reviews("99").unwrap_err();
    assert_eq!(err.code_str(), "book_not_found");
}

#[test]
fn upsert_review_validates_and_overwrites() {
    let catalog = SharedCatalog::seeded();

    let err = catalog.upsert_review("1", "alice", "").unwrap_err();
    assert_eq!(err.http_status(), 400);
    let err = catalog.upsert_review("", "alice", "fine").unwrap_err();
    assert_eq!(err.http_status(), 400);
    let err = catalog.upsert_review("99", "alice", "fine").unwrap_err();
    assert_eq!(err.http_status(), 404);

    catalog.upsert_review("1", "alice", "Loved it").expect("first review");
    assert_eq!(catalog.get_reviews("1").unwrap().get("alice").map(String::as_str), Some("Loved it"));

    // Re-submission overwrites rather than appends
    catalog.upsert_review("1", "alice", "Changed my mind").expect("overwrite");
    let reviews = catalog.get_reviews("1").unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews.get("alice").map(String::as_str), Some("Changed my mind"));
}

#[test]
fn delete_review_removes_only_the_owners_entry() {
    let catalog = SharedCatalog::seeded();
    catalog.upsert_review("2", "alice", "lyrical").unwrap();
    catalog.upsert_review("2", "bob", "dense").unwrap();

    catalog.delete_review("2", "alice").expect("owner delete");
    let reviews = catalog.get_reviews("2").unwrap();
    assert!(!reviews.contains_key("alice"));
    assert_eq!(reviews.get("bob").map(String::as_str), Some("dense"));
}

#[test]
fn delete_review_misses_are_not_found() {
    let catalog = SharedCatalog::seeded();

    let err = catalog.delete_review("99", "alice").unwrap_err();
    assert_eq!(err.code_str(), "book_not_found");

    // Book exists but this user never reviewed it
    let err = catalog.delete_review("1", "alice").unwrap_err();
    assert_eq!(err.code_str(), "review_not_found");
    assert_eq!(err.http_status(), 404);
}

#[test]
fn deleting_last_review_leaves_book_with_empty_map() {
    let catalog = SharedCatalog::seeded();
    catalog.upsert_review("5", "alice", "bleak").unwrap();
    catalog.delete_review("5", "alice").unwrap();

    // The book itself survives and reports an explicit empty map
    assert!(catalog.get_by_isbn("5").is_ok());
    assert!(catalog.get_reviews("5").unwrap().is_empty());

    // The removed entry does not reappear on later reads
    assert!(catalog.get_reviews("5").unwrap().is_empty());
    let err = catalog.delete_review("5", "alice").unwrap_err();
    assert_eq!(err.code_str(), "review_not_found");
}
