//!
//! librarium catalog module
//! ------------------------
//! In-memory book catalog keyed by ISBN. Each book carries its author, title and
//! a per-user review map. The catalog is seeded once at startup and mutated only
//! by the review operations.
//!
//! Key responsibilities:
//! - Public queries: full listing, ISBN lookup, author and title filters.
//! - Review ownership: at most one review per (ISBN, username), overwritten on
//!   re-submission, removable only by its owner.
//! - Empty filter results surface as not-found errors; a book with no reviews
//!   reports an explicit empty map.
//!
//! The public API centers around `SharedCatalog`, a cheap-to-clone handle over
//! an `Arc<RwLock<BTreeMap>>` shared across request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A single catalog entry. Reviews are keyed by the reviewing username, so a
/// user holds at most one review per book and re-submission overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub reviews: BTreeMap<String, String>,
}

impl Book {
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self { author: author.into(), title: title.into(), reviews: BTreeMap::new() }
    }
}

fn seed_entries() -> BTreeMap<String, Book> {
    let entries = [
        ("1", "Chinua Achebe", "Things Fall Apart"),
        ("2", "Hans Christian Andersen", "Fairy tales"),
        ("3", "Dante Alighieri", "The Divine Comedy"),
        ("4", "Unknown", "The Epic Of Gilgamesh"),
        ("5", "Unknown", "The Book Of Job"),
        ("6", "Unknown", "One Thousand and One Nights"),
        ("7", "Unknown", "Njál's Saga"),
        ("8", "Jane Austen", "Pride and Prejudice"),
        ("9", "Honoré de Balzac", "Father Goriot"),
        ("10", "Samuel Beckett", "Molloy, Malone Dies, The Unnamable, the trilogy"),
    ];
    entries
        .into_iter()
        .map(|(isbn, author, title)| (isbn.to_string(), Book::new(author, title)))
        .collect()
}

/// Thread-safe catalog handle. Reads take the shared lock, review mutations the
/// exclusive lock; locks are never held across await points.
#[derive(Clone)]
pub struct SharedCatalog {
    books: Arc<RwLock<BTreeMap<String, Book>>>,
}

impl Default for SharedCatalog {
    fn default() -> Self { Self::new() }
}

impl SharedCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self { books: Arc::new(RwLock::new(BTreeMap::new())) }
    }

    /// Create a catalog pre-populated with the standard shop inventory.
    pub fn seeded() -> Self {
        Self { books: Arc::new(RwLock::new(seed_entries())) }
    }

    /// Insert or replace a catalog entry.
    pub fn insert(&self, isbn: impl Into<String>, book: Book) {
        self.books.write().insert(isbn.into(), book);
    }

    pub fn len(&self) -> usize { self.books.read().len() }
    pub fn is_empty(&self) -> bool { self.books.read().is_empty() }

    /// Snapshot of the full catalog. An empty catalog is an empty map, not an error.
    pub fn list_all(&self) -> BTreeMap<String, Book> {
        self.books.read().clone()
    }

    pub fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        let books = self.books.read();
        match books.get(isbn) {
            Some(book) => Ok(book.clone()),
            None => Err(AppError::not_found("book_not_found", "Book not found for the given ISBN")),
        }
    }

    /// Case-insensitive exact match on the author name (not a substring search).
    pub fn get_by_author(&self, author: &str) -> AppResult<BTreeMap<String, Book>> {
        let needle = author.to_lowercase();
        let books = self.books.read();
        let matches: BTreeMap<String, Book> = books
            .iter()
            .filter(|(_, book)| book.author.to_lowercase() == needle)
            .map(|(isbn, book)| (isbn.clone(), book.clone()))
            .collect();
        if matches.is_empty() {
            return Err(AppError::not_found("author_not_found", "No books found for the given author"));
        }
        Ok(matches)
    }

    /// Case-insensitive substring containment on the title.
    pub fn get_by_title(&self, title: &str) -> AppResult<BTreeMap<String, Book>> {
        let needle = title.to_lowercase();
        let books = self.books.read();
        let matches: BTreeMap<String, Book> = books
            .iter()
            .filter(|(_, book)| book.title.to_lowercase().contains(&needle))
            .map(|(isbn, book)| (isbn.clone(), book.clone()))
            .collect();
        if matches.is_empty() {
            return Err(AppError::not_found("title_not_found", "No books found for the given title"));
        }
        Ok(matches)
    }

    /// Reviews for a book. A book with no reviews yields an empty map; only a
    /// missing ISBN is an error.
    pub fn get_reviews(&self, isbn: &str) -> AppResult<BTreeMap<String, String>> {
        let books = self.books.read();
        match books.get(isbn) {
            Some(book) => Ok(book.reviews.clone()),
            None => Err(AppError::not_found("book_not_found", "Book not found for the given ISBN")),
        }
    }

    /// Add or replace `username`'s review on the given book. Idempotent for
    /// repeated submissions of the same text.
    pub fn upsert_review(&self, isbn: &str, username: &str, review: &str) -> AppResult<()> {
        if isbn.is_empty() || review.is_empty() {
            return Err(AppError::user("missing_review", "Failed to add review: ISBN and review content are required"));
        }
        let mut books = self.books.write();
        let Some(book) = books.get_mut(isbn) else {
            return Err(AppError::not_found("book_not_found", "Book not found for the given ISBN"));
        };
        book.reviews.insert(username.to_string(), review.to_string());
        Ok(())
    }

    /// Remove `username`'s review on the given book, leaving other users'
    /// reviews intact. Ownership is the (ISBN, username) pair itself.
    pub fn delete_review(&self, isbn: &str, username: &str) -> AppResult<()> {
        let mut books = self.books.write();
        let Some(book) = books.get_mut(isbn) else {
            return Err(AppError::not_found("book_not_found", "Book not found for the given ISBN"));
        };
        if book.reviews.remove(username).is_none() {
            return Err(AppError::not_found("review_not_found", "Your review for this book not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod catalog_tests;
