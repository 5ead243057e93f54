//! # board: interface to the external project board service
//!
//! This module defines a single trait ([`BoardClient`]) and the plain data
//! types the publish pipeline exchanges with it. Two calls are consumed:
//! a list lookup (only used when the target list is configured by name) and
//! card creation.
//!
//! ## Interface & Extensibility
//! - Implement [`BoardClient`] to target another board service; the trait is
//!   agnostic of authentication and transport details.
//! - All methods are async, returning boxed error trait objects so
//!   implementors can surface transport, status and decode failures
//!   uniformly.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so the integration tests drive
//!   the whole pipeline against a deterministic mock service.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

pub type BoardError = Box<dyn std::error::Error + Send + Sync>;

/// A named list on a board, as returned by the list lookup.
#[derive(Debug, Clone)]
pub struct BoardList {
    pub id: String,
    pub name: String,
}

/// The bare minimum data needed to create a card.
pub struct NewCard<'a> {
    /// Card title; the pipeline uses the note's file name.
    pub title: &'a str,
    /// Free-text card body; the pipeline uses the note's content verbatim.
    pub body: &'a str,
    /// The board the card lands on.
    pub board_id: &'a str,
    /// The list within the board the card lands on.
    pub list_id: &'a str,
}

/// The created card as reported back by the service.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
}

/// Trait for the two board-service calls the pipeline consumes.
///
/// Implemented by the real HTTP client and by test mocks. `Send + Sync`
/// because one shared client is used from every concurrent file task.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait BoardClient: Send + Sync {
    /// Fetch all lists on a board. Used exactly once per run, and only when
    /// the target list is configured by name.
    async fn lists(&self, board_id: &str) -> Result<Vec<BoardList>, BoardError>;

    /// Create a new card in a list.
    async fn create_card<'a>(&self, req: NewCard<'a>) -> Result<Card, BoardError>;
}
