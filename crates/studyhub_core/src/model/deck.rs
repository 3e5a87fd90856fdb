//! Flashcard deck domain model.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one flashcard deck.
pub type DeckId = Uuid;

/// One question/answer flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub question: String,
    pub answer: String,
}

impl Card {
    /// Creates a card from raw user input.
    ///
    /// # Errors
    /// - `ValidationError::EmptyCardField` when either field trims to nothing.
    pub fn new(question: &str, answer: &str) -> Result<Self, ValidationError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyCardField("question"));
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ValidationError::EmptyCardField("answer"));
        }
        Ok(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

/// A named, ordered collection of flashcards.
///
/// Deck contents persist; the card cursor and flip orientation are
/// session-local navigation state owned by the deck service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Stable ID used for selection and card addressing.
    pub id: DeckId,
    /// Trimmed, non-empty display name.
    pub name: String,
    /// Cards in insertion order; may be empty.
    pub cards: Vec<Card>,
}

impl Deck {
    /// Creates an empty deck from raw user input.
    ///
    /// # Errors
    /// - `ValidationError::EmptyDeckName` when `name` trims to nothing.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyDeckName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: trimmed.to_string(),
            cards: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Deck};
    use crate::model::ValidationError;

    #[test]
    fn new_deck_starts_empty() {
        let deck = Deck::new("Algebra").expect("valid name");
        assert_eq!(deck.name, "Algebra");
        assert!(deck.cards.is_empty());
    }

    #[test]
    fn new_deck_rejects_empty_name() {
        assert_eq!(Deck::new(""), Err(ValidationError::EmptyDeckName));
        assert_eq!(Deck::new("  "), Err(ValidationError::EmptyDeckName));
    }

    #[test]
    fn card_rejects_empty_fields_individually() {
        assert_eq!(
            Card::new("", "an answer"),
            Err(ValidationError::EmptyCardField("question"))
        );
        assert_eq!(
            Card::new("a question", "  "),
            Err(ValidationError::EmptyCardField("answer"))
        );
    }
}
