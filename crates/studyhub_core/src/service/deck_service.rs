//! Flashcard deck use-case service.
//!
//! # Responsibility
//! - CRUD over named decks and their card sequences.
//! - Own the session-local navigation state (card cursor, flip orientation).
//!
//! # Invariants
//! - Deck contents and the active-deck selection persist; cursor and flip do
//!   not, and both reset whenever the selection changes.
//! - The persisted active-deck id always references an existing deck or is
//!   null; a stale id found at load time is cleared.
//! - The card cursor stays inside `[0, cards.len() - 1]`; navigation clamps,
//!   it never errors.

use crate::cell::PersistedCell;
use crate::model::deck::{Card, Deck, DeckId};
use crate::model::ValidationError;
use crate::store::{keys, StoreAdapter};
use log::debug;
use std::cell::Cell;
use std::rc::Rc;

/// One card-cursor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStep {
    Previous,
    Next,
}

/// Owned state object for the flashcard tool.
pub struct DeckService {
    decks: PersistedCell<Vec<Deck>>,
    active_deck: PersistedCell<Option<DeckId>>,
    current_card_index: Cell<usize>,
    is_flipped: Cell<bool>,
}

impl DeckService {
    /// Builds the service over the persisted `flashcard-*` keys.
    ///
    /// A persisted active-deck id that no longer resolves to an existing
    /// deck is treated as no selection and written back as null.
    pub fn new(store: Rc<StoreAdapter>) -> Self {
        let decks = PersistedCell::new(Rc::clone(&store), keys::FLASHCARD_DECKS, Vec::<Deck>::new());
        let active_deck = PersistedCell::new(store, keys::FLASHCARD_ACTIVE_DECK, None);

        if let Some(id) = active_deck.get() {
            let exists = decks.with(|decks| decks.iter().any(|deck| deck.id == id));
            if !exists {
                debug!("event=deck_select module=decks status=stale_cleared id={id}");
                active_deck.set(None);
            }
        }

        Self {
            decks,
            active_deck,
            current_card_index: Cell::new(0),
            is_flipped: Cell::new(false),
        }
    }

    /// Appends a new empty deck and returns its id.
    ///
    /// # Errors
    /// - `ValidationError::EmptyDeckName` when `name` trims to nothing.
    pub fn create_deck(&self, name: &str) -> Result<DeckId, ValidationError> {
        let deck = Deck::new(name)?;
        let id = deck.id;
        self.decks.update(|decks| {
            let mut next = decks.clone();
            next.push(deck.clone());
            next
        });
        debug!("event=deck_create module=decks status=ok id={id}");
        Ok(id)
    }

    /// Appends a card to the deck with `deck_id`; unknown ids are no-ops.
    ///
    /// # Errors
    /// - `ValidationError::EmptyCardField` when either field trims to
    ///   nothing; validation runs before the deck lookup, so an invalid card
    ///   is rejected even for unknown decks.
    pub fn add_card(
        &self,
        deck_id: DeckId,
        question: &str,
        answer: &str,
    ) -> Result<(), ValidationError> {
        let card = Card::new(question, answer)?;
        if !self.contains(deck_id) {
            debug!("event=card_add module=decks status=noop deck={deck_id}");
            return Ok(());
        }
        self.decks.update(|decks| {
            let mut next = decks.clone();
            if let Some(deck) = next.iter_mut().find(|deck| deck.id == deck_id) {
                deck.cards.push(card.clone());
            }
            next
        });
        debug!("event=card_add module=decks status=ok deck={deck_id}");
        Ok(())
    }

    /// Sets the active deck and resets cursor and flip state.
    ///
    /// An id that does not resolve to an existing deck behaves as selecting
    /// nothing (silent, per the forgiving UI mutation contract).
    pub fn select_deck(&self, id: Option<DeckId>) {
        let resolved = id.filter(|id| self.contains(*id));
        if id.is_some() && resolved.is_none() {
            debug!("event=deck_select module=decks status=unknown_as_none");
        }
        self.active_deck.set(resolved);
        self.current_card_index.set(0);
        self.is_flipped.set(false);
    }

    /// Removes the deck with `id`; unknown ids are no-ops.
    ///
    /// Deleting the active deck clears the selection (and with it the
    /// session-local cursor and flip state).
    pub fn delete_deck(&self, id: DeckId) {
        if !self.contains(id) {
            debug!("event=deck_delete module=decks status=noop id={id}");
            return;
        }
        self.decks
            .update(|decks| decks.iter().filter(|deck| deck.id != id).cloned().collect());
        if self.active_deck.get() == Some(id) {
            self.select_deck(None);
        }
        debug!("event=deck_delete module=decks status=ok id={id}");
    }

    /// Moves the card cursor one step, clamped to the active deck's bounds,
    /// and resets the flip orientation.
    ///
    /// Out-of-range requests clamp; with no selection or an empty deck the
    /// cursor stays at 0.
    pub fn navigate_card(&self, direction: CardStep) {
        let card_count = self
            .active_deck_snapshot()
            .map_or(0, |deck| deck.cards.len());
        let last = card_count.saturating_sub(1);

        let current = self.current_card_index.get();
        let next = match direction {
            CardStep::Previous => current.saturating_sub(1),
            CardStep::Next => current.saturating_add(1).min(last),
        };

        self.current_card_index.set(next.min(last));
        self.is_flipped.set(false);
    }

    /// Toggles the flip orientation of the current card.
    pub fn flip_card(&self) {
        self.is_flipped.set(!self.is_flipped.get());
    }

    /// Snapshot of all decks in insertion order.
    pub fn decks(&self) -> Vec<Deck> {
        self.decks.get()
    }

    pub fn active_deck_id(&self) -> Option<DeckId> {
        self.active_deck.get()
    }

    /// Snapshot of the active deck, when one is selected.
    pub fn active_deck_snapshot(&self) -> Option<Deck> {
        let id = self.active_deck.get()?;
        self.decks
            .with(|decks| decks.iter().find(|deck| deck.id == id).cloned())
    }

    /// The card under the cursor, when the active deck has any.
    pub fn current_card(&self) -> Option<Card> {
        let deck = self.active_deck_snapshot()?;
        deck.cards.get(self.current_card_index.get()).cloned()
    }

    pub fn current_card_index(&self) -> usize {
        self.current_card_index.get()
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped.get()
    }

    fn contains(&self, id: DeckId) -> bool {
        self.decks.with(|decks| decks.iter().any(|deck| deck.id == id))
    }
}
