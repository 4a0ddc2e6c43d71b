use crate::domain::StateError;
use ff_01_durable_store::{DurableStore, CATEGORY_KEY, VOTING_KEY};
use shared_types::{CategoryId, StatePayload};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_CATEGORY: CategoryId = 0;
pub const DEFAULT_VOTING: bool = false;

/// Cached `category` / `voting` pair backed by a [`DurableStore`].
pub struct AppState {
    store: Arc<dyn DurableStore>,
    category: CategoryId,
    voting: bool,
}

impl AppState {
    /// Initialize from the store, falling back to defaults for absent or
    /// unusable values.
    pub fn load(store: Arc<dyn DurableStore>) -> Result<Self, StateError> {
        let category = match store.get_integer(CATEGORY_KEY)? {
            None => DEFAULT_CATEGORY,
            Some(value) => CategoryId::try_from(value).unwrap_or_else(|_| {
                warn!(value, "Stored category is out of range, using default");
                DEFAULT_CATEGORY
            }),
        };
        let voting = store
            .get_integer(VOTING_KEY)?
            .map_or(DEFAULT_VOTING, |value| value != 0);

        info!(category, voting, "Application state loaded");
        Ok(Self {
            store,
            category,
            voting,
        })
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn voting(&self) -> bool {
        self.voting
    }

    pub fn snapshot(&self) -> StatePayload {
        StatePayload {
            category: self.category,
            voting: self.voting,
        }
    }

    /// Set the active category.
    ///
    /// Zero and negative values normalize to the default category. Returns
    /// whether the value changed; an unchanged value never touches the store.
    pub fn set_category(&mut self, value: i64) -> Result<bool, StateError> {
        let category = if value <= 0 {
            DEFAULT_CATEGORY
        } else {
            CategoryId::try_from(value).map_err(|_| StateError::CategoryOutOfRange(value))?
        };
        if category == self.category {
            return Ok(false);
        }

        let previous = std::mem::replace(&mut self.category, category);
        if let Err(e) = self.store.set_integer(CATEGORY_KEY, i64::from(category)) {
            self.category = previous;
            return Err(e.into());
        }
        info!(from = previous, to = category, "Category changed");
        Ok(true)
    }

    /// Open or close voting. Returns whether the value changed.
    pub fn set_voting(&mut self, voting: bool) -> Result<bool, StateError> {
        if voting == self.voting {
            return Ok(false);
        }

        self.voting = voting;
        if let Err(e) = self.store.set_integer(VOTING_KEY, i64::from(voting)) {
            self.voting = !voting;
            return Err(e.into());
        }
        info!(category = self.category, voting, "Voting toggled");
        Ok(true)
    }
}
