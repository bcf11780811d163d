use crate::core::validation::ValidationCoordinator;
use crate::domain::model::{ItemId, NavigationItem};
use crate::domain::ports::ItemValidator;
use crate::utils::error::{DesignError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Ordered navigation items plus the single draft slot.
#[derive(Debug, Clone)]
pub struct NavigationList {
    items: Vec<NavigationItem>,
    draft: NavigationItem,
}

impl NavigationList {
    pub fn new(items: Vec<NavigationItem>) -> Self {
        Self {
            items,
            draft: NavigationItem::draft(),
        }
    }

    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    pub fn draft(&self) -> &NavigationItem {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut NavigationItem {
        &mut self.draft
    }

    /// An untouched url means the user wants the site root.
    pub fn normalize_draft_url(&mut self) {
        if self.draft.url.is_empty() {
            self.draft.url = "/".to_string();
        }
    }

    /// Appends the current draft if it still matches `validated` and opens a fresh
    /// draft. Returns false when the draft was replaced or edited meanwhile.
    pub fn append_draft(&mut self, validated: &NavigationItem) -> bool {
        if self.draft.id() != validated.id()
            || self.draft.label != validated.label
            || self.draft.url != validated.url
        {
            return false;
        }
        let mut committed = std::mem::replace(&mut self.draft, NavigationItem::draft());
        committed.is_new = false;
        self.items.push(committed);
        true
    }

    pub fn remove(&mut self, id: Option<ItemId>) -> Option<NavigationItem> {
        let id = id?;
        let position = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(position))
    }

    pub fn reorder(&mut self, sequence: Vec<NavigationItem>) -> Result<()> {
        if !is_permutation(&self.items, &sequence) {
            return Err(DesignError::NotAPermutation);
        }
        self.items = sequence;
        Ok(())
    }

    pub fn update_url(&mut self, id: Option<ItemId>, url: &str) -> bool {
        let Some(id) = id else {
            return false;
        };
        let target = if self.draft.id() == id {
            Some(&mut self.draft)
        } else {
            self.items.iter_mut().find(|item| item.id() == id)
        };
        match target {
            Some(item) => {
                item.url = url.to_string();
                true
            }
            None => false,
        }
    }

    pub fn reset_draft(&mut self) {
        self.draft = NavigationItem::draft();
    }
}

fn is_permutation(current: &[NavigationItem], proposed: &[NavigationItem]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let mut counts: HashMap<ItemId, usize> = HashMap::new();
    for item in current {
        *counts.entry(item.id()).or_default() += 1;
    }
    for item in proposed {
        match counts.get_mut(&item.id()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    true
}

/// Shared handle over a [`NavigationList`]. Edits are allowed while a save is in
/// flight; the lock is never held across an await.
#[derive(Clone)]
pub struct NavigationEditor {
    list: Arc<Mutex<NavigationList>>,
    validator: Arc<dyn ItemValidator>,
}

impl NavigationEditor {
    pub fn new(items: Vec<NavigationItem>, validator: Arc<dyn ItemValidator>) -> Self {
        Self {
            list: Arc::new(Mutex::new(NavigationList::new(items))),
            validator,
        }
    }

    fn lock(&self) -> MutexGuard<'_, NavigationList> {
        self.list.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn validator(&self) -> Arc<dyn ItemValidator> {
        Arc::clone(&self.validator)
    }

    pub fn items(&self) -> Vec<NavigationItem> {
        self.lock().items().to_vec()
    }

    pub fn draft(&self) -> NavigationItem {
        self.lock().draft().clone()
    }

    /// Runs `edit` against the draft, e.g. while the user types a label.
    pub fn edit_draft<F: FnOnce(&mut NavigationItem)>(&self, edit: F) {
        edit(self.lock().draft_mut());
    }

    /// Validates the draft and appends it. `Ok(None)` means the draft changed
    /// while validation was running, so nothing was appended.
    pub async fn commit_draft(&self) -> Result<Option<NavigationItem>> {
        let draft = {
            let mut list = self.lock();
            list.normalize_draft_url();
            list.draft().clone()
        };

        self.validator.validate(&draft).await?;

        if !self.lock().append_draft(&draft) {
            tracing::debug!("Draft changed during validation, nothing committed");
            return Ok(None);
        }
        tracing::debug!("Committed navigation item '{}' -> {}", draft.label, draft.url);
        Ok(Some(draft))
    }

    /// Normalizes a non-blank draft and returns it with the committed items,
    /// the batch a save validates.
    pub(crate) fn prepare_save(&self) -> (Option<NavigationItem>, Vec<NavigationItem>) {
        let mut list = self.lock();
        let draft = if list.draft().is_blank() {
            None
        } else {
            list.normalize_draft_url();
            Some(list.draft().clone())
        };
        (draft, list.items().to_vec())
    }

    pub(crate) fn append_validated_draft(&self, validated: &NavigationItem) -> bool {
        self.lock().append_draft(validated)
    }

    pub async fn validate_items(&self, items: &[NavigationItem]) -> Result<()> {
        ValidationCoordinator::new(self.validator()).validate_all(items).await
    }

    pub fn remove(&self, id: Option<ItemId>) -> Option<NavigationItem> {
        self.lock().remove(id)
    }

    pub fn reorder(&self, sequence: Vec<NavigationItem>) -> Result<()> {
        self.lock().reorder(sequence)
    }

    pub fn update_url(&self, id: Option<ItemId>, url: &str) -> bool {
        self.lock().update_url(id, url)
    }

    pub fn reset_draft(&self) {
        self.lock().reset_draft();
    }
}
