use crate::domain::model::ThemeRecord;
use crate::domain::ports::{Notifier, ThemeCache, ThemeStore};
use crate::utils::error::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionStep {
    /// Theme recorded, waiting for confirmation.
    AwaitingConfirmation(String),
    Deleted(String),
    /// Confirmation arrived with nothing pending.
    NothingPending,
}

/// Two-step delete: the first call arms, the confirming call destroys.
pub struct ThemeDeletionWorkflow {
    store: Arc<dyn ThemeStore>,
    cache: Arc<dyn ThemeCache>,
    notifier: Arc<dyn Notifier>,
    pending: Mutex<Option<ThemeRecord>>,
}

impl ThemeDeletionWorkflow {
    pub fn new(
        store: Arc<dyn ThemeStore>,
        cache: Arc<dyn ThemeCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            cache,
            notifier,
            pending: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ThemeRecord>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn pending(&self) -> Option<ThemeRecord> {
        self.lock().clone()
    }

    pub fn show_confirmation(&self) -> bool {
        self.lock().is_some()
    }

    /// `Some(theme)` only records it; `None` deletes whatever is pending.
    pub async fn delete_theme(&self, theme: Option<ThemeRecord>) -> Result<DeletionStep> {
        if let Some(theme) = theme {
            tracing::debug!("Theme '{}' awaiting delete confirmation", theme.name);
            let name = theme.name.clone();
            *self.lock() = Some(theme);
            return Ok(DeletionStep::AwaitingConfirmation(name));
        }

        let Some(theme) = self.lock().take() else {
            return Ok(DeletionStep::NothingPending);
        };

        match self.store.destroy(&theme).await {
            Ok(()) => {
                // A later upload with the same name must create, not update the stale entry.
                self.cache.evict(&theme.name);
                tracing::info!("Deleted theme '{}'", theme.name);
                Ok(DeletionStep::Deleted(theme.name))
            }
            Err(error) => {
                tracing::error!("Deleting theme '{}' failed: {}", theme.name, error);
                self.notifier.show_api_error(&error);
                Err(error)
            }
        }
    }

    pub fn hide_confirmation(&self) {
        *self.lock() = None;
    }
}
