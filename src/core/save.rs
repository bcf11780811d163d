use crate::core::job::SerialJob;
use crate::core::navigation::NavigationEditor;
use crate::domain::model::NavigationItem;
use crate::domain::ports::{NavigationStore, Notifier};
use crate::utils::error::{DesignError, Result};
use std::sync::Arc;

/// Validate-then-persist for the navigation list, one save at a time.
pub struct SaveWorkflow {
    editor: NavigationEditor,
    store: Arc<dyn NavigationStore>,
    notifier: Arc<dyn Notifier>,
    job: SerialJob,
}

impl SaveWorkflow {
    pub fn new(
        editor: NavigationEditor,
        store: Arc<dyn NavigationStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            editor,
            store,
            notifier,
            job: SerialJob::new("save-navigation"),
        }
    }

    /// Overlapping calls are queued and run in order.
    #[tracing::instrument(name = "save_navigation", skip_all)]
    pub async fn save(&self) -> Result<Vec<NavigationItem>> {
        let result = self.job.perform(self.validate_and_persist()).await;

        if let Err(error) = &result {
            if error.is_silent() || self.job.is_cancelled() {
                tracing::debug!("Navigation save stopped without a reportable error: {}", error);
            } else {
                tracing::error!("Navigation save failed: {}", error);
                self.notifier.show_api_error(error);
            }
        }
        result
    }

    async fn validate_and_persist(&self) -> Result<Vec<NavigationItem>> {
        let (draft, items) = self.editor.prepare_save();

        let mut batch = Vec::with_capacity(items.len() + 1);
        if let Some(draft) = &draft {
            batch.push(draft.clone());
        }
        batch.extend(items);

        self.editor.validate_items(&batch).await?;

        if self.job.is_cancelled() {
            return Err(DesignError::Cancelled);
        }
        if let Some(draft) = draft {
            if !self.editor.append_validated_draft(&draft) {
                tracing::debug!("Draft changed during validation, left out of this save");
            }
        }

        // Edits made while validating are part of what gets persisted.
        let items = self.editor.items();
        tracing::info!("Saving {} navigation item(s)", items.len());
        let saved = self.store.save(&items).await?;
        tracing::info!("Navigation saved");
        Ok(saved)
    }

    pub fn is_running(&self) -> bool {
        self.job.is_running()
    }

    pub fn queued(&self) -> usize {
        self.job.queued()
    }

    /// Stops the running save and everything queued behind it.
    pub fn cancel(&self) {
        self.job.cancel();
    }
}
