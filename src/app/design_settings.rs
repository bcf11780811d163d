use crate::core::download::{with_trailing_slash, DownloadDispatcher};
use crate::core::navigation::NavigationEditor;
use crate::core::save::SaveWorkflow;
use crate::core::theme_activation::{ActivationState, ThemeActivationWorkflow, ThemeReport};
use crate::core::theme_deletion::{DeletionStep, ThemeDeletionWorkflow};
use crate::core::{
    ConfigProvider, DownloadHost, ItemId, ItemValidator, NavigationItem, NavigationStore,
    Notifier, SessionProvider, ThemeCache, ThemeRecord, ThemeStore,
};
use crate::utils::error::Result;
use std::sync::Arc;

/// Everything the design page talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub config: Arc<dyn ConfigProvider>,
    pub session: Arc<dyn SessionProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub validator: Arc<dyn ItemValidator>,
    pub navigation: Arc<dyn NavigationStore>,
    pub themes: Arc<dyn ThemeStore>,
    pub theme_cache: Arc<dyn ThemeCache>,
    pub download_host: Arc<dyn DownloadHost>,
}

/// The design settings page: navigation editing plus theme management.
pub struct DesignSettings {
    config: Arc<dyn ConfigProvider>,
    theme_cache: Arc<dyn ThemeCache>,
    editor: NavigationEditor,
    save: SaveWorkflow,
    activation: ThemeActivationWorkflow,
    deletion: ThemeDeletionWorkflow,
    downloads: DownloadDispatcher,
}

impl DesignSettings {
    pub fn new(navigation: Vec<NavigationItem>, deps: Collaborators) -> Self {
        let editor = NavigationEditor::new(navigation, deps.validator);
        Self {
            save: SaveWorkflow::new(editor.clone(), deps.navigation, Arc::clone(&deps.notifier)),
            activation: ThemeActivationWorkflow::new(
                Arc::clone(&deps.themes),
                Arc::clone(&deps.notifier),
            ),
            deletion: ThemeDeletionWorkflow::new(
                deps.themes,
                Arc::clone(&deps.theme_cache),
                deps.notifier,
            ),
            downloads: DownloadDispatcher::new(
                Arc::clone(&deps.config),
                deps.session,
                deps.download_host,
            ),
            config: deps.config,
            theme_cache: deps.theme_cache,
            editor,
        }
    }

    pub fn blog_url(&self) -> String {
        with_trailing_slash(self.config.blog_url())
    }

    pub fn navigation(&self) -> Vec<NavigationItem> {
        self.editor.items()
    }

    pub fn new_nav_item(&self) -> NavigationItem {
        self.editor.draft()
    }

    pub fn edit_new_nav_item(&self, label: &str, url: &str) {
        self.editor.edit_draft(|draft| {
            draft.label = label.to_string();
            draft.url = url.to_string();
        });
    }

    pub async fn add_nav_item(&self) -> Result<Option<NavigationItem>> {
        self.editor.commit_draft().await
    }

    pub fn delete_nav_item(&self, id: Option<ItemId>) {
        self.editor.remove(id);
    }

    pub fn reorder_items(&self, items: Vec<NavigationItem>) -> Result<()> {
        self.editor.reorder(items)
    }

    pub fn update_url(&self, url: &str, id: Option<ItemId>) {
        self.editor.update_url(id, url);
    }

    pub fn reset(&self) {
        self.editor.reset_draft();
    }

    pub async fn save(&self) -> Result<Vec<NavigationItem>> {
        self.save.save().await
    }

    pub fn is_saving(&self) -> bool {
        self.save.is_running()
    }

    pub async fn activate_theme(&self, theme: &ThemeRecord) -> Result<Option<ThemeRecord>> {
        let activated = self.activation.activate(theme).await?;
        if let Some(record) = &activated {
            self.theme_cache.insert(record.clone());
        }
        Ok(activated)
    }

    pub fn activation_state(&self) -> ActivationState {
        self.activation.state()
    }

    pub fn theme_report(&self) -> ThemeReport {
        self.activation.report()
    }

    pub fn hide_theme_warnings_modal(&self) {
        self.activation.dismiss_report();
    }

    pub fn download_theme(&self, theme: &ThemeRecord) -> Result<String> {
        self.downloads.download_theme(&theme.name)
    }

    pub async fn delete_theme(&self, theme: Option<ThemeRecord>) -> Result<DeletionStep> {
        self.deletion.delete_theme(theme).await
    }

    pub fn theme_to_delete(&self) -> Option<ThemeRecord> {
        self.deletion.pending()
    }

    pub fn show_delete_theme_modal(&self) -> bool {
        self.deletion.show_confirmation()
    }

    pub fn hide_delete_theme_modal(&self) {
        self.deletion.hide_confirmation();
    }

    /// The page is going away: pending saves and activations stop without
    /// touching any more state.
    pub fn teardown(&self) {
        tracing::debug!("Tearing down design settings");
        self.save.cancel();
        self.activation.cancel();
    }
}
