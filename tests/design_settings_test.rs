use async_trait::async_trait;
use design_settings::adapters::{InMemoryThemeCache, TracingNotifier};
use design_settings::core::theme_activation::ActivationState;
use design_settings::core::theme_deletion::DeletionStep;
use design_settings::core::validation::NavigationItemValidator;
use design_settings::core::{
    ConfigProvider, DeliveryChannel, DownloadHost, NavigationStore, SessionProvider, ThemeCache,
    ThemeStore,
};
use design_settings::{
    Collaborators, DesignError, DesignSettings, NavigationItem, Result, ThemeIssue, ThemeRecord,
};
use std::sync::{Arc, Mutex};

struct Site;

impl ConfigProvider for Site {
    fn blog_url(&self) -> &str {
        "http://blog.test"
    }

    fn api_root(&self) -> &str {
        "/ghost/api/v0.1"
    }
}

impl SessionProvider for Site {
    fn access_token(&self) -> Option<String> {
        Some("session-token".to_string())
    }
}

#[derive(Default)]
struct RecordingBackend {
    saves: Mutex<Vec<Vec<NavigationItem>>>,
    destroyed: Mutex<Vec<String>>,
    activation_issues: Mutex<Option<Vec<ThemeIssue>>>,
    activation_warnings: Mutex<Vec<String>>,
}

#[async_trait]
impl NavigationStore for RecordingBackend {
    async fn save(&self, items: &[NavigationItem]) -> Result<Vec<NavigationItem>> {
        self.saves.lock().unwrap().push(items.to_vec());
        Ok(items.to_vec())
    }
}

#[async_trait]
impl ThemeStore for RecordingBackend {
    async fn activate(&self, theme: &ThemeRecord) -> Result<ThemeRecord> {
        if let Some(issues) = self.activation_issues.lock().unwrap().clone() {
            return Err(DesignError::ThemeValidation {
                message: "Theme is not compatible or contains errors.".to_string(),
                issues,
            });
        }
        Ok(ThemeRecord {
            name: theme.name.clone(),
            active: true,
            warnings: self.activation_warnings.lock().unwrap().clone(),
            errors: Vec::new(),
        })
    }

    async fn destroy(&self, theme: &ThemeRecord) -> Result<()> {
        self.destroyed.lock().unwrap().push(theme.name.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingHost {
    urls: Arc<Mutex<Vec<String>>>,
}

struct RecordingChannel(Arc<Mutex<Vec<String>>>);

impl DeliveryChannel for RecordingChannel {
    fn deliver(&self, url: &str) {
        self.0.lock().unwrap().push(url.to_string());
    }
}

impl DownloadHost for RecordingHost {
    fn attach_channel(&self) -> Arc<dyn DeliveryChannel> {
        Arc::new(RecordingChannel(Arc::clone(&self.urls)))
    }
}

struct Page {
    settings: DesignSettings,
    backend: Arc<RecordingBackend>,
    notifier: Arc<TracingNotifier>,
    cache: Arc<InMemoryThemeCache>,
    host: Arc<RecordingHost>,
}

fn page(navigation: Vec<NavigationItem>) -> Page {
    let backend = Arc::new(RecordingBackend::default());
    let notifier = Arc::new(TracingNotifier::new());
    let cache = Arc::new(InMemoryThemeCache::with_themes(vec![
        ThemeRecord::new("casper"),
        ThemeRecord::new("london"),
    ]));
    let host = Arc::new(RecordingHost::default());
    let settings = DesignSettings::new(
        navigation,
        Collaborators {
            config: Arc::new(Site),
            session: Arc::new(Site),
            notifier: notifier.clone(),
            validator: Arc::new(NavigationItemValidator),
            navigation: backend.clone(),
            themes: backend.clone(),
            theme_cache: cache.clone(),
            download_host: host.clone(),
        },
    );
    Page {
        settings,
        backend,
        notifier,
        cache,
        host,
    }
}

#[test]
fn test_blog_url_gets_trailing_slash() {
    let page = page(vec![]);
    assert_eq!(page.settings.blog_url(), "http://blog.test/");
}

#[test]
fn test_add_nav_item_without_runtime() {
    let page = page(vec![]);
    page.settings.edit_new_nav_item("Tags", "/tag/");

    let added = tokio_test::block_on(page.settings.add_nav_item())
        .unwrap()
        .unwrap();

    assert_eq!(added.label, "Tags");
    assert_eq!(page.settings.navigation().len(), 1);
    assert!(page.settings.new_nav_item().is_blank());
}

#[tokio::test]
async fn test_editing_then_saving_navigation() {
    let page = page(vec![NavigationItem::new("Home", "/")]);
    let settings = &page.settings;

    settings.edit_new_nav_item("About", "/about/");
    settings.add_nav_item().await.unwrap();
    settings.edit_new_nav_item("Blog", "");
    settings.add_nav_item().await.unwrap();

    let mut reordered = settings.navigation();
    reordered.reverse();
    settings.reorder_items(reordered.clone()).unwrap();
    assert_eq!(settings.navigation(), reordered);

    let about = settings.navigation()[1].id();
    settings.update_url("/about-us/", Some(about));
    let home = settings.navigation()[2].id();
    settings.delete_nav_item(Some(home));
    settings.delete_nav_item(None);

    let saved = settings.save().await.unwrap();

    let pairs: Vec<(&str, &str)> = saved
        .iter()
        .map(|i| (i.label.as_str(), i.url.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Blog", "/"), ("About", "/about-us/")]);
    assert_eq!(page.backend.saves.lock().unwrap().len(), 1);
    assert!(page.notifier.shown().is_empty());
}

#[tokio::test]
async fn test_invalid_item_with_blank_draft_never_persists() {
    let page = page(vec![
        NavigationItem::new("Home", "/"),
        NavigationItem::new("Broken", "not a link"),
    ]);

    let result = page.settings.save().await;

    assert!(matches!(result, Err(DesignError::ItemValidation { .. })));
    assert!(page.backend.saves.lock().unwrap().is_empty());
    assert_eq!(page.notifier.shown().len(), 1);
}

#[tokio::test]
async fn test_reset_discards_draft() {
    let page = page(vec![]);
    page.settings.edit_new_nav_item("Draft", "/draft/");
    let before = page.settings.new_nav_item().id();

    page.settings.reset();

    let draft = page.settings.new_nav_item();
    assert!(draft.is_blank());
    assert_ne!(draft.id(), before);
    page.settings.save().await.unwrap();
    assert!(page.backend.saves.lock().unwrap()[0].is_empty());
}

#[tokio::test]
async fn test_activation_with_warnings_updates_cache_and_report() {
    let page = page(vec![]);
    *page.backend.activation_warnings.lock().unwrap() = vec!["a".to_string(), "b".to_string()];

    let activated = page
        .settings
        .activate_theme(&ThemeRecord::new("london"))
        .await
        .unwrap()
        .unwrap();

    let report = page.settings.theme_report();
    assert!(activated.active);
    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.errors.len(), 0);
    assert!(report.show_warnings_modal);
    assert!(page.cache.peek("london").unwrap().active);
    assert_eq!(
        page.settings.activation_state(),
        ActivationState::Activated { with_issues: true }
    );

    page.settings.hide_theme_warnings_modal();
    assert!(!page.settings.theme_report().show_warnings_modal);
    assert!(page.settings.theme_report().warnings.is_empty());
}

#[tokio::test]
async fn test_activation_rejected_by_validation() {
    let page = page(vec![]);
    *page.backend.activation_issues.lock().unwrap() = Some(vec![
        ThemeIssue::new("x", true),
        ThemeIssue::new("y", false),
    ]);

    let result = page.settings.activate_theme(&ThemeRecord::new("casper")).await;

    assert!(matches!(result, Ok(None)));
    let report = page.settings.theme_report();
    assert_eq!(report.fatal_errors, vec![ThemeIssue::new("x", true)]);
    assert_eq!(report.normal_errors, vec![ThemeIssue::new("y", false)]);
    assert!(report.show_errors_modal);
    assert!(!page.cache.peek("casper").unwrap().active);
    assert!(page.notifier.shown().is_empty());
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let page = page(vec![]);
    let casper = page.cache.peek("casper").unwrap();

    assert_eq!(
        page.settings.delete_theme(None).await.unwrap(),
        DeletionStep::NothingPending
    );
    page.settings.delete_theme(Some(casper.clone())).await.unwrap();
    assert!(page.settings.show_delete_theme_modal());
    assert_eq!(page.settings.theme_to_delete(), Some(casper));
    assert!(page.backend.destroyed.lock().unwrap().is_empty());

    page.settings.delete_theme(None).await.unwrap();

    assert_eq!(*page.backend.destroyed.lock().unwrap(), vec!["casper".to_string()]);
    assert!(page.cache.peek("casper").is_none());
    assert!(page.cache.peek("london").is_some());
}

#[tokio::test]
async fn test_hide_delete_modal_cancels() {
    let page = page(vec![]);
    page.settings
        .delete_theme(Some(ThemeRecord::new("london")))
        .await
        .unwrap();

    page.settings.hide_delete_theme_modal();
    page.settings.delete_theme(None).await.unwrap();

    assert!(page.backend.destroyed.lock().unwrap().is_empty());
    assert!(!page.settings.show_delete_theme_modal());
}

#[test]
fn test_download_builds_signed_url() {
    let page = page(vec![]);

    page.settings.download_theme(&ThemeRecord::new("casper")).unwrap();
    page.settings.download_theme(&ThemeRecord::new("london")).unwrap();

    assert_eq!(
        *page.host.urls.lock().unwrap(),
        vec![
            "/ghost/api/v0.1/themes/casper/download/?access_token=session-token".to_string(),
            "/ghost/api/v0.1/themes/london/download/?access_token=session-token".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_teardown_stops_workflows() {
    let page = page(vec![NavigationItem::new("Home", "/")]);

    page.settings.teardown();

    assert!(matches!(page.settings.save().await, Err(DesignError::Cancelled)));
    assert!(matches!(
        page.settings.activate_theme(&ThemeRecord::new("casper")).await,
        Err(DesignError::Cancelled)
    ));
    assert!(page.backend.saves.lock().unwrap().is_empty());
    assert!(page.notifier.shown().is_empty());
    assert_eq!(page.settings.activation_state(), ActivationState::Idle);
}
