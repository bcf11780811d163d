use crate::domain::model::NavigationItem;
use crate::domain::ports::ItemValidator;
use crate::utils::error::{DesignError, Result};
use crate::utils::validation::is_navigation_target;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;

/// Fans out item validations and joins them: every item must pass.
pub struct ValidationCoordinator {
    validator: Arc<dyn ItemValidator>,
}

impl ValidationCoordinator {
    pub fn new(validator: Arc<dyn ItemValidator>) -> Self {
        Self { validator }
    }

    /// Resolves with the first rejection; remaining validations are dropped.
    pub async fn validate_all(&self, items: &[NavigationItem]) -> Result<()> {
        tracing::debug!("Validating {} navigation item(s)", items.len());
        let checks = items.iter().map(|item| self.validator.validate(item));
        try_join_all(checks).await?;
        Ok(())
    }
}

/// The site's rules for a navigation entry. Blank entries are always valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationItemValidator;

impl NavigationItemValidator {
    pub fn check(item: &NavigationItem) -> Result<()> {
        if item.is_blank() {
            return Ok(());
        }
        if item.label.trim().is_empty() {
            return Err(DesignError::item_validation("label", "You must specify a label"));
        }
        if item.url.trim().is_empty() {
            return Err(DesignError::item_validation(
                "url",
                "You must specify a URL or relative path",
            ));
        }
        if !is_navigation_target(&item.url) {
            return Err(DesignError::item_validation(
                "url",
                "You must specify a valid URL or relative path",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemValidator for NavigationItemValidator {
    async fn validate(&self, item: &NavigationItem) -> Result<()> {
        Self::check(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_rules() {
        assert!(NavigationItemValidator::check(&NavigationItem::draft()).is_ok());
        assert!(NavigationItemValidator::check(&NavigationItem::new("Home", "/")).is_ok());
        assert!(NavigationItemValidator::check(&NavigationItem::new("Mail", "mailto:a@b.c")).is_ok());

        let err = NavigationItemValidator::check(&NavigationItem::new("", "/about/")).unwrap_err();
        assert_eq!(err.user_friendly_message(), "You must specify a label");

        let err = NavigationItemValidator::check(&NavigationItem::new("About", "")).unwrap_err();
        assert_eq!(err.user_friendly_message(), "You must specify a URL or relative path");

        let err = NavigationItemValidator::check(&NavigationItem::new("About", "about us")).unwrap_err();
        assert_eq!(
            err.user_friendly_message(),
            "You must specify a valid URL or relative path"
        );
    }

    /// Sleeps before answering so overlapping validations can be observed.
    struct SlowValidator {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ItemValidator for SlowValidator {
        async fn validate(&self, item: &NavigationItem) -> Result<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            NavigationItemValidator::check(item)
        }
    }

    #[tokio::test]
    async fn test_validations_run_concurrently() {
        let validator = Arc::new(SlowValidator {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let coordinator = ValidationCoordinator::new(validator.clone());
        let items = vec![
            NavigationItem::new("Home", "/"),
            NavigationItem::new("About", "/about/"),
            NavigationItem::new("Tag", "/tag/news/"),
        ];

        coordinator.validate_all(&items).await.unwrap();

        assert_eq!(validator.peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_batch() {
        let coordinator = ValidationCoordinator::new(Arc::new(NavigationItemValidator));
        let items = vec![
            NavigationItem::new("Home", "/"),
            NavigationItem::new("", "/broken/"),
        ];

        let result = coordinator.validate_all(&items).await;

        assert!(matches!(result, Err(DesignError::ItemValidation { .. })));
    }

    #[tokio::test]
    async fn test_empty_batch_succeeds() {
        let coordinator = ValidationCoordinator::new(Arc::new(NavigationItemValidator));
        assert!(coordinator.validate_all(&[]).await.is_ok());
    }
}
