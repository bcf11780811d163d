use crate::domain::model::{ThemeIssue, ThemeRecord};
use crate::domain::ports::{Notifier, ThemeStore};
use crate::utils::error::{DesignError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    Idle,
    Activating,
    Activated { with_issues: bool },
    RejectedByValidation,
    Failed,
}

/// What the warnings/errors dialogs render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub fatal_errors: Vec<ThemeIssue>,
    pub normal_errors: Vec<ThemeIssue>,
    pub message: Option<String>,
    pub show_warnings_modal: bool,
    pub show_errors_modal: bool,
}

#[derive(Debug)]
struct ActivationInner {
    state: ActivationState,
    report: ThemeReport,
}

pub struct ThemeActivationWorkflow {
    store: Arc<dyn ThemeStore>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<ActivationInner>,
    token: CancellationToken,
}

/// Splits issues into (fatal, normal), keeping their relative order.
pub fn partition_issues(issues: &[ThemeIssue]) -> (Vec<ThemeIssue>, Vec<ThemeIssue>) {
    issues.iter().cloned().partition(|issue| issue.fatal)
}

pub fn issues_summary(theme_name: &str) -> String {
    format!(
        "{} activated successfully but some warnings/errors were detected. \
         You are still able to use and activate the theme. Here is your report...",
        theme_name
    )
}

impl ThemeActivationWorkflow {
    pub fn new(store: Arc<dyn ThemeStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            inner: Mutex::new(ActivationInner {
                state: ActivationState::Idle,
                report: ThemeReport::default(),
            }),
            token: CancellationToken::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ActivationInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ActivationState {
        self.lock().state
    }

    pub fn report(&self) -> ThemeReport {
        self.lock().report.clone()
    }

    /// Activates `theme`. A theme validation rejection is absorbed into the report
    /// and returns `Ok(None)`; any other failure is reported and returned.
    #[tracing::instrument(name = "activate_theme", skip_all, fields(theme = %theme.name))]
    pub async fn activate(&self, theme: &ThemeRecord) -> Result<Option<ThemeRecord>> {
        if self.token.is_cancelled() {
            return Err(DesignError::Cancelled);
        }
        {
            let mut inner = self.lock();
            inner.state = ActivationState::Activating;
            inner.report = ThemeReport::default();
        }
        tracing::debug!("Activating theme '{}'", theme.name);

        let outcome = tokio::select! {
            biased;
            _ = self.token.cancelled() => return Err(DesignError::Cancelled),
            outcome = self.store.activate(theme) => outcome,
        };
        if self.token.is_cancelled() {
            return Err(DesignError::Cancelled);
        }

        match outcome {
            Ok(activated) => {
                self.apply_activated(&activated);
                Ok(Some(activated))
            }
            Err(DesignError::ThemeValidation { message, issues }) => {
                tracing::warn!(
                    "Theme '{}' rejected: {} ({} issue(s))",
                    theme.name,
                    message,
                    issues.len()
                );
                self.apply_rejected(&issues);
                Ok(None)
            }
            Err(error) => {
                tracing::error!("Activating theme '{}' failed: {}", theme.name, error);
                self.lock().state = ActivationState::Failed;
                self.notifier.show_api_error(&error);
                Err(error)
            }
        }
    }

    fn apply_activated(&self, activated: &ThemeRecord) {
        let mut inner = self.lock();
        if !activated.warnings.is_empty() {
            inner.report.warnings = activated.warnings.clone();
            inner.report.show_warnings_modal = true;
        }
        if !activated.errors.is_empty() {
            inner.report.errors = activated.errors.clone();
            inner.report.show_warnings_modal = true;
        }

        let with_issues = activated.has_issues();
        if with_issues {
            inner.report.message = Some(issues_summary(&activated.name));
            tracing::warn!(
                "Theme '{}' activated with {} warning(s) and {} error(s)",
                activated.name,
                activated.warnings.len(),
                activated.errors.len()
            );
        } else {
            tracing::info!("Theme '{}' activated", activated.name);
        }
        inner.state = ActivationState::Activated { with_issues };
    }

    fn apply_rejected(&self, issues: &[ThemeIssue]) {
        let (fatal, normal) = partition_issues(issues);
        let mut inner = self.lock();
        inner.report.fatal_errors = fatal;
        inner.report.normal_errors = normal;
        inner.report.show_errors_modal = true;
        inner.state = ActivationState::RejectedByValidation;
    }

    /// Closes both dialogs and forgets the report.
    pub fn dismiss_report(&self) {
        let mut inner = self.lock();
        inner.report = ThemeReport::default();
        inner.state = ActivationState::Idle;
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}
