use crate::core::Notifier;
use crate::utils::error::DesignError;
use std::sync::{Mutex, PoisonError};

/// Surfaces errors through the log and remembers what was shown.
#[derive(Debug, Default)]
pub struct TracingNotifier {
    shown: Mutex<Vec<String>>,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for TracingNotifier {
    fn show_api_error(&self, error: &DesignError) {
        let message = error.user_friendly_message();
        tracing::error!("{}", message);
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_friendly_messages() {
        let notifier = TracingNotifier::new();
        notifier.show_api_error(&DesignError::item_validation("label", "You must specify a label"));
        notifier.show_api_error(&DesignError::NotAuthenticated);

        assert_eq!(
            notifier.shown(),
            vec![
                "You must specify a label".to_string(),
                "You need to sign in again".to_string()
            ]
        );
    }
}
