use crate::core::download::with_trailing_slash;
use crate::core::{ConfigProvider, NavigationItem, NavigationStore, ThemeIssue, ThemeRecord, ThemeStore};
use crate::utils::error::{DesignError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const THEME_VALIDATION_ERROR: &str = "ThemeValidationError";

#[derive(Debug, Deserialize)]
struct ThemesEnvelope {
    themes: Vec<WireTheme>,
}

#[derive(Debug, Deserialize)]
struct WireTheme {
    name: String,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    warnings: Vec<Value>,
    #[serde(default)]
    errors: Vec<Value>,
}

impl From<WireTheme> for ThemeRecord {
    fn from(wire: WireTheme) -> Self {
        ThemeRecord {
            name: wire.name,
            active: wire.active,
            warnings: wire.warnings.iter().map(issue_text).collect(),
            errors: wire.errors.iter().map(issue_text).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<WireError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireError {
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_details: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SettingsEnvelope {
    settings: Vec<Setting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Setting {
    key: String,
    value: Value,
}

/// The navigation setting is stored as a JSON string, older servers return the array itself.
fn stored_navigation(envelope: SettingsEnvelope) -> Option<Vec<NavigationItem>> {
    let setting = envelope
        .settings
        .into_iter()
        .find(|setting| setting.key == "navigation")?;
    match setting.value {
        Value::String(raw) => serde_json::from_str(&raw).ok(),
        other => serde_json::from_value(other).ok(),
    }
}

/// Issues arrive either as plain strings or as objects with a message/rule.
fn issue_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("rule"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

fn theme_issue(value: &Value) -> ThemeIssue {
    let fatal = value.get("fatal").and_then(Value::as_bool).unwrap_or(false);
    ThemeIssue::new(issue_text(value), fatal)
}

/// Turns an error body into the matching error kind.
fn classify_error(status: u16, body: &str) -> DesignError {
    let envelope: Option<ErrorEnvelope> = serde_json::from_str(body).ok();
    let Some(first) = envelope.and_then(|e| e.errors.into_iter().next()) else {
        return DesignError::api(Some(status), format!("request failed with status {}", status));
    };

    if first.error_type.as_deref() == Some(THEME_VALIDATION_ERROR) {
        let issues = match &first.error_details {
            Some(Value::Array(details)) => details.iter().map(theme_issue).collect(),
            _ => Vec::new(),
        };
        return DesignError::ThemeValidation {
            message: first.message,
            issues,
        };
    }
    DesignError::api(Some(status), first.message)
}

/// Admin API client for the site's settings and themes endpoints.
#[derive(Debug, Clone)]
pub struct GhostAdminClient {
    client: Client,
    api_base: String,
    access_token: Option<String>,
}

impl GhostAdminClient {
    pub fn new(config: &dyn ConfigProvider, access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base(config),
            access_token,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Admin API error {}: {}", status, body);
        Err(classify_error(status.as_u16(), &body))
    }

    pub async fn list_themes(&self) -> Result<Vec<ThemeRecord>> {
        let url = format!("{}/themes/", self.api_base);
        tracing::debug!("GET {}", url);
        let response = Self::check(self.authorized(self.client.get(&url)).send().await?).await?;
        let envelope: ThemesEnvelope = response.json().await?;
        Ok(envelope.themes.into_iter().map(ThemeRecord::from).collect())
    }
}

/// Joins a relative api root onto the blog url; absolute roots are used as-is.
fn api_base(config: &dyn ConfigProvider) -> String {
    let root = config.api_root().trim_end_matches('/');
    if root.starts_with("http://") || root.starts_with("https://") {
        return root.to_string();
    }
    let blog = with_trailing_slash(config.blog_url());
    format!("{}{}", blog.trim_end_matches('/'), root)
}

#[async_trait::async_trait]
impl NavigationStore for GhostAdminClient {
    async fn save(&self, items: &[NavigationItem]) -> Result<Vec<NavigationItem>> {
        let url = format!("{}/settings/", self.api_base);
        let payload = SettingsEnvelope {
            settings: vec![Setting {
                key: "navigation".to_string(),
                value: Value::String(serde_json::to_string(items)?),
            }],
        };

        tracing::debug!("PUT {} ({} items)", url, items.len());
        let response =
            Self::check(self.authorized(self.client.put(&url)).json(&payload).send().await?).await?;
        let envelope: SettingsEnvelope = response.json().await?;

        match stored_navigation(envelope) {
            Some(saved) => Ok(saved),
            None => {
                tracing::warn!(
                    "Settings response carried no readable navigation, echoing {} submitted item(s)",
                    items.len()
                );
                Ok(items.to_vec())
            }
        }
    }
}

#[async_trait::async_trait]
impl ThemeStore for GhostAdminClient {
    async fn activate(&self, theme: &ThemeRecord) -> Result<ThemeRecord> {
        let url = format!("{}/themes/{}/activate/", self.api_base, theme.name);
        tracing::debug!("PUT {}", url);
        let response = Self::check(self.authorized(self.client.put(&url)).send().await?).await?;
        let envelope: ThemesEnvelope = response.json().await?;

        envelope
            .themes
            .into_iter()
            .next()
            .map(ThemeRecord::from)
            .ok_or_else(|| DesignError::api(None, "activation response contained no theme"))
    }

    async fn destroy(&self, theme: &ThemeRecord) -> Result<()> {
        let url = format!("{}/themes/{}/", self.api_base, theme.name);
        tracing::debug!("DELETE {}", url);
        Self::check(self.authorized(self.client.delete(&url)).send().await?).await?;
        Ok(())
    }
}
