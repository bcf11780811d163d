use crate::core::{ConfigProvider, SessionProvider};
use crate::utils::error::{DesignError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub session: Option<SessionSection>,
    pub download: Option<DownloadSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    pub blog_url: String,
    #[serde(default = "default_api_root")]
    pub api_root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSection {
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSection {
    pub output_dir: Option<String>,
}

fn default_api_root() -> String {
    "/ghost/api/v0.1".to_string()
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DesignError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DesignError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GHOST_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DesignError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("site.blog_url", &self.site.blog_url)?;
        crate::utils::validation::validate_non_empty_string("site.api_root", &self.site.api_root)?;

        if let Some(dir) = self.download.as_ref().and_then(|d| d.output_dir.as_deref()) {
            crate::utils::validation::validate_path("download.output_dir", dir)?;
        }

        // An unresolved ${VAR} means the token was never provided.
        if let Some(token) = self.session.as_ref().and_then(|s| s.access_token.as_deref()) {
            if token.starts_with("${") {
                return Err(DesignError::MissingConfigError {
                    field: "session.access_token".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn output_dir(&self) -> &str {
        self.download
            .as_ref()
            .and_then(|d| d.output_dir.as_deref())
            .unwrap_or(".")
    }
}

impl ConfigProvider for SiteConfig {
    fn blog_url(&self) -> &str {
        &self.site.blog_url
    }

    fn api_root(&self) -> &str {
        &self.site.api_root
    }
}

impl SessionProvider for SiteConfig {
    fn access_token(&self) -> Option<String> {
        self.session
            .as_ref()
            .and_then(|s| s.access_token.clone())
            .filter(|token| !token.is_empty())
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
