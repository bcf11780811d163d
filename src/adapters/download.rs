use crate::core::{DeliveryChannel, DownloadHost};
use crate::utils::error::{DesignError, Result};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tokio::task::JoinHandle;
use url::Url;

/// Writes each delivered download to `{output_dir}/{theme}.zip` in the background.
pub struct FileDeliveryChannel {
    client: Client,
    base: Url,
    output_dir: PathBuf,
    in_flight: Mutex<Vec<JoinHandle<Result<PathBuf>>>>,
}

impl FileDeliveryChannel {
    pub fn new(base: Url, output_dir: PathBuf) -> Self {
        Self {
            client: Client::new(),
            base,
            output_dir,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    fn prune(handles: &mut Vec<JoinHandle<Result<PathBuf>>>) {
        handles.retain(|handle| !handle.is_finished());
    }

    /// Deliveries still running.
    pub fn pending(&self) -> usize {
        let mut handles = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Self::prune(&mut handles);
        handles.len()
    }

    /// Waits for the deliveries still tracked. Completed ones are dropped on the
    /// next `deliver`, their outcome is only logged.
    pub async fn finish(&self) -> Vec<Result<PathBuf>> {
        let handles: Vec<_> = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.unwrap_or_else(|e| {
                Err(DesignError::Io(std::io::Error::other(e.to_string())))
            }));
        }
        results
    }
}

fn theme_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| {
            let segments: Vec<&str> = segments.collect();
            segments
                .iter()
                .position(|s| *s == "themes")
                .and_then(|i| segments.get(i + 1).map(|s| s.to_string()))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "theme".to_string())
}

async fn fetch_to_file(client: Client, url: Url, target: PathBuf) -> Result<PathBuf> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DesignError::api(
            Some(status.as_u16()),
            format!("download failed with status {}", status),
        ));
    }
    let bytes = response.bytes().await?;
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, &bytes).await?;
    tracing::info!("Saved {} bytes to {}", bytes.len(), target.display());
    Ok(target)
}

impl DeliveryChannel for FileDeliveryChannel {
    fn deliver(&self, url: &str) {
        let resolved = match self.base.join(url) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!("Ignoring undeliverable download url {}: {}", url, e);
                return;
            }
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime available, download of {} dropped", resolved.path());
            return;
        };

        let target = self.output_dir.join(format!("{}.zip", theme_name(&resolved)));
        let client = self.client.clone();
        let handle = runtime.spawn(async move {
            let result = fetch_to_file(client, resolved, target).await;
            if let Err(e) = &result {
                tracing::error!("Theme download failed: {}", e);
            }
            result
        });

        let mut handles = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Self::prune(&mut handles);
        handles.push(handle);
    }
}

/// Creates the single file channel on first request and remembers it.
pub struct FileDownloadHost {
    base: Url,
    output_dir: PathBuf,
    channel: OnceLock<Arc<FileDeliveryChannel>>,
}

impl FileDownloadHost {
    pub fn new(base: Url, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base,
            output_dir: output_dir.into(),
            channel: OnceLock::new(),
        }
    }

    pub fn channel(&self) -> Option<Arc<FileDeliveryChannel>> {
        self.channel.get().cloned()
    }
}

impl DownloadHost for FileDownloadHost {
    fn attach_channel(&self) -> Arc<dyn DeliveryChannel> {
        self.channel
            .get_or_init(|| {
                Arc::new(FileDeliveryChannel::new(
                    self.base.clone(),
                    self.output_dir.clone(),
                ))
            })
            .clone()
    }
}
