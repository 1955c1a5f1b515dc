use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Static configuration and filesystem paths used throughout the application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    api_base_url: String,
    data_dir: PathBuf,
    favorites_db_path: PathBuf,
    log_path: PathBuf,
    user_agent: String,
    client_id: String,
    location_options: Vec<String>,
    share_command: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = PathBuf::from("data");

        let client_id = format!("groupie-tui-{}", Uuid::new_v4());
        let user_agent = format!("groupie-tracker-tui/0.1.0 ( unique-id={client_id} )");

        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            favorites_db_path: base.join("favorites.db"),
            log_path: base.join("groupie-tui.log"),
            data_dir: base,
            user_agent,
            client_id,
            location_options: default_location_options(),
            share_command: None,
        }
    }
}

impl AppConfig {
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Moves every derived path under `dir`.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.favorites_db_path = dir.join("favorites.db");
        self.log_path = dir.join("groupie-tui.log");
        self.data_dir = dir;
        self
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    pub fn with_share_command(mut self, command: Option<String>) -> Self {
        self.share_command = command.filter(|cmd| !cmd.trim().is_empty());
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn favorites_db_path(&self) -> &Path {
        &self.favorites_db_path
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn location_options(&self) -> &[String] {
        &self.location_options
    }

    pub fn share_command(&self) -> Option<&str> {
        self.share_command.as_deref()
    }

    /// Public URL of a page, used when sharing.
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Ensures that required directories exist.
    pub fn ensure_filesystem(&self) -> Result<()> {
        let mut dirs = vec![self.data_dir()];
        if let Some(parent) = self.log_path().parent() {
            dirs.push(parent);
        }

        for path in dirs {
            if path.as_os_str().is_empty() {
                continue;
            }
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }

        Ok(())
    }
}

fn default_location_options() -> Vec<String> {
    [
        "london-uk",
        "los_angeles-usa",
        "new_york-usa",
        "paris-france",
        "berlin-germany",
        "tokyo-japan",
        "sydney-australia",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
