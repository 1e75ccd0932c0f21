use anyhow::{anyhow, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/askbot/config.toml";

/// Bot configuration
///
/// Read once at startup and shared read-only afterwards.  Every field has a default so a bot can
/// run from environment variables alone.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub discord: Discord,
    pub llm: Llm,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct General {
    /// Port the interactions webhook listens on
    pub port: u16,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Discord {
    /// Hex encoded ed25519 key from the application's dashboard
    pub public_key: Option<String>,
    pub application_id: Option<String>,
    /// Only needed for the presence connection and command registration
    pub bot_token: Option<String>,
    pub api_base: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Llm {
    pub api_key: Option<String>,
    pub model: String,
    pub url: String,
    pub system: String,
    pub max_output_tokens: u32,
}

impl Default for General {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl Default for Discord {
    fn default() -> Self {
        Self {
            public_key: None,
            application_id: None,
            bot_token: None,
            api_base: "https://discord.com/api/v10".to_string(),
        }
    }
}

impl Default for Llm {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            url: "https://api.openai.com/v1/responses".to_string(),
            system: "You are a helpful assistant. Keep answers concise and accurate.".to_string(),
            max_output_tokens: 400,
        }
    }
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    /// Load configuration from `path`, or the default location if `None`, then apply environment
    /// overrides.
    ///
    /// A missing file at the default location is not an error.  A missing file that was asked for
    /// explicitly is.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read(path).await?,
            None => {
                let path = Self::config_path()?;
                match Self::read(&path).await {
                    Ok(config) => config,
                    Err(e) if is_not_found(&e) => Self::default(),
                    Err(e) => return Err(e),
                }
            }
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    async fn read(path: &Path) -> Result<Self> {
        let mut file = tokio::fs::File::open(path).await.map_err(|e| {
            anyhow::Error::new(e).context(format!(
                "Could not open configuration at `{}`",
                path.to_string_lossy()
            ))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        toml::from_str(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })
    }

    /// Override file values with environment variables.
    ///
    /// Each setting accepts a second name, matching the `YOUR_*` names used by the application's
    /// sample `.env`.  Empty values count as unset.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str, fallback: Option<&str>| {
            var(name)
                .filter(|v| !v.is_empty())
                .or_else(|| fallback.and_then(|f| var(f)).filter(|v| !v.is_empty()))
        };

        if let Some(port) = lookup("PORT", None).and_then(|p| p.parse().ok()) {
            self.general.port = port;
        }
        if let Some(key) = lookup("PUBLIC_KEY", Some("YOUR_PUBLIC_KEY")) {
            self.discord.public_key = Some(key);
        }
        if let Some(id) = lookup("APP_ID", Some("YOUR_APP_ID")) {
            self.discord.application_id = Some(id);
        }
        if let Some(token) = lookup("DISCORD_TOKEN", Some("YOUR_BOT_TOKEN")) {
            self.discord.bot_token = Some(token);
        }
        if let Some(key) = lookup("OPENAI_API_KEY", Some("YOUR_OPENAI_API_KEY")) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = lookup("OPENAI_MODEL", None) {
            self.llm.model = model;
        }
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == ErrorKind::NotFound)
}
