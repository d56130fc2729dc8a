use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use kartei_config::Config;
use serde::{Deserialize, Serialize};

pub const MAIN_PROFILE: &str = "main";

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Profile files under `<root>/profiles`
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$KARTEI_HOME`, else the user config directory
    pub fn from_env() -> anyhow::Result<Self> {
        if let Some(home) = env::var_os("KARTEI_HOME").filter(|v| !v.is_empty()) {
            return Ok(Self::new(home));
        }

        let config_dir = dirs::config_dir().context("Cannot determine user config directory")?;
        Ok(Self::new(config_dir.join("kartei")))
    }

    fn profiles_dir(&self) -> PathBuf {
        self.root.join("profiles")
    }

    fn profile_file(&self, name: &str) -> PathBuf {
        self.profiles_dir().join(format!("{name}.json"))
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profile_file(name).exists()
    }

    /// Initialize the profiles folder and main profile if missing
    pub fn init_user_config(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.profiles_dir())
            .with_context(|| format!("Failed to create {}", self.profiles_dir().display()))?;

        if !self.profile_file(MAIN_PROFILE).exists() {
            self.save_user_profile(MAIN_PROFILE, &Config::default())?;
            tracing::info!("Created main profile in {}", self.root.display());
        }

        Ok(())
    }

    /// Load a user profile by name, defaulting to main if name not found
    pub fn load_user_profile(&self, name: &str) -> anyhow::Result<Config> {
        let profile_file = self.profile_file(name);

        if profile_file.exists() {
            return read_profile(&profile_file);
        }

        tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
        let main_file = self.profile_file(MAIN_PROFILE);
        if main_file.exists() {
            read_profile(&main_file)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_user_profile(&self, name: &str, config: &Config) -> anyhow::Result<PathBuf> {
        let profile = Profile {
            name: name.into(),
            value: config.clone(),
        };
        let file = self.profile_file(name);
        fs::write(&file, serde_json::to_string_pretty(&profile)?)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        Ok(file)
    }

    /// Add a new profile cloned from main (or defaults if main missing)
    pub fn add_profile_from_default(&self, new_name: &str) -> anyhow::Result<PathBuf> {
        let default_config = self.load_user_profile(MAIN_PROFILE)?;
        let file = self.save_user_profile(new_name, &default_config)?;
        tracing::info!("Created new profile: {new_name}");
        Ok(file)
    }
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Invalid profile {}", path.display()))?;
    Ok(profile.value)
}
