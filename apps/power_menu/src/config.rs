use std::{env, fs};

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub action_keys: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            action_keys: vec![
                menu_core::ACTION_KEY_QUICK_RESTART.to_string(),
                menu_core::ACTION_KEY_RECOVERY.to_string(),
                menu_core::ACTION_KEY_BOOTLOADER.to_string(),
            ],
        }
    }
}

pub fn load_settings(path: &str) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<Settings>(&raw) {
            Ok(file_cfg) => settings = file_cfg,
            Err(error) => warn!(path, %error, "ignoring malformed settings file"),
        }
    }

    if let Ok(raw) = env::var("POWER_MENU__ACTION_KEYS") {
        settings.action_keys = parse_key_list(&raw);
    }

    settings
}

fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect()
}
