use crate::domain::constants::DEFAULT_PRICE_MAX;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct UiConfig {
    /// Print the full cart after `cart add`, the "redirect to cart" policy.
    /// A view policy, not a cart contract; off by default.
    #[serde(default)]
    pub show_cart_after_add: bool,
}

#[derive(Debug, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_price_max")]
    pub default_price_max: u64,
}

fn default_price_max() -> u64 {
    DEFAULT_PRICE_MAX
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_price_max: DEFAULT_PRICE_MAX,
        }
    }
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/treadmark/config.toml"))
}

/// Absent file means defaults; a malformed file is an error the caller can
/// either surface (`doctor`) or replace with defaults.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn empty_config_parses_to_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("empty config");
        assert!(!cfg.ui.show_cart_after_add);
        assert_eq!(cfg.filter.default_price_max, 50_000);
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"[ui]
show_cart_after_add = true
"#,
        )
        .expect("partial config");
        assert!(cfg.ui.show_cart_after_add);
        assert_eq!(cfg.filter.default_price_max, 50_000);
    }
}
