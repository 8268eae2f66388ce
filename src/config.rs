use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::{DEFAULT_COUNTRIES, SessionBuilder, Selection};

/// 配置文件结构 (~/.config/flagquiz/config.toml)，所有字段可选
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub total_rounds: Option<u32>,
    pub selection: Option<Selection>,
    pub seed: Option<u64>,
    pub countries: Option<Vec<String>>,
}

impl Config {
    /// 按配置生成会话构建器，未设置的字段使用默认值
    pub fn session_builder(&self) -> SessionBuilder {
        let builder = match &self.countries {
            Some(countries) => SessionBuilder::new(countries.iter().map(String::as_str)),
            None => SessionBuilder::new(DEFAULT_COUNTRIES),
        };
        let builder = match self.total_rounds {
            Some(total_rounds) => builder.with_total_rounds(total_rounds),
            None => builder,
        };
        builder
            .with_selection(self.selection.unwrap_or_default())
            .with_seed(self.seed)
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("flagquiz").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// 加载配置
///
/// 显式指定的文件必须存在；默认位置的文件不存在时使用默认配置。
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let path = default_config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    read_config(&path)
}

/// 从TOML文件读取配置
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content, path)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

fn parse_config(content: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DEFAULT_TOTAL_ROUNDS, Phase};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("flagquiz-{}-{}", uuid::Uuid::new_v4(), name))
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
total_rounds = 5
selection = "deck"
seed = 7
countries = ["Estonia", "France", "Germany", "Italy"]
"#;
        let config = parse_config(content, Path::new("config.toml")).unwrap();

        assert_eq!(config.total_rounds, Some(5));
        assert_eq!(config.selection, Some(Selection::Deck));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.countries.as_ref().map(Vec::len), Some(4));

        let session = config.session_builder().build().unwrap();
        assert_eq!(session.total_rounds(), 5);
        assert_eq!(session.selection(), Selection::Deck);
        assert_eq!(session.pool().len(), 4);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("", Path::new("config.toml")).unwrap();
        assert_eq!(config, Config::default());

        let session = config.session_builder().build().unwrap();
        assert_eq!(session.total_rounds(), DEFAULT_TOTAL_ROUNDS);
        assert_eq!(session.pool().len(), DEFAULT_COUNTRIES.len());
        assert_eq!(session.selection(), Selection::Resample);
        assert_eq!(session.phase(), Phase::AwaitingGuess);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let unknown_selection = parse_config(r#"selection = "random""#, Path::new("a.toml"));
        assert!(matches!(unknown_selection, Err(ConfigError::Parse { .. })));

        let unknown_key = parse_config("rounds = 3", Path::new("b.toml"));
        assert!(matches!(unknown_key, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_read_config_from_file() {
        let path = temp_path("config.toml");
        fs::write(&path, "total_rounds = 3\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.total_rounds, Some(3));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let path = temp_path("missing.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn test_too_small_pool_fails_at_build() {
        let config = Config {
            countries: Some(vec!["Estonia".to_string(), "France".to_string()]),
            ..Config::default()
        };
        assert!(config.session_builder().build().is_err());
    }
}
