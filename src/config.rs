use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 設定ファイル全体。どのセクションも省略可能。
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub defaults: Defaults,
    pub source: SourceConfig,
}

/// CLI で指定されなかったオプションの既定値。
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub src: Option<PathBuf>,
    pub dst: Option<PathBuf>,
    pub yes: bool,
    pub quiet: bool,
    pub color: Option<bool>,
}

/// スクリーンショット保存先を問い合わせるコマンドの設定。
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub query: Option<Vec<String>>,
}

impl Config {
    /// Loads the configuration from the TOML file.
    ///
    /// # Behavior
    /// 1. Uses SHOT_CONFIG_PATH environment variable if set
    /// 2. Otherwise, looks for config at ~/.config/shot/config.toml
    /// 3. A missing file yields the built-in defaults
    pub fn load() -> Result<Self, String> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスの設定ファイルを読み込む。存在しなければ既定値を返す。
    pub fn load_from(config_path: &Path) -> Result<Self, String> {
        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))?;
        config.validate()?;

        log::debug!("loaded config from {}", config_path.display());
        Ok(config)
    }

    /// 読み込んだ設定値の整合性を検証する。
    ///
    /// `source.query` を指定する場合は実行するプログラム名が必須。
    fn validate(&self) -> Result<(), String> {
        if let Some(query) = &self.source.query {
            match query.first() {
                Some(program) if !program.trim().is_empty() => {}
                _ => {
                    return Err(
                        "Invalid config: source.query must name a program to run".to_string()
                    );
                }
            }
        }

        Ok(())
    }

    /// Determines the path to the configuration file.
    ///
    /// # Priority
    /// 1. SHOT_CONFIG_PATH environment variable (for testing and custom setups)
    /// 2. ~/.config/shot/config.toml (default location)
    fn config_path() -> Result<PathBuf, String> {
        if let Ok(path) = std::env::var("SHOT_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let home_dir =
            dirs::home_dir().ok_or_else(|| "Could not determine home directory".to_string())?;

        Ok(home_dir.join(".config").join("shot").join("config.toml"))
    }
}

/// 先頭の `~` をホームディレクトリへ展開する。
///
/// `~user` 形式は扱わず、そのまま返す。
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
