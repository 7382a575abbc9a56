//! 有効な設定を保持するモジュール

use std::path::Path;

use super::{
    ConfigError,
    LocaliserSettings,
    loader,
};

/// 検証済みの設定を保持する
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: LocaliserSettings,
}

impl ConfigManager {
    /// 既定の設定でマネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: LocaliserSettings::default() }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `resource_root` - リソースルート。設定ファイルがなければ既定値を使う
    ///
    /// # Returns
    /// - `Ok(())`: 読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー（現在の設定は変更しない）
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, resource_root: Option<&Path>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for resource root: {:?}", resource_root);

        let settings = if let Some(root) = resource_root {
            loader::load_from_root(root)?.map_or_else(LocaliserSettings::default, |loaded| {
                tracing::debug!("Loaded settings file: {:?}", loaded);
                loaded
            })
        } else {
            LocaliserSettings::default()
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &LocaliserSettings {
        &self.current_settings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    #[rstest]
    fn new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().default_locale, "en-US");
    }

    #[rstest]
    fn load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            r#"{"defaultLocale": "fr", "missingPlaceholder": "??{key}??"}"#,
        )
        .unwrap();

        let mut manager = ConfigManager::new();
        manager.load_settings(Some(temp_dir.path())).unwrap();

        assert_eq!(manager.get_settings().default_locale, "fr");
        assert_eq!(manager.get_settings().missing_placeholder, "??{key}??");
    }

    #[rstest]
    fn load_settings_without_config_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        manager.load_settings(Some(temp_dir.path())).unwrap();

        assert_eq!(manager.get_settings(), &LocaliserSettings::default());
    }

    #[rstest]
    fn load_settings_without_root_uses_defaults() {
        let mut manager = ConfigManager::new();

        manager.load_settings(None).unwrap();

        assert_eq!(manager.get_settings(), &LocaliserSettings::default());
    }

    #[rstest]
    fn load_settings_rejects_invalid_file_and_keeps_previous() {
        let valid_dir = TempDir::new().unwrap();
        fs::write(valid_dir.path().join(CONFIG_FILE_NAME), r#"{"defaultLocale": "de"}"#).unwrap();
        let invalid_dir = TempDir::new().unwrap();
        fs::write(invalid_dir.path().join(CONFIG_FILE_NAME), r#"{"supportedLocales": []}"#).unwrap();
        let mut manager = ConfigManager::new();
        manager.load_settings(Some(valid_dir.path())).unwrap();

        let result = manager.load_settings(Some(invalid_dir.path()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().default_locale, "de");
    }
}
