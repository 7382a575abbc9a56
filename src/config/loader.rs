//! リソースルートからの設定読み込み

use std::path::Path;

use super::{
    ConfigError,
    LocaliserSettings,
};

/// リソースルート直下で探す設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".localisation.json";

/// `resource_root` から設定を読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが存在し、パースに成功
/// - `Ok(None)`: 設定ファイルが存在しない
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_root(
    resource_root: &Path,
) -> Result<Option<LocaliserSettings>, ConfigError> {
    let config_path = resource_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: LocaliserSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
