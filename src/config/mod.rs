//! Localisation settings: model, file loading and table-file matching.
/// 設定ファイルの読み込み
mod loader;
/// 有効な設定の保持
mod manager;
/// テーブルファイルの glob マッチング
mod matcher;
/// 設定のデータモデルとバリデーション
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use matcher::{
    MatcherError,
    TableMatcher,
};
pub use types::{
    ConfigError,
    LocaliserSettings,
    PLACEHOLDER_KEY_TOKEN,
    TableFilesConfig,
    ValidationError,
};
