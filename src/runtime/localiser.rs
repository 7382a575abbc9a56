//! 実行時のロケール解決

use std::borrow::Cow;
use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use super::events::{
    LocaleCallback,
    LocaleChanged,
    Subscribers,
    SubscriptionId,
};
use crate::config::LocaliserSettings;
use crate::locale;
use crate::source::{
    SourceError,
    TableSource,
};
use crate::table::LocalisationTable;
use crate::types::EncodedKey;

/// ローカライザーのエラー
#[derive(Error, Debug)]
pub enum LocaliserError {
    /// 常駐テーブルがない状態での参照
    #[error("Localiser not initialised")]
    NotInitialised,

    /// リソースパス配下に読み込めるテーブルが一つもない
    #[error("No localisation tables found at path: {0:?}")]
    NoTables(PathBuf),

    /// テーブル探索の失敗
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// 常駐中のテーブルと、それを有効化したロケール
#[derive(Debug)]
struct ActiveTable {
    /// 現在のロケール（正規化済み）
    locale: String,
    /// テーブルのパス（`locale_index` の値と同じもの）
    path: PathBuf,
    /// 読み込んだテーブル本体
    table: LocalisationTable,
}

/// テーブルを探索し、現在のロケールを管理して参照に応える
///
/// 状態はインスタンスごとに持ち、グローバルな状態は持たない。
/// 同時に常駐するテーブルは最大一つ。
pub struct Localiser {
    /// テーブルの探索と読み込みを行うソース
    source: Box<dyn TableSource>,
    /// 既定ロケールやプレースホルダーなどの設定
    settings: LocaliserSettings,
    /// 既定ロケール（`override_default_locale` で変更可能）
    default_locale: String,
    /// 探索したすべてのテーブル（名前 → パス、有効かどうかを問わない）
    table_paths: BTreeMap<String, PathBuf>,
    /// 正規化済みロケール → 最初に宣言したテーブルのパス
    locale_index: HashMap<String, PathBuf>,
    /// 常駐テーブル
    active: Option<ActiveTable>,
    /// ロケール変更の購読者
    subscribers: Subscribers,
}

impl Localiser {
    /// 新しい `Localiser` を作成
    ///
    /// 既定ロケールは `settings` から取る。既知の識別子でない場合はそのまま使い、
    /// 解決されることはない。
    #[must_use]
    pub fn new(source: Box<dyn TableSource>, settings: LocaliserSettings) -> Self {
        let default_locale = locale::canonicalize(&settings.default_locale)
            .map_or_else(|| settings.default_locale.clone(), String::from);
        Self {
            source,
            settings,
            default_locale,
            table_paths: BTreeMap::new(),
            locale_index: HashMap::new(),
            active: None,
            subscribers: Subscribers::default(),
        }
    }

    /// `resource_path` 配下のテーブルを索引化し、ロケールを有効化する
    ///
    /// `requested` が `None` ならホストのロケールを使う。解釈できない場合や
    /// テーブルがない場合は既定ロケールにフォールバックする。
    ///
    /// # Returns
    /// - `Ok(true)`: テーブルが常駐した
    /// - `Ok(false)`: 要求ロケールにも既定ロケールにもテーブルがない
    ///
    /// # Errors
    /// - [`LocaliserError::NoTables`]: テーブルが見つからない、またはどれも読み込めない
    /// - [`LocaliserError::Source`]: 探索自体の失敗
    pub fn initialise(
        &mut self,
        resource_path: &Path,
        requested: Option<&str>,
    ) -> Result<bool, LocaliserError> {
        self.reset();

        let handles = self.source.discover(resource_path)?;
        let mut loaded = 0usize;
        for handle in handles {
            self.table_paths.insert(handle.name.clone(), handle.path.clone());
            let table = match self.source.load(&handle.path) {
                Ok(table) => table,
                Err(err) => {
                    tracing::warn!(table = %handle.name, error = %err, "Skipping unreadable localisation table");
                    continue;
                }
            };
            loaded += 1;
            self.register_locales(&handle.name, &handle.path, &table);
            self.source.unload(&handle.path);
        }

        if loaded == 0 {
            return Err(LocaliserError::NoTables(resource_path.to_path_buf()));
        }

        let resolved = self.resolve_requested(requested);
        tracing::debug!(locale = %resolved, tables = self.table_paths.len(), "Localisation tables indexed");

        if !(self.locale_index.contains_key(&resolved) && self.switch_locale(&resolved)) {
            tracing::warn!(locale = %resolved, default = %self.default_locale, "Unsupported locale, switching to default");
            self.revert_to_default_locale();
        }

        Ok(self.is_initialised())
    }

    /// 常駐テーブルを解放し、索引を空にする
    fn reset(&mut self) {
        if let Some(previous) = self.active.take() {
            self.source.unload(&previous.path);
        }
        self.table_paths.clear();
        self.locale_index.clear();
    }

    /// テーブルが宣言するロケールを索引に登録する
    ///
    /// 同じテーブル内で重複する宣言は一つにまとめ、他のテーブルが先に
    /// 宣言したロケールは登録しない。
    fn register_locales(&mut self, name: &str, path: &Path, table: &LocalisationTable) {
        if !table.is_usable() {
            tracing::warn!(
                table = name,
                "Did not register localisation table as it has no supported locales so would never be used"
            );
            return;
        }

        let mut declared: Vec<&'static str> = Vec::new();
        for raw in table.supported_locales() {
            let Some(canonical) = locale::canonicalize(raw) else {
                tracing::warn!(table = name, locale = %raw, "Ignoring unknown locale name in table");
                continue;
            };
            if declared.contains(&canonical) {
                tracing::debug!(table = name, locale = canonical, "Locale listed more than once in table");
                continue;
            }
            declared.push(canonical);
        }

        for canonical in declared {
            if let Some(owner) = self.locale_index.get(canonical) {
                tracing::warn!(
                    table = name,
                    locale = canonical,
                    owner = %owner.display(),
                    "Locale already claimed by another table"
                );
                continue;
            }
            self.locale_index.insert(canonical.to_string(), path.to_path_buf());
        }
    }

    /// 要求されたロケール（なければホストのロケール）を正規化する
    ///
    /// 解釈できない場合は既定ロケールを返す。
    fn resolve_requested(&self, requested: Option<&str>) -> String {
        let outcome = match requested {
            Some(name) => locale::canonicalize(name).ok_or_else(|| Some(name.to_string())),
            None => locale::system_locale(),
        };
        match outcome {
            Ok(canonical) => canonical.to_string(),
            Err(raw) => {
                tracing::error!(
                    locale = raw.as_deref().unwrap_or("<none>"),
                    default = %self.default_locale,
                    "Invalid locale name, using default"
                );
                self.default_locale.clone()
            }
        }
    }

    /// `locale` を現在のロケールにする
    ///
    /// テーブルを読み込み、以前のテーブルを解放する。同じテーブルが常駐中なら
    /// 読み込み直さない。成功した場合のみ購読者に通知し、失敗した場合は何も変えない。
    pub fn switch_locale(&mut self, locale: &str) -> bool {
        let Some(canonical) = locale::canonicalize(locale) else {
            tracing::warn!(locale, "Error loading localisation table: unknown locale");
            return false;
        };
        let Some(path) = self.locale_index.get(canonical).cloned() else {
            tracing::warn!(locale = canonical, "Error loading localisation table: no table for locale");
            return false;
        };

        let reuse = self.active.as_ref().is_some_and(|active| active.path == path);
        let previous = if reuse {
            let Some(active) = self.active.as_mut() else {
                return false;
            };
            Some(std::mem::replace(&mut active.locale, canonical.to_string()))
        } else {
            let table = match self.source.load(&path) {
                Ok(table) => table,
                Err(err) => {
                    tracing::warn!(locale = canonical, error = %err, "Error loading localisation table");
                    return false;
                }
            };
            if !table.is_current_encoding() {
                tracing::warn!(
                    path = %path.display(),
                    version = %table.encoding_version(),
                    "Localisation table uses a stale key encoding; re-encode it before trusting lookups"
                );
            }
            let replaced = self.active.replace(ActiveTable {
                locale: canonical.to_string(),
                path,
                table,
            });
            replaced.map(|old| {
                self.source.unload(&old.path);
                old.locale
            })
        };

        tracing::debug!(locale = canonical, "Locale switched");
        let event = LocaleChanged { previous, current: canonical.to_string() };
        let mut subscribers = self.subscribers.take();
        subscribers.notify(self, &event);
        self.subscribers.restore(subscribers);
        true
    }

    /// 既定ロケールに切り替える
    pub fn revert_to_default_locale(&mut self) -> bool {
        let default = self.default_locale.clone();
        self.switch_locale(&default)
    }

    /// アプリケーションが対応するロケールの場合のみ、既定ロケールを差し替える
    pub fn override_default_locale(&mut self, locale: &str) -> bool {
        match locale::canonicalize(locale) {
            Some(canonical) if self.settings.is_supported(canonical) => {
                self.default_locale = canonical.to_string();
                true
            }
            _ => {
                tracing::warn!(locale, "Invalid default locale name");
                false
            }
        }
    }

    /// 常駐テーブルから `key` を引く
    ///
    /// `Ok(None)` はテーブルに内容がないことを表す。呼び出し側で目に見える
    /// フォールバックを表示すること。
    ///
    /// # Errors
    /// [`LocaliserError::NotInitialised`]: 常駐テーブルがない
    pub fn get_localised_string(&self, key: EncodedKey) -> Result<Option<&str>, LocaliserError> {
        let active = self.active.as_ref().ok_or(LocaliserError::NotInitialised)?;
        Ok(active.table.get(key).ok())
    }

    /// [`Self::get_localised_string`] と同じだが、内容がなければ設定の
    /// プレースホルダーを返す
    pub fn localised_or_placeholder(&self, key: EncodedKey) -> Result<Cow<'_, str>, LocaliserError> {
        Ok(self
            .get_localised_string(key)?
            .map_or_else(|| Cow::Owned(self.settings.placeholder_for(key)), Cow::Borrowed))
    }

    /// ロケール変更の購読を登録する
    pub fn subscribe(&mut self, callback: LocaleCallback) -> SubscriptionId {
        self.subscribers.add(callback)
    }

    /// 購読を解除する。登録されていなければ `false`
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// テーブルが常駐しているか
    #[must_use]
    pub const fn is_initialised(&self) -> bool {
        self.active.is_some()
    }

    /// 現在のロケール
    #[must_use]
    pub fn current_locale(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.locale.as_str())
    }

    /// 既定ロケール
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// 常駐テーブルが現行のエンコーディングを使っているか
    ///
    /// 常駐テーブルがない場合や再エンコードが必要な場合は `false`。
    #[must_use]
    pub fn current_table_is_authoritative(&self) -> bool {
        self.active.as_ref().is_some_and(|active| active.table.is_current_encoding())
    }

    /// 探索したすべてのテーブル（名前 → パス）
    #[must_use]
    pub const fn table_paths(&self) -> &BTreeMap<String, PathBuf> {
        &self.table_paths
    }

    /// テーブルが登録されたロケール（ソート済み）
    #[must_use]
    pub fn registered_locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.locale_index.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// `locale` を担当するテーブルのパス
    #[must_use]
    pub fn table_path_for(&self, locale: &str) -> Option<&Path> {
        let canonical = locale::canonicalize(locale)?;
        self.locale_index.get(canonical).map(PathBuf::as_path)
    }

    /// 現在の設定
    #[must_use]
    pub const fn settings(&self) -> &LocaliserSettings {
        &self.settings
    }

    /// 購読者の数
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for Localiser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localiser")
            .field("source", &"<dyn TableSource>")
            .field("default_locale", &self.default_locale)
            .field("current_locale", &self.current_locale())
            .field("table_paths", &self.table_paths)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}
