//! テーブルソースの境界

use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::config::MatcherError;
use crate::table::{
    LocalisationTable,
    TableError,
};

/// テーブルソースのエラー
#[derive(Error, Debug)]
pub enum SourceError {
    /// リソースルートが存在しない、またはディレクトリではない
    #[error("Resource root does not exist or is not a directory: {0}")]
    RootNotFound(PathBuf),

    /// テーブルファイルのパターンが不正
    #[error(transparent)]
    Matcher(#[from] MatcherError),

    /// テーブルファイルの読み込みまたはパースの失敗
    #[error("Failed to load table {path:?}: {source}")]
    Table {
        /// 読み込もうとしたパス
        path: PathBuf,
        /// 原因
        #[source]
        source: TableError,
    },

    /// パスにテーブルがない
    #[error("No table at {0:?}")]
    NotFound(PathBuf),
}

/// 探索済みで未読み込みのテーブル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    /// リソースルートからの相対パス（`/` 区切り）
    pub name: String,
    /// 読み込みに使うパス
    pub path: PathBuf,
}

/// リゾルバーに代わってテーブルを探索し、取得する
///
/// 探索結果の順序は決定的であること。返した順序がロケールを宣言する順序になる。
pub trait TableSource {
    /// `root` 配下のテーブルを列挙する
    fn discover(&mut self, root: &Path) -> Result<Vec<TableHandle>, SourceError>;

    /// `path` のテーブルを読み込む
    fn load(&mut self, path: &Path) -> Result<LocalisationTable, SourceError>;

    /// 読み込んだテーブルが常駐しなくなったときに呼ばれる
    fn unload(&mut self, _path: &Path) {}
}
