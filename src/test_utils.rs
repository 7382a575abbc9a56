//! テスト用の共通ヘルパー
#![cfg(test)]

use std::cell::RefCell;
use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::path::{
    Path,
    PathBuf,
};
use std::rc::Rc;

use crate::source::{
    SourceError,
    TableHandle,
    TableSource,
};
use crate::table::LocalisationTable;

/// `MemoryTableSource` のクローン間で共有する状態
#[derive(Debug, Default)]
struct MemoryState {
    /// 名前 → テーブル
    tables: BTreeMap<String, LocalisationTable>,
    /// 探索には現れるが読み込みに失敗する名前
    unreadable: BTreeSet<String>,
    /// 読み込み済みで未解放のパス
    resident: Vec<PathBuf>,
    /// 読み込み回数
    loads: usize,
}

/// メモリ上の [`TableSource`]
///
/// クローンは状態を共有するので、ローカライザーに渡した後もテスト側で
/// 観察できる。テーブル名をそのままパスとして使い、リソースルートは無視する。
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryTableSource {
    /// 共有状態
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryTableSource {
    /// 空のソースを作成
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// テーブルを追加
    pub(crate) fn with_table(self, name: &str, table: LocalisationTable) -> Self {
        self.state.borrow_mut().tables.insert(name.to_string(), table);
        self
    }

    /// 探索されるが読み込めないテーブルを追加
    pub(crate) fn with_unreadable(self, name: &str) -> Self {
        self.state.borrow_mut().unreadable.insert(name.to_string());
        self
    }

    /// テーブルを削除（以降の読み込みは `NotFound`）
    pub(crate) fn remove(&self, name: &str) {
        self.state.borrow_mut().tables.remove(name);
    }

    /// これまでの読み込み回数
    pub(crate) fn load_count(&self) -> usize {
        self.state.borrow().loads
    }

    /// 読み込み済みで未解放のパス
    pub(crate) fn resident(&self) -> Vec<PathBuf> {
        self.state.borrow().resident.clone()
    }

    /// 常駐しているテーブルの数
    pub(crate) fn resident_count(&self) -> usize {
        self.state.borrow().resident.len()
    }
}

impl TableSource for MemoryTableSource {
    fn discover(&mut self, _root: &Path) -> Result<Vec<TableHandle>, SourceError> {
        let state = self.state.borrow();
        let names: BTreeSet<&String> = state.tables.keys().chain(state.unreadable.iter()).collect();
        Ok(names
            .into_iter()
            .map(|name| TableHandle { name: name.clone(), path: PathBuf::from(name) })
            .collect())
    }

    fn load(&mut self, path: &Path) -> Result<LocalisationTable, SourceError> {
        let mut state = self.state.borrow_mut();
        let name = path.to_string_lossy();
        if state.unreadable.contains(name.as_ref()) {
            return Err(SourceError::Table {
                path: path.to_path_buf(),
                source: crate::table::TableError::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "unreadable table",
                )),
            });
        }
        let table = state
            .tables
            .get(name.as_ref())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_path_buf()))?;
        state.loads += 1;
        state.resident.push(path.to_path_buf());
        Ok(table)
    }

    fn unload(&mut self, path: &Path) {
        self.state.borrow_mut().resident.retain(|p| p != path);
    }
}
