//! テーブルがスキーマをどれだけ網羅しているか

use std::collections::HashSet;

use super::LocalisationTable;
use crate::encoding::{
    KeyEncoding,
    encode,
};
use crate::schema::Schema;

/// テーブル自身のエンコーディングでスキーマと照合した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCoverage {
    /// スキーマのキー総数
    pub total_keys: usize,
    /// エントリがない `Category/Key` 識別子
    pub missing: Vec<String>,
    /// 値が空文字列の `Category/Key` 識別子
    pub empty: Vec<String>,
    /// どの識別子にも対応しないエントリの数
    pub unlisted: usize,
    /// 照合に使ったエンコーディング
    pub encoding_version: KeyEncoding,
}

impl TableCoverage {
    /// 翻訳済みのキー数
    #[must_use]
    pub fn translated(&self) -> usize {
        self.total_keys.saturating_sub(self.missing.len() + self.empty.len())
    }

    /// 出荷前に対応が必要な問題があるか（欠落、空、古いエンコーディング）
    #[must_use]
    pub fn has_problem(&self) -> bool {
        !self.missing.is_empty() || !self.empty.is_empty() || !self.encoding_version.is_current()
    }
}

impl LocalisationTable {
    /// スキーマに対する網羅状況を計算
    #[must_use]
    pub fn coverage(&self, schema: &Schema) -> TableCoverage {
        let mut missing = Vec::new();
        let mut empty = Vec::new();
        let mut listed = HashSet::new();

        for (category, key, encoded) in schema.encoded_keys(self.encoding_version) {
            listed.insert(encoded);
            match self.entries.get(&encoded) {
                None => missing.push(format!("{category}/{key}")),
                Some(value) if value.is_empty() => empty.push(format!("{category}/{key}")),
                Some(_) => {}
            }
        }

        let unlisted = self.entries.keys().filter(|key| !listed.contains(key)).count();

        TableCoverage {
            total_keys: schema.key_count(),
            missing,
            empty,
            unlisted,
            encoding_version: self.encoding_version,
        }
    }

    /// テーブルにないスキーマのキーすべてに空のエントリを追加する
    ///
    /// 追加したエントリ数を返す。
    pub fn fill_missing(&mut self, schema: &Schema) -> usize {
        let version = self.encoding_version;
        let mut added = 0;
        for (category, key) in schema.pairs() {
            let encoded = encode(&category.name, key, version);
            if !self.entries.contains_key(&encoded) {
                self.entries.insert(encoded, String::new());
                added += 1;
            }
        }
        if added > 0 {
            tracing::debug!(added, "Filled missing table entries");
        }
        added
    }
}
