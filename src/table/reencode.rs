//! キーエンコーディング間のテーブル移行

use std::collections::{
    BTreeMap,
    HashMap,
    HashSet,
};

use super::{
    LocalisationTable,
    TableError,
};
use crate::encoding::{
    KeyEncoding,
    encode,
};
use crate::schema::Schema;
use crate::types::EncodedKey;

/// [`LocalisationTable::reencode`] の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReencodeReport {
    /// 移行前のエンコーディング
    pub from: KeyEncoding,
    /// 移行後のエンコーディング
    pub to: KeyEncoding,
    /// スキーマから計算したキーへ移した値の数
    pub remapped: usize,
    /// スキーマにない値の数（元のキーのまま残す）
    pub orphans: usize,
}

impl ReencodeReport {
    /// テーブルが既に要求されたエンコーディングだったか
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

impl LocalisationTable {
    /// すべての値を、スキーマの識別子を `target` でエンコードしたキーへ移す
    ///
    /// 新しいエントリ集合を完成させてから置き換えるため、エラー時は
    /// エントリもバージョンも変わらない。
    ///
    /// # Errors
    /// [`TableError::ReencodeCollision`]:
    /// - 値を持つ二つの識別子が `target` で同じキーになる
    /// - 移したキーがスキーマにないエントリと重なる
    pub fn reencode(
        &mut self,
        schema: &Schema,
        target: KeyEncoding,
    ) -> Result<ReencodeReport, TableError> {
        let from = self.encoding_version;
        if from == target {
            tracing::debug!(version = %target, "Table already uses requested encoding");
            return Ok(ReencodeReport { from, to: target, remapped: 0, orphans: 0 });
        }

        // 新しいキー → 値、新しいキー → 識別子、スキーマが記述する旧キー
        let mut remapped: BTreeMap<EncodedKey, String> = BTreeMap::new();
        let mut owners: HashMap<EncodedKey, String> = HashMap::new();
        let mut described: HashSet<EncodedKey> = HashSet::new();

        for (category, key) in schema.pairs() {
            let old_key = encode(&category.name, key, from);
            described.insert(old_key);
            let Some(value) = self.entries.get(&old_key) else {
                continue;
            };

            let identifier = format!("{}/{key}", category.name);
            let new_key = encode(&category.name, key, target);
            if let Some(owner) = owners.get(&new_key) {
                if *owner == identifier {
                    continue;
                }
                return Err(TableError::ReencodeCollision {
                    target,
                    key: new_key,
                    first: owner.clone(),
                    second: identifier,
                });
            }
            owners.insert(new_key, identifier);
            remapped.insert(new_key, value.clone());
        }

        let moved = remapped.len();
        let mut orphans = 0;
        for (key, value) in &self.entries {
            if described.contains(key) {
                continue;
            }
            if let Some(owner) = owners.get(key) {
                return Err(TableError::ReencodeCollision {
                    target,
                    key: *key,
                    first: owner.clone(),
                    second: format!("unlisted entry {key}"),
                });
            }
            remapped.insert(*key, value.clone());
            orphans += 1;
        }

        if orphans > 0 {
            tracing::warn!(orphans, "Table holds entries not described by the schema; keeping them as-is");
        }

        self.entries = remapped;
        self.encoding_version = target;
        tracing::debug!(%from, to = %target, moved, orphans, "Table re-encoded");

        Ok(ReencodeReport { from, to: target, remapped: moved, orphans })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::schema::Category;
    use crate::types::ResourceType;

    #[fixture]
    fn schema() -> Schema {
        Schema::new(vec![
            Category::new("UI", ResourceType::Text).with_keys(["Title", "Start", "Quit"]),
            Category::new("Menu", ResourceType::Text).with_keys(["Start"]),
        ])
    }

    fn v1_table(pairs: &[(&str, &str, &str)]) -> LocalisationTable {
        let mut table = LocalisationTable::with_encoding(["en-GB"], KeyEncoding::V1);
        for (category, key, value) in pairs {
            table.set_entry(encode(category, key, KeyEncoding::V1), *value);
        }
        table
    }

    #[rstest]
    fn reencode_moves_values_to_new_keys(schema: Schema) {
        let mut table = v1_table(&[("UI", "Title", "Hello"), ("Menu", "Start", "Go")]);

        let report = table.reencode(&schema, KeyEncoding::V2).unwrap();

        assert_eq!(
            report,
            ReencodeReport { from: KeyEncoding::V1, to: KeyEncoding::V2, remapped: 2, orphans: 0 }
        );
        assert_eq!(table.encoding_version(), KeyEncoding::V2);
        assert_that!(table.len(), eq(2));
        assert_eq!(table.get(encode("UI", "Title", KeyEncoding::V2)).unwrap(), "Hello");
        assert_eq!(table.get(encode("Menu", "Start", KeyEncoding::V2)).unwrap(), "Go");
        assert!(!table.contains(encode("UI", "Title", KeyEncoding::V1)));
    }

    #[rstest]
    fn reencode_skips_identifiers_without_values(schema: Schema) {
        let mut table = v1_table(&[("UI", "Quit", "Bye")]);

        let report = table.reencode(&schema, KeyEncoding::V2).unwrap();

        assert_that!(report.remapped, eq(1));
        assert_that!(table.len(), eq(1));
    }

    #[rstest]
    fn reencode_keeps_orphans(schema: Schema) {
        let mut table = v1_table(&[("UI", "Title", "Hello"), ("Old", "Removed", "Legacy")]);
        let orphan = encode("Old", "Removed", KeyEncoding::V1);

        let report = table.reencode(&schema, KeyEncoding::V2).unwrap();

        assert_that!(report.orphans, eq(1));
        assert_eq!(table.get(orphan).unwrap(), "Legacy");
    }

    #[rstest]
    fn reencode_to_same_version_is_noop(schema: Schema) {
        let mut table = v1_table(&[("UI", "Title", "Hello")]);
        let before = table.clone();

        let report = table.reencode(&schema, KeyEncoding::V1).unwrap();

        assert!(report.is_noop());
        assert_eq!(table, before);
    }

    #[rstest]
    fn reencode_round_trip_restores_table(schema: Schema) {
        let mut table = v1_table(&[("UI", "Title", "Hello"), ("UI", "Start", "Play")]);
        let before = table.clone();

        table.reencode(&schema, KeyEncoding::V2).unwrap();
        table.reencode(&schema, KeyEncoding::V1).unwrap();

        assert_eq!(table, before);
    }

    #[rstest]
    fn reencode_collision_leaves_table_untouched() {
        // These two keys are distinct under V1 but share a key under V2.
        let schema = Schema::new(vec![
            Category::new("UI", ResourceType::Text).with_keys(["Title", "tLlir3A", "waI0YJ"]),
        ]);
        let mut table =
            v1_table(&[("UI", "Title", "Hello"), ("UI", "tLlir3A", "first"), ("UI", "waI0YJ", "second")]);
        let before = table.clone();

        let result = table.reencode(&schema, KeyEncoding::V2);

        match result {
            Err(TableError::ReencodeCollision { key, first, second, .. }) => {
                assert_that!(key.value(), eq(4_209_923_232));
                assert_that!(first, eq("UI/tLlir3A"));
                assert_that!(second, eq("UI/waI0YJ"));
            }
            other => panic!("expected collision, got {other:?}"),
        }
        assert_eq!(table, before);
        assert_eq!(table.encoding_version(), KeyEncoding::V1);
        assert_eq!(table.get(encode("UI", "Title", KeyEncoding::V1)).unwrap(), "Hello");
    }

    #[rstest]
    fn colliding_identifiers_without_values_do_not_abort() {
        let schema = Schema::new(vec![
            Category::new("UI", ResourceType::Text).with_keys(["tLlir3A", "waI0YJ"]),
        ]);
        let mut table = v1_table(&[("UI", "tLlir3A", "only")]);

        table.reencode(&schema, KeyEncoding::V2).unwrap();

        assert_eq!(table.get(EncodedKey(4_209_923_232)).unwrap(), "only");
    }

    #[rstest]
    fn remapped_key_landing_on_orphan_aborts() {
        let schema = Schema::new(vec![Category::new("UI", ResourceType::Text).with_keys(["Title"])]);
        let mut table = v1_table(&[("UI", "Title", "Hello")]);
        table.set_entry(encode("UI", "Title", KeyEncoding::V2), "stale");
        let before = table.clone();

        let result = table.reencode(&schema, KeyEncoding::V2);

        assert!(matches!(result, Err(TableError::ReencodeCollision { .. })));
        assert_eq!(table, before);
    }
}
