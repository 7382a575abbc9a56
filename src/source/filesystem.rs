//! ディレクトリツリーからのテーブル探索

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use super::{
    SourceError,
    TableHandle,
    TableSource,
};
use crate::config::{
    TableFilesConfig,
    TableMatcher,
};
use crate::table::LocalisationTable;

/// glob パターンで選んだ JSON ファイルからテーブルを読み込む
#[derive(Debug, Clone, Default)]
pub struct FsTableSource {
    /// 対象ファイルのパターン
    config: TableFilesConfig,
}

impl FsTableSource {
    /// 新しい `FsTableSource` を作成
    #[must_use]
    pub const fn new(config: TableFilesConfig) -> Self {
        Self { config }
    }

    /// マッチするファイルをパス順に列挙する
    ///
    /// `.gitignore` を尊重し、シンボリックリンクは辿らない。
    fn find_table_files(matcher: &TableMatcher) -> Vec<PathBuf> {
        let mut found_files = Vec::new();

        for result in WalkBuilder::new(matcher.resource_root())
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            // ディレクトリはスキップ
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            if matcher.is_table_file(entry.path()) {
                found_files.push(entry.path().to_path_buf());
            }
        }

        found_files.sort();
        found_files
    }
}

impl TableSource for FsTableSource {
    fn discover(&mut self, root: &Path) -> Result<Vec<TableHandle>, SourceError> {
        if !root.is_dir() {
            return Err(SourceError::RootNotFound(root.to_path_buf()));
        }
        tracing::debug!(root = %root.display(), "Discovering localisation tables");

        let matcher = TableMatcher::new(root.to_path_buf(), &self.config)?;
        let handles: Vec<TableHandle> = Self::find_table_files(&matcher)
            .into_iter()
            .map(|path| {
                let name = path
                    .strip_prefix(root)
                    .unwrap_or(path.as_path())
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                TableHandle { name, path }
            })
            .collect();

        tracing::debug!(count = handles.len(), "Table discovery finished");
        Ok(handles)
    }

    fn load(&mut self, path: &Path) -> Result<LocalisationTable, SourceError> {
        if !path.is_file() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }
        LocalisationTable::load_from_file(path)
            .map_err(|source| SourceError::Table { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;

    fn write_table(root: &Path, relative: &str, locales: &[&str]) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        LocalisationTable::new(locales.iter().copied()).save_to_file(&path).unwrap();
    }

    #[rstest]
    fn discover_finds_tables_sorted_by_path() {
        let temp_dir = TempDir::new().unwrap();
        write_table(temp_dir.path(), "z/fr.loctable.json", &["fr"]);
        write_table(temp_dir.path(), "a/en.loctable.json", &["en-GB"]);
        write_table(temp_dir.path(), "root.loctable.json", &["de"]);
        fs::write(temp_dir.path().join("notes.json"), "{}").unwrap();

        let mut source = FsTableSource::default();
        let handles = source.discover(temp_dir.path()).unwrap();
        let names: Vec<_> = handles.iter().map(|h| h.name.as_str()).collect();

        assert_eq!(names, vec!["a/en.loctable.json", "root.loctable.json", "z/fr.loctable.json"]);
        assert_eq!(handles[0].path, temp_dir.path().join("a/en.loctable.json"));
    }

    #[rstest]
    fn discover_honours_exclude_patterns() {
        let temp_dir = TempDir::new().unwrap();
        write_table(temp_dir.path(), "live/en.loctable.json", &["en-GB"]);
        write_table(temp_dir.path(), "backup/en.loctable.json", &["en-GB"]);

        let mut source = FsTableSource::new(TableFilesConfig {
            exclude_patterns: vec!["backup/**".to_string()],
            ..TableFilesConfig::default()
        });
        let handles = source.discover(temp_dir.path()).unwrap();

        assert_that!(handles, len(eq(1)));
        assert_that!(handles[0].name, eq("live/en.loctable.json"));
    }

    #[rstest]
    fn discover_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();

        let result = FsTableSource::default().discover(&temp_dir.path().join("absent"));

        assert!(matches!(result, Err(SourceError::RootNotFound(_))));
    }

    #[rstest]
    fn load_reads_table() {
        let temp_dir = TempDir::new().unwrap();
        write_table(temp_dir.path(), "fr.loctable.json", &["fr"]);

        let table =
            FsTableSource::default().load(&temp_dir.path().join("fr.loctable.json")).unwrap();

        assert!(table.supports("fr"));
    }

    #[rstest]
    fn load_reports_broken_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.loctable.json");
        fs::write(&path, "{ not json").unwrap();

        let result = FsTableSource::default().load(&path);

        assert!(matches!(result, Err(SourceError::Table { .. })));
    }

    #[rstest]
    fn load_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();

        let result = FsTableSource::default().load(&temp_dir.path().join("gone.loctable.json"));

        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }
}
