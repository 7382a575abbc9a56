//! `loctool`: inspect and migrate localisation tables.

use std::collections::BTreeMap;
use std::io::{
    self,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use locale_tables::config::{
    ConfigError,
    ConfigManager,
};
use locale_tables::encoding::{
    CURRENT_ENCODING_VERSION,
    KeyEncoding,
    encode,
};
use locale_tables::locale;
use locale_tables::runtime::{
    Localiser,
    LocaliserError,
};
use locale_tables::schema::{
    Schema,
    SchemaError,
};
use locale_tables::source::{
    FsTableSource,
    SourceError,
    TableSource,
};
use locale_tables::table::{
    LocalisationTable,
    TableError,
};

/// Inspect and migrate localisation tables
#[derive(Parser)]
#[command(name = "loctool", version)]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Report every table under a resource root: locales, encoding and coverage.
    Check {
        /// Resource root holding the tables and `.localisation.json`.
        root: PathBuf,

        /// Schema to measure coverage against.
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
    /// Move a table's values to keys computed by another encoding version.
    Reencode {
        /// Table file to migrate in place.
        table: PathBuf,

        /// Schema naming every identifier the table may hold.
        #[arg(short, long)]
        schema: PathBuf,

        /// Target encoding version.
        #[arg(long, value_parser = parse_encoding, default_value_t = CURRENT_ENCODING_VERSION)]
        to: KeyEncoding,

        /// Report what would change without writing the table.
        #[arg(long)]
        dry_run: bool,
    },
    /// Resolve one identifier the way the runtime would.
    Lookup {
        /// Resource root holding the tables and `.localisation.json`.
        root: PathBuf,

        /// Category name.
        category: String,

        /// Key name within the category.
        key: String,

        /// Locale to activate; the host locale when omitted.
        #[arg(short, long)]
        locale: Option<String>,

        /// Encoding version used to compute the key.
        #[arg(long, value_parser = parse_encoding, default_value_t = CURRENT_ENCODING_VERSION)]
        encoding: KeyEncoding,
    },
    /// Print every schema identifier with its encoded key.
    Keys {
        /// Schema file.
        schema: PathBuf,

        /// Encoding version used to compute the keys.
        #[arg(long, value_parser = parse_encoding, default_value_t = CURRENT_ENCODING_VERSION)]
        encoding: KeyEncoding,
    },
}

/// サブコマンドの失敗（終了コード 2）
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// 設定ファイルの読み込みまたはバリデーションの失敗
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// スキーマの読み込みの失敗
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// テーブルの読み書きまたは再エンコードの失敗
    #[error(transparent)]
    Table(#[from] TableError),

    /// テーブル探索の失敗
    #[error(transparent)]
    Source(#[from] SourceError),

    /// ローカライザーの初期化または参照の失敗
    #[error(transparent)]
    Localiser(#[from] LocaliserError),

    /// 標準出力への書き込みの失敗
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// `2` や `v2` をエンコーディングバージョンとして解釈する
fn parse_encoding(raw: &str) -> Result<KeyEncoding, String> {
    let version: u32 = raw.trim_start_matches('v').parse().map_err(|e| format!("{e}"))?;
    KeyEncoding::try_from(version).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check { root, schema } => check(&root, schema.as_deref()),
        Commands::Reencode { table, schema, to, dry_run } => {
            reencode(&table, &schema, to, dry_run).map(|()| true)
        }
        Commands::Lookup { root, category, key, locale, encoding } => {
            lookup(&root, &category, &key, locale.as_deref(), encoding)
        }
        Commands::Keys { schema, encoding } => keys(&schema, encoding).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(2)
        }
    }
}

/// `root` の設定を読み込んで検証する
fn load_manager(root: &Path) -> Result<ConfigManager, CliError> {
    let mut manager = ConfigManager::new();
    manager.load_settings(Some(root))?;
    Ok(manager)
}

/// リソースルート配下のテーブルを報告する
///
/// テーブルかスキーマに対応が必要な問題があれば `false` を返す。
fn check(root: &Path, schema_path: Option<&Path>) -> Result<bool, CliError> {
    let manager = load_manager(root)?;
    let schema = schema_path.map(Schema::load).transpose()?;
    let mut out = io::stdout().lock();
    let mut healthy = true;

    if let Some(schema) = &schema
        && let Err(issues) = schema.validate()
    {
        healthy = false;
        for issue in issues {
            writeln!(out, "schema: {issue}")?;
        }
    }

    let mut source = FsTableSource::new(manager.get_settings().table_files.clone());
    let handles = source.discover(root)?;
    if handles.is_empty() {
        writeln!(out, "no tables found under {}", root.display())?;
        return Ok(false);
    }

    let mut claims: BTreeMap<&'static str, String> = BTreeMap::new();
    for handle in &handles {
        let table = match source.load(&handle.path) {
            Ok(table) => table,
            Err(err) => {
                healthy = false;
                writeln!(out, "{}: unreadable: {err}", handle.name)?;
                continue;
            }
        };

        writeln!(
            out,
            "{}: locales [{}], encoding {}, {} entries",
            handle.name,
            table.supported_locales().join(", "),
            table.encoding_version(),
            table.len()
        )?;

        if !table.is_usable() {
            healthy = false;
            writeln!(out, "  no supported locales; this table is never used")?;
        }
        if !table.is_current_encoding() {
            healthy = false;
            writeln!(out, "  stale encoding, re-encode to {CURRENT_ENCODING_VERSION}")?;
        }
        for raw in table.supported_locales() {
            match locale::canonicalize(raw) {
                None => {
                    healthy = false;
                    writeln!(out, "  unknown locale '{raw}'")?;
                }
                Some(canonical) => {
                    if let Some(owner) = claims.get(canonical) {
                        healthy = false;
                        writeln!(out, "  locale '{canonical}' already claimed by {owner}")?;
                    } else {
                        claims.insert(canonical, handle.name.clone());
                    }
                }
            }
        }

        if let Some(schema) = &schema {
            let coverage = table.coverage(schema);
            writeln!(
                out,
                "  {}/{} translated, {} missing, {} empty, {} unlisted",
                coverage.translated(),
                coverage.total_keys,
                coverage.missing.len(),
                coverage.empty.len(),
                coverage.unlisted
            )?;
            for identifier in &coverage.missing {
                writeln!(out, "  missing: {identifier}")?;
            }
            healthy &= !coverage.has_problem();
        }
    }

    Ok(healthy)
}

/// テーブルを別のエンコーディングバージョンへ移行し、上書き保存する
fn reencode(
    table_path: &Path,
    schema_path: &Path,
    target: KeyEncoding,
    dry_run: bool,
) -> Result<(), CliError> {
    let schema = Schema::load(schema_path)?;
    let mut table = LocalisationTable::load_from_file(table_path)?;
    let report = table.reencode(&schema, target)?;
    let mut out = io::stdout().lock();

    if report.is_noop() {
        writeln!(out, "{} already uses encoding {target}", table_path.display())?;
        return Ok(());
    }

    writeln!(
        out,
        "{}: {} -> {}, {} remapped, {} kept unchanged",
        table_path.display(),
        report.from,
        report.to,
        report.remapped,
        report.orphans
    )?;
    if dry_run {
        writeln!(out, "dry run, table not written")?;
    } else {
        table.save_to_file(table_path)?;
    }
    Ok(())
}

/// ランタイムと同じ手順で識別子を解決して表示する
///
/// 内容が見つかれば `true`、プレースホルダーを表示した場合は `false`。
fn lookup(
    root: &Path,
    category: &str,
    key: &str,
    requested: Option<&str>,
    encoding: KeyEncoding,
) -> Result<bool, CliError> {
    let manager = load_manager(root)?;
    let settings = manager.get_settings().clone();
    let source = FsTableSource::new(settings.table_files.clone());
    let mut localiser = Localiser::new(Box::new(source), settings);

    if !localiser.initialise(root, requested)? {
        tracing::error!("No table could be loaded for the requested or default locale");
        return Ok(false);
    }

    let encoded = encode(category, key, encoding);
    let found = localiser.get_localised_string(encoded)?.is_some();
    let text = localiser.localised_or_placeholder(encoded)?;
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "[{}] {category}/{key} ({encoded}): {text}",
        localiser.current_locale().unwrap_or_default()
    )?;

    Ok(found)
}

/// スキーマの全識別子とエンコード済みキーを表示する
fn keys(schema_path: &Path, encoding: KeyEncoding) -> Result<(), CliError> {
    let schema = Schema::load(schema_path)?;
    let mut out = io::stdout().lock();
    for (category, key, encoded) in schema.encoded_keys(encoding) {
        writeln!(out, "{category}/{key}\t{encoded}")?;
    }
    Ok(())
}
