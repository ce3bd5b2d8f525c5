use clap::Parser;
use dialoguer::Confirm;
use picker_common::{parse_bulk_text, parse_chat_log, DatabaseStore, InitPolicy, LookupReport};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use warehouse_picker::{cli, config, error, export, importer, ocr, picklist, scanner, store};
use cli::{Cli, Commands, DbAction, ExportFormat};
use config::Config;
use error::{PickerError, Result};
use picklist::CandidateMode;
use store::JsonFileStorage;

type Store = DatabaseStore<JsonFileStorage>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut config = Config::load()?;

    match cli.command {
        Commands::Scan { path, sort, output, format, use_cache, language } => {
            println!("📦 warehouse-picker - ラベル読み取り\n");

            // 1. 画像確認
            println!("[1/3] 画像を確認中...");
            let images = scanner::collect_images(&path)?;
            println!("✔ {}枚の画像を検出\n", images.len());

            let store = open_store(&config, cli.database.as_deref())?;

            // 2. 文字認識
            println!("[2/3] 文字認識中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let settings = ocr::OcrSettings {
                command: config.ocr_command.clone(),
                language: language.unwrap_or_else(|| config.ocr_language.clone()),
            };
            let texts = if use_cache {
                ocr::recognize_images_cached(&images, &settings, &cache_folder(&path)).await?
            } else {
                ocr::recognize_images(&images, &settings, None).await?
            };
            let cached = texts.iter().filter(|t| t.cached).count();
            if cached > 0 {
                println!("✔ 認識完了 (キャッシュ {}件)\n", cached);
            } else {
                println!("✔ 認識完了\n");
            }

            // 3. 照合
            println!("[3/3] 棚番を照合中...");
            let raw: Vec<&str> = texts.iter().map(|t| t.text.as_str()).collect();
            let candidates = picklist::candidates_from_texts(&raw);
            if candidates.is_empty() {
                println!("SKUらしき文字列が見つかりませんでした");
                return Ok(());
            }

            let report = picklist::build_pick_list(&candidates, &store, sort.unwrap_or(config.default_sort));
            print_report(&report);

            if let Some(output) = output {
                write_pick_list(&report, &format, &output)?;
            }

            println!("\n✅ 完了");
        }

        Commands::Lookup { skus, file, extract, sort, output, format } => {
            let text = if !skus.is_empty() {
                skus.join("\n")
            } else if let Some(file) = file {
                read_text_file(&file)?
            } else {
                read_stdin()?
            };

            let mode = if extract { CandidateMode::Extract } else { CandidateMode::Manual };
            let candidates = picklist::candidates_from_text(&text, mode);
            if candidates.is_empty() {
                println!("入力が空です");
                return Ok(());
            }

            let store = open_store(&config, cli.database.as_deref())?;
            let report = picklist::build_pick_list(&candidates, &store, sort.unwrap_or(config.default_sort));
            print_report(&report);

            if let Some(output) = output {
                write_pick_list(&report, &format, &output)?;
            }
        }

        Commands::Db { action } => {
            let mut store = open_store(&config, cli.database.as_deref())?;
            run_db_action(&mut store, action)?;
        }

        Commands::Config { show, set_database, set_ocr_language, set_sort } => {
            let changed = set_database.is_some() || set_ocr_language.is_some() || set_sort.is_some();

            if let Some(path) = set_database {
                let shown = path.display().to_string();
                config.set_database_path(path)?;
                println!("✔ データベース: {}", shown);
            }

            if let Some(language) = set_ocr_language {
                config.set_ocr_language(language)?;
                println!("✔ OCR言語: {}", config.ocr_language);
            }

            if let Some(sort) = set_sort {
                config.set_default_sort(sort)?;
                println!("✔ 並べ替え: {}", sort);
            }

            if show || !changed {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  データベース: {}", config.database_path()?.display());
                println!("  同梱CSV: {}", config.seed_csv.display());
                println!("  OCRコマンド: {}", config.ocr_command);
                println!("  OCR言語: {}", config.ocr_language);
                println!("  並べ替え: {}", config.default_sort);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = ocr::OcrCache::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = ocr::OcrCache::inspect(&target)?;
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  言語: {}", cache.language());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match ocr::OcrCache::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn run_db_action(store: &mut Store, action: DbAction) -> Result<()> {
    match action {
        DbAction::Set { sku, location } => {
            store.set(&sku, &location)?;
            println!("✔ {} → {}", sku.trim(), location.trim());
        }

        DbAction::Get { sku } => match store.get(sku.trim()) {
            Some(location) => println!("{} → {}", sku.trim(), location),
            None => println!("未登録: {}", sku.trim()),
        },

        DbAction::List => {
            if store.is_empty() {
                println!("データベースは空です");
            }
            for (sku, location) in store.entries() {
                println!("  {:<20} {}", sku, location);
            }
            println!("\n{}件 (初期データ: {})", store.len(), store.origin());
        }

        DbAction::Import { file } => {
            println!("- 読み込み中: {}", file.display());
            // 読み込みに失敗したらテーブルは変更しない
            let import = importer::read_table_file(&file)?;
            let count = store.bulk_import(import.entries)?;
            println!("✔ {}件を取り込み (スキップ {}件)", count, import.skipped);
        }

        DbAction::Bulk { file } => {
            let text = match file {
                Some(file) => read_text_file(&file)?,
                None => read_stdin()?,
            };
            let pairs = parse_bulk_text(&text);
            let total = pairs.len();
            let count = store.bulk_import(pairs)?;
            println!("✔ {}件を登録 (スキップ {}件)", count, total - count);
        }

        DbAction::ImportChat { file } => {
            let text = read_text_file(&file)?;
            let pairs = parse_chat_log(&text);
            let count = store.bulk_import(pairs)?;
            println!("✔ チャットログから{}件を取り込み", count);
        }

        DbAction::Export { output, format } => {
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let path = export::export_table(store.table(), &format, &output, "database")?;
            println!("✔ {}件を出力: {}", store.len(), path.display());
        }

        DbAction::Clear { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("{}件をすべて削除しますか？", store.len()))
                    .default(false)
                    .interact()
                    .map_err(|e| PickerError::Prompt(e.to_string()))?;
                if !confirmed {
                    println!("中止しました");
                    return Ok(());
                }
            }
            store.remove_all()?;
            println!("✔ データベースを空にしました");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--database` → 環境変数 → 設定 の順でパスを決めて開く
fn open_store(config: &Config, database: Option<&Path>) -> Result<Store> {
    let path = match database {
        Some(path) => path.to_path_buf(),
        None => config.database_path()?,
    };
    debug!(path = %path.display(), "データベースを開く");

    let policy = InitPolicy::standard(config.seed_csv.clone());
    let store = DatabaseStore::open(JsonFileStorage::new(&path), &policy)
        .map_err(|e| PickerError::InvalidDatabase(format!("{}: {}", path.display(), e)))?;
    Ok(store)
}

/// キャッシュを置くフォルダ（画像ファイル指定時はその親）
fn cache_folder(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn print_report(report: &LookupReport) {
    println!("✔ {}件中 {}件ヒット\n", report.total(), report.matched.len());

    for (location, sku) in picklist::display_rows(report) {
        println!("  📍 {:<10} {}", location, sku);
    }

    if !report.unmatched.is_empty() {
        println!("\n未検出:");
        for candidate in &report.unmatched {
            println!("  ❓ {}", candidate);
        }
    }
}

fn write_pick_list(report: &LookupReport, format: &ExportFormat, output: &Path) -> Result<()> {
    let written = export::export_pick_list(&report.matched, format, output, "pick_list")?;
    for path in written {
        println!("✔ 出力: {}", path.display());
    }
    Ok(())
}

fn read_text_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(PickerError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
