use clap::{Parser, Subcommand};
use picker_common::SortOrder;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "warehouse-picker")]
#[command(about = "倉庫ピッキングリスト作成ツール（SKU→棚番照合）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// データベースファイル（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 商品ラベルの写真を読み取ってピッキングリストを作成
    Scan {
        /// 画像ファイルまたは画像フォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// 並べ替えキー (location/sku/route)
        #[arg(short, long)]
        sort: Option<SortOrder>,

        /// 出力ファイル/ディレクトリ（省略時は画面表示のみ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (csv/excel/both)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// キャッシュを使用（再認識をスキップ）
        #[arg(long)]
        use_cache: bool,

        /// OCR言語（設定より優先）
        #[arg(short, long)]
        language: Option<String>,
    },

    /// SKUを手入力で照合
    Lookup {
        /// SKU（省略時は --file か標準入力から1行1件）
        skus: Vec<String>,

        /// SKU一覧ファイル
        #[arg(long)]
        file: Option<PathBuf>,

        /// 入力テキストからSKUパターンを抽出する
        #[arg(short, long)]
        extract: bool,

        /// 並べ替えキー (location/sku/route)
        #[arg(short, long)]
        sort: Option<SortOrder>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (csv/excel/both)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
    },

    /// データベース操作
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// データベースファイルの場所を設定
        #[arg(long)]
        set_database: Option<PathBuf>,

        /// OCR言語を設定 (例: eng, jpn)
        #[arg(long)]
        set_ocr_language: Option<String>,

        /// 既定の並べ替えキーを設定
        #[arg(long)]
        set_sort: Option<SortOrder>,
    },

    /// 文字認識キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Subcommand)]
pub enum DbAction {
    /// SKUの棚番を登録（上書き）
    Set {
        sku: String,
        location: String,
    },

    /// SKUの棚番を表示
    Get {
        sku: String,
    },

    /// 全件表示
    List,

    /// テーブルファイルを取り込み (csv/json/xlsx)
    Import {
        #[arg(required = true)]
        file: PathBuf,
    },

    /// `sku,location` を1行1件で一括登録（省略時は標準入力）
    Bulk {
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// チャットログから棚番を取り込み
    ImportChat {
        #[arg(required = true)]
        file: PathBuf,
    },

    /// データベースを書き出し
    Export {
        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (csv/excel/json)
        #[arg(short, long, default_value = "csv")]
        format: DbExportFormat,
    },

    /// 全件削除
    Clear {
        /// 確認なしで削除
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Clone, Debug, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or both", s)),
        }
    }
}

/// データベース書き出し形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DbExportFormat {
    #[default]
    Csv,
    Excel,
    Json,
}

impl DbExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DbExportFormat::Csv => "csv",
            DbExportFormat::Excel => "xlsx",
            DbExportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for DbExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(DbExportFormat::Csv),
            "excel" | "xlsx" => Ok(DbExportFormat::Excel),
            "json" => Ok(DbExportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or json", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan() {
        let cli = Cli::parse_from(["warehouse-picker", "scan", "labels", "--sort", "route", "-f", "both"]);
        match cli.command {
            Commands::Scan { path, sort, format, .. } => {
                assert_eq!(path, PathBuf::from("labels"));
                assert_eq!(sort, Some(SortOrder::Route));
                assert!(matches!(format, ExportFormat::Both));
            }
            _ => panic!("scan expected"),
        }
    }

    #[test]
    fn test_parse_db_set_with_global_database() {
        let cli = Cli::parse_from([
            "warehouse-picker", "db", "set", "AB123", "A01", "--database", "db.json",
        ]);
        assert_eq!(cli.database, Some(PathBuf::from("db.json")));
        match cli.command {
            Commands::Db { action: DbAction::Set { sku, location } } => {
                assert_eq!(sku, "AB123");
                assert_eq!(location, "A01");
            }
            _ => panic!("db set expected"),
        }
    }

    #[test]
    fn test_export_format_from_str() {
        assert!(matches!("XLSX".parse::<ExportFormat>(), Ok(ExportFormat::Excel)));
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!("json".parse::<DbExportFormat>(), Ok(DbExportFormat::Json));
    }
}
