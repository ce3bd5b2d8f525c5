//! 初期データ投入ポリシー
//!
//! 保存済みテーブルがない初回起動時に、データ源を順に試す。
//! 標準の順序は「同梱CSV → 組み込みデモデータ」。

use crate::error::Result;
use crate::table_io::parse_table_csv;
use crate::types::SkuTable;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 組み込みデモデータ
pub const DEMO_ENTRIES: [(&str, &str); 16] = [
    ("SKU12345 100", "A01"),
    ("SKU23456 200", "A12"),
    ("SKU34567 300", "B22"),
    ("SKU45678 400", "C30"),
    ("SKU56789 500", "B05"),
    ("SKU67890 600", "A39"),
    ("SKU78901 700", "C15"),
    ("ITEM1001 101", "A02"),
    ("ITEM1002 102", "B45"),
    ("ITEM1003 103", "C25"),
    ("DD1391 100", "B12"),
    ("DQ9131 700", "B43"),
    ("HP7580 100", "A11"),
    ("GY9265 100", "C15"),
    ("BY9262 100", "A04"),
    ("GZ3495 100", "B43"),
];

/// テーブルの読み込み元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOrigin {
    /// 保存済みテーブル
    Persisted,
    /// 同梱CSV
    SeedCsv,
    /// 組み込みデモデータ
    BuiltinDemo,
    /// どのデータ源も使えなかった
    Empty,
}

impl std::fmt::Display for SeedOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedOrigin::Persisted => write!(f, "persisted"),
            SeedOrigin::SeedCsv => write!(f, "seed-csv"),
            SeedOrigin::BuiltinDemo => write!(f, "demo"),
            SeedOrigin::Empty => write!(f, "empty"),
        }
    }
}

/// 初期データ源
pub trait SeedSource {
    fn origin(&self) -> SeedOrigin;

    /// テーブルを読み込む。使えるデータがなければ `None`
    fn load(&self) -> Result<Option<SkuTable>>;
}

/// 同梱CSV（`SKU,Location` ヘッダー）
#[derive(Debug, Clone)]
pub struct CsvSeedFile {
    path: PathBuf,
}

impl CsvSeedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeedSource for CsvSeedFile {
    fn origin(&self) -> SeedOrigin {
        SeedOrigin::SeedCsv
    }

    fn load(&self) -> Result<Option<SkuTable>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "同梱CSVなし");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let import = parse_table_csv(&content)?;
        if import.entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(import.entries.into_iter().collect()))
    }
}

/// 組み込みデモデータ
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDemo;

impl SeedSource for BuiltinDemo {
    fn origin(&self) -> SeedOrigin {
        SeedOrigin::BuiltinDemo
    }

    fn load(&self) -> Result<Option<SkuTable>> {
        Ok(Some(demo_table()))
    }
}

/// デモデータのテーブル
pub fn demo_table() -> SkuTable {
    DEMO_ENTRIES.iter().copied().collect()
}

/// 初期化ポリシー（データ源の優先順リスト）
#[derive(Default)]
pub struct InitPolicy {
    sources: Vec<Box<dyn SeedSource>>,
}

impl InitPolicy {
    /// データ源なし（空テーブルで開始）
    pub fn new() -> Self {
        Self::default()
    }

    /// 標準ポリシー: 同梱CSV → デモデータ
    pub fn standard(seed_csv: impl Into<PathBuf>) -> Self {
        Self::new()
            .then(CsvSeedFile::new(seed_csv))
            .then(BuiltinDemo)
    }

    /// データ源を末尾に追加
    pub fn then(mut self, source: impl SeedSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// データ源を順に試し、最初に得られたテーブルを返す
    ///
    /// 読み込みエラーはログに残して次のデータ源へ進む。
    pub fn resolve(&self) -> (SkuTable, SeedOrigin) {
        for source in &self.sources {
            match source.load() {
                Ok(Some(table)) => return (table, source.origin()),
                Ok(None) => debug!(origin = %source.origin(), "データなし、次のデータ源へ"),
                Err(e) => warn!(origin = %source.origin(), error = %e, "初期データの読み込みに失敗、次のデータ源へ"),
            }
        }
        (SkuTable::new(), SeedOrigin::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct FailingSource;

    impl SeedSource for FailingSource {
        fn origin(&self) -> SeedOrigin {
            SeedOrigin::SeedCsv
        }

        fn load(&self) -> Result<Option<SkuTable>> {
            Err(Error::Parse("broken".into()))
        }
    }

    #[test]
    fn test_demo_table_has_sixteen_entries() {
        let table = demo_table();
        assert_eq!(table.len(), 16);
        assert_eq!(table.get("DD1391 100"), Some("B12"));
        assert_eq!(table.get("GZ3495 100"), Some("B43"));
    }

    #[test]
    fn test_missing_seed_csv_falls_back_to_demo() {
        let policy = InitPolicy::standard("/nonexistent/database.csv");
        let (table, origin) = policy.resolve();
        assert_eq!(origin, SeedOrigin::BuiltinDemo);
        assert_eq!(table.len(), 16);
    }

    #[test]
    fn test_error_falls_through_to_next_source() {
        let policy = InitPolicy::new().then(FailingSource).then(BuiltinDemo);
        let (_, origin) = policy.resolve();
        assert_eq!(origin, SeedOrigin::BuiltinDemo);
    }

    #[test]
    fn test_empty_policy_yields_empty_table() {
        let (table, origin) = InitPolicy::new().resolve();
        assert!(table.is_empty());
        assert_eq!(origin, SeedOrigin::Empty);
    }

    #[test]
    fn test_seed_csv_used_when_present() {
        let dir = std::env::temp_dir().join("picker-seed-test-present");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("database.csv");
        std::fs::write(&path, "SKU,Location\nAB123 456,A01\nCD789,B02\n").unwrap();

        let (table, origin) = InitPolicy::standard(&path).resolve();
        assert_eq!(origin, SeedOrigin::SeedCsv);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("AB123 456"), Some("A01"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_seed_csv_without_valid_rows_falls_back() {
        let dir = std::env::temp_dir().join("picker-seed-test-empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("database.csv");
        std::fs::write(&path, "SKU,Location\n,A01\nCD789,\n").unwrap();

        let (_, origin) = InitPolicy::standard(&path).resolve();
        assert_eq!(origin, SeedOrigin::BuiltinDemo);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_seed_csv_bad_header_falls_back() {
        let dir = std::env::temp_dir().join("picker-seed-test-header");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("database.csv");
        std::fs::write(&path, "code,bin\nAB123,A01\n").unwrap();

        let (_, origin) = InitPolicy::standard(&path).resolve();
        assert_eq!(origin, SeedOrigin::BuiltinDemo);

        std::fs::remove_dir_all(&dir).ok();
    }
}
