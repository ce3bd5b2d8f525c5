//! テーブルの入出力形式
//!
//! - CSV: `SKU,Location` ヘッダー（大文字小文字は区別しない）
//! - 一括入力テキスト: 1行1ペア `sku,location`
//! - JSON: `{"SKU": "棚番", ...}`
//! - ピッキングリストCSV: 照合結果の書き出し

use crate::error::{Error, Result};
use crate::types::{MatchResult, SkuTable};
use serde_json::Value;

/// CSVヘッダー（書き出し用）
pub const CSV_HEADER: [&str; 2] = ["SKU", "Location"];

/// 読み込み結果
///
/// `entries` は有効なペア（ファイル内の順序）、`skipped` は空フィールドで捨てた行数。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableImport {
    pub entries: Vec<(String, String)>,
    pub skipped: usize,
}

impl TableImport {
    fn push(&mut self, sku: &str, location: &str) {
        let sku = sku.trim();
        let location = location.trim();
        if sku.is_empty() || location.is_empty() {
            self.skipped += 1;
        } else {
            self.entries.push((sku.to_string(), location.to_string()));
        }
    }
}

/// CSV文字列を読み込む
///
/// ヘッダー行から `SKU` 列と `Location` 列を探す（大文字小文字は無視）。
/// 列が見つからない、またはレコードが壊れている場合はエラー。
/// どちらかのフィールドが空の行はスキップとして数える。
pub fn parse_table_csv(content: &str) -> Result<TableImport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let sku_idx = find_column(&headers, "sku").ok_or_else(|| Error::MissingColumn("SKU".into()))?;
    let location_idx =
        find_column(&headers, "location").ok_or_else(|| Error::MissingColumn("Location".into()))?;

    let mut import = TableImport::default();
    for record in reader.records() {
        let record = record?;
        import.push(
            record.get(sku_idx).unwrap_or(""),
            record.get(location_idx).unwrap_or(""),
        );
    }

    Ok(import)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
}

/// テーブルをCSV文字列に変換
pub fn table_to_csv(table: &SkuTable) -> Result<String> {
    write_csv(table.iter())
}

/// ピッキングリストをCSV文字列に変換
///
/// SKU列は照合注記（`(Matched as: ...)`）を取り除いた表示名を使う。
pub fn pick_list_to_csv(results: &[MatchResult]) -> Result<String> {
    let rows: Vec<(String, &str)> = results
        .iter()
        .map(|r| (strip_match_annotation(&r.display_sku()).to_string(), r.location.as_str()))
        .collect();
    write_csv(rows.iter().map(|(sku, location)| (sku.as_str(), *location)))
}

/// 表示名から照合注記を取り除く（最初の `(` 以降を捨てる）
pub fn strip_match_annotation(display: &str) -> &str {
    display.split('(').next().unwrap_or("").trim()
}

fn write_csv<'a>(rows: impl Iterator<Item = (&'a str, &'a str)>) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for (sku, location) in rows {
        writer.write_record([sku, location])?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Parse(format!("CSV出力がUTF-8ではありません: {}", e)))
}

/// 一括入力テキストをペアに分解
///
/// 空行は無視する。カンマがない行・空フィールドの行もそのまま返し、
/// 登録時に読み飛ばす（件数に含めない）。3列目以降は無視。
pub fn parse_bulk_text(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut parts = line.split(',');
            let sku = parts.next().unwrap_or("").trim().to_string();
            let location = parts.next().unwrap_or("").trim().to_string();
            (sku, location)
        })
        .collect()
}

/// JSONマッピングを読み込む
///
/// 値が文字列でない、または空のキーはスキップとして数える。
pub fn parse_table_json(content: &str) -> Result<TableImport> {
    let value: Value = serde_json::from_str(content)?;
    let map = value
        .as_object()
        .ok_or_else(|| Error::Parse("JSON must be an object of SKU to location".into()))?;

    let mut import = TableImport::default();
    for (sku, location) in map {
        match location.as_str() {
            Some(location) => import.push(sku, location),
            None => import.skipped += 1,
        }
    }
    Ok(import)
}

/// テーブルをJSON文字列に変換
pub fn table_to_json(table: &SkuTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}
