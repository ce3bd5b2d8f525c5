//! ファイルからのテーブル読み込み
//!
//! 拡張子で形式を判定する。
//! - `.csv` / `.txt`: `SKU,Location` ヘッダー付きCSV
//! - `.json`: `{"SKU": "棚番"}` オブジェクト
//! - `.xlsx` / `.xlsm` / `.xls` / `.ods`: 先頭シートのヘッダー行から列を探す

use crate::error::{PickerError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use picker_common::{parse_table_csv, parse_table_json, Error as CommonError, TableImport};
use std::path::Path;
use tracing::debug;

/// ファイルを読み込んでSKU→棚番のペアにする
pub fn read_table_file(path: &Path) -> Result<TableImport> {
    if !path.is_file() {
        return Err(PickerError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    debug!(path = %path.display(), ext = %ext, "テーブル読み込み");

    match ext.as_str() {
        "csv" | "txt" => {
            let content = std::fs::read_to_string(path)?;
            Ok(parse_table_csv(&content)?)
        }
        "json" => {
            let content = std::fs::read_to_string(path)?;
            Ok(parse_table_json(&content)?)
        }
        "xlsx" | "xlsm" | "xls" | "ods" => read_spreadsheet(path),
        _ => Err(PickerError::Import(format!(
            "未対応の形式です: {} (csv/json/xlsx)",
            path.display()
        ))),
    }
}

/// スプレッドシートの先頭シートを読む
fn read_spreadsheet(path: &Path) -> Result<TableImport> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| PickerError::Import(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PickerError::Import(format!("シートがありません: {}", path.display())))?
        .map_err(|e| PickerError::Import(format!("{}: {}", path.display(), e)))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| CommonError::MissingColumn("SKU".into()))?;

    let sku_col = find_column(header, "SKU")?;
    let location_col = find_column(header, "Location")?;

    let mut import = TableImport::default();
    for row in rows {
        let sku = cell_text(row.get(sku_col));
        let location = cell_text(row.get(location_col));
        if sku.is_empty() || location.is_empty() {
            import.skipped += 1;
        } else {
            import.entries.push((sku, location));
        }
    }

    Ok(import)
}

fn find_column(header: &[Data], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell.to_string().trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| CommonError::MissingColumn(name.to_string()).into())
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::Empty) | None => String::new(),
        Some(cell) => cell.to_string().trim().to_string(),
    }
}
