//! Excel生成（共通ライブラリ）
//!
//! SKUテーブル・ピッキングリストを1シートのブックとして書き出す。

use crate::table_io::{strip_match_annotation, CSV_HEADER};
use crate::types::{MatchResult, SkuTable};
use rust_xlsxwriter::*;

const SKU_COL_WIDTH: f64 = 24.0;
const LOCATION_COL_WIDTH: f64 = 12.0;
const MATCHED_AS_COL_WIDTH: f64 = 24.0;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA))
}

fn location_format() -> Format {
    Format::new().set_bold().set_align(FormatAlign::Center)
}

/// SKUテーブルをExcelバッファに生成
pub fn generate_table_xlsx(table: &SkuTable) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Database")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    write_header(worksheet, &CSV_HEADER)?;

    let location_format = location_format();
    for (i, (sku, location)) in table.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet
            .write_string(row, 0, sku)
            .map_err(|e| format!("SKU書き込みエラー: {}", e))?;
        worksheet
            .write_string_with_format(row, 1, location, &location_format)
            .map_err(|e| format!("棚番書き込みエラー: {}", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

/// ピッキングリストをExcelバッファに生成
///
/// 3列目には正規化で一致したときのSKUを出す（完全一致は空欄）。
pub fn generate_pick_list_xlsx(results: &[MatchResult]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Pick List")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    write_header(worksheet, &[CSV_HEADER[0], CSV_HEADER[1], "Matched As"])?;
    worksheet
        .set_column_width(2, MATCHED_AS_COL_WIDTH)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;

    let location_format = location_format();
    for (i, result) in results.iter().enumerate() {
        let row = (i + 1) as u32;
        let display = result.display_sku();
        worksheet
            .write_string(row, 0, strip_match_annotation(&display))
            .map_err(|e| format!("SKU書き込みエラー: {}", e))?;
        worksheet
            .write_string_with_format(row, 1, &result.location, &location_format)
            .map_err(|e| format!("棚番書き込みエラー: {}", e))?;
        if !result.exact_match {
            worksheet
                .write_string(row, 2, &result.resolved_sku)
                .map_err(|e| format!("照合SKU書き込みエラー: {}", e))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

fn write_header(worksheet: &mut Worksheet, labels: &[&str]) -> Result<(), String> {
    let format = header_format();
    for (col, label) in labels.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *label, &format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    worksheet
        .set_column_width(0, SKU_COL_WIDTH)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet
        .set_column_width(1, LOCATION_COL_WIDTH)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    Ok(())
}
