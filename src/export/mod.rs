//! ファイル出力
//!
//! ピッキングリスト（CSV/Excel）とデータベース全体（CSV/Excel/JSON）を書き出す。

use crate::cli::{DbExportFormat, ExportFormat};
use crate::error::{PickerError, Result};
use picker_common::export::excel_core::{generate_pick_list_xlsx, generate_table_xlsx};
use picker_common::{pick_list_to_csv, table_to_csv, table_to_json, MatchResult, SkuTable};
use std::path::{Path, PathBuf};

/// 出力先がディレクトリ（または拡張子なし）なら `title.拡張子` を付ける
fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, title: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        let csv_path = output.join(format!("{}.csv", title));
        let excel_path = output.join(format!("{}.xlsx", title));
        (csv_path, excel_path)
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(title);
        let csv_path = parent.join(format!("{}.csv", stem));
        let excel_path = parent.join(format!("{}.xlsx", stem));
        (csv_path, excel_path)
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}

pub fn write_pick_list_csv(results: &[MatchResult], path: &Path) -> Result<()> {
    let csv = pick_list_to_csv(results)?;
    write_file(path, csv.as_bytes())
}

pub fn write_pick_list_excel(results: &[MatchResult], path: &Path) -> Result<()> {
    let buffer = generate_pick_list_xlsx(results).map_err(PickerError::ExcelGeneration)?;
    write_file(path, &buffer)
}

/// ピッキングリストを出力し、書き出したファイルを返す
pub fn export_pick_list(
    results: &[MatchResult],
    format: &ExportFormat,
    output: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    let written = match format {
        ExportFormat::Csv => {
            let path = output_path_for_format(output, title, "csv");
            write_pick_list_csv(results, &path)?;
            vec![path]
        }
        ExportFormat::Excel => {
            let path = output_path_for_format(output, title, "xlsx");
            write_pick_list_excel(results, &path)?;
            vec![path]
        }
        ExportFormat::Both => {
            let (csv_path, excel_path) = output_paths_for_both(output, title);
            write_pick_list_csv(results, &csv_path)?;
            write_pick_list_excel(results, &excel_path)?;
            vec![csv_path, excel_path]
        }
    };

    Ok(written)
}

/// データベース全体を出力
pub fn export_table(
    table: &SkuTable,
    format: &DbExportFormat,
    output: &Path,
    title: &str,
) -> Result<PathBuf> {
    let path = output_path_for_format(output, title, format.extension());
    match format {
        DbExportFormat::Csv => write_file(&path, table_to_csv(table)?.as_bytes())?,
        DbExportFormat::Json => write_file(&path, table_to_json(table)?.as_bytes())?,
        DbExportFormat::Excel => {
            let buffer = generate_table_xlsx(table).map_err(PickerError::ExcelGeneration)?;
            write_file(&path, &buffer)?;
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_directory_like() {
        let path = output_path_for_format(Path::new("out"), "pick_list", "csv");
        assert_eq!(path, PathBuf::from("out/pick_list.csv"));
    }

    #[test]
    fn test_output_path_keeps_file_name() {
        let path = output_path_for_format(Path::new("out/today.csv"), "pick_list", "csv");
        assert_eq!(path, PathBuf::from("out/today.csv"));
    }

    #[test]
    fn test_output_paths_for_both_uses_stem() {
        let (csv, xlsx) = output_paths_for_both(Path::new("out/today.csv"), "pick_list");
        assert_eq!(csv, PathBuf::from("out/today.csv"));
        assert_eq!(xlsx, PathBuf::from("out/today.xlsx"));
    }
}
