//! ピッキングリスト作成
//!
//! 候補の取り出し → 棚番照合 → 並べ替え → 表示行の組み立て。

use picker_common::{
    extract_candidates, parse_manual_entry, resolve_all, sort_results, LookupReport, SkuLookup,
    SortOrder,
};

/// 候補文字列の取り出し方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateMode {
    /// 認識テキストからSKUパターンを抽出
    Extract,
    /// 1行1SKUとしてそのまま使う
    Manual,
}

/// テキストから候補を取り出す
pub fn candidates_from_text(text: &str, mode: CandidateMode) -> Vec<String> {
    match mode {
        CandidateMode::Extract => extract_candidates(text),
        CandidateMode::Manual => parse_manual_entry(text),
    }
}

/// 複数画像の認識テキストから候補を取り出す
///
/// 全テキストを連結してから抽出するので、画像をまたいだ重複も除かれる。
pub fn candidates_from_texts<S: AsRef<str>>(texts: &[S]) -> Vec<String> {
    let joined = texts
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    extract_candidates(&joined)
}

/// 照合して並べ替える
pub fn build_pick_list<S: AsRef<str>>(
    candidates: &[S],
    db: &dyn SkuLookup,
    order: SortOrder,
) -> LookupReport {
    let mut report = resolve_all(candidates, db);
    sort_results(&mut report.matched, order);
    report
}

/// 表示用の行（棚番, SKU表示）
pub fn display_rows(report: &LookupReport) -> Vec<(String, String)> {
    report
        .matched
        .iter()
        .map(|m| (m.location.clone(), m.display_sku()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use picker_common::SkuTable;

    fn table(pairs: &[(&str, &str)]) -> SkuTable {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_style_code_on_label_matches_exactly() {
        let db = table(&[("AB123 456", "A01")]);
        let candidates = candidates_from_text("AB123-456-02", CandidateMode::Extract);
        let report = build_pick_list(&candidates, &db, SortOrder::Location);

        let hit = report
            .matched
            .iter()
            .find(|m| m.original_candidate == "AB123 456")
            .expect("AB123 456 should match");
        assert!(hit.exact_match);
        assert_eq!(hit.location, "A01");
    }

    #[test]
    fn test_manual_mode_keeps_lines() {
        let candidates = candidates_from_text("  AB123 \n\nCD456\n", CandidateMode::Manual);
        assert_eq!(candidates, vec!["AB123", "CD456"]);
    }

    #[test]
    fn test_texts_dedupe_across_images() {
        let candidates = candidates_from_texts(&["AB123 on shelf", "again AB123"]);
        assert_eq!(candidates, vec!["AB123"]);
    }

    #[test]
    fn test_sorted_by_location() {
        let db = table(&[("CD456", "B2"), ("AB123", "A1")]);
        let report = build_pick_list(&["CD456", "AB123", "ZZ000"], &db, SortOrder::Location);

        let locations: Vec<&str> = report.matched.iter().map(|m| m.location.as_str()).collect();
        assert_eq!(locations, vec!["A1", "B2"]);
        assert_eq!(report.unmatched, vec!["ZZ000"]);
    }

    #[test]
    fn test_display_rows_annotate_partial_match() {
        let db = table(&[("AB123", "B02")]);
        let report = build_pick_list(&["AB123-456"], &db, SortOrder::Sku);
        let rows = display_rows(&report);
        assert_eq!(rows, vec![("B02".to_string(), "AB123-456 (Matched as: AB123)".to_string())]);
    }
}
