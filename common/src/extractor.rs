//! SKU候補抽出モジュール
//!
//! OCRテキスト（または手入力テキスト）からSKU候補を取り出す。
//!
//! 抽出規則（最初に1件以上ヒットした規則で打ち切り）:
//! 1. `DD1391-100-11` 形式 → `DD1391 100`（基本コード + 最初の区切り）
//! 2. `DD1391 100` 形式（基本コード + 空白 + 数字3桁）
//! 3. `DD1391` 形式（基本コードのみ）

use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

lazy_static::lazy_static! {
    static ref FULL_SKU_RE: Regex =
        Regex::new(r"\b([A-Z]{2,}[0-9]+)-([A-Z0-9]+)-[A-Z0-9.]+\b").unwrap();
    static ref STYLE_SKU_RE: Regex =
        Regex::new(r"\b([A-Z]{2,}[0-9]+)\s+([0-9]{3})\b").unwrap();
    static ref BASE_SKU_RE: Regex =
        Regex::new(r"\b[A-Z]{2,}[0-9]+\b").unwrap();
}

type ExtractionRule = fn(&str) -> Vec<String>;

/// 抽出規則（優先順）
const EXTRACTION_RULES: &[(&str, ExtractionRule)] = &[
    ("full", extract_full_codes),
    ("style", extract_style_codes),
    ("base", extract_base_codes),
];

/// テキストからSKU候補を抽出する
///
/// 既知のOCR誤読を補正し、初出順を保って重複を除く。
pub fn extract_candidates(text: &str) -> Vec<String> {
    let raw = EXTRACTION_RULES
        .iter()
        .find_map(|(name, rule)| {
            let found = rule(text);
            if found.is_empty() {
                None
            } else {
                debug!(rule = *name, count = found.len(), "SKU候補を抽出");
                Some(found)
            }
        })
        .unwrap_or_default();

    dedupe_preserving_order(raw.into_iter().map(|c| fix_ocr_misread(&c)))
}

/// 手入力テキストをSKUリストに変換
///
/// 1行1SKU。前後の空白を除き、空行は捨てる。抽出規則は適用しない。
pub fn parse_manual_entry(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 既知のOCR誤読を補正（先頭の `1G` → `IG`）
pub fn fix_ocr_misread(candidate: &str) -> String {
    match candidate.strip_prefix("1G") {
        Some(rest) => format!("IG{}", rest),
        None => candidate.to_string(),
    }
}

fn extract_full_codes(text: &str) -> Vec<String> {
    FULL_SKU_RE
        .captures_iter(text)
        .map(|caps| format!("{} {}", &caps[1], &caps[2]))
        .collect()
}

fn extract_style_codes(text: &str) -> Vec<String> {
    STYLE_SKU_RE
        .captures_iter(text)
        .map(|caps| format!("{} {}", &caps[1], &caps[2]))
        .collect()
}

fn extract_base_codes(text: &str) -> Vec<String> {
    BASE_SKU_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn dedupe_preserving_order(candidates: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pattern_emits_base_and_style() {
        let text = "Picking slip\nDD1391-100-11 x2\nHP7580-100-9.5";
        assert_eq!(extract_candidates(text), vec!["DD1391 100", "HP7580 100"]);
    }

    #[test]
    fn test_full_pattern_wins_over_other_rules() {
        // 2行目はフォールバック規則にも合うが、規則1がヒットした時点で打ち切り
        let text = "AB123-456-02\nGY9265 100\nZZ999";
        assert_eq!(extract_candidates(text), vec!["AB123 456"]);
    }

    #[test]
    fn test_style_fallback() {
        let text = "GY9265 100\nBY9262   100 size M";
        assert_eq!(extract_candidates(text), vec!["GY9265 100", "BY9262 100"]);
    }

    #[test]
    fn test_style_requires_exactly_three_digits() {
        let text = "GY9265 1000";
        // 3桁に一致しないので基本コードのみ
        assert_eq!(extract_candidates(text), vec!["GY9265"]);
    }

    #[test]
    fn test_base_code_last_resort() {
        let text = "item DQ9131 and GZ3495 on shelf";
        assert_eq!(extract_candidates(text), vec!["DQ9131", "GZ3495"]);
    }

    #[test]
    fn test_lowercase_is_not_extracted() {
        assert!(extract_candidates("dd1391-100-11 gy9265").is_empty());
    }

    #[test]
    fn test_dedupe_keeps_first_seen_order() {
        let text = "GZ3495 DD1391 GZ3495 DD1391 HP7580";
        assert_eq!(extract_candidates(text), vec!["GZ3495", "DD1391", "HP7580"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_candidates("").is_empty());
        assert!(extract_candidates("no codes here 123").is_empty());
    }

    #[test]
    fn test_fix_ocr_misread() {
        assert_eq!(fix_ocr_misread("1G4521 100"), "IG4521 100");
        assert_eq!(fix_ocr_misread("IG4521"), "IG4521");
        // 先頭以外は対象外
        assert_eq!(fix_ocr_misread("AB1G22"), "AB1G22");
        assert_eq!(fix_ocr_misread("11G"), "11G");
    }

    #[test]
    fn test_parse_manual_entry() {
        let text = "  DD1391 100 \n\n\tHP7580-100\r\n   \nZZ000";
        assert_eq!(
            parse_manual_entry(text),
            vec!["DD1391 100", "HP7580-100", "ZZ000"]
        );
    }

    #[test]
    fn test_parse_manual_entry_blank() {
        assert!(parse_manual_entry("   \n \n").is_empty());
    }
}
