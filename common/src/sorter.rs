//! 照合結果の並べ替え
//!
//! - 棚番順 / SKU順: ロケール風の文字列比較（昇順）
//! - ルート順: ゾーン（棚番の先頭1文字）→ 棚番号（数値）の順
//!
//! いずれも安定ソート。キーが等しい要素は入力順を保つ。

use crate::types::MatchResult;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 並べ替えキー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// 棚番順（デフォルト）
    #[default]
    Location,
    /// ヒットしたSKU順
    Sku,
    /// ピッキングルート順（ゾーン→棚番号）
    Route,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "location" | "loc" => Ok(SortOrder::Location),
            "sku" => Ok(SortOrder::Sku),
            "route" | "optimize" => Ok(SortOrder::Route),
            _ => Err(format!("Unknown sort key: {}. Use location, sku, or route", s)),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Location => write!(f, "location"),
            SortOrder::Sku => write!(f, "sku"),
            SortOrder::Route => write!(f, "route"),
        }
    }
}

/// 照合結果を並べ替える
pub fn sort_results(results: &mut [MatchResult], order: SortOrder) {
    match order {
        SortOrder::Location => results.sort_by(|a, b| locale_compare(&a.location, &b.location)),
        SortOrder::Sku => results.sort_by(|a, b| locale_compare(&a.resolved_sku, &b.resolved_sku)),
        SortOrder::Route => results.sort_by(|a, b| compare_route(&a.location, &b.location)),
    }
}

/// ロケール風の文字列比較
///
/// 大文字小文字を無視して比較し、同じなら小文字を先にする。
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// ルート順の比較（ゾーン → 棚番号）
///
/// 同じゾーン内で棚番号が読めないものは、読めるものの後ろに回す。
pub fn compare_route(a: &str, b: &str) -> Ordering {
    let (zone_a, rest_a) = split_zone(a);
    let (zone_b, rest_b) = split_zone(b);

    if zone_a != zone_b {
        return locale_compare(zone_a, zone_b);
    }

    match (parse_bin_number(rest_a), parse_bin_number(rest_b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 棚番をゾーン（先頭1文字）と残りに分ける
fn split_zone(location: &str) -> (&str, &str) {
    match location.char_indices().nth(1) {
        Some((idx, _)) => location.split_at(idx),
        None => (location, ""),
    }
}

/// 先頭の整数部分を読む（`"05"` → 5, `" 12b"` → 12, `"x1"` → None）
pub fn parse_bin_number(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
