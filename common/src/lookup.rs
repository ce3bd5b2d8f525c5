//! SKU照合・正規化エンジン
//!
//! 候補ごとに以下の規則を優先順に試し、最初にヒットした規則で確定する。
//!
//! 1. 完全一致
//! 2. ハイフン → 空白
//! 3. 連続空白 → ハイフン
//! 4. ハイフンを含む場合: 先頭部分のみ → 先頭 + 空白 + 2番目
//! 5. 空白を含む場合: 先頭トークンのみ → 先頭 + ハイフン + 2番目
//!
//! 規則の順序は既存データ（区切り文字が混在）との互換性に関わるため変更しない。

use crate::types::{LookupReport, MatchResult, SkuTable};
use regex::Regex;
use tracing::debug;

lazy_static::lazy_static! {
    static ref WHITESPACE_RUN_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// SKU→棚番の参照先
pub trait SkuLookup {
    fn location(&self, sku: &str) -> Option<&str>;
}

impl SkuLookup for SkuTable {
    fn location(&self, sku: &str) -> Option<&str> {
        self.get(sku)
    }
}

/// 規則のヒット（ヒットしたSKU, 棚番）
type Hit = (String, String);

type LookupRule = fn(&str, &dyn SkuLookup) -> Option<Hit>;

/// 照合規則（優先順）。先頭の規則だけが完全一致扱い
const LOOKUP_RULES: &[(&str, LookupRule)] = &[
    ("exact", exact),
    ("hyphen_to_space", hyphen_to_space),
    ("whitespace_to_hyphen", whitespace_to_hyphen),
    ("hyphen_parts", hyphen_parts),
    ("whitespace_parts", whitespace_parts),
];

/// 候補1件を照合する
///
/// どの規則でもヒットしなければ `None`（未検出）。
pub fn resolve(candidate: &str, db: &dyn SkuLookup) -> Option<MatchResult> {
    LOOKUP_RULES
        .iter()
        .enumerate()
        .find_map(|(idx, (name, rule))| {
            rule(candidate, db).map(|(sku, location)| {
                debug!(candidate, rule = *name, sku = %sku, location = %location, "照合ヒット");
                MatchResult {
                    original_candidate: candidate.to_string(),
                    resolved_sku: sku,
                    location,
                    exact_match: idx == 0,
                }
            })
        })
}

/// 候補リストを照合し、ヒット/未検出に振り分ける
pub fn resolve_all<S: AsRef<str>>(candidates: &[S], db: &dyn SkuLookup) -> LookupReport {
    let mut report = LookupReport::default();

    for candidate in candidates {
        let candidate = candidate.as_ref();
        match resolve(candidate, db) {
            Some(result) => report.matched.push(result),
            None => {
                debug!(candidate, "照合なし");
                report.unmatched.push(candidate.to_string());
            }
        }
    }

    report
}

fn lookup_key(db: &dyn SkuLookup, key: String) -> Option<Hit> {
    let location = db.location(&key)?.to_string();
    Some((key, location))
}

fn exact(candidate: &str, db: &dyn SkuLookup) -> Option<Hit> {
    lookup_key(db, candidate.to_string())
}

fn hyphen_to_space(candidate: &str, db: &dyn SkuLookup) -> Option<Hit> {
    lookup_key(db, candidate.replace('-', " "))
}

fn whitespace_to_hyphen(candidate: &str, db: &dyn SkuLookup) -> Option<Hit> {
    lookup_key(db, WHITESPACE_RUN_RE.replace_all(candidate, "-").into_owned())
}

fn hyphen_parts(candidate: &str, db: &dyn SkuLookup) -> Option<Hit> {
    if !candidate.contains('-') {
        return None;
    }
    let parts: Vec<&str> = candidate.split('-').collect();
    base_then_base_with_style(&parts, " ", db)
}

fn whitespace_parts(candidate: &str, db: &dyn SkuLookup) -> Option<Hit> {
    if !candidate.chars().any(char::is_whitespace) {
        return None;
    }
    let parts: Vec<&str> = candidate.split_whitespace().collect();
    base_then_base_with_style(&parts, "-", db)
}

/// 先頭部分のみ → 先頭 + 区切り + 2番目 の順に試す
fn base_then_base_with_style(parts: &[&str], joiner: &str, db: &dyn SkuLookup) -> Option<Hit> {
    let base = parts.first()?;
    lookup_key(db, base.to_string()).or_else(|| {
        let style = parts.get(1)?;
        lookup_key(db, format!("{}{}{}", base, joiner, style))
    })
}
