//! 共通型定義
//!
//! SKU→棚番テーブルと照合結果の型。CLI・ライブラリの双方から使う。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// SKU→棚番（ロケーション）のマッピング
///
/// キーは大文字小文字を区別する。同じキーへの書き込みは後勝ち。
/// 反復順はSKUの昇順（エクスポート結果を安定させるため）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuTable {
    entries: BTreeMap<String, String>,
}

impl SkuTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 棚番を取得（空文字の棚番は未登録扱い）
    pub fn get(&self, sku: &str) -> Option<&str> {
        self.entries
            .get(sku)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// 登録または上書き。以前の棚番を返す
    pub fn insert(&mut self, sku: impl Into<String>, location: impl Into<String>) -> Option<String> {
        self.entries.insert(sku.into(), location.into())
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.get(sku).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (SKU, 棚番) をSKU昇順で列挙
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for SkuTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for SkuTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// 照合結果（棚番が見つかった候補）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// 抽出された元の候補文字列
    pub original_candidate: String,
    /// 実際にヒットしたSKU
    pub resolved_sku: String,
    /// 棚番
    pub location: String,
    /// 正規化なしで一致したか
    pub exact_match: bool,
}

impl MatchResult {
    /// 表示用SKU
    ///
    /// 正規化で一致した場合は `元の候補 (Matched as: ヒットしたSKU)` 形式。
    pub fn display_sku(&self) -> String {
        if self.exact_match {
            self.resolved_sku.clone()
        } else {
            format!("{} (Matched as: {})", self.original_candidate, self.resolved_sku)
        }
    }
}

/// 候補リスト全体の照合結果
///
/// 各候補は `matched` か `unmatched` のどちらか一方にだけ入る。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupReport {
    pub matched: Vec<MatchResult>,
    pub unmatched: Vec<String>,
}

impl LookupReport {
    /// 処理した候補数
    pub fn total(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
