//! チャット履歴からのSKU→棚番抽出
//!
//! 現場のグループチャット（エクスポートしたテキスト）には
//! `[1/2/24, 9:15:02 AM] 担当者: DD1391 100, B12` のような連絡が流れる。
//! そこからSKUと棚番のペアを拾い出す。
//!
//! 対応する本文の形式:
//! - `SKU123, A01` / `SKU123 A01`
//! - `SKU123, A01 & A02`（複数棚はそのまま保持）
//! - `SKU123, A01 >>> A02`（移動連絡。矢印の後ろの棚番を採用）
//! - `SKU123 100 A01`（スタイル番号付き）

use regex::Regex;
use tracing::debug;

lazy_static::lazy_static! {
    static ref MESSAGE_RE: Regex =
        Regex::new(r"\[[0-9]+/[0-9]+/[0-9]+,\s[0-9]+:[0-9]+:[0-9]+\s[AP]M\]\s(.+?):\s(.+)").unwrap();
    static ref SKU_LOCATION_RE: Regex = Regex::new(
        r"([A-Z0-9]{5,10}(?:\s[0-9]{3})?)\s*(?:,\s*|\s+)((?:[A-Z][0-9]{1,2}\s*>>>\s*[A-Z][0-9]{1,2})|(?:[A-Z][0-9]{1,2}(?:\s*&\s*[A-Z][0-9]{1,2})?))"
    ).unwrap();
}

/// システムメッセージ等、読み飛ばす行の目印
const SKIP_MARKERS: &[&str] = &[
    "This message was deleted",
    "This message was edited",
    "image omitted",
    "Messages and calls are end-to-end encrypted",
    "created group",
    "added you",
    "Done",
];

/// チャット履歴からペアを抽出（出現順。同じSKUは後の行が優先される想定）
pub fn parse_chat_log(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter(|line| !SKIP_MARKERS.iter().any(|m| line.contains(m)))
        .filter_map(parse_chat_line)
        .collect()
}

/// 1行を解析
pub fn parse_chat_line(line: &str) -> Option<(String, String)> {
    let message = MESSAGE_RE.captures(line)?;
    let content = message.get(2)?.as_str();

    let caps = SKU_LOCATION_RE.captures(content)?;
    let sku = caps[1].trim().to_string();
    let mut location = caps[2].trim().to_string();

    if let Some((_, latest)) = location.split_once(">>>") {
        location = latest.trim().to_string();
    }

    debug!(sender = &message[1], sku = %sku, location = %location, "チャットからペアを抽出");
    Some((sku, location))
}
