//! 文字認識結果キャッシュ
//!
//! 画像内容のSHA-256をキーにして認識テキストを保存し、
//! 同じ画像の再認識をスキップする。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

const CACHE_FILE_NAME: &str = ".ocr-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrCache {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 認識に使ったOCR言語
    language: String,
    /// 内容ハッシュ → エントリ
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub file_name: String,
    pub text: String,
}

impl OcrCache {
    const CURRENT_VERSION: u32 = 1;

    pub fn new(language: &str) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            language: language.to_string(),
            entries: HashMap::new(),
        }
    }

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み
    ///
    /// 無い・壊れている・バージョンや言語が違う場合は空のキャッシュ。
    pub fn load(folder: &Path, language: &str) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::new(language);
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::new(language),
        };

        match serde_json::from_reader::<_, OcrCache>(BufReader::new(file)) {
            Ok(cache) if cache.version != Self::CURRENT_VERSION => {
                warn!("キャッシュバージョン不一致、再生成します");
                Self::new(language)
            }
            Ok(cache) if cache.language != language => {
                warn!(cached = %cache.language, language, "OCR言語が変わったためキャッシュを破棄");
                Self::new(language)
            }
            Ok(cache) => cache,
            Err(e) => {
                warn!(error = %e, "キャッシュを読み込めません");
                Self::new(language)
            }
        }
    }

    /// 保存されている内容をそのまま読む（言語で絞り込まない）
    ///
    /// ファイルが無ければ空。壊れていればエラー。
    pub fn inspect(folder: &Path) -> Result<Self> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(Self::new(""));
        }
        let file = File::open(cache_path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// キャッシュファイルを保存
    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn get(&self, hash: &str) -> Option<&str> {
        self.entries.get(hash).map(|e| e.text.as_str())
    }

    pub fn insert(&mut self, hash: String, file_name: String, text: String) {
        self.entries.insert(hash, CacheEntry { file_name, text });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// キャッシュファイルを削除（無ければ `false`）
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// 画像内容のハッシュ（SHA-256, 16進）
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let content = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&content)))
}
