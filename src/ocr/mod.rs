//! 画像の文字認識
//!
//! 外部OCRコマンドを1枚ずつ順に実行する。キャッシュ有効時は
//! 内容ハッシュが一致する画像の認識をスキップする。

pub mod cache;
mod tesseract;

pub use cache::{compute_file_hash, OcrCache};
pub use tesseract::recognize;

use crate::error::Result;
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, warn};

/// OCR実行設定
#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub command: String,
    pub language: String,
}

/// 1枚分の認識結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrText {
    pub file_name: String,
    pub text: String,
    /// キャッシュから取得した
    pub cached: bool,
}

/// 画像を順に文字認識する
///
/// 1枚でも失敗したらそこで中断してエラーを返す。
pub async fn recognize_images(
    images: &[ImageInfo],
    settings: &OcrSettings,
    mut cache: Option<&mut OcrCache>,
) -> Result<Vec<OcrText>> {
    let progress = ProgressBar::new(images.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("  {bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut results = Vec::with_capacity(images.len());

    for img in images {
        progress.set_message(img.file_name.clone());

        let hash = if cache.is_some() {
            match compute_file_hash(&img.path) {
                Ok(h) => Some(h),
                Err(e) => {
                    // ハッシュ計算失敗時は未キャッシュとして扱う
                    warn!(file = %img.file_name, error = %e, "ハッシュ計算に失敗");
                    None
                }
            }
        } else {
            None
        };

        let cached_text = match (&cache, &hash) {
            (Some(c), Some(h)) => c.get(h).map(str::to_string),
            _ => None,
        };

        let result = match cached_text {
            Some(text) => {
                debug!(file = %img.file_name, "キャッシュヒット");
                OcrText {
                    file_name: img.file_name.clone(),
                    text,
                    cached: true,
                }
            }
            None => {
                let text = match recognize(&img.path, &settings.command, &settings.language).await {
                    Ok(t) => t,
                    Err(e) => {
                        progress.abandon();
                        return Err(e);
                    }
                };
                if let (Some(c), Some(h)) = (cache.as_deref_mut(), hash) {
                    c.insert(h, img.file_name.clone(), text.clone());
                }
                OcrText {
                    file_name: img.file_name.clone(),
                    text,
                    cached: false,
                }
            }
        };

        results.push(result);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(results)
}

/// キャッシュを使って順に文字認識する
///
/// 途中の画像で失敗しても、それまでに認識した分はキャッシュに保存してから
/// エラーを返す。
pub async fn recognize_images_cached(
    images: &[ImageInfo],
    settings: &OcrSettings,
    cache_dir: &Path,
) -> Result<Vec<OcrText>> {
    let mut cache = OcrCache::load(cache_dir, &settings.language);
    let result = recognize_images(images, settings, Some(&mut cache)).await;
    let saved = cache.save(cache_dir);

    let texts = result?;
    saved?;
    Ok(texts)
}
