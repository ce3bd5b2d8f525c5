//! tesseract連携
//!
//! `tesseract <画像> stdout -l <言語>` を子プロセスで実行し、標準出力を認識結果とする。

use crate::error::{PickerError, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, warn};

/// 1枚の画像を文字認識する
pub async fn recognize(image: &Path, command: &str, language: &str) -> Result<String> {
    debug!(image = %image.display(), command, language, "OCR実行");

    let output = Command::new(command)
        .arg(image)
        .args(["stdout", "-l", language])
        .output()
        .await
        .map_err(|e| PickerError::Ocr(format!("{} を実行できません: {}", command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(code = ?output.status.code(), "OCRコマンドが失敗");
        return Err(PickerError::Ocr(format!(
            "{} failed (code {:?}): {}",
            command,
            output.status.code(),
            stderr.trim()
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).to_string();
    debug!(chars = text.len(), "OCR完了");
    Ok(text)
}
