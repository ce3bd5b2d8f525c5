use crate::error::{PickerError, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageInfo {
    fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            file_name,
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff", "webp"];

/// 形式判定に読む先頭バイト数
const MAGIC_BYTES: u64 = 64;

/// 画像ファイルか検証する（中身の先頭バイトで判定）
///
/// 画像でなければ処理前に `NotAnImage` で弾く。
pub fn validate_image(path: &Path) -> Result<ImageInfo> {
    if !path.is_file() {
        return Err(PickerError::FileNotFound(path.display().to_string()));
    }

    if !has_image_signature(path)? {
        return Err(PickerError::NotAnImage(path.display().to_string()));
    }

    Ok(ImageInfo::from_path(path))
}

/// 先頭バイトが既知の画像形式か
fn has_image_signature(path: &Path) -> Result<bool> {
    let mut head = Vec::new();
    File::open(path)?.take(MAGIC_BYTES).read_to_end(&mut head)?;
    Ok(image::guess_format(&head).is_ok())
}

/// フォルダ直下の画像を列挙（ファイル名順）
///
/// 拡張子が画像でも中身が画像でないファイルは警告して除外する。
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.exists() {
        return Err(PickerError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(ext) = path.extension() {
            if !is_image_extension(&ext.to_string_lossy()) {
                continue;
            }
            match has_image_signature(path) {
                Ok(true) => images.push(ImageInfo::from_path(path)),
                Ok(false) => warn!(file = %path.display(), "画像ファイルではないため除外"),
                Err(e) => warn!(file = %path.display(), error = %e, "読み込めないため除外"),
            }
        }
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// 入力パスから処理対象の画像を集める
///
/// - ファイル: 画像か検証して1件
/// - フォルダ: 直下の画像すべて（0件ならエラー）
pub fn collect_images(path: &Path) -> Result<Vec<ImageInfo>> {
    if path.is_dir() {
        let images = scan_folder(path)?;
        if images.is_empty() {
            return Err(PickerError::NoImagesFound(path.display().to_string()));
        }
        Ok(images)
    } else {
        Ok(vec![validate_image(path)?])
    }
}

/// Check if a file extension is a supported image format
fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// 最小のPNGシグネチャ
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPG"));
        assert!(is_image_extension("jpeg"));
        assert!(is_image_extension("png"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension("csv"));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(PickerError::FolderNotFound(_))));
    }

    #[test]
    fn test_validate_image_accepts_png_magic() {
        let temp_dir = std::env::temp_dir().join("picker-test-validate-png");
        fs::create_dir_all(&temp_dir).unwrap();
        let path = temp_dir.join("label.png");
        fs::write(&path, PNG_MAGIC).unwrap();

        let info = validate_image(&path).unwrap();
        assert_eq!(info.file_name, "label.png");

        fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_validate_image_rejects_text_with_image_extension() {
        let temp_dir = std::env::temp_dir().join("picker-test-validate-fake");
        fs::create_dir_all(&temp_dir).unwrap();
        let path = temp_dir.join("fake.jpg");
        fs::write(&path, b"SKU,Location\nAB123,A01\n").unwrap();

        assert!(matches!(validate_image(&path), Err(PickerError::NotAnImage(_))));

        fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let temp_dir = std::env::temp_dir().join("picker-test-scan-sort");
        fs::create_dir_all(&temp_dir).unwrap();

        fs::write(temp_dir.join("c.jpg"), PNG_MAGIC).unwrap();
        fs::write(temp_dir.join("a.PNG"), PNG_MAGIC).unwrap();
        fs::write(temp_dir.join("b.jpeg"), PNG_MAGIC).unwrap();
        fs::write(temp_dir.join("notes.txt"), b"text").unwrap();

        let result = scan_folder(&temp_dir).unwrap();
        let names: Vec<&str> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.PNG", "b.jpeg", "c.jpg"]);

        fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_scan_folder_skips_fake_image() {
        let temp_dir = std::env::temp_dir().join("picker-test-scan-fake");
        fs::create_dir_all(&temp_dir).unwrap();

        fs::write(temp_dir.join("fake.jpg"), b"SKU,Location\nAB123,A01\n").unwrap();
        fs::write(temp_dir.join("label.png"), PNG_MAGIC).unwrap();

        let result = scan_folder(&temp_dir).unwrap();
        let names: Vec<&str> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["label.png"]);

        fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_collect_images_empty_folder() {
        let temp_dir = std::env::temp_dir().join("picker-test-collect-empty");
        fs::create_dir_all(&temp_dir).unwrap();

        assert!(matches!(collect_images(&temp_dir), Err(PickerError::NoImagesFound(_))));

        fs::remove_dir_all(&temp_dir).ok();
    }
}
