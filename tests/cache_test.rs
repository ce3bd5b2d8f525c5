//! 文字認識キャッシュのテスト

use warehouse_picker::error::PickerError;
use warehouse_picker::ocr::{compute_file_hash, recognize_images_cached, OcrCache, OcrSettings};
use warehouse_picker::scanner::ImageInfo;
use tempfile::tempdir;

/// 空のキャッシュファイル
#[test]
fn test_cache_file_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache = OcrCache::load(dir.path(), "eng");

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
}

/// キャッシュの保存と読み込み
#[test]
fn test_cache_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = OcrCache::load(dir.path(), "eng");
    cache.insert("abc123".into(), "label.png".into(), "AB123-456-02".into());
    cache.save(dir.path()).expect("キャッシュ保存失敗");

    let loaded = OcrCache::load(dir.path(), "eng");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("abc123"), Some("AB123-456-02"));
}

/// OCR言語が変わったら使わない
#[test]
fn test_cache_discarded_on_language_change() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = OcrCache::new("eng");
    cache.insert("abc123".into(), "label.png".into(), "AB123".into());
    cache.save(dir.path()).unwrap();

    let loaded = OcrCache::load(dir.path(), "jpn");
    assert!(loaded.is_empty());
    assert_eq!(loaded.language(), "jpn");
}

/// 壊れたファイルは空のキャッシュ扱い
#[test]
fn test_corrupt_cache_is_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(OcrCache::cache_path(dir.path()), "not json").unwrap();

    assert!(OcrCache::load(dir.path(), "eng").is_empty());
}

/// キャッシュ削除
#[test]
fn test_cache_clear() {
    let dir = tempdir().expect("Failed to create temp dir");
    OcrCache::new("eng").save(dir.path()).unwrap();

    assert!(OcrCache::clear(dir.path()).unwrap());
    assert!(!OcrCache::cache_path(dir.path()).exists());
    assert!(!OcrCache::clear(dir.path()).unwrap());
}

/// 同じ内容の画像は同じハッシュ
#[test]
fn test_hash_stable_for_same_content() {
    let dir = tempdir().expect("Failed to create temp dir");
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    std::fs::write(&a, b"\x89PNG label").unwrap();
    std::fs::write(&b, b"\x89PNG label").unwrap();

    assert_eq!(compute_file_hash(&a).unwrap(), compute_file_hash(&b).unwrap());
}

/// 情報表示は保存時の言語のまま読む
#[test]
fn test_inspect_keeps_stored_language() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = OcrCache::new("jpn");
    cache.insert("abc123".into(), "label.png".into(), "AB123".into());
    cache.save(dir.path()).unwrap();

    let shown = OcrCache::inspect(dir.path()).expect("キャッシュ読み込み失敗");
    assert_eq!(shown.language(), "jpn");
    assert_eq!(shown.len(), 1);

    // 照合用の読み込みは言語違いで捨てるが、ファイルは残る
    assert!(OcrCache::load(dir.path(), "eng").is_empty());
    assert_eq!(OcrCache::inspect(dir.path()).unwrap().len(), 1);
}

/// 途中の画像で失敗しても、認識済みの分はキャッシュに残る
#[cfg(unix)]
#[tokio::test]
async fn test_cache_saved_when_later_image_fails() {
    let dir = tempdir().expect("Failed to create temp dir");

    // `sh <画像> stdout -l eng` として実行されるので、中身をスクリプトにする
    std::fs::write(dir.path().join("a.png"), "echo AB123-456-02\n").unwrap();
    std::fs::write(dir.path().join("b.png"), "exit 3\n").unwrap();
    let images: Vec<ImageInfo> = ["a.png", "b.png"]
        .iter()
        .map(|name| ImageInfo {
            path: dir.path().join(name),
            file_name: name.to_string(),
        })
        .collect();
    let settings = OcrSettings {
        command: "sh".into(),
        language: "eng".into(),
    };

    let result = recognize_images_cached(&images, &settings, dir.path()).await;
    assert!(matches!(result, Err(PickerError::Ocr(_))));

    let cache = OcrCache::load(dir.path(), "eng");
    assert_eq!(cache.len(), 1);
    let hash = compute_file_hash(&images[0].path).unwrap();
    assert_eq!(cache.get(&hash).map(str::trim), Some("AB123-456-02"));
}
