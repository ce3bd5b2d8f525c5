use crate::error::{PickerError, Result};
use picker_common::SortOrder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// データベースパスを上書きする環境変数
pub const DATABASE_ENV: &str = "PICKER_DATABASE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SKUテーブルの保存先（未設定なら設定ディレクトリ内の database.json）
    pub database_path: Option<PathBuf>,
    /// 初回起動時に読み込む同梱CSV
    pub seed_csv: PathBuf,
    /// OCRコマンド
    pub ocr_command: String,
    /// OCR言語
    pub ocr_language: String,
    /// 結果の並べ替えキー
    pub default_sort: SortOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_csv: PathBuf::from("database.csv"),
            ocr_command: "tesseract".into(),
            ocr_language: "eng".into(),
            default_sort: SortOrder::Location,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PickerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("warehouse-picker"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 実際に使うデータベースパス
    ///
    /// 優先順: 環境変数 → 設定ファイル → 既定（設定ディレクトリ内）
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Ok(path) = std::env::var(DATABASE_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("database.json")),
        }
    }

    pub fn set_database_path(&mut self, path: PathBuf) -> Result<()> {
        self.database_path = Some(path);
        self.save()
    }

    pub fn set_ocr_language(&mut self, language: String) -> Result<()> {
        if language.trim().is_empty() {
            return Err(PickerError::Config("OCR言語が空です".into()));
        }
        self.ocr_language = language;
        self.save()
    }

    pub fn set_default_sort(&mut self, sort: SortOrder) -> Result<()> {
        self.default_sort = sort;
        self.save()
    }
}
