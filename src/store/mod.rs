//! データベースファイル（JSON）
//!
//! テーブル全体を1ファイルに保存する。変更のたびに丸ごと書き換える。

use picker_common::{Error as CommonError, Result as CommonResult, SkuTable, TableStorage};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// ファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseFile {
    /// バージョン（互換性チェック用）
    pub version: u32,
    /// 保存日時（RFC 3339）
    pub saved_at: String,
    /// SKU → 棚番
    pub entries: SkuTable,
}

impl DatabaseFile {
    pub const CURRENT_VERSION: u32 = 1;
}

/// JSONファイルへの保存先
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableStorage for JsonFileStorage {
    fn load(&self) -> CommonResult<Option<SkuTable>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "データベースファイルなし");
            return Ok(None);
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let file: DatabaseFile = serde_json::from_reader(reader).map_err(|e| {
            CommonError::Parse(format!("{}: {}", self.path.display(), e))
        })?;

        // 壊れた・古いファイルは黙って捨てない
        if file.version != DatabaseFile::CURRENT_VERSION {
            return Err(CommonError::Parse(format!(
                "{}: unsupported version {} (expected {})",
                self.path.display(),
                file.version,
                DatabaseFile::CURRENT_VERSION
            )));
        }

        Ok(Some(file.entries))
    }

    /// 同じフォルダの一時ファイルに書き切ってから置き換える
    ///
    /// 書き込み途中で失敗しても既存のファイルは元のまま残る。
    fn save(&self, table: &SkuTable) -> CommonResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let file = DatabaseFile {
            version: DatabaseFile::CURRENT_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            entries: table.clone(),
        };

        let mut temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &file)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), entries = table.len(), "データベースを保存");
        Ok(())
    }
}
