use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像ファイルではありません: {0}")]
    NotAnImage(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("文字認識エラー: {0}")]
    Ocr(String),

    #[error("データベースファイルが不正: {0}")]
    InvalidDatabase(String),

    #[error("インポートエラー: {0}")]
    Import(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] picker_common::Error),
}

pub type Result<T> = std::result::Result<T, PickerError>;
