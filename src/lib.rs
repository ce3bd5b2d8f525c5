//! warehouse-picker
//!
//! 商品ラベルの写真や手入力からSKUを拾い、棚番を引いてピッキングリストを作る。
//! 照合ロジック本体は `picker_common` にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod importer;
pub mod ocr;
pub mod picklist;
pub mod scanner;
pub mod store;
