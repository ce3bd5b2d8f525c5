//! Warehouse Picker Common Library
//!
//! SKU候補の抽出、棚番照合、並べ替え、テーブル入出力など
//! UIに依存しない処理をまとめる。

pub mod types;
pub mod error;
pub mod extractor;
pub mod lookup;
pub mod sorter;
pub mod store;
pub mod seed;
pub mod table_io;
pub mod chat_log;
pub mod export;

pub use types::{LookupReport, MatchResult, SkuTable};
pub use error::{Error, Result};
pub use extractor::{extract_candidates, fix_ocr_misread, parse_manual_entry};
pub use lookup::{resolve, resolve_all, SkuLookup};
pub use sorter::{sort_results, SortOrder};
pub use store::{DatabaseStore, MemoryStorage, TableStorage};
pub use seed::{demo_table, BuiltinDemo, CsvSeedFile, InitPolicy, SeedOrigin, SeedSource};
pub use table_io::{
    parse_bulk_text, parse_table_csv, parse_table_json, pick_list_to_csv, table_to_csv,
    table_to_json, TableImport,
};
pub use chat_log::parse_chat_log;
