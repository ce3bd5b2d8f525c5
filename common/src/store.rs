//! SKU→棚番データベース
//!
//! メモリ上のテーブルを保持し、変更のたびにテーブル全体を保存先へ書き戻す。
//! 保存先は `TableStorage` で差し替える（CLIはJSONファイル、テストはメモリ）。

use crate::error::{Error, Result};
use crate::lookup::SkuLookup;
use crate::seed::{InitPolicy, SeedOrigin};
use crate::types::SkuTable;
use std::cell::{Cell, RefCell};
use tracing::{debug, info};

/// テーブルの保存先
pub trait TableStorage {
    /// 保存済みテーブルを読み込む（未保存なら `None`）
    fn load(&self) -> Result<Option<SkuTable>>;

    /// テーブル全体を保存する
    fn save(&self, table: &SkuTable) -> Result<()>;
}

/// メモリ上の保存先（テスト・一時利用向け）
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: RefCell<Option<SkuTable>>,
    save_count: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みテーブルを持った状態で作成
    pub fn with_table(table: SkuTable) -> Self {
        Self {
            saved: RefCell::new(Some(table)),
            save_count: Cell::new(0),
        }
    }

    /// 最後に保存されたテーブル
    pub fn saved(&self) -> Option<SkuTable> {
        self.saved.borrow().clone()
    }

    /// 保存回数
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl TableStorage for MemoryStorage {
    fn load(&self) -> Result<Option<SkuTable>> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&self, table: &SkuTable) -> Result<()> {
        *self.saved.borrow_mut() = Some(table.clone());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}

/// 永続化付きSKUデータベース
#[derive(Debug)]
pub struct DatabaseStore<S: TableStorage> {
    table: SkuTable,
    storage: S,
    origin: SeedOrigin,
}

impl<S: TableStorage> DatabaseStore<S> {
    /// データベースを開く
    ///
    /// 保存済みテーブルがあればそれを使う（空でも採用）。
    /// なければ初期化ポリシーのデータ源を順に試し、結果を保存する。
    pub fn open(storage: S, policy: &InitPolicy) -> Result<Self> {
        if let Some(table) = storage.load()? {
            debug!(entries = table.len(), "保存済みテーブルを読み込み");
            return Ok(Self {
                table,
                storage,
                origin: SeedOrigin::Persisted,
            });
        }

        let (table, origin) = policy.resolve();
        info!(entries = table.len(), origin = %origin, "初期データを投入");
        let store = Self {
            table,
            storage,
            origin,
        };
        store.persist()?;
        Ok(store)
    }

    /// 棚番を取得
    pub fn get(&self, sku: &str) -> Option<&str> {
        self.table.get(sku)
    }

    /// SKUを登録（上書き）
    ///
    /// 前後の空白は除去する。どちらかが空ならエラーでテーブルは変更しない。
    pub fn set(&mut self, sku: &str, location: &str) -> Result<()> {
        let sku = sku.trim();
        let location = location.trim();
        if sku.is_empty() || location.is_empty() {
            return Err(Error::InvalidEntry(
                "SKU and location must both be non-empty".into(),
            ));
        }

        self.table.insert(sku, location);
        self.persist()
    }

    /// 全件削除
    pub fn remove_all(&mut self) -> Result<()> {
        self.table.clear();
        self.persist()
    }

    /// 一括登録
    ///
    /// 各ペアを上書き登録する。SKUか棚番が空（空白のみ含む）のペアは読み飛ばす。
    /// 登録できた件数を返す。
    pub fn bulk_import<I, K, V>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut count = 0;
        for (sku, location) in entries {
            let sku = sku.as_ref().trim();
            let location = location.as_ref().trim();
            if sku.is_empty() || location.is_empty() {
                debug!(sku, location, "空フィールドの行をスキップ");
                continue;
            }
            self.table.insert(sku, location);
            count += 1;
        }

        self.persist()?;
        Ok(count)
    }

    pub fn table(&self) -> &SkuTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// 全エントリ（SKU昇順）
    pub fn entries(&self) -> Vec<(String, String)> {
        self.table
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// 起動時にどのデータ源から読み込んだか
    pub fn origin(&self) -> SeedOrigin {
        self.origin
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.table)
    }
}

impl<S: TableStorage> SkuLookup for DatabaseStore<S> {
    fn location(&self, sku: &str) -> Option<&str> {
        self.get(sku)
    }
}
