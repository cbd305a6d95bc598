use std::time::Duration;

use async_trait::async_trait;

use crate::LockError;

/// 共有 KV ストアに対するロック操作の境界。
///
/// 排他性はストア側のアトミックな「存在しなければ作成」プリミティブのみで
/// 保証される。プロセス内にロック状態のキャッシュは持たない。
#[async_trait]
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait LockStore: Send + Sync {
    /// キーが存在しない場合に限り、有効期限付きでエントリを作成する。
    /// この呼び出しがエントリを作成したときだけ `Ok(true)` を返す。
    /// ストアでの単一ラウンドトリップでアトミックに実行されること
    /// （read-then-write は不可）。
    async fn try_acquire(&self, key: &str, value: &str, ttl: Duration)
        -> Result<bool, LockError>;

    /// エントリを無条件に削除する。存在しないキーに対しては no-op。
    ///
    /// 保持者の検証は行わない。キーを知っている任意のプロセスが
    /// 自分の保持していないロックを解放できる点は設計上の既知の制約。
    async fn release(&self, key: &str) -> Result<(), LockError>;
}
