use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("ロックストアに到達できません: {0}")]
    StoreUnavailable(String),
    #[error("キー導出のシリアライズに失敗しました: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 拒否ポリシー（API ガード）が呼び出し元へ返すエラー。
#[derive(Debug, Error)]
pub enum GuardError<E> {
    /// 同一キーのロックが既に保持されているため実行を拒否した。
    /// トランスポート層は HTTP 409 相当にマップすることを想定する。
    #[error("重複操作のため拒否されました: key={key}")]
    Duplicate { key: String },
    /// 保護対象の処理自体が失敗した。ロック取得は成功している。
    #[error("保護対象の処理が失敗しました: {0}")]
    Operation(E),
}
