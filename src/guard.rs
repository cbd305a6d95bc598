use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::GuardError;
use crate::spec::LockSpec;
use crate::store::LockStore;

/// 取得リトライのデフォルトポーリング間隔。
///
/// この定数が最悪ケースの取得レイテンシとストア負荷の上限を決める。
/// 通知ベースの待機は採用しない（ストア境界を 2 プリミティブに保つため）。
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 1 回のガード実行の結末。ポリシー適用前の中間表現。
enum GuardOutcome<T, E> {
    /// ロックを取得し、操作を実行した（操作自体の成否は result が持つ）。
    Completed { key: String, result: Result<T, E> },
    /// 待機期限内にロックを取得できなかった。操作は実行していない。
    NotAcquired { key: String },
}

/// 保護対象の操作を取得・実行・解放のシーケンスでラップするインターセプター。
///
/// ストアクライアントは明示的に注入する。プロセス内での直列化は行わず、
/// 排他性はストアのアトミックな作成プリミティブのみに依存する。各呼び出しの
/// 待機ループは呼び出し元の tokio タスク上で await するだけなので、他の
/// タスクの進行を妨げない。
pub struct LockInterceptor {
    store: Arc<dyn LockStore>,
    poll_interval: Duration,
}

impl LockInterceptor {
    pub fn new(store: Arc<dyn LockStore>) -> Self {
        Self {
            store,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// ポーリング間隔を変更する（デフォルト 50ms）。
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// タスク向けガード（サイレントスキップポリシー）。
    ///
    /// ロックを取得できた場合のみ操作を実行し、結果を `Some` で返す。
    /// 取得失敗・操作失敗はログに記録したうえで `None` を返し、呼び出し元へ
    /// エラーを伝播させない。
    pub async fn guard_task<F, Fut, T, E>(
        &self,
        spec: &LockSpec,
        key_suffix: &str,
        operation: F,
    ) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match self.run(spec, key_suffix, operation).await {
            GuardOutcome::Completed { result: Ok(v), .. } => Some(v),
            GuardOutcome::Completed {
                key,
                result: Err(e),
            } => {
                tracing::error!(key = %key, "保護対象のタスクが失敗: {}", e);
                None
            }
            GuardOutcome::NotAcquired { key } => {
                tracing::warn!(key = %key, "ロック未取得のためタスクをスキップ");
                None
            }
        }
    }

    /// API 向けガード（拒否ポリシー）。
    ///
    /// ロックを取得できなかった場合は `GuardError::Duplicate` を返し、
    /// ハンドラーは実行しない。取得後にハンドラー自体が失敗した場合は
    /// そのエラーを `GuardError::Operation` として返す。
    pub async fn guard_api<F, Fut, T, E>(
        &self,
        spec: &LockSpec,
        key_suffix: &str,
        operation: F,
    ) -> Result<T, GuardError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match self.run(spec, key_suffix, operation).await {
            GuardOutcome::Completed { result: Ok(v), .. } => Ok(v),
            GuardOutcome::Completed {
                key,
                result: Err(e),
            } => {
                tracing::error!(key = %key, "保護対象のハンドラーが失敗: {}", e);
                Err(GuardError::Operation(e))
            }
            GuardOutcome::NotAcquired { key } => Err(GuardError::Duplicate { key }),
        }
    }

    async fn run<F, Fut, T, E>(
        &self,
        spec: &LockSpec,
        key_suffix: &str,
        operation: F,
    ) -> GuardOutcome<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = format!("{}_{}", spec.key_prefix, key_suffix);

        if !self
            .acquire_with_wait(&key, &spec.value, spec.ttl, spec.wait_timeout)
            .await
        {
            return GuardOutcome::NotAcquired { key };
        }

        let result = operation().await;

        // 操作が失敗していても、即時解放の指定があれば必ず解放する。
        // 解放に失敗してもエントリは ttl で自動失効するため伝播させない。
        if spec.release_immediately {
            if let Err(e) = self.store.release(&key).await {
                tracing::warn!(key = %key, "ロック解放に失敗: {}", e);
            }
        }

        GuardOutcome::Completed { key, result }
    }

    /// 期限付きポーリングでロック取得を試みる。
    ///
    /// 期限は開始時点で一度だけ計算した絶対時刻。`wait_timeout` がゼロなら
    /// 単一試行のみ。ストアエラーは「取得失敗」と同一視する（fail-closed:
    /// ロック状態が不明なまま保護対象を実行することはない）。
    async fn acquire_with_wait(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
        wait_timeout: Duration,
    ) -> bool {
        let deadline = Instant::now() + wait_timeout;
        loop {
            match self.store.try_acquire(key, value, ttl).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(key = %key, "ロック取得でストアエラー: {}", e);
                }
            }
            let now = Instant::now();
            if wait_timeout.is_zero() || now >= deadline {
                return false;
            }
            let remaining = deadline - now;
            tokio::time::sleep(self.poll_interval.min(remaining)).await;
        }
    }
}
