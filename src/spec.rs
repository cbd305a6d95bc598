use std::time::Duration;

/// 保護対象の操作ごとに与えるロック設定。操作に紐付けた後は不変。
#[derive(Debug, Clone)]
pub struct LockSpec {
    /// ロックキーの接頭辞。キーは `{key_prefix}_{suffix}` となる。
    pub key_prefix: String,
    /// ストアに書き込む不透明なマーカー値。所有権検証には使われない。
    pub value: String,
    /// ロックの有効期限。解放されなくてもこの時間でストア側が自動失効させる。
    pub ttl: Duration,
    /// 取得待ちの上限。ゼロならポーリングせず単一試行のみ。
    pub wait_timeout: Duration,
    /// true なら操作の完了（成功・失敗とも）直後に解放する。
    /// false なら ttl 満了まで保持し続ける（長期排他用）。
    pub release_immediately: bool,
}

impl LockSpec {
    /// バックグラウンドタスク向けのデフォルト設定。
    pub fn task() -> Self {
        Self {
            key_prefix: "lock_task".to_string(),
            ..Self::base()
        }
    }

    /// API リクエスト向けのデフォルト設定。
    pub fn api() -> Self {
        Self {
            key_prefix: "lock_api".to_string(),
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            key_prefix: String::new(),
            value: "lock_value".to_string(),
            ttl: Duration::from_secs(600),
            wait_timeout: Duration::ZERO,
            release_immediately: true,
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn with_release_immediately(mut self, release_immediately: bool) -> Self {
        self.release_immediately = release_immediately;
        self
    }
}

impl Default for LockSpec {
    fn default() -> Self {
        Self::task()
    }
}
