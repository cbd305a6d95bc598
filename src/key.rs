use serde::Serialize;

use crate::LockError;

/// タスク用キーサフィックスを導出する。
///
/// コンポーネント名と操作名から決定的に構成するため、同一のタスクは
/// プロセスを問わず常に同一キーで競合する。
pub fn task_key_suffix(component: &str, operation: &str) -> String {
    format!("{}_{}", component, operation)
}

/// API 用キーサフィックスを導出する。
///
/// メソッド・パス・引数ペイロード（JSON）から構成する。同一引数の同一
/// リクエストは同一キーに写像され、異なる引数は原則として異なるキーに
/// なる（衝突しても余分な競合が起きるだけで安全性は損なわれない）。
pub fn api_key_suffix<T: Serialize>(
    method: &str,
    path: &str,
    args: &T,
) -> Result<String, LockError> {
    let payload = serde_json::to_string(args)?;
    Ok(format!("{}_{}_{}", method, path, payload))
}
