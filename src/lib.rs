//! lockguard: 分散ロックガードライブラリ。
//!
//! 共有 KV ストアの「存在しなければ作成 + 有効期限」プリミティブの上に
//! 相互排他を実現し、バックグラウンドタスクや API リクエストを
//! 取得・実行・解放のシーケンスでラップするインターセプターを提供する。

pub mod error;
pub mod guard;
pub mod key;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
pub mod spec;
pub mod store;

pub use error::{GuardError, LockError};
pub use guard::LockInterceptor;
pub use key::{api_key_suffix, task_key_suffix};
pub use memory::InMemoryLockStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisLockStore;
pub use spec::LockSpec;
pub use store::LockStore;

#[cfg(feature = "mock")]
pub use store::MockLockStore;
