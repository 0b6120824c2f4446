//! 会话模块
//!
//! 显式的会话上下文：登录时创建，登出或检测到过期时销毁。
//! 持久化细节通过 `SessionStore` 注入，浏览器端为 LocalStorage，测试中为内存实现。

use crate::error::{ClientError, ClientResult};
use cleanair_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, UserInfo};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 键值持久化存储
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    /// 返回是否写入成功
    fn set(&self, key: &str, value: &str) -> bool;
    /// 返回是否删除成功
    fn delete(&self, key: &str) -> bool;
}

/// 进程内存储，用于测试和原生环境
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .lock()
            .map(|mut m| m.insert(key.to_string(), value.to_string()))
            .is_ok()
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.lock().map(|mut m| m.remove(key)).is_ok()
    }
}

/// 已认证的会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: Option<UserInfo>,
}

impl Session {
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }
}

/// 会话上下文
///
/// token 存在即视为已登录，本地不做过期判断；过期由 API 客户端在 401 时被动发现。
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// 从持久化存储恢复会话
    ///
    /// 用户记录损坏时丢弃该记录，token 仍然有效。
    pub fn load(&self) -> Option<Session> {
        let token = self.store.get(STORAGE_TOKEN_KEY)?;
        let user = self.store.get(STORAGE_USER_KEY).and_then(|raw| {
            match serde_json::from_str::<UserInfo>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("discarding malformed stored user record: {}", e);
                    self.store.delete(STORAGE_USER_KEY);
                    None
                }
            }
        });
        Some(Session { token, user })
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(STORAGE_TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// 登录成功后写入会话
    pub fn begin(&self, session: &Session) -> ClientResult<()> {
        if !self.store.set(STORAGE_TOKEN_KEY, &session.token) {
            return Err(ClientError::storage("failed to persist session token").in_op("session.begin"));
        }
        match &session.user {
            Some(user) => {
                let raw = serde_json::to_string(user)?;
                if !self.store.set(STORAGE_USER_KEY, &raw) {
                    return Err(
                        ClientError::storage("failed to persist user record").in_op("session.begin")
                    );
                }
            }
            None => {
                self.store.delete(STORAGE_USER_KEY);
            }
        }
        Ok(())
    }

    /// 登出或检测到过期时清除全部会话状态
    pub fn end(&self) {
        self.store.delete(STORAGE_TOKEN_KEY);
        self.store.delete(STORAGE_USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> UserInfo {
        UserInfo {
            email: email.to_string(),
            full_name: None,
        }
    }

    #[test]
    fn test_absent_token_means_logged_out() {
        let ctx = SessionContext::in_memory();
        assert!(ctx.load().is_none());
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_begin_then_load_round_trips() {
        let ctx = SessionContext::in_memory();
        let session = Session {
            token: "tok".to_string(),
            user: Some(user("ali@example.pk")),
        };
        ctx.begin(&session).unwrap();

        let loaded = ctx.load().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.email(), Some("ali@example.pk"));
    }

    #[test]
    fn test_malformed_user_record_is_dropped() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(STORAGE_TOKEN_KEY, "tok");
        store.set(STORAGE_USER_KEY, "{not json");
        let ctx = SessionContext::new(store.clone());

        let loaded = ctx.load().unwrap();
        assert_eq!(loaded.token, "tok");
        assert!(loaded.user.is_none());
        assert!(store.get(STORAGE_USER_KEY).is_none());
    }

    #[test]
    fn test_end_clears_token_and_user() {
        let ctx = SessionContext::in_memory();
        ctx.begin(&Session {
            token: "tok".to_string(),
            user: Some(user("a@b.pk")),
        })
        .unwrap();

        ctx.end();
        assert!(ctx.load().is_none());
        assert!(ctx.token().is_none());
    }
}
