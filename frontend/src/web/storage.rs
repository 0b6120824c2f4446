//! 会话持久化到 `window.localStorage`

use cleanair::SessionStore;

/// 无状态，每次操作重新获取 Storage 实例；隐私模式下存储不可用时按失败处理
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

impl SessionStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let stored = local_storage().is_some_and(|s| s.set_item(key, value).is_ok());
        if !stored {
            log::warn!("localStorage write failed for {}", key);
        }
        stored
    }

    fn delete(&self, key: &str) -> bool {
        local_storage().is_some_and(|s| s.remove_item(key).is_ok())
    }
}
