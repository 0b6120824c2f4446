//! 桌面通知封装模块

use cleanair::alerts::{NotificationPermission, Notifier};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Notification, NotificationOptions};

fn is_supported() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("Notification")).unwrap_or(false))
        .unwrap_or(false)
}

fn convert(permission: web_sys::NotificationPermission) -> NotificationPermission {
    match permission {
        web_sys::NotificationPermission::Granted => NotificationPermission::Granted,
        web_sys::NotificationPermission::Denied => NotificationPermission::Denied,
        web_sys::NotificationPermission::Default => NotificationPermission::Default,
        _ => NotificationPermission::Unsupported,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
    fn permission(&self) -> NotificationPermission {
        if !is_supported() {
            return NotificationPermission::Unsupported;
        }
        convert(Notification::permission())
    }

    fn show(&self, title: &str, body: &str) -> bool {
        let opts = NotificationOptions::new();
        opts.set_body(body);
        match Notification::new_with_options(title, &opts) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("failed to show notification: {:?}", e);
                false
            }
        }
    }
}

/// 向用户申请通知权限，返回最终状态
pub async fn request_permission() -> NotificationPermission {
    if !is_supported() {
        return NotificationPermission::Unsupported;
    }
    let promise = match Notification::request_permission() {
        Ok(promise) => promise,
        Err(e) => {
            log::warn!("notification permission request failed: {:?}", e);
            return BrowserNotifier.permission();
        }
    };
    match JsFuture::from(promise).await {
        Ok(value) => match value.as_string().as_deref() {
            Some("granted") => NotificationPermission::Granted,
            Some("denied") => NotificationPermission::Denied,
            _ => NotificationPermission::Default,
        },
        Err(e) => {
            log::warn!("notification permission request rejected: {:?}", e);
            BrowserNotifier.permission()
        }
    }
}
