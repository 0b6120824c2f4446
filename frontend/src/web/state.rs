//! 响应式信号与核心库状态容器的桥接

use cleanair::StateCell;
use leptos::prelude::*;

/// 包装 `RwSignal`，让核心库的异步流程直接写入视图状态
///
/// 视图卸载后信号被释放，写入返回 None 并被丢弃。
#[derive(Debug)]
pub struct SignalCell<T: Send + Sync + 'static>(pub RwSignal<T>);

impl<T: Send + Sync + 'static> Clone for SignalCell<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for SignalCell<T> {}

impl<T: Send + Sync + 'static> SignalCell<T> {
    pub fn new(value: T) -> Self {
        Self(RwSignal::new(value))
    }
}

impl<T: Send + Sync + 'static> StateCell<T> for SignalCell<T> {
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.0.try_update(f)
    }

    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.0.try_with_untracked(f)
    }
}
