//! 页面状态容器抽象
//!
//! 异步流程（拉取 -> 等待 -> 写回）只依赖此 trait，
//! 前端用响应式信号实现，测试中用 `RefCell`。

use std::cell::RefCell;
use std::rc::Rc;

pub trait StateCell<T> {
    /// 原地修改状态
    ///
    /// 返回 None 表示容器已失效（例如所属视图已卸载），修改被丢弃。
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;

    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.update_with(|state| f(state))
    }
}

impl<T> StateCell<T> for RefCell<T> {
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut state = self.try_borrow_mut().ok()?;
        Some(f(&mut state))
    }
}

impl<T, S: StateCell<T>> StateCell<T> for Rc<S> {
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.as_ref().update_with(f)
    }
}
