//! 定时器封装模块
//!
//! 核心库的定时任务通过 `Sleeper` 等待，浏览器端由 `setTimeout` 驱动。

use async_trait::async_trait;
use cleanair::schedule::Sleeper;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSleeper;

#[async_trait(?Send)]
impl Sleeper for BrowserSleeper {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
