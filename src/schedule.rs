//! 可取消的定时任务
//!
//! 所有定时任务都返回 `(future, TaskHandle)`：future 交给调用方所在的执行器运行，
//! 句柄随视图一起销毁。句柄被丢弃或调用 `cancel` 后任务不再执行。

use async_trait::async_trait;
use futures::future::{AbortHandle, abortable};
use futures::{Future, FutureExt};
use std::time::Duration;

/// 计时器抽象，浏览器端用 `setTimeout`，测试中用 tokio
#[async_trait(?Send)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// 任务句柄，Drop 时中止任务
#[derive(Debug)]
pub struct TaskHandle {
    abort: Option<AbortHandle>,
}

impl TaskHandle {
    fn new(abort: AbortHandle) -> Self {
        Self { abort: Some(abort) }
    }

    pub fn cancel(mut self) {
        if let Some(abort) = self.abort.take() {
            abort.abort();
        }
    }

    /// 放弃对任务的控制，任务将运行到结束
    pub fn detach(mut self) {
        self.abort = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.as_ref().is_none_or(AbortHandle::is_aborted)
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(abort) = self.abort.take() {
            abort.abort();
        }
    }
}

/// 等待 `delay` 后执行一次 `task`
pub fn delayed<S, F>(sleeper: S, delay: Duration, task: F) -> (impl Future<Output = ()>, TaskHandle)
where
    S: Sleeper,
    F: Future<Output = ()>,
{
    let (fut, abort) = abortable(async move {
        sleeper.sleep(delay).await;
        task.await;
    });
    (fut.map(|_| ()), TaskHandle::new(abort))
}

/// 立即执行一次 `tick`，之后每隔 `interval` 执行一次，直到句柄释放
///
/// 上一次 `tick` 完成后才开始计时，不会叠加执行。
pub fn periodic<S, F, Fut>(
    sleeper: S,
    interval: Duration,
    tick: F,
) -> (impl Future<Output = ()>, TaskHandle)
where
    S: Sleeper,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let (fut, abort) = abortable(run_periodic(sleeper, interval, tick));
    (fut.map(|_| ()), TaskHandle::new(abort))
}

async fn run_periodic<S, F, Fut>(sleeper: S, interval: Duration, mut tick: F)
where
    S: Sleeper,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        tick().await;
        sleeper.sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct TokioSleeper;

    #[async_trait(?Send)]
    impl Sleeper for TokioSleeper {
        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let handle = count.clone();
        (count, move || handle.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_runs_after_delay() {
        let (count, share) = counter();
        let started = tokio::time::Instant::now();
        let hits = share();
        let (fut, handle) = delayed(TokioSleeper, Duration::from_secs(1), async move {
            hits.set(hits.get() + 1);
        });

        fut.await;

        assert_eq!(count.get(), 1);
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(!handle.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_prevents_delayed_task() {
        let (count, share) = counter();
        let hits = share();
        let (fut, handle) = delayed(TokioSleeper, Duration::from_secs(1), async move {
            hits.set(hits.get() + 1);
        });

        drop(handle);
        fut.await;

        assert_eq!(count.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_sleep() {
        let (count, share) = counter();
        let hits = share();
        let (fut, handle) = delayed(TokioSleeper, Duration::from_secs(1), async move {
            hits.set(hits.get() + 1);
        });

        tokio::join!(fut, async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            handle.cancel();
        });

        assert_eq!(count.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_task_still_runs() {
        let (count, share) = counter();
        let hits = share();
        let (fut, handle) = delayed(TokioSleeper, Duration::from_secs(1), async move {
            hits.set(hits.get() + 1);
        });

        handle.detach();
        fut.await;

        assert_eq!(count.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_ticks_immediately_then_every_interval() {
        let (count, share) = counter();
        let (fut, _handle) = periodic(TokioSleeper, Duration::from_secs(300), || {
            let hits = share();
            async move { hits.set(hits.get() + 1) }
        });

        // 0s、300s、600s 各一次
        let result = tokio::time::timeout(Duration::from_secs(650), fut).await;

        assert!(result.is_err());
        assert_eq!(count.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_stops_when_cancelled() {
        let (count, share) = counter();
        let (fut, handle) = periodic(TokioSleeper, Duration::from_secs(300), || {
            let hits = share();
            async move { hits.set(hits.get() + 1) }
        });

        tokio::join!(fut, async move {
            tokio::time::sleep(Duration::from_secs(301)).await;
            handle.cancel();
        });

        assert_eq!(count.get(), 2);
    }
}
