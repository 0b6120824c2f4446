use crate::api::{use_api, use_config};
use crate::components::icons::{AlertTriangle, X};
use crate::web::{BrowserNotifier, BrowserSleeper, SignalCell};
use cleanair::alerts::{self, AlertFeed};
use cleanair::schedule::periodic;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 顶部提醒横幅
///
/// 挂载时立即轮询一次，之后按配置间隔轮询；卸载时取消轮询。
#[component]
pub fn AlertBanner() -> impl IntoView {
    let api = use_api();
    let config = use_config();
    let feed = SignalCell::new(AlertFeed::new());

    let (poll, handle) = periodic(BrowserSleeper, config.alert_poll_interval, {
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { alerts::poll_alerts(&api, &feed, &BrowserNotifier).await }
        }
    });
    spawn_local(poll);
    on_cleanup(move || {
        log::debug!("alert polling stopped");
        handle.cancel();
    });

    let dismiss_one = {
        let api = api.clone();
        move |id: String| {
            let api = api.clone();
            spawn_local(async move { alerts::dismiss_one(&api, &feed, &id).await });
        }
    };
    let dismiss_all = move |_: ev::MouseEvent| {
        let api = api.clone();
        spawn_local(async move { alerts::dismiss_all(&api, &feed).await });
    };

    let visible = move || feed.0.with(AlertFeed::is_visible);

    view! {
        <Show when=visible>
            <div class="bg-error/10 border-l-4 border-error p-4 mb-6 rounded">
                <div class="flex items-start">
                    <AlertTriangle attr:class="h-5 w-5 text-error mt-0.5 flex-shrink-0" />
                    <div class="ml-3 flex-1">
                        <h3 class="text-sm font-medium text-error">
                            {move || format!("Air Quality Alerts ({} unread)", feed.0.with(AlertFeed::unread_count))}
                        </h3>
                        <div class="mt-2 space-y-2">
                            <For
                                each=move || feed.0.with(|f| f.preview().to_vec())
                                key=|a| a.id.clone()
                                children={
                                    let dismiss_one = dismiss_one.clone();
                                    move |alert| {
                                        let id = alert.id.clone();
                                        let dismiss_one = dismiss_one.clone();
                                        view! {
                                            <div class="flex justify-between items-start bg-base-100 p-3 rounded border border-error/30">
                                                <div class="flex-1">
                                                    <p class="text-sm">{alert.message.clone()}</p>
                                                    <p class="text-xs text-base-content/60 mt-1">
                                                        {alert.created_at.format_date_time()}
                                                    </p>
                                                </div>
                                                <button
                                                    class="btn btn-ghost btn-xs text-error ml-3"
                                                    on:click=move |_| dismiss_one(id.clone())
                                                >
                                                    "Dismiss"
                                                </button>
                                            </div>
                                        }
                                    }
                                }
                            />
                            <Show when=move || feed.0.with(|f| f.overflow() > 0)>
                                <p class="text-xs text-error">
                                    {move || format!(
                                        "+{} more alerts. Check your profile for details.",
                                        feed.0.with(AlertFeed::overflow),
                                    )}
                                </p>
                            </Show>
                        </div>
                    </div>
                    <div class="ml-4 flex gap-2">
                        {
                            let dismiss_all = dismiss_all.clone();
                            view! {
                                <Show when=move || feed.0.with(AlertFeed::offers_mark_all)>
                                    <button class="btn btn-error btn-xs" on:click=dismiss_all.clone()>
                                        "Mark All Read"
                                    </button>
                                </Show>
                            }
                        }
                        <button
                            class="btn btn-ghost btn-xs btn-square"
                            on:click=move |_| feed.0.update(AlertFeed::dismiss)
                        >
                            <X attr:class="h-4 w-4" />
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
