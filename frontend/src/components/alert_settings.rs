use crate::api::{use_api, use_config};
use crate::components::icons::Bell;
use crate::web::{BrowserNotifier, BrowserSleeper, request_permission};
use cleanair::alerts::{self, NotificationPermission, Notifier, ThresholdSetting};
use cleanair::schedule::TaskHandle;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;

const SAVE_SUCCESS: &str = "Alert threshold updated successfully!";
const SAVE_FAILURE: &str = "Failed to update alert threshold.";

const TIPS: [&str; 4] = [
    "Alerts are checked every 5 minutes",
    "At most one alert per city every 6 hours",
    "A threshold of 150 is recommended for most people",
    "Use 100 if you have respiratory conditions",
];

#[component]
pub fn AlertSettings() -> impl IntoView {
    let api = use_api();
    let config = use_config();

    let threshold = RwSignal::new(ThresholdSetting::default());
    let (saving, set_saving) = signal(false);
    let (notifications_on, set_notifications_on) =
        signal(BrowserNotifier.permission() == NotificationPermission::Granted);
    // (消息, 是否成功)
    let (message, set_message) = signal(Option::<(String, bool)>::None);

    // 待执行的服务端检查；重新保存会替换并取消上一次
    let pending_check = StoredValue::new(Option::<TaskHandle>::None);
    on_cleanup(move || {
        pending_check.try_update_value(|slot| {
            if let Some(handle) = slot.take() {
                handle.cancel();
            }
        });
    });

    let on_save = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let api = api.clone();
        let value = threshold.get_untracked().value();
        let delay = config.alert_check_delay;
        set_saving.set(true);
        set_message.set(None);
        spawn_local(async move {
            match api.set_threshold(value).await {
                Ok(_) => {
                    set_message.set(Some((SAVE_SUCCESS.to_string(), true)));
                    let (check, handle) = alerts::schedule_check(api, BrowserSleeper, delay);
                    pending_check.try_set_value(Some(handle));
                    spawn_local(check);
                }
                Err(e) => {
                    log::error!("Error setting threshold: {}", e);
                    set_message.set(Some((SAVE_FAILURE.to_string(), false)));
                }
            }
            set_saving.set(false);
        });
    };

    let on_toggle = move |_| {
        if notifications_on.get_untracked() {
            set_notifications_on.set(false);
            set_message.set(Some(("Desktop notifications disabled".to_string(), true)));
            return;
        }
        spawn_local(async move {
            let permission = request_permission().await;
            let granted = permission == NotificationPermission::Granted;
            set_notifications_on.set(granted);
            let msg = if granted {
                "Desktop notifications enabled".to_string()
            } else {
                log::warn!("notification permission: {}", permission.label());
                "Please enable notifications in your browser settings.".to_string()
            };
            set_message.set(Some((msg, granted)));
        });
    };

    let on_test = move |_| {
        if alerts::send_test_notification(&BrowserNotifier) {
            set_message.set(Some(("Test alert sent! Check your notifications.".to_string(), true)));
        } else {
            set_message.set(Some(("Failed to send test alert.".to_string(), false)));
        }
    };

    view! {
        <div class="space-y-6">
            <div>
                <h3 class="text-lg font-semibold flex items-center gap-2">
                    <Bell attr:class="h-5 w-5" /> "Alert Settings"
                </h3>
                <p class="text-sm text-base-content/70">
                    "Get notified when air quality in your cities crosses your threshold."
                </p>
            </div>

            <div class="bg-info/10 rounded-lg p-4">
                <h4 class="font-medium text-info mb-3">"AQI Alert Threshold"</h4>
                <form on:submit=on_save>
                    <div class="flex items-center gap-4 mb-3">
                        <input
                            type="range"
                            class="range range-info range-sm"
                            min=ThresholdSetting::MIN.to_string()
                            max=ThresholdSetting::MAX.to_string()
                            step=ThresholdSetting::STEP.to_string()
                            prop:value=move || threshold.get().value().to_string()
                            on:input=move |ev| {
                                if let Ok(v) = event_target_value(&ev).parse::<u32>() {
                                    threshold.update(|t| t.set(v));
                                }
                            }
                        />
                        <span class="text-lg font-bold text-info min-w-[60px]">
                            {move || threshold.get().value()}
                        </span>
                    </div>
                    <div class="flex justify-between text-xs text-info mb-4">
                        <span>"150: recommended"</span>
                        <span>"100: respiratory conditions"</span>
                    </div>
                    <button type="submit" class="btn btn-info w-full" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </form>
            </div>

            <div class="bg-success/10 rounded-lg p-4">
                <h4 class="font-medium text-success mb-3">"Browser Notifications"</h4>
                <label class="flex items-center justify-between mb-3 cursor-pointer">
                    <span class="text-sm">"Enable desktop notifications"</span>
                    <input
                        type="checkbox"
                        class="toggle toggle-success"
                        prop:checked=move || notifications_on.get()
                        on:change=on_toggle
                    />
                </label>
                <button
                    class="btn btn-success w-full"
                    disabled=move || !notifications_on.get()
                    on:click=on_test
                >
                    "Send Test Notification"
                </button>
            </div>

            <div class="bg-warning/10 rounded-lg p-4">
                <h4 class="font-medium text-warning mb-2">"Alert Tips"</h4>
                <ul class="text-sm space-y-1">
                    {TIPS.iter().map(|tip| view! { <li>"• " {*tip}</li> }).collect_view()}
                </ul>
            </div>

            {move || message.get().map(|(text, ok)| {
                let class = if ok { "alert alert-success text-sm" } else { "alert alert-error text-sm" };
                view! { <div class=class>{text}</div> }
            })}
        </div>
    }
}
