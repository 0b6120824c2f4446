use crate::api::use_api;
use crate::web::SignalCell;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use cleanair::alerts::AlertHistory;
use cleanair::profile::{self, ProfileState};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let api = use_api();

    let state = SignalCell::new(ProfileState::new());
    let history = RwSignal::new(AlertHistory::default());
    let saving = Memo::new(move |_| state.0.with(ProfileState::is_saving));
    let risk = Memo::new(move |_| state.0.with(|s| s.risk().cloned()));

    // 挂载时并行加载档案与提醒历史
    {
        let api = api.clone();
        spawn_local(async move { profile::load_profile(&api, &state).await });
    }
    {
        let api = api.clone();
        spawn_local(async move {
            match api.alerts().await {
                Ok(alerts) => {
                    history.try_set(AlertHistory::new(alerts));
                }
                Err(e) => log::error!("Failed to load alerts: {}", e),
            }
        });
    }

    let on_submit = {
        let api = api.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            let api = api.clone();
            spawn_local(async move { profile::save_profile(&api, &state).await });
        }
    };

    let mark_read = {
        let api = api.clone();
        move |id: String| {
            let api = api.clone();
            spawn_local(async move {
                match api.mark_read(&id).await {
                    Ok(_) => {
                        history.try_update(|h| h.mark_read(&id));
                    }
                    Err(e) => log::error!("Failed to mark alert as read: {}", e),
                }
            });
        }
    };

    let mark_all_read = move |_: ev::MouseEvent| {
        let api = api.clone();
        spawn_local(async move {
            match api.mark_all_read().await {
                Ok(_) => {
                    history.try_update(AlertHistory::mark_all_read);
                }
                Err(e) => log::error!("Failed to mark all alerts as read: {}", e),
            }
        });
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="container mx-auto px-4 py-8">
                <div class="flex justify-between items-center mb-8">
                    <h1 class="text-3xl font-bold">"User Profile"</h1>
                    <Link to=AppRoute::Dashboard class="btn btn-primary">"Back to Dashboard"</Link>
                </div>

                <div class="grid lg:grid-cols-3 gap-8">
                    <div class="lg:col-span-2 space-y-8">
                        <div class="card bg-base-100 shadow p-6">
                            <h2 class="text-xl font-semibold mb-4">"Update Your Profile"</h2>
                            {move || state.0.with(|s| s.notice().cloned()).map(|notice| {
                                let class = if notice.is_error { "alert alert-error mb-4" } else { "alert alert-success mb-4" };
                                view! { <div class=class><span>{notice.text}</span></div> }
                            })}
                            <form on:submit=on_submit>
                                <div class="grid md:grid-cols-2 gap-6">
                                    <label class="form-control">
                                        <span class="label-text">"Age"</span>
                                        <input
                                            type="number"
                                            class="input input-bordered"
                                            min=profile::AGE_RANGE.start().to_string()
                                            max=profile::AGE_RANGE.end().to_string()
                                            prop:value=move || state.0.with(|s| s.form.age.clone())
                                            on:input=move |ev| state.0.update(|s| s.form.age = event_target_value(&ev))
                                        />
                                    </label>
                                    <label class="form-control">
                                        <span class="label-text">"Daily outdoor hours"</span>
                                        <input
                                            type="number"
                                            class="input input-bordered"
                                            min=profile::OUTDOOR_HOURS_RANGE.start().to_string()
                                            max=profile::OUTDOOR_HOURS_RANGE.end().to_string()
                                            prop:value=move || state.0.with(|s| s.form.daily_outdoor_hours.clone())
                                            on:input=move |ev| {
                                                state.0.update(|s| s.form.daily_outdoor_hours = event_target_value(&ev))
                                            }
                                        />
                                    </label>
                                    <label class="label cursor-pointer justify-start gap-2">
                                        <input
                                            type="checkbox"
                                            class="checkbox checkbox-primary"
                                            prop:checked=move || state.0.with(|s| s.form.has_chronic_conditions)
                                            on:change=move |ev| {
                                                state.0.update(|s| s.form.has_chronic_conditions = event_target_checked(&ev))
                                            }
                                        />
                                        <span class="label-text">"I have chronic respiratory conditions"</span>
                                    </label>
                                    <label class="label cursor-pointer justify-start gap-2">
                                        <input
                                            type="checkbox"
                                            class="checkbox checkbox-primary"
                                            prop:checked=move || state.0.with(|s| s.form.is_smoker)
                                            on:change=move |ev| state.0.update(|s| s.form.is_smoker = event_target_checked(&ev))
                                        />
                                        <span class="label-text">"I am a smoker"</span>
                                    </label>
                                </div>
                                <button type="submit" class="btn btn-primary w-full mt-6" disabled=move || saving.get()>
                                    {move || if saving.get() { "Updating..." } else { "Update Profile" }}
                                </button>
                            </form>
                        </div>

                        <div class="card bg-base-100 shadow p-6">
                            <div class="flex justify-between items-center mb-4">
                                <h2 class="text-xl font-semibold">
                                    "Alert History"
                                    {move || {
                                        let n = history.with(AlertHistory::unread_count);
                                        (n > 0).then(|| view! { <span class="badge badge-error ml-2">{n}</span> })
                                    }}
                                </h2>
                                <Show when=move || !history.with(AlertHistory::is_empty)>
                                    <button class="btn btn-neutral btn-sm" on:click=mark_all_read.clone()>
                                        "Mark All Read"
                                    </button>
                                </Show>
                            </div>
                            <Show
                                when=move || !history.with(AlertHistory::is_empty)
                                fallback=|| view! {
                                    <p class="text-base-content/70 text-center py-4">
                                        "No alerts yet. Configure alerts in the dashboard."
                                    </p>
                                }
                            >
                                <div class="space-y-3 max-h-96 overflow-y-auto">
                                    <For
                                        each=move || history.with(|h| h.alerts().to_vec())
                                        key=|a| a.id.clone()
                                        children={
                                            let mark_read = mark_read.clone();
                                            move |alert| {
                                                let id = alert.id.clone();
                                                let mark_read = mark_read.clone();
                                                let (border, text) = if alert.is_read {
                                                    ("border-base-300 bg-base-200", "text-base-content/70")
                                                } else {
                                                    ("border-error bg-error/10", "text-error")
                                                };
                                                view! {
                                                    <div class=format!("p-3 rounded border-l-4 {}", border)>
                                                        <div class="flex justify-between items-start">
                                                            <div class="flex-1">
                                                                <p class=format!("text-sm {}", text)>{alert.message.clone()}</p>
                                                                <p class="text-xs text-base-content/60 mt-1">
                                                                    {alert.created_at.format_date_time()}
                                                                </p>
                                                            </div>
                                                            {(!alert.is_read).then(|| view! {
                                                                <button
                                                                    class="btn btn-error btn-xs ml-2"
                                                                    on:click=move |_| mark_read(id.clone())
                                                                >
                                                                    "Dismiss"
                                                                </button>
                                                            })}
                                                        </div>
                                                    </div>
                                                }
                                            }
                                        }
                                    />
                                </div>
                            </Show>
                        </div>
                    </div>

                    <div class="space-y-6">
                        <div class="card bg-base-100 shadow p-6">
                            <h2 class="text-xl font-semibold mb-4">"Risk Assessment"</h2>
                            {move || match risk.get() {
                                Some(assessment) => view! {
                                    <div class="space-y-4">
                                        <div class="text-center p-4 bg-info/10 rounded-lg">
                                            <div class="text-2xl font-bold text-info">
                                                {profile::risk_score_label(&assessment)}
                                            </div>
                                            <div class="text-sm">"Risk Score"</div>
                                        </div>
                                        <div>
                                            <span class="font-medium">"Category:"</span>
                                            <span class=format!(
                                                "ml-2 px-2 py-1 rounded text-sm font-semibold {}",
                                                profile::risk_badge_class(&assessment.category),
                                            )>
                                                {assessment.category.clone()}
                                            </span>
                                        </div>
                                        <div>
                                            <span class="font-medium">"Health Advice:"</span>
                                            <p class="mt-1 text-sm bg-base-200 p-3 rounded">{assessment.advice.clone()}</p>
                                        </div>
                                    </div>
                                }
                                .into_any(),
                                None => view! {
                                    <p class="text-base-content/70 text-center py-4">
                                        "Complete your profile to see risk assessment"
                                    </p>
                                }
                                .into_any(),
                            }}
                        </div>

                        <div class="card bg-base-100 shadow p-6">
                            <h3 class="text-lg font-semibold mb-4">"Quick Links"</h3>
                            <Link to=AppRoute::Dashboard class="btn btn-primary w-full">"🏠 Dashboard"</Link>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
