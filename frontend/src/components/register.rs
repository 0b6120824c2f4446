use crate::api::use_api;
use crate::auth::{register, use_auth};
use crate::components::icons::UserIcon;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_navigate};
use cleanair_shared::protocol::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

const MIN_PASSWORD_LEN: usize = 6;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let navigate = use_navigate();

    let (full_name, set_full_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let password_value = password.get();
        if email.get().is_empty() || password_value.is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }
        if password_value.len() < MIN_PASSWORD_LEN {
            set_error_msg.set(Some(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
            return;
        }
        if password_value != confirm.get() {
            set_error_msg.set(Some("Passwords do not match".to_string()));
            return;
        }

        let name = full_name.get();
        let req = RegisterRequest {
            email: email.get(),
            password: password_value,
            full_name: (!name.trim().is_empty()).then(|| name.trim().to_string()),
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match register(&auth, &api, req).await {
                Ok(()) => navigate(AppRoute::Dashboard),
                Err(e) => {
                    log::error!("registration failed: {}", e);
                    set_error_msg.set(Some(e.message().to_string()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-success/10 rounded-2xl text-success">
                            <UserIcon attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Create your account"</h1>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="form-control">
                            <label class="label" for="full_name">
                                <span class="label-text">"Full name"</span>
                            </label>
                            <input
                                id="full_name"
                                type="text"
                                on:input=move |ev| set_full_name.set(event_target_value(&ev))
                                prop:value=full_name
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="confirm">
                                <span class="label-text">"Confirm password"</span>
                            </label>
                            <input
                                id="confirm"
                                type="password"
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                prop:value=confirm
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-success" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already registered? "
                            <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
