use crate::auth::use_auth;
use crate::components::icons::Wind;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

const FEATURES: [(&str, &str); 3] = [
    ("Real-time AQI", "Get current air quality index for your location"),
    ("PM2.5 Forecast", "24-48 hour PM2.5 predictions"),
    ("Health Risk Assessment", "Personalized exposure risk scoring"),
];

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let is_authenticated = auth.is_authenticated_signal();

    view! {
        <div class="min-h-screen bg-gradient-to-br from-blue-50 to-green-50">
            <div class="container mx-auto px-4 py-16">
                <div class="text-center">
                    <div class="flex justify-center mb-4 text-primary">
                        <Wind attr:class="h-12 w-12" />
                    </div>
                    <h1 class="text-5xl font-bold mb-6">"CleanAirPK"</h1>
                    <p class="text-xl text-base-content/70 mb-12">
                        "Real-time Air Quality Monitoring for Pakistan"
                    </p>

                    <div class="grid md:grid-cols-3 gap-8 mb-16">
                        {FEATURES
                            .iter()
                            .map(|(title, text)| {
                                view! {
                                    <div class="card bg-base-100 shadow-md">
                                        <div class="card-body">
                                            <h3 class="card-title justify-center text-2xl">{*title}</h3>
                                            <p class="text-base-content/70">{*text}</p>
                                        </div>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>

                    <div class="flex justify-center gap-4">
                        <Show
                            when=move || is_authenticated.get()
                            fallback=|| view! {
                                <Link to=AppRoute::Login class="btn btn-primary">"Login"</Link>
                                <Link to=AppRoute::Register class="btn btn-success">"Register"</Link>
                            }
                        >
                            <span class="self-center text-base-content/70">
                                "Welcome, " {move || auth.email().get()}
                            </span>
                        </Show>
                        <Link to=AppRoute::Dashboard class="btn btn-neutral">"View Dashboard"</Link>
                    </div>
                </div>
            </div>
        </div>
    }
}
