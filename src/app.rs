//! Scrum Board App
//!
//! Main application component: header, the routed content and the
//! login gate in front of it.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::components::{Header, Homepage, LoginForm, SprintView};
use crate::config::Config;
use crate::context::{ApiStatus, AppContext};
use crate::router::{resolve, use_hash_route, Gate, Route};

#[component]
pub fn App(config: Config) -> impl IntoView {
    let ctx = AppContext::new(config);
    provide_context(ctx);

    // Discover endpoints on start; retry after sign-in if that failed
    Effect::new(move |previous: Option<bool>| {
        let authenticated = ctx.authenticated();
        let failed = matches!(ctx.endpoints.get_untracked(), ApiStatus::Failed(_));
        if previous.is_some() && !failed {
            return authenticated;
        }
        let api = ctx.api();
        let root_url = ctx.config.with_value(|config| config.api_root.clone());

        spawn_local(async move {
            match commands::discover(&api, &root_url).await {
                Ok(root) => {
                    log::info!("[APP] API ready at {}", root_url);
                    ctx.endpoints.set(ApiStatus::Ready(root));
                }
                Err(e) => {
                    log::error!("[APP] API discovery failed: {}", e);
                    ctx.endpoints.set(ApiStatus::Failed(e.to_string()));
                }
            }
        });
        authenticated
    });

    let route = use_hash_route();
    let gate_state = Memo::new(move |_| resolve(ctx.authenticated(), route.get()));
    let gated = move || gate_state.with(|state| state.as_ref().is_some_and(Gate::shows_login));
    let open_route = Memo::new(move |_| gate_state.with(|state| state.as_ref().and_then(Gate::open_route)));

    let content = move || match open_route.get() {
        Some(Route::Home) => view! { <Homepage /> }.into_any(),
        Some(Route::Sprint(sprint_id)) => view! { <SprintView sprint_id=sprint_id /> }.into_any(),
        None if route.with(Option::is_none) => view! {
            <div class="not-found">
                <h1>"Page not found"</h1>
                <a href=Route::Home.href()>"Back to the sprints"</a>
            </div>
        }
        .into_any(),
        None => ().into_any(),
    };

    let on_login = Callback::new(move |_: ()| {
        if let Some(pending) = route.get_untracked() {
            log::info!("[APP] Signed in, resuming {}", pending.href());
        }
    });

    view! {
        <Header />
        <div id="content" style:display=move || if gated() { "none" } else { "" }>
            {content}
        </div>
        <Show when=gated>
            <LoginForm on_done=on_login />
        </Show>
    }
}
