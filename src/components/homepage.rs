//! Homepage Component
//!
//! Recent sprints with links to their boards, and the new sprint form.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::new_sprint_form::NewSprintForm;
use crate::commands;
use crate::context::{use_app_context, ApiStatus};
use crate::models::Sprint;
use crate::router::Route;

#[component]
pub fn Homepage() -> impl IntoView {
    let ctx = use_app_context();
    let (loaded, set_loaded) = signal(false);
    let (load_error, set_load_error) = signal(None::<String>);
    let (adding, set_adding) = signal(false);

    // Load once the endpoints are known
    Effect::new(move |_| {
        let Some(root) = ctx.endpoints() else {
            return;
        };
        let api = ctx.api();
        let days = ctx.config.with_value(|config| config.recent_days);

        spawn_local(async move {
            let today = chrono::Utc::now().date_naive();
            match commands::fetch_recent_sprints(&api, &root.sprints, &ctx.sprints, today, days).await {
                Ok(_) => set_loaded.set(true),
                Err(e) => {
                    log::error!("[HOME] Failed to load sprints: {}", e);
                    set_load_error.set(Some(e.to_string()));
                }
            }
        });
    });

    // Placeholders of sprints that never loaded stay off the list
    let sprints = Memo::new(move |_| {
        let mut list: Vec<Sprint> = ctx.sprints.with(|sprints| {
            sprints
                .iter()
                .filter(|sprint| !sprint.invalid && sprint.end.is_some())
                .cloned()
                .collect()
        });
        list.sort_by(|a, b| a.end.cmp(&b.end).then_with(|| a.id.cmp(&b.id)));
        list
    });

    let status_line = move || {
        if let ApiStatus::Failed(message) = ctx.endpoints.get() {
            return Some(format!("Cannot reach the API: {}", message));
        }
        if let Some(message) = load_error.get() {
            return Some(format!("Could not load sprints: {}", message));
        }
        if !loaded.get() && sprints.with(Vec::is_empty) {
            return Some("Loading...".to_string());
        }
        None
    };

    view! {
        <div class="homepage">
            <h1>"Sprints"</h1>
            {move || status_line().map(|line| view! { <p class="status-line">{line}</p> })}
            <ul class="sprints">
                <For
                    each=move || sprints.get()
                    key=|sprint| sprint.id.clone()
                    children=move |sprint| {
                        let end = sprint.end.map(|end| end.format("%Y-%m-%d").to_string()).unwrap_or_default();
                        view! {
                            <li>
                                <a href=Route::from(&sprint).href()>{sprint.display_name()}</a>
                                <span class="end">{end}</span>
                            </li>
                        }
                    }
                />
            </ul>
            <Show
                when=move || adding.get()
                fallback=move || view! {
                    <button class="add" type="button" on:click=move |_| set_adding.set(true)>"Add Sprint"</button>
                }
            >
                <NewSprintForm on_done=move |_| set_adding.set(false) />
            </Show>
        </div>
    }
}
