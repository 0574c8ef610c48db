//! Sprint View Component
//!
//! Sprint details and its status columns. Loads the sprint, its tasks,
//! the backlog and the user list; dropping a task on a column saves its
//! new sprint and status.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_listeners, create_dnd_signals};

use super::status_column::StatusColumn;
use crate::board::Column;
use crate::commands::{self, FetchOptions};
use crate::context::use_app_context;
use crate::markdown::render_markdown;
use crate::models::Id;

#[derive(Debug, Clone, Copy, PartialEq)]
enum LoadState {
    Loading,
    Ready,
    Invalid,
}

#[component]
pub fn SprintView(sprint_id: Id) -> impl IntoView {
    let ctx = use_app_context();
    let (state, set_state) = signal(LoadState::Loading);
    let (move_error, set_move_error) = signal(None::<String>);

    let sprint = {
        let sprint_id = sprint_id.clone();
        Memo::new(move |_| ctx.sprints.with(|sprints| sprints.get(&sprint_id).cloned()))
    };

    // ========================
    // Loading
    // ========================

    {
        let sprint_id = sprint_id.clone();
        Effect::new(move |_| {
            let Some(root) = ctx.endpoints() else {
                return;
            };
            let api = ctx.api();
            let sprint_id = sprint_id.clone();

            spawn_local(async move {
                let sprint = match commands::get_or_fetch(&api, &root.sprints, &ctx.sprints, &sprint_id).await {
                    // A placeholder left by an earlier failed visit
                    Ok(sprint) if sprint.invalid => {
                        set_state.set(LoadState::Invalid);
                        return;
                    }
                    Ok(sprint) => sprint,
                    Err(failure) => {
                        let mut sprint = failure.entity;
                        sprint.invalid = true;
                        ctx.sprints.update(|sprints| {
                            sprints.insert(sprint);
                        });
                        set_state.set(LoadState::Invalid);
                        return;
                    }
                };
                set_state.set(LoadState::Ready);

                if let Some(Err(e)) = commands::fetch_sprint_tasks(&api, &root.tasks, &ctx.tasks, &sprint).await {
                    log::error!("[SPRINT] Failed to load tasks of {}: {}", sprint.id, e);
                }
                if let Err(e) = commands::get_backlog(&api, &root.tasks, &ctx.tasks).await {
                    log::error!("[SPRINT] Failed to load backlog: {}", e);
                }
                if let Err(e) = commands::fetch(&api, &root.users, &ctx.users, FetchOptions::merge()).await {
                    log::warn!("[SPRINT] Failed to load users: {}", e);
                }
            });
        });
    }

    // ========================
    // Drag and drop
    // ========================

    let dnd = create_dnd_signals::<Id, Column>();
    let listeners = {
        let sprint_id = sprint_id.clone();
        bind_global_listeners(dnd, move |task_id: Id, column: Column| {
            let Some(task) = ctx.tasks.with_untracked(|tasks| tasks.get(&task_id).cloned()) else {
                return;
            };
            let Some(root) = ctx.endpoints_untracked() else {
                return;
            };
            let api = ctx.api();
            let sprint_id = sprint_id.clone();
            set_move_error.set(None);

            spawn_local(async move {
                if let Err(e) = commands::move_task(&api, &root.tasks, &ctx.tasks, &task, column, &sprint_id).await {
                    log::error!("[SPRINT] Failed to move {}: {}", task.id, e);
                    set_move_error.set(Some(format!("Could not move \"{}\": {}", task.name, e)));
                }
            });
        })
    };
    on_cleanup(move || listeners.remove());

    // ========================
    // Rendering
    // ========================

    let details = move || {
        sprint.get().map(|sprint| {
            let end = sprint.end.map(|end| end.format("%Y-%m-%d").to_string()).unwrap_or_default();
            view! {
                <h1>{sprint.display_name()}</h1>
                <span class="end">{end}</span>
                <div class="description" inner_html=render_markdown(&sprint.description)></div>
            }
        })
    };

    let columns = Column::ALL
        .iter()
        .map(|column| view! { <StatusColumn column=*column sprint_id=sprint_id.clone() dnd=dnd /> })
        .collect_view();

    view! {
        <div class="sprint-view">
            {move || match state.get() {
                LoadState::Loading => view! { <p class="status-line">"Loading..."</p> }.into_any(),
                LoadState::Invalid => view! {
                    <div class="sprint-missing">
                        <h1>"Sprint not found"</h1>
                        <p>"Sprint #" {sprint_id.to_string()} " could not be loaded."</p>
                    </div>
                }
                .into_any(),
                LoadState::Ready => details.into_any(),
            }}
            {move || move_error.get().map(|message| view! { <p class="error">{message}</p> })}
            <div class="tasks" style:display=move || if state.get() == LoadState::Invalid { "none" } else { "" }>
                {columns}
            </div>
        </div>
    }
}
