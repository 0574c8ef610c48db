//! Add Task Form Component
//!
//! Inline form of a status column; new tasks take the column's
//! sprint and status.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::api::ApiError;
use crate::board::Column;
use crate::commands;
use crate::context::use_app_context;
use crate::forms::{to_attributes, ErrorList, FormState};
use crate::models::Id;

const FIELDS: &[&str] = &["name", "description", "assigned", "due"];

/// Optional fields the API wants as null rather than ""
const NULLABLE: &[&str] = &["assigned", "due"];

#[component]
pub fn AddTaskForm(
    column: Column,
    sprint_id: Id,
    #[prop(into)]
    on_done: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let form = FormState::new(FIELDS);

    let users = Memo::new(move |_| {
        ctx.users.with(|users| {
            users
                .iter()
                .filter(|user| user.is_active)
                .map(|user| user.username.clone())
                .collect::<Vec<_>>()
        })
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        let Some(pairs) = form.begin_submit(&ev) else {
            return;
        };
        let Some(root) = ctx.endpoints_untracked() else {
            form.fail(&ApiError::Network("still connecting to the API".to_string()));
            return;
        };
        let api = ctx.api();
        let sprint_id = sprint_id.clone();
        let mut attributes = to_attributes(&pairs);
        for field in NULLABLE {
            if attributes.get(*field).and_then(Value::as_str) == Some("") {
                attributes.insert(field.to_string(), Value::Null);
            }
        }

        spawn_local(async move {
            match commands::create_task(&api, &root.tasks, &ctx.tasks, attributes, column, &sprint_id).await {
                Ok(_) => {
                    form.succeed();
                    on_done.run(());
                }
                Err(e) => form.fail(&e),
            }
        });
    };

    view! {
        <div class="add-task">
            <form method="post" on:submit=on_submit>
                <ErrorList messages=form.unmatched_errors() />
                <ErrorList messages=form.errors_for("name") />
                <label for=format!("id_name_{}", column.class())>"Task Name"</label>
                <input id=format!("id_name_{}", column.class()) type="text" name="name" maxlength="100" required />
                <ErrorList messages=form.errors_for("description") />
                <label for=format!("id_description_{}", column.class())>"Description"</label>
                <textarea id=format!("id_description_{}", column.class()) name="description"></textarea>
                <ErrorList messages=form.errors_for("assigned") />
                <label for=format!("id_assigned_{}", column.class())>"Assigned To"</label>
                <select id=format!("id_assigned_{}", column.class()) name="assigned">
                    <option value="">"Nobody"</option>
                    <For
                        each=move || users.get()
                        key=|username| username.clone()
                        children=move |username| view! { <option value=username.clone()>{username.clone()}</option> }
                    />
                </select>
                <ErrorList messages=form.errors_for("due") />
                <label for=format!("id_due_{}", column.class())>"Due"</label>
                <input id=format!("id_due_{}", column.class()) type="date" name="due" />
                <button class="cancel" type="button" on:click=move |_| on_done.run(())>"Cancel"</button>
                <button type="submit" disabled=move || form.submitting.get()>"Add"</button>
            </form>
        </div>
    }
}
