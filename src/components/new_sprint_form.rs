//! New Sprint Form Component
//!
//! Inline form on the homepage. A created sprint opens its own page.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiError;
use crate::commands;
use crate::context::use_app_context;
use crate::forms::{to_attributes, ErrorList, FormState};
use crate::router::{navigate, Route};

const FIELDS: &[&str] = &["name", "end", "description"];

#[component]
pub fn NewSprintForm(
    /// Runs when the form closes (created or cancelled)
    #[prop(into)]
    on_done: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let form = FormState::new(FIELDS);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        let Some(pairs) = form.begin_submit(&ev) else {
            return;
        };
        let Some(root) = ctx.endpoints_untracked() else {
            form.fail(&ApiError::Network("still connecting to the API".to_string()));
            return;
        };
        let api = ctx.api();
        let attributes = to_attributes(&pairs);

        spawn_local(async move {
            match commands::create_sprint(&api, &root.sprints, &ctx.sprints, &attributes).await {
                Ok(sprint) => {
                    form.succeed();
                    on_done.run(());
                    navigate(&Route::from(&sprint));
                }
                Err(e) => form.fail(&e),
            }
        });
    };

    view! {
        <div class="new-sprint">
            <form method="post" on:submit=on_submit>
                <ErrorList messages=form.unmatched_errors() />
                <ErrorList messages=form.errors_for("name") />
                <label for="id_name">"Name"</label>
                <input id="id_name" type="text" name="name" maxlength="100" />
                <ErrorList messages=form.errors_for("end") />
                <label for="id_end">"End Date"</label>
                <input id="id_end" type="date" name="end" required />
                <ErrorList messages=form.errors_for("description") />
                <label for="id_description">"Description"</label>
                <textarea id="id_description" name="description"></textarea>
                <button class="cancel" type="button" on:click=move |_| on_done.run(())>"Cancel"</button>
                <button type="submit" disabled=move || form.submitting.get()>"Add"</button>
            </form>
        </div>
    }
}
