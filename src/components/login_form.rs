//! Login Form Component
//!
//! Exchanges credentials for an API token and stores it in the session.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::context::use_app_context;
use crate::forms::{ErrorList, FormState};

const FIELDS: &[&str] = &["username", "password"];

#[component]
pub fn LoginForm(
    /// Runs once the token is saved
    #[prop(into)]
    on_done: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let form = FormState::new(FIELDS);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        let Some(credentials) = form.begin_submit(&ev) else {
            return;
        };
        let api = ctx.api();
        let login_url = ctx.config.with_value(|config| config.api_login.clone());

        spawn_local(async move {
            match commands::login(&api, &login_url, credentials).await {
                Ok(token) => {
                    form.succeed();
                    ctx.login(token);
                    on_done.run(());
                }
                Err(e) => form.fail(&e),
            }
        });
    };

    view! {
        <div id="login">
            <form method="post" on:submit=on_submit>
                <ErrorList messages=form.unmatched_errors() />
                <ErrorList messages=form.errors_for("username") />
                <label for="id_username">"Username"</label>
                <input id="id_username" type="text" name="username" maxlength="30" required />
                <ErrorList messages=form.errors_for("password") />
                <label for="id_password">"Password"</label>
                <input id="id_password" type="password" name="password" required />
                <button type="submit" disabled=move || form.submitting.get()>"Login"</button>
            </form>
        </div>
    }
}
