//! Header Component
//!
//! Site header reflecting the session; logging out reloads the page.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::router::{reload_to, Route};

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_app_context();

    let logout = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        ctx.logout();
        reload_to("/");
    };

    view! {
        <header>
            <a class="brand" href=Route::Home.href()>"Scrum Board"</a>
            <Show when=move || ctx.authenticated()>
                <nav>
                    <a class="logout" href="#" on:click=logout>"Logout"</a>
                </nav>
            </Show>
        </header>
    }
}
