//! Task Item Component
//!
//! One task card. Follows its entry in the tasks collection and renders
//! nothing once the task is gone.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, DndSignals};

use crate::board::Column;
use crate::context::use_app_context;
use crate::markdown::render_markdown_inline;
use crate::models::Id;

#[component]
pub fn TaskItem(task_id: Id, dnd: DndSignals<Id, Column>) -> impl IntoView {
    let ctx = use_app_context();

    let task = {
        let task_id = task_id.clone();
        Memo::new(move |_| ctx.tasks.with(|tasks| tasks.get(&task_id).cloned()))
    };
    let is_dragging = {
        let task_id = task_id.clone();
        move || dnd.dragging_read.with(|dragging| dragging.as_ref() == Some(&task_id))
    };
    let on_mousedown = make_on_mousedown(dnd, task_id);

    move || {
        task.get().map(|task| {
            let class = format!("task {}", task.status_class().unwrap_or_default());
            let description = render_markdown_inline(&task.description);
            let assigned = task.assigned.clone();
            let due = task.due.map(|due| due.format("%Y-%m-%d").to_string());
            view! {
                <div
                    class=class
                    class:dragging=is_dragging.clone()
                    style:order=task.order.to_string()
                    on:mousedown=on_mousedown.clone()
                >
                    <span class="name">{task.name.clone()}</span>
                    <span class="description" inner_html=description></span>
                    {assigned.map(|user| view! { <span class="assigned">{user}</span> })}
                    {due.map(|due| view! { <span class="due">{due}</span> })}
                </div>
            }
        })
    }
}
