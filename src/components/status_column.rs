//! Status Column Component
//!
//! One column of the sprint board: its tasks in display order, a drop
//! target for dragged tasks, and the add task form.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mouseleave, make_on_target_mouseenter, DndSignals};

use super::add_task_form::AddTaskForm;
use super::task_item::TaskItem;
use crate::board::{tasks_in_column, Column};
use crate::context::use_app_context;
use crate::models::Id;

#[component]
pub fn StatusColumn(column: Column, sprint_id: Id, dnd: DndSignals<Id, Column>) -> impl IntoView {
    let ctx = use_app_context();
    let (adding, set_adding) = signal(false);

    let task_ids = {
        let sprint_id = sprint_id.clone();
        Memo::new(move |_| {
            ctx.tasks.with(|tasks| {
                tasks_in_column(tasks.iter(), &sprint_id, column)
                    .into_iter()
                    .map(|task| task.id)
                    .collect::<Vec<Id>>()
            })
        })
    };
    let is_target = move || dnd.drop_target_read.get() == Some(column);

    view! {
        <section
            class=format!("status {}", column.class())
            class:target=is_target
            on:mouseenter=make_on_target_mouseenter(dnd, column)
            on:mouseleave=make_on_mouseleave(dnd)
        >
            <h3>{column.title()}</h3>
            <div class="list">
                <For
                    each=move || task_ids.get()
                    key=|id| id.clone()
                    children=move |task_id| view! { <TaskItem task_id=task_id dnd=dnd /> }
                />
            </div>
            <Show
                when=move || adding.get()
                fallback=move || view! {
                    <button class="add" type="button" on:click=move |_| set_adding.set(true)>"Add Task"</button>
                }
            >
                <AddTaskForm column=column sprint_id=sprint_id.clone() on_done=move |_| set_adding.set(false) />
            </Show>
        </section>
    }
}
