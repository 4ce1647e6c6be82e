/// Todo list with collapsible details
///
/// Item controls carry a `data-action` tag; a single click handler on the
/// list resolves the tag and the owning item's `data-id`.

use crate::listing::{DetailPanel, ListView, TodoRow, build_list_view};
use crate::operations::{ACTION_ATTR, ID_ATTR, TodoAction};
use crate::todo_data::Todo;
use crate::ui::components::{ActionLineView, DetailField};
use web_sys::Element;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TodoListProps {
    pub todos: Option<Vec<Todo>>,
    pub on_action: Callback<(TodoAction, String)>,
}

#[function_component(TodoList)]
pub fn todo_list(props: &TodoListProps) -> Html {
    let view = build_list_view(props.todos.as_deref());

    let onclick = {
        let on_action = props.on_action.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some((action, id)) = resolve_action(&e) {
                on_action.emit((action, id));
            }
        })
    };

    html! {
        <ul id="todoList" class="todo-list" {onclick}>
            {match view {
                ListView::Placeholder(message) => html! {
                    <li class="no-todos-message">{message}</li>
                },
                ListView::Rows(rows) => html! {
                    {for rows.into_iter().map(|row| {
                        let key = row.id.clone();
                        html! { <TodoItem key={key} {row} /> }
                    })}
                },
            }}
        </ul>
    }
}

fn resolve_action(e: &MouseEvent) -> Option<(TodoAction, String)> {
    let target = e.target_dyn_into::<Element>()?;
    let control = target.closest(&format!("[{}]", ACTION_ATTR)).ok()??;
    let tag = control.get_attribute(ACTION_ATTR)?;

    let Some(action) = TodoAction::from_tag(&tag) else {
        log::debug!("Unknown list action '{}'", tag);
        return None;
    };

    let item = control.closest(&format!("li[{}]", ID_ATTR)).ok()??;
    let id = item.get_attribute(ID_ATTR)?;
    Some((action, id))
}

#[derive(Properties, PartialEq)]
struct TodoItemProps {
    row: TodoRow,
}

#[function_component(TodoItem)]
fn todo_item(props: &TodoItemProps) -> Html {
    let expanded = use_state(|| false);
    let row = &props.row;
    let completed = row.status.is_completed();

    let on_toggle_details = {
        let expanded = expanded.clone();
        Callback::from(move |_: MouseEvent| {
            expanded.set(!*expanded);
        })
    };

    let (aria_expanded, glyph) = collapse_control(*expanded);

    html! {
        <li data-id={row.id.clone()} class={classes!("todo-item", completed.then_some("completed"))}>
            <div class="todo-text-container">
                <div class="todo-header-wrapper">
                    <h4 class="todo-title">{&row.title}</h4>
                    <button
                        class="collapse-btn"
                        aria-expanded={aria_expanded}
                        onclick={on_toggle_details}
                    >
                        {glyph}
                    </button>
                </div>
                <div class={classes!("todo-details-list", (!*expanded).then_some("collapsed"))}>
                    {detail_view(&row.details)}
                </div>
            </div>
            <div class="actions">
                <span class="status">{if completed { "Completed" } else { "Pending" }}</span>
                <button
                    class={classes!("status-btn", if completed { "pending-btn" } else { "complete-btn" })}
                    data-action={TodoAction::Toggle.tag()}
                >
                    {if completed { "Mark Pending" } else { "Mark Complete" }}
                </button>
                <button class="delete-btn" data-action={TodoAction::Delete.tag()}>
                    {"Delete"}
                </button>
            </div>
        </li>
    }
}

/// `aria-expanded` value and glyph for an item's collapse button
fn collapse_control(expanded: bool) -> (&'static str, &'static str) {
    if expanded { ("true", "▲") } else { ("false", "▼") }
}

fn detail_view(panel: &DetailPanel) -> Html {
    match panel {
        DetailPanel::Raw(text) => html! {
            <div class="raw-details-text">{text}</div>
        },
        DetailPanel::Structured {
            role,
            location,
            contact,
            actions,
        } => html! {
            <ul class="structured-details">
                if let Some(role) = role {
                    <DetailField label="Role & Experience: " value={role.clone()} />
                }
                if let Some(location) = location {
                    <DetailField label="Location: " value={location.clone()} />
                }
                if let Some(contact) = contact {
                    <DetailField label="Contact: " value={contact.clone()} />
                }
                if !actions.is_empty() {
                    <li class="detail-field">
                        <strong class="detail-label">{"Actions:"}</strong>
                        <ul class="action-list">
                            {for actions.iter().map(|line| html! {
                                <li><ActionLineView line={line.clone()} /></li>
                            })}
                        </ul>
                    </li>
                }
            </ul>
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_control() {
        assert_eq!(collapse_control(false), ("false", "▼"));
        assert_eq!(collapse_control(true), ("true", "▲"));
    }
}
