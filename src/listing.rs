/// Display model for the todo list: titles, detail panels, action links

use crate::details::{ParsedDetails, parse_structured_text};
use crate::todo_data::{Todo, TodoStatus};
use regex::Regex;
use std::sync::OnceLock;

pub const TITLE_MAX_CHARS: usize = 50;
pub const NO_TODOS_MESSAGE: &str = "No todos yet. Add one below!";
const NO_CONTENT: &str = "No content";
const ELLIPSIS: &str = "...";

/// What the list container shows after a redraw
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Placeholder(&'static str),
    Rows(Vec<TodoRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodoRow {
    pub id: String,
    pub title: String,
    pub status: TodoStatus,
    pub details: DetailPanel,
}

/// Content of an item's collapsible detail panel
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPanel {
    Structured {
        role: Option<String>,
        location: Option<String>,
        contact: Option<String>,
        actions: Vec<ActionLine>,
    },
    Raw(String),
}

/// An action line split around its first URL, if it has one
#[derive(Debug, Clone, PartialEq)]
pub struct ActionLine {
    pub before: String,
    pub link: Option<ActionLink>,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionLink {
    pub href: String,
    pub label: String,
}

/// Build the list view; todos without an id are skipped with a warning
pub fn build_list_view(todos: Option<&[Todo]>) -> ListView {
    let todos = match todos {
        Some(todos) if !todos.is_empty() => todos,
        _ => return ListView::Placeholder(NO_TODOS_MESSAGE),
    };

    let rows: Vec<TodoRow> = todos
        .iter()
        .enumerate()
        .filter_map(|(index, todo)| match todo.id.as_deref() {
            Some(id) if !id.is_empty() => Some(build_row(id, todo)),
            _ => {
                log::warn!("Skipping todo at position {} without an id", index);
                None
            }
        })
        .collect();

    ListView::Rows(rows)
}

fn build_row(id: &str, todo: &Todo) -> TodoRow {
    let parsed = parse_structured_text(&todo.text);

    TodoRow {
        id: id.to_string(),
        title: display_title(&parsed, todo.title.as_deref()),
        status: todo.status,
        details: detail_panel(&parsed),
    }
}

/// Pick the heading for a todo
///
/// Preference: company, role/experience, server title, raw text, "No content".
/// Role and raw text are truncated to `TITLE_MAX_CHARS`.
pub fn display_title(parsed: &ParsedDetails, server_title: Option<&str>) -> String {
    if !parsed.company.is_empty() {
        return parsed.company.clone();
    }
    if !parsed.role_and_exp.is_empty() {
        return truncate_title(&parsed.role_and_exp);
    }
    if let Some(title) = server_title.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    let raw = parsed.raw.trim();
    if raw.is_empty() {
        NO_CONTENT.to_string()
    } else {
        truncate_title(raw)
    }
}

/// Truncate to `TITLE_MAX_CHARS` characters, ending with an ellipsis when cut
pub fn truncate_title(text: &str) -> String {
    if text.chars().count() <= TITLE_MAX_CHARS {
        return text.to_string();
    }

    let keep = TITLE_MAX_CHARS - ELLIPSIS.len();
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Structured panel when it has something beyond the company, raw text otherwise
pub fn detail_panel(parsed: &ParsedDetails) -> DetailPanel {
    if !parsed.has_structured_data {
        return DetailPanel::Raw(parsed.raw.clone());
    }

    let non_empty = |value: &str| Some(value.to_string()).filter(|v| !v.is_empty());
    let role = non_empty(&parsed.role_and_exp);
    let location = non_empty(&parsed.location);
    let contact = non_empty(&parsed.contact);
    let actions: Vec<ActionLine> = parsed.actions.iter().map(|a| linkify_action(a)).collect();

    if role.is_none() && location.is_none() && contact.is_none() && actions.is_empty() {
        return DetailPanel::Raw(parsed.raw.clone());
    }

    DetailPanel::Structured {
        role,
        location,
        contact,
        actions,
    }
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").expect("URL pattern compiles")
    })
}

/// Split an action line around the first URL it contains
pub fn linkify_action(action: &str) -> ActionLine {
    let Some(found) = url_pattern().find(action) else {
        return ActionLine {
            before: action.to_string(),
            link: None,
            after: String::new(),
        };
    };

    let matched = found.as_str();
    let label = matched.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | ')' | '!' | '?' | '"' | '\''));
    let end = found.start() + label.len();

    let href = if label.to_ascii_lowercase().starts_with("www.") {
        format!("https://{}", label)
    } else {
        label.to_string()
    };

    ActionLine {
        before: action[..found.start()].to_string(),
        link: Some(ActionLink {
            href,
            label: label.to_string(),
        }),
        after: action[end..].to_string(),
    }
}
