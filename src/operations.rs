/// Todo operations: list actions, image submission, refetch ordering

use crate::api::{ApiClient, ApiError, Transport};
use crate::attachment::PendingAttachment;
use crate::notice::Notice;
use crate::todo_data::{ProcessImageResponse, Todo};
use std::cell::Cell;

pub const ACTION_ATTR: &str = "data-action";
pub const ID_ATTR: &str = "data-id";
pub const NO_IMAGE_MESSAGE: &str = "Please paste an image before submitting.";
pub const CREATED_MESSAGE: &str = "Todo created from image";

/// Actions a list item can request through its `data-action` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoAction {
    Toggle,
    Delete,
}

impl TodoAction {
    pub fn from_tag(tag: &str) -> Option<TodoAction> {
        match tag {
            "toggle" => Some(TodoAction::Toggle),
            "delete" => Some(TodoAction::Delete),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            TodoAction::Toggle => "toggle",
            TodoAction::Delete => "delete",
        }
    }
}

/// Run a list action against the API
pub async fn apply_action<T: Transport>(
    client: &ApiClient<T>,
    action: TodoAction,
    todo: &Todo,
) -> Result<(), ApiError> {
    let id = todo.id.as_deref().filter(|id| !id.is_empty()).ok_or_else(|| {
        log::warn!("Ignoring {} on a todo without an id", action.tag());
        ApiError::Validation("This todo has no id".to_string())
    })?;

    match action {
        TodoAction::Toggle => {
            let next = todo.status.toggled();
            log::info!("Marking todo {} as {}", id, next);
            client.update_status(id, next).await.map(|_| ())
        }
        TodoAction::Delete => {
            log::info!("Deleting todo {}", id);
            client.delete_todo(id).await
        }
    }
}

/// Validate and upload the pending image
///
/// Validation failures are reported as warnings and no request is sent.
pub async fn submit_attachment<T: Transport>(
    client: &ApiClient<T>,
    notifier: &yew::Callback<Notice>,
    pending: Option<&PendingAttachment>,
) -> Result<ProcessImageResponse, ApiError> {
    let image = pending
        .ok_or_else(|| ApiError::Validation(NO_IMAGE_MESSAGE.to_string()))
        .and_then(|p| p.to_image().map_err(|e| ApiError::Validation(e.to_string())));

    let image = match image {
        Ok(image) => image,
        Err(e) => {
            log::warn!("Image submission rejected: {}", e);
            notifier.emit(e.notice());
            return Err(e);
        }
    };

    log::info!("Uploading {} ({} bytes)", image.file_name, image.bytes.len());
    let response = client.process_image(image).await?;

    if let Some(todo) = &response.todo {
        log::info!("Server created todo {}", todo.id);
    }
    notifier.emit(Notice::success(
        response
            .message
            .clone()
            .unwrap_or_else(|| CREATED_MESSAGE.to_string()),
    ));

    Ok(response)
}

/// Toggle or delete a todo, then refetch the list whether or not the
/// mutation succeeded
pub async fn perform_action<T: Transport>(
    client: &ApiClient<T>,
    sequencer: &RefetchSequencer,
    action: TodoAction,
    todo: &Todo,
) -> Option<Vec<Todo>> {
    if let Err(e) = apply_action(client, action, todo).await {
        log::debug!("{} failed: {}", action.tag(), e);
    }
    refetch(client, sequencer).await
}

/// Result of a submission attempt as the panel sees it
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing was sent; the input stays as it is
    Rejected,
    /// The upload was attempted. Carries the refetched list, or `None` when
    /// a newer refetch superseded it.
    Submitted(Option<Vec<Todo>>),
}

/// Upload the pending image and refetch, unless validation rejects it
pub async fn submit_and_refetch<T: Transport>(
    client: &ApiClient<T>,
    sequencer: &RefetchSequencer,
    notifier: &yew::Callback<Notice>,
    pending: Option<&PendingAttachment>,
) -> SubmitOutcome {
    match submit_attachment(client, notifier, pending).await {
        Err(ApiError::Validation(_)) => SubmitOutcome::Rejected,
        _ => SubmitOutcome::Submitted(refetch(client, sequencer).await),
    }
}

/// Orders overlapping refetches: only the most recently started one may
/// apply its result
#[derive(Debug, Default)]
pub struct RefetchSequencer {
    latest: Cell<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefetchTicket(u64);

impl RefetchSequencer {
    pub fn begin(&self) -> RefetchTicket {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        RefetchTicket(next)
    }

    pub fn is_current(&self, ticket: RefetchTicket) -> bool {
        self.latest.get() == ticket.0
    }
}

/// Fetch the list, returning `None` when a newer refetch has started
/// meanwhile. A failed fetch yields an empty list.
pub async fn refetch<T: Transport>(
    client: &ApiClient<T>,
    sequencer: &RefetchSequencer,
) -> Option<Vec<Todo>> {
    let ticket = sequencer.begin();
    let todos = client.list_todos().await.unwrap_or_default();

    if sequencer.is_current(ticket) {
        Some(todos)
    } else {
        log::debug!("Dropping stale todo list response");
        None
    }
}
