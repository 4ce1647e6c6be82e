/// Side panel UI for Snap Todo

use crate::api::{ApiClient, Endpoints};
use crate::attachment::PendingAttachment;
use crate::config::PanelConfig;
use crate::fetch::FetchTransport;
use crate::operations::{
    RefetchSequencer, SubmitOutcome, TodoAction, perform_action, refetch, submit_and_refetch,
};
use crate::todo_data::Todo;
use crate::ui::components::LoadingMessage;
use crate::ui::compose::ComposeForm;
use crate::ui::todo_list::TodoList;
use crate::ui::toast::{ToastAction, ToastStack, ToastViewer, notifier};
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| PanelConfig::from_document());
    let toasts = use_reducer(ToastStack::default);

    let notify = {
        let dispatcher = toasts.dispatcher();
        let duration_ms = config.notice_duration_ms;
        use_memo((), move |_| notifier(dispatcher, duration_ms))
    };

    let client = {
        let notify = (*notify).clone();
        let api_base = config.api_base.clone();
        use_memo((), move |_| ApiClient::new(FetchTransport, Endpoints::new(api_base), notify))
    };

    let sequencer = use_memo((), |_| RefetchSequencer::default());
    let todos = use_state(|| None::<Vec<Todo>>);
    let submitting = use_state(|| false);
    let reset_token = use_state(|| 0u32);

    // Full refetch; only the latest one may replace the list
    let refresh = {
        let client = client.clone();
        let sequencer = sequencer.clone();
        let todos = todos.clone();

        Callback::from(move |_: ()| {
            let client = client.clone();
            let sequencer = sequencer.clone();
            let todos = todos.clone();

            log::debug!("Fetching todos");
            spawn_local(async move {
                if let Some(list) = refetch(&*client, &*sequencer).await {
                    todos.set(Some(list));
                }
            });
        })
    };

    // Load todos on mount
    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    // Delegated list actions: toggle status or delete, then refetch
    let on_action = {
        let client = client.clone();
        let sequencer = sequencer.clone();
        let todos = todos.clone();

        Callback::from(move |(action, id): (TodoAction, String)| {
            let todo = (*todos)
                .as_ref()
                .and_then(|list| list.iter().find(|t| t.id.as_deref() == Some(id.as_str())))
                .cloned();

            let Some(todo) = todo else {
                log::warn!("No todo with id {} in the current list", id);
                return;
            };

            let client = client.clone();
            let sequencer = sequencer.clone();
            let todos = todos.clone();
            spawn_local(async move {
                if let Some(list) = perform_action(&*client, &*sequencer, action, &todo).await {
                    todos.set(Some(list));
                }
            });
        })
    };

    // Image submission; validation failures leave the input untouched
    let on_submit = {
        let client = client.clone();
        let sequencer = sequencer.clone();
        let notify = (*notify).clone();
        let todos = todos.clone();
        let submitting = submitting.clone();
        let reset_token = reset_token.clone();

        Callback::from(move |pending: Option<PendingAttachment>| {
            let client = client.clone();
            let sequencer = sequencer.clone();
            let notify = notify.clone();
            let todos = todos.clone();
            let submitting = submitting.clone();
            let reset_token = reset_token.clone();

            submitting.set(true);
            spawn_local(async move {
                let outcome = submit_and_refetch(&*client, &*sequencer, &notify, pending.as_ref()).await;
                submitting.set(false);

                if let SubmitOutcome::Submitted(list) = outcome {
                    reset_token.set((*reset_token).wrapping_add(1));
                    if let Some(list) = list {
                        todos.set(Some(list));
                    }
                }
            });
        })
    };

    let on_dismiss = {
        let dispatcher = toasts.dispatcher();
        Callback::from(move |id: Uuid| {
            dispatcher.dispatch(ToastAction::Dismiss(id));
        })
    };

    let completed = (*todos)
        .as_ref()
        .map_or(0, |list| list.iter().filter(|t| t.status.is_completed()).count());
    let total = (*todos).as_ref().map_or(0, Vec::len);

    html! {
        <div class="side-panel">
            <h1 class="panel-title">{"Snap Todo"}</h1>

            <ToastViewer toasts={toasts.toasts.clone()} {on_dismiss} />

            if todos.is_none() {
                <LoadingMessage message={"Loading todos...".to_string()} />
            } else {
                <TodoList todos={(*todos).clone()} {on_action} />
            }

            <ComposeForm
                busy={*submitting}
                reset_token={*reset_token}
                notifier={(*notify).clone()}
                {on_submit}
            />

            <p class="footer-panel">
                {format!("{} todos • {} completed", total, completed)}
            </p>
        </div>
    }
}
