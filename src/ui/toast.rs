/// Transient notices shown at the top of the panel

use crate::notice::{Notice, NoticeKind};
use gloo_timers::callback::Timeout;
use patternfly_yew::prelude::*;
use std::rc::Rc;
use uuid::Uuid;
use yew::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub notice: Notice,
}

#[derive(Debug, Default, PartialEq)]
pub struct ToastStack {
    pub toasts: Vec<Toast>,
}

pub enum ToastAction {
    Push(Toast),
    Dismiss(Uuid),
}

impl Reducible for ToastStack {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut toasts = self.toasts.clone();
        match action {
            ToastAction::Push(toast) => toasts.push(toast),
            ToastAction::Dismiss(id) => toasts.retain(|t| t.id != id),
        }
        Rc::new(ToastStack { toasts })
    }
}

/// Callback that shows a notice and dismisses it after `duration_ms`
pub fn notifier(dispatcher: UseReducerDispatcher<ToastStack>, duration_ms: u32) -> Callback<Notice> {
    Callback::from(move |notice: Notice| {
        let id = Uuid::new_v4();
        dispatcher.dispatch(ToastAction::Push(Toast { id, notice }));

        let dispatcher = dispatcher.clone();
        Timeout::new(duration_ms, move || {
            dispatcher.dispatch(ToastAction::Dismiss(id));
        })
        .forget();
    })
}

fn alert_type(kind: NoticeKind) -> AlertType {
    match kind {
        NoticeKind::Success => AlertType::Success,
        NoticeKind::Warning => AlertType::Warning,
        NoticeKind::Error => AlertType::Danger,
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastViewerProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<Uuid>,
}

#[function_component(ToastViewer)]
pub fn toast_viewer(props: &ToastViewerProps) -> Html {
    html! {
        <div id="toast-container" class="toast-container">
            {for props.toasts.iter().map(|toast| {
                let id = toast.id;
                html! {
                    <div key={id.to_string()} class="toast show">
                        <Alert r#type={alert_type(toast.notice.kind)} title={toast.notice.message.clone()} inline={true}>
                            <Button
                                onclick={props.on_dismiss.reform(move |_| id)}
                                variant={ButtonVariant::Plain}
                            >
                                {"✗"}
                            </Button>
                        </Alert>
                    </div>
                }
            })}
        </div>
    }
}
