/// Reusable UI components

use crate::listing::ActionLine;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingMessageProps {
    #[prop_or_default]
    pub message: Option<String>,
}

#[function_component(LoadingMessage)]
pub fn loading_message(props: &LoadingMessageProps) -> Html {
    html! {
        <div class="loading-container">
            <Spinner />
            if let Some(msg) = &props.message {
                <p class="loading-message">{msg}</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ActionLineViewProps {
    pub line: ActionLine,
}

/// An action line with its first URL rendered as a link
#[function_component(ActionLineView)]
pub fn action_line_view(props: &ActionLineViewProps) -> Html {
    let line = &props.line;

    html! {
        <>
            {&line.before}
            if let Some(link) = &line.link {
                <a href={link.href.clone()} target="_blank" rel="noopener noreferrer">
                    {&link.label}
                </a>
            }
            {&line.after}
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct DetailFieldProps {
    pub label: &'static str,
    pub value: String,
}

#[function_component(DetailField)]
pub fn detail_field(props: &DetailFieldProps) -> Html {
    html! {
        <li class="detail-field">
            <strong class="detail-label">{props.label}</strong>
            <span class="detail-value">{&props.value}</span>
        </li>
    }
}
