/// Screenshot input: a content-editable box that captures pasted images
///
/// The pasted image is kept as a single pending attachment in component
/// state and shown as a preview; the editable box itself only holds text.

use crate::attachment::PendingAttachment;
use crate::notice::Notice;
use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{ClipboardEvent, File, FileReader, HtmlElement};
use yew::prelude::*;

pub const PLACEHOLDER: &str = "Paste screenshot here...";
const READ_FAILED: &str = "Could not read the pasted image";

/// The placeholder shows only while the box is unfocused and holds nothing
pub fn is_empty_state(focused: bool, has_text: bool, has_attachment: bool) -> bool {
    !focused && !has_text && !has_attachment
}

/// Enter together with Ctrl or Cmd submits
pub fn is_submit_shortcut(key: &str, ctrl: bool, meta: bool) -> bool {
    key == "Enter" && (ctrl || meta)
}

#[derive(Properties, PartialEq)]
pub struct ComposeFormProps {
    pub busy: bool,
    /// Changing this clears the input and the pending attachment
    pub reset_token: u32,
    pub notifier: Callback<Notice>,
    pub on_submit: Callback<Option<PendingAttachment>>,
}

#[function_component(ComposeForm)]
pub fn compose_form(props: &ComposeFormProps) -> Html {
    let editor_ref = use_node_ref();
    let attachment = use_state(|| None::<PendingAttachment>);
    let has_text = use_state(|| false);
    let focused = use_state(|| false);

    // Clear everything after each completed submission
    {
        let editor_ref = editor_ref.clone();
        let attachment = attachment.clone();
        let has_text = has_text.clone();
        use_effect_with(props.reset_token, move |_| {
            if let Some(editor) = editor_ref.cast::<HtmlElement>() {
                editor.set_inner_html("");
            }
            attachment.set(None);
            has_text.set(false);
            || ()
        });
    }

    let on_input = {
        let editor_ref = editor_ref.clone();
        let has_text = has_text.clone();
        Callback::from(move |_: InputEvent| {
            has_text.set(editor_has_text(&editor_ref));
        })
    };

    let on_focus = {
        let focused = focused.clone();
        Callback::from(move |_: FocusEvent| {
            focused.set(true);
        })
    };

    let on_blur = {
        let editor_ref = editor_ref.clone();
        let focused = focused.clone();
        let has_text = has_text.clone();
        Callback::from(move |_: FocusEvent| {
            focused.set(false);
            has_text.set(editor_has_text(&editor_ref));
        })
    };

    let on_paste = {
        let attachment = attachment.clone();
        let notifier = props.notifier.clone();
        Callback::from(move |e: Event| {
            let Some(event) = e.dyn_ref::<ClipboardEvent>() else {
                return;
            };
            let Some(data) = event.clipboard_data() else {
                return;
            };

            let items = data.items();
            for index in 0..items.length() {
                let Some(item) = items.get(index) else {
                    continue;
                };
                if item.kind() != "file" || !item.type_().starts_with("image/") {
                    continue;
                }

                e.prevent_default();
                match item.get_as_file() {
                    Ok(Some(file)) => read_as_data_url(file, attachment.clone(), notifier.clone()),
                    _ => notifier.emit(Notice::error(READ_FAILED)),
                }
                break;
            }
        })
    };

    let submit = {
        let attachment = attachment.clone();
        let on_submit = props.on_submit.clone();
        let busy = props.busy;
        Callback::from(move |_: ()| {
            if busy {
                log::debug!("Submission already in progress");
                return;
            }
            on_submit.emit((*attachment).clone());
        })
    };

    let on_keydown = {
        let submit = submit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if is_submit_shortcut(&e.key(), e.ctrl_key(), e.meta_key()) {
                e.prevent_default();
                submit.emit(());
            }
        })
    };

    let on_form_submit = {
        let submit = submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            submit.emit(());
        })
    };

    let on_remove_attachment = {
        let attachment = attachment.clone();
        Callback::from(move |_: MouseEvent| {
            attachment.set(None);
        })
    };

    let is_empty = is_empty_state(*focused, *has_text, attachment.is_some());

    html! {
        <form id="uploadForm" class="upload-form" onsubmit={on_form_submit}>
            <div
                ref={editor_ref}
                id="multimodal-input"
                class={classes!("multimodal-input", is_empty.then_some("is-empty"))}
                contenteditable="true"
                data-placeholder={PLACEHOLDER}
                oninput={on_input}
                onfocus={on_focus}
                onblur={on_blur}
                onpaste={on_paste}
                onkeydown={on_keydown}
            ></div>

            if let Some(pending) = &*attachment {
                <div class="attachment-preview">
                    <img class="attachment-image" src={pending.data_url.clone()} alt="Pasted screenshot" />
                    <Button onclick={on_remove_attachment} variant={ButtonVariant::Plain}>
                        {"✗"}
                    </Button>
                </div>
            }

            <Button
                class="submit-btn"
                variant={ButtonVariant::Primary}
                r#type={ButtonType::Submit}
                disabled={props.busy}
            >
                {if props.busy { "Processing..." } else { "Add Todo" }}
            </Button>
        </form>
    }
}

fn editor_has_text(editor_ref: &NodeRef) -> bool {
    editor_ref
        .cast::<HtmlElement>()
        .and_then(|editor| editor.text_content())
        .is_some_and(|text| !text.trim().is_empty())
}

fn read_as_data_url(
    file: File,
    attachment: UseStateHandle<Option<PendingAttachment>>,
    notifier: Callback<Notice>,
) {
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            log::error!("Failed to create FileReader: {:?}", e);
            notifier.emit(Notice::error(READ_FAILED));
            return;
        }
    };

    let onload = {
        let reader = reader.clone();
        let notifier = notifier.clone();
        Closure::once_into_js(move |_: web_sys::Event| {
            match reader.result().ok().and_then(|value| value.as_string()) {
                Some(data_url) => attachment.set(Some(PendingAttachment::new(data_url))),
                None => notifier.emit(Notice::error(READ_FAILED)),
            }
        })
    };
    reader.set_onload(Some(onload.unchecked_ref()));

    if let Err(e) = reader.read_as_data_url(&file) {
        log::error!("Failed to read pasted image: {:?}", e);
        notifier.emit(Notice::error(READ_FAILED));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty_state() {
        assert!(is_empty_state(false, false, false));
        assert!(!is_empty_state(true, false, false));
        assert!(!is_empty_state(false, true, false));
        assert!(!is_empty_state(false, false, true));
    }

    #[test]
    fn test_submit_shortcut() {
        assert!(is_submit_shortcut("Enter", true, false));
        assert!(is_submit_shortcut("Enter", false, true));
        assert!(!is_submit_shortcut("Enter", false, false));
        assert!(!is_submit_shortcut("a", true, false));
    }
}
