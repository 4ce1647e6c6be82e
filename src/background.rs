/// Service-worker side: opens the side panel from the extension command
/// and the toolbar icon
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub const EXECUTE_ACTION_COMMAND: &str = "_execute_action";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "sidePanel"], js_name = open)]
    async fn sidePanelOpen(options: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "sidePanel"], js_name = setPanelBehavior)]
    async fn sidePanelSetPanelBehavior(behavior: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "windows"], js_name = getCurrent)]
    async fn windowsGetCurrent() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "commands", "onCommand"], js_name = addListener)]
    fn onCommandAddListener(listener: &Closure<dyn FnMut(String, JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onInstalled"], js_name = addListener)]
    fn onInstalledAddListener(listener: &Closure<dyn FnMut(JsValue)>);
}

/// The `tab` argument of `chrome.commands.onCommand`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CommandTab {
    #[serde(default)]
    pub id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WindowInfo {
    #[serde(default)]
    id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTarget {
    Tab(i32),
    CurrentWindow,
}

/// Open for the command's tab when it has a usable id, else the current window
pub fn panel_target(tab: Option<&CommandTab>) -> PanelTarget {
    match tab.and_then(|t| t.id) {
        Some(id) if id > 0 => PanelTarget::Tab(id),
        _ => PanelTarget::CurrentWindow,
    }
}

/// Options for `chrome.sidePanel.open`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i32>,
}

impl OpenOptions {
    pub fn for_tab(tab_id: i32) -> OpenOptions {
        OpenOptions {
            tab_id: Some(tab_id),
            window_id: None,
        }
    }

    pub fn for_window(window_id: i32) -> OpenOptions {
        OpenOptions {
            tab_id: None,
            window_id: Some(window_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PanelBehavior {
    pub open_panel_on_action_click: bool,
}

async fn open_side_panel(target: PanelTarget) -> Result<(), String> {
    let options = match target {
        PanelTarget::Tab(tab_id) => OpenOptions::for_tab(tab_id),
        PanelTarget::CurrentWindow => {
            let window_js = windowsGetCurrent()
                .await
                .map_err(|e| format!("Failed to get current window: {:?}", e))?;
            let window: WindowInfo = serde_wasm_bindgen::from_value(window_js)
                .map_err(|e| format!("Failed to parse window: {:?}", e))?;
            let window_id = window
                .id
                .ok_or_else(|| "Could not get tab or window ID to open side panel".to_string())?;
            OpenOptions::for_window(window_id)
        }
    };

    let options_js = serde_wasm_bindgen::to_value(&options)
        .map_err(|e| format!("Failed to serialize options: {:?}", e))?;

    sidePanelOpen(options_js)
        .await
        .map_err(|e| format!("Failed to open side panel: {:?}", e))?;

    match target {
        PanelTarget::Tab(id) => log::info!("Side panel opened for tab: {}", id),
        PanelTarget::CurrentWindow => log::info!("Side panel opened for window: {:?}", options.window_id),
    }
    Ok(())
}

async fn open_panel_on_action_click() -> Result<(), String> {
    let behavior = serde_wasm_bindgen::to_value(&PanelBehavior {
        open_panel_on_action_click: true,
    })
    .map_err(|e| format!("Failed to serialize behavior: {:?}", e))?;

    sidePanelSetPanelBehavior(behavior)
        .await
        .map_err(|e| format!("Failed to set panel behavior: {:?}", e))?;
    Ok(())
}

/// Register the command and install listeners. Listeners live for the
/// lifetime of the service worker.
pub fn register_listeners() {
    let on_command = Closure::<dyn FnMut(String, JsValue)>::new(move |command: String, tab: JsValue| {
        if command != EXECUTE_ACTION_COMMAND {
            return;
        }

        let tab: Option<CommandTab> = if tab.is_null() || tab.is_undefined() {
            None
        } else {
            serde_wasm_bindgen::from_value(tab).ok()
        };
        let target = panel_target(tab.as_ref());

        spawn_local(async move {
            if let Err(e) = open_side_panel(target).await {
                log::error!("{}", e);
            }
        });
    });
    onCommandAddListener(&on_command);
    on_command.forget();

    let on_installed = Closure::<dyn FnMut(JsValue)>::new(move |_details: JsValue| {
        spawn_local(async move {
            if let Err(e) = open_panel_on_action_click().await {
                log::error!("{}", e);
            }
        });
    });
    onInstalledAddListener(&on_installed);
    on_installed.forget();
}
