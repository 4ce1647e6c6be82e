/// Browser `fetch` transport
use crate::api::{ApiError, HttpRequest, HttpResponse, RequestBody, Transport};
use crate::attachment::ImageAttachment;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchTransport;

fn js_error(context: &str, e: JsValue) -> ApiError {
    let detail = e
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| e.as_string())
        .unwrap_or_else(|| format!("{:?}", e));
    ApiError::Network(format!("{}: {}", context, detail))
}

fn form_data(field: &str, file: &ImageAttachment) -> Result<FormData, JsValue> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);

    let options = BlobPropertyBag::new();
    options.set_type(&file.mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename(field, &blob, &file.file_name)?;
    Ok(form)
}

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let window = web_sys::window().ok_or_else(|| ApiError::Network("No window available".to_string()))?;

        let init = RequestInit::new();
        init.set_method(request.method.as_str());

        let headers = Headers::new().map_err(|e| js_error("Failed to build headers", e))?;
        if let Some(body) = &request.body {
            if let Some(content_type) = body.content_type() {
                headers
                    .set("Content-Type", content_type)
                    .map_err(|e| js_error("Failed to set header", e))?;
            }
            match body {
                RequestBody::Json(value) => {
                    let json = serde_json::to_string(value)
                        .map_err(|e| ApiError::Decode(e.to_string()))?;
                    init.set_body(&JsValue::from_str(&json));
                }
                RequestBody::Multipart { field, file } => {
                    let form = form_data(field, file).map_err(|e| js_error("Failed to build form", e))?;
                    init.set_body(&form);
                }
            }
        }
        init.set_headers(&headers);

        let js_request = Request::new_with_str_and_init(request.url.as_str(), &init)
            .map_err(|e| js_error("Failed to build request", e))?;

        let response: Response = JsFuture::from(window.fetch_with_request(&js_request))
            .await
            .map_err(|e| js_error("Failed to fetch", e))?
            .dyn_into()
            .map_err(|e| js_error("Unexpected fetch result", e))?;

        let status = response.status();
        let status_text = response.status_text();

        let body = if status == 204 {
            String::new()
        } else {
            let text = response.text().map_err(|e| js_error("Failed to read body", e))?;
            JsFuture::from(text)
                .await
                .map_err(|e| js_error("Failed to read body", e))?
                .as_string()
                .unwrap_or_default()
        };

        Ok(HttpResponse {
            status,
            status_text,
            body,
        })
    }
}
