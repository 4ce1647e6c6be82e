/// HTTP client wrapper for the todo API
///
/// Requests go through a `Transport` so the browser `fetch` binding can be
/// swapped for a recording transport in tests. Every failed request is logged
/// and reported to the notice callback before being returned to the caller.
use crate::attachment::{IMAGE_FIELD, ImageAttachment};
use crate::notice::Notice;
use crate::todo_data::{ProcessImageResponse, StatusUpdate, Todo, TodoStatus};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use url::Url;
use yew::Callback;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// The notice shown to the user for this failure
    pub fn notice(&self) -> Notice {
        match self {
            ApiError::Network(msg) => Notice::error(format!("Error: {}", msg)),
            ApiError::Http { message, .. } => Notice::error(format!("API Error: {}", message)),
            ApiError::Decode(_) => Notice::error(format!("Error: {}", self)),
            ApiError::Validation(msg) => Notice::warning(msg.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart {
        field: String,
        file: ImageAttachment,
    },
}

impl RequestBody {
    /// Only JSON bodies carry an explicit content type; the browser sets the
    /// multipart boundary itself
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Multipart { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<RequestBody>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single request; transport failures map to `ApiError::Network`
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Endpoint URLs under the API base
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// `base` must end with `/` (see `config::parse_api_base`)
    pub fn new(base: Url) -> Endpoints {
        Endpoints { base }
    }

    fn join(&self, path: &str) -> Url {
        self.base.join(path).unwrap_or_else(|_| self.base.clone())
    }

    pub fn todos(&self) -> Url {
        self.join("todos")
    }

    pub fn todo(&self, id: &str) -> Url {
        let mut url = self.todos();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    pub fn process_image(&self) -> Url {
        self.join("process-image")
    }
}

/// Pull a readable message out of an error response
///
/// Tries, in order: `error` as a string, `error.message`, `message`,
/// then the status text. Empty strings are skipped.
pub fn extract_error_message(response: &HttpResponse) -> String {
    let parsed = serde_json::from_str::<Value>(&response.body).ok();

    fn non_empty(value: Option<&Value>) -> Option<&str> {
        value.and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    let from_body = parsed.as_ref().and_then(|body| {
        let error = body.get("error");
        non_empty(error)
            .or_else(|| non_empty(error.and_then(|e| e.get("message"))))
            .or_else(|| non_empty(body.get("message")))
            .map(str::to_string)
    });

    match from_body {
        Some(message) => message,
        None if !response.status_text.is_empty() => response.status_text.clone(),
        None => format!("HTTP error! status: {}", response.status),
    }
}

pub struct ApiClient<T> {
    transport: T,
    endpoints: Endpoints,
    notifier: Callback<Notice>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, endpoints: Endpoints, notifier: Callback<Notice>) -> ApiClient<T> {
        ApiClient {
            transport,
            endpoints,
            notifier,
        }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform a request; `Ok(None)` for 204 or an empty body
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<RequestBody>,
    ) -> Result<Option<R>, ApiError> {
        log::debug!("API request: {} {}", method, url);

        let result = self.execute(method, url.clone(), body).await;
        if let Err(e) = &result {
            log::error!("API request failed: {} {}: {}", method, url, e);
            self.notifier.emit(e.notice());
        }
        result
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<RequestBody>,
    ) -> Result<Option<R>, ApiError> {
        let response = self.transport.send(HttpRequest { method, url, body }).await?;

        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                message: extract_error_message(&response),
            });
        }

        if response.status == 204 || response.body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Fetch every todo; records that cannot be read are skipped with a warning
    pub async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let records: Option<Vec<Value>> = self
            .request(Method::Get, self.endpoints.todos(), None)
            .await?;

        let todos = records
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Todo>(record) {
                Ok(todo) => Some(todo),
                Err(e) => {
                    log::warn!("Skipping unreadable todo at position {}: {}", index, e);
                    None
                }
            })
            .collect();
        Ok(todos)
    }

    pub async fn update_status(&self, id: &str, status: TodoStatus) -> Result<Option<Todo>, ApiError> {
        let body = serde_json::to_value(StatusUpdate { status })
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(Method::Put, self.endpoints.todo(id), Some(RequestBody::Json(body)))
            .await
    }

    pub async fn delete_todo(&self, id: &str) -> Result<(), ApiError> {
        self.request::<Value>(Method::Delete, self.endpoints.todo(id), None)
            .await
            .map(|_| ())
    }

    pub async fn process_image(&self, image: ImageAttachment) -> Result<ProcessImageResponse, ApiError> {
        let body = RequestBody::Multipart {
            field: IMAGE_FIELD.to_string(),
            file: image,
        };
        let response: Option<ProcessImageResponse> = self
            .request(Method::Post, self.endpoints.process_image(), Some(body))
            .await?;
        Ok(response.unwrap_or_default())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Transport that replays queued responses and records every request
    #[derive(Default)]
    pub struct RecordingTransport {
        pub requests: RefCell<Vec<HttpRequest>>,
        pub responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    }

    impl RecordingTransport {
        pub fn push(&self, status: u16, status_text: &str, body: &str) {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            }));
        }

        pub fn push_err(&self, err: ApiError) {
            self.responses.borrow_mut().push_back(Err(err));
        }

        pub fn methods(&self) -> Vec<Method> {
            self.requests.borrow().iter().map(|r| r.method).collect()
        }
    }

    impl Transport for RecordingTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no response queued".to_string())))
        }
    }

    pub fn notice_log() -> (Callback<Notice>, Rc<RefCell<Vec<Notice>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (Callback::from(move |n: Notice| sink.borrow_mut().push(n)), log)
    }

    pub fn client() -> (ApiClient<RecordingTransport>, Rc<RefCell<Vec<Notice>>>) {
        let (notifier, log) = notice_log();
        let base = Url::parse("https://api.test/api/").unwrap();
        (
            ApiClient::new(RecordingTransport::default(), Endpoints::new(base), notifier),
            log,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::testing::client;
    use super::*;
    use crate::notice::NoticeKind;
    use futures::executor::block_on;

    fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_endpoints() {
        let endpoints = Endpoints::new(Url::parse("https://api.test/api/").unwrap());

        assert_eq!(endpoints.todos().as_str(), "https://api.test/api/todos");
        assert_eq!(endpoints.todo("abc").as_str(), "https://api.test/api/todos/abc");
        assert_eq!(endpoints.todo("a/b").as_str(), "https://api.test/api/todos/a%2Fb");
        assert_eq!(
            endpoints.process_image().as_str(),
            "https://api.test/api/process-image"
        );
    }

    #[test]
    fn test_error_message_priority() {
        assert_eq!(
            extract_error_message(&response(404, "Not Found", r#"{"error":"Not found"}"#)),
            "Not found"
        );
        assert_eq!(
            extract_error_message(&response(500, "Server Error", r#"{"error":{"message":"boom"}}"#)),
            "boom"
        );
        assert_eq!(
            extract_error_message(&response(400, "Bad Request", r#"{"message":"bad input"}"#)),
            "bad input"
        );
        assert_eq!(
            extract_error_message(&response(502, "Bad Gateway", "<html>oops</html>")),
            "Bad Gateway"
        );
        assert_eq!(
            extract_error_message(&response(503, "", "")),
            "HTTP error! status: 503"
        );
    }

    #[test]
    fn test_error_message_skips_empty_strings() {
        assert_eq!(
            extract_error_message(&response(400, "Bad Request", r#"{"error":"","message":"Real reason"}"#)),
            "Real reason"
        );
        assert_eq!(
            extract_error_message(&response(400, "Bad Request", r#"{"error":{"message":""},"message":"fallback"}"#)),
            "fallback"
        );
        assert_eq!(
            extract_error_message(&response(400, "Bad Request", r#"{"message":""}"#)),
            "Bad Request"
        );
    }

    #[test]
    fn test_http_error_surfaces_exact_message() {
        let (client, notices) = client();
        client.transport().push(404, "Not Found", r#"{"error":"Not found"}"#);

        let err = block_on(client.list_todos()).unwrap_err();

        assert_eq!(err.to_string(), "Not found");
        assert_eq!(
            err,
            ApiError::Http {
                status: 404,
                message: "Not found".to_string()
            }
        );
        let notices = notices.borrow();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
        assert_eq!(notices[0].message, "API Error: Not found");
    }

    #[test]
    fn test_no_content_yields_nothing() {
        let (client, notices) = client();
        client.transport().push(204, "No Content", "");
        client.transport().push(204, "No Content", "");

        let updated = block_on(client.update_status("1", TodoStatus::Completed)).unwrap();
        assert_eq!(updated, None);
        block_on(client.delete_todo("1")).unwrap();

        assert!(notices.borrow().is_empty());
    }

    #[test]
    fn test_json_body_sets_content_type_only_for_json() {
        let (client, _) = client();
        client.transport().push(200, "OK", r#"{"_id":"1","text":"t","status":"completed"}"#);
        client.transport().push(200, "OK", r#"{"message":"ok"}"#);

        block_on(client.update_status("1", TodoStatus::Completed)).unwrap();
        block_on(client.process_image(ImageAttachment {
            bytes: vec![1, 2, 3],
            mime: "image/png".to_string(),
            file_name: "pasted-image.png".to_string(),
        }))
        .unwrap();

        let requests = client.transport().requests.borrow();
        let put_body = requests[0].body.as_ref().unwrap();
        assert_eq!(put_body.content_type(), Some("application/json"));
        assert_eq!(
            put_body,
            &RequestBody::Json(serde_json::json!({"status": "completed"}))
        );

        let post_body = requests[1].body.as_ref().unwrap();
        assert_eq!(post_body.content_type(), None);
        assert!(matches!(post_body, RequestBody::Multipart { field, .. } if field == "image"));
    }

    #[test]
    fn test_network_failure_notifies() {
        let (client, notices) = client();
        client
            .transport()
            .push_err(ApiError::Network("Failed to fetch".to_string()));

        let err = block_on(client.list_todos()).unwrap_err();

        assert_eq!(err, ApiError::Network("Failed to fetch".to_string()));
        assert_eq!(notices.borrow()[0].message, "Error: Failed to fetch");
    }

    #[test]
    fn test_undecodable_success_body() {
        let (client, notices) = client();
        client.transport().push(200, "OK", "not json");

        let err = block_on(client.list_todos()).unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(notices.borrow().len(), 1);
    }

    #[test]
    fn test_list_todos() {
        let (client, _) = client();
        client.transport().push(
            200,
            "OK",
            r#"[{"_id":"1","text":"a","status":"pending"},{"text":"no id"}]"#,
        );

        let todos = block_on(client.list_todos()).unwrap();

        assert_eq!(todos.len(), 2);
        assert_eq!(todos[1].id, None);
        assert_eq!(client.transport().methods(), vec![Method::Get]);
    }

    #[test]
    fn test_list_todos_keeps_good_records_beside_bad_ones() {
        let (client, notices) = client();
        client.transport().push(
            200,
            "OK",
            r#"[
                {"_id":"1","text":"ok","status":"pending"},
                {"_id":"2","text":null,"status":null},
                {"_id":"3","id":"3","text":"both ids","status":"completed"},
                "not a todo",
                {"id":4,"text":"numeric id"}
            ]"#,
        );

        let todos = block_on(client.list_todos()).unwrap();

        let ids: Vec<_> = todos.iter().map(|t| t.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("1"), Some("2"), Some("3"), Some("4")]);
        assert_eq!(todos[1].text, "");
        assert_eq!(todos[1].status, TodoStatus::Pending);
        assert_eq!(todos[2].status, TodoStatus::Completed);
        assert!(notices.borrow().is_empty());
    }
}
