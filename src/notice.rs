/// User-facing notifications raised by the client and the panel

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Notice {
        Notice {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Notice {
        Notice::new(NoticeKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Notice {
        Notice::new(NoticeKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Notice {
        Notice::new(NoticeKind::Error, message)
    }
}
