/// UI module exports
pub mod components;
pub mod compose;
pub mod panel;
pub mod toast;
pub mod todo_list;
