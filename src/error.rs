//! Error type shared by every DOM-facing operation.

use wasm_bindgen::JsValue;

/// Errors raised while wiring or animating the page.
///
/// Missing *optional* elements (hamburger, sections, year slot) are not errors;
/// those features just stay disabled. Only the things the page cannot run
/// without end up here.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("element is not a {0}")]
    UnexpectedElement(&'static str),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("config is not valid json: {0}")]
    ConfigParse(String),
}

pub type Result<T> = std::result::Result<T, PageError>;

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(s) => PageError::Js(s),
            None => PageError::Js(format!("{value:?}")),
        }
    }
}

impl From<PageError> for JsValue {
    fn from(err: PageError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
