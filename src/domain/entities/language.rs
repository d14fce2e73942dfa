//! Language reference entity.

/// A language the platform can render content in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: i32,
    pub code: String,
}

impl Language {
    pub fn new(id: i32, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }
}
