use crate::language::Language;
use alloc::string::String;

/// One input unit: its identifier, full text and language.
///
/// The text is owned and never modified after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path or name supplied by the caller.
    pub id: String,
    pub text: String,
    pub language: Language,
}

impl SourceUnit {
    /// Creates a unit, detecting the language from the identifier's extension.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let id = id.into();
        let language = Language::from_identifier(&id);
        Self {
            id,
            text: text.into(),
            language,
        }
    }

    #[must_use]
    pub fn with_language(id: impl Into<String>, text: impl Into<String>, language: Language) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            language,
        }
    }

    /// Creates a unit from raw bytes, replacing invalid UTF-8 with U+FFFD.
    #[must_use]
    pub fn from_bytes(id: impl Into<String>, bytes: &[u8], language: Language) -> Self {
        Self::with_language(id, String::from_utf8_lossy(bytes), language)
    }
}
