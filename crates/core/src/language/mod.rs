pub mod keywords;
pub mod lex_options;

pub use lex_options::LexOptions;

use crate::structure::TypeKind;
use serde::{Deserialize, Serialize};

/// Source language of a unit.
///
/// Every supported language is block structured with C-style comments; the
/// variants differ in literal syntax and in the keywords that introduce
/// types, callables and lambdas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Java,
    Kotlin,
    CSharp,
    C,
    Cpp,
    JavaScript,
    TypeScript,
    Go,
    Php,
    /// Unknown extension; C-style defaults.
    Generic,
}

/// How a `when`/`switch` expression spells its arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmStyle {
    /// Word that opens the arm block (`when`, `switch`).
    pub opener: &'static str,
    /// Whether the opener is followed by a parenthesized subject before `{`.
    pub opener_takes_subject: bool,
    /// Arrow separating an arm's pattern from its body.
    pub arrow: &'static str,
    /// Pattern that marks the fallback arm, which adds no branch.
    pub fallback: &'static str,
}

impl Language {
    /// 拡張子から言語を判定
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "java" => Self::Java,
            "kt" | "kts" => Self::Kotlin,
            "cs" => Self::CSharp,
            "c" => Self::C,
            // `.h` は C++ として扱う (C として読む指定は AnalysisConfig 側)
            "h" | "cpp" | "cc" | "cxx" | "c++" | "hpp" | "hh" | "hxx" | "h++" => Self::Cpp,
            "js" | "mjs" | "cjs" | "jsx" => Self::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Self::TypeScript,
            "go" => Self::Go,
            "php" => Self::Php,
            _ => Self::Generic,
        }
    }

    /// Detects the language from a unit identifier such as a path or file name.
    #[must_use]
    pub fn from_identifier(id: &str) -> Self {
        extension_of(id).map_or(Self::Generic, Self::from_extension)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::CSharp => "csharp",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Go => "go",
            Self::Php => "php",
            Self::Generic => "generic",
        }
    }

    /// 言語ごとのリテラル構文オプション
    #[must_use]
    pub const fn lex_options(self) -> LexOptions {
        match self {
            Self::Java | Self::Kotlin => LexOptions::java_kotlin(),
            Self::CSharp => LexOptions::csharp(),
            Self::C | Self::Generic => LexOptions::c(),
            Self::Cpp => LexOptions::cpp(),
            Self::JavaScript | Self::TypeScript => LexOptions::javascript(),
            Self::Go => LexOptions::go(),
            Self::Php => LexOptions::php(),
        }
    }

    /// Maps a word to the kind of type it declares, if it is a type keyword here.
    #[must_use]
    pub fn type_keyword(self, word: &str) -> Option<TypeKind> {
        let kind = match word {
            "class" => TypeKind::Class,
            "interface" => TypeKind::Interface,
            "enum" => TypeKind::Enum,
            "record" => TypeKind::Record,
            "struct" => TypeKind::Struct,
            "union" => TypeKind::Struct,
            "object" => TypeKind::Object,
            "trait" => TypeKind::Interface,
            _ => return None,
        };
        let supported = match self {
            Self::Java => matches!(word, "class" | "interface" | "enum" | "record"),
            Self::Kotlin => matches!(word, "class" | "interface" | "enum" | "object"),
            Self::CSharp => matches!(word, "class" | "interface" | "enum" | "struct" | "record"),
            Self::C => matches!(word, "struct" | "union" | "enum"),
            Self::Cpp => matches!(word, "class" | "struct" | "union" | "enum"),
            Self::JavaScript => word == "class",
            Self::TypeScript => matches!(word, "class" | "interface" | "enum"),
            Self::Go => matches!(word, "struct" | "interface"),
            Self::Php => matches!(word, "class" | "interface" | "trait" | "enum"),
            Self::Generic => matches!(word, "class" | "interface" | "enum" | "struct" | "record"),
        };
        supported.then_some(kind)
    }

    /// Keyword that introduces a named or anonymous function (`fun`, `func`, `function`).
    #[must_use]
    pub const fn callable_keyword(self) -> Option<&'static str> {
        match self {
            Self::Kotlin => Some("fun"),
            Self::Go => Some("func"),
            Self::JavaScript | Self::TypeScript | Self::Php => Some("function"),
            _ => None,
        }
    }

    /// Arrow token that introduces a lambda body.
    #[must_use]
    pub const fn lambda_arrow(self) -> Option<&'static str> {
        match self {
            Self::Java => Some("->"),
            Self::CSharp | Self::JavaScript | Self::TypeScript => Some("=>"),
            _ => None,
        }
    }

    /// Whether callables may be declared outside any type.
    ///
    /// C# counts through top-level statements and their local functions.
    #[must_use]
    pub const fn free_functions(self) -> bool {
        matches!(
            self,
            Self::C
                | Self::Cpp
                | Self::CSharp
                | Self::JavaScript
                | Self::TypeScript
                | Self::Go
                | Self::Php
                | Self::Kotlin
        )
    }

    /// Whether `#` at the start of a line begins a preprocessor directive.
    #[must_use]
    pub const fn preprocessor(self) -> bool {
        matches!(self, Self::C | Self::Cpp | Self::CSharp | Self::Generic)
    }

    /// Whether `T?` nullable type syntax exists, making a `?` glued to a type name a marker.
    #[must_use]
    pub const fn nullable_types(self) -> bool {
        matches!(self, Self::Kotlin | Self::CSharp | Self::TypeScript | Self::Php)
    }

    #[must_use]
    pub const fn has_ternary(self) -> bool {
        !matches!(self, Self::Kotlin | Self::Go)
    }

    /// Whether a brace block inside a callable body is a lambda unless a keyword opened it.
    #[must_use]
    pub const fn brace_lambdas(self) -> bool {
        matches!(self, Self::Kotlin)
    }

    /// Whether `and` / `or` words are short-circuit operators.
    #[must_use]
    pub const fn word_logical_operators(self) -> bool {
        matches!(self, Self::Php)
    }

    /// Expression-switch arm syntax, if the language has one.
    #[must_use]
    pub const fn arm_style(self) -> Option<ArmStyle> {
        match self {
            Self::Kotlin => Some(ArmStyle {
                opener: "when",
                opener_takes_subject: true,
                arrow: "->",
                fallback: "else",
            }),
            Self::CSharp => Some(ArmStyle {
                opener: "switch",
                opener_takes_subject: false,
                arrow: "=>",
                fallback: "_",
            }),
            _ => None,
        }
    }

    /// Whether a line break may end a statement.
    #[must_use]
    pub const fn optional_semicolons(self) -> bool {
        matches!(self, Self::Kotlin | Self::Go | Self::JavaScript | Self::TypeScript)
    }

    /// Whether `new T(...) { ... }` declares an anonymous class.
    #[must_use]
    pub const fn anonymous_classes(self) -> bool {
        matches!(self, Self::Java)
    }

    /// Whether a type may be declared without a body (`record R(int x);`, `class Empty`).
    ///
    /// C and C++ are excluded because `struct S;` is a forward declaration.
    #[must_use]
    pub const fn bodyless_types(self) -> bool {
        !matches!(self, Self::C | Self::Cpp | Self::Go)
    }

    /// Go declares named types as `type Name struct {`, with the name before the keyword.
    #[must_use]
    pub const fn type_name_precedes_keyword(self) -> bool {
        matches!(self, Self::Go)
    }
}

/// Returns the extension of the last path component, without the dot.
#[must_use]
pub fn extension_of(id: &str) -> Option<&str> {
    let file = id.rsplit(['/', '\\']).next().unwrap_or(id);
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}
