// crates/core/src/language/lex_options.rs
/// Options controlling which comment and literal syntaxes the scanner recognizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexOptions {
    flags: u16,
}

impl LexOptions {
    const DOUBLE_QUOTE: u16 = 1 << 0;
    const SINGLE_QUOTE: u16 = 1 << 1;
    const TEXT_BLOCK: u16 = 1 << 2;
    const BACKTICK_STRING: u16 = 1 << 3;
    const BACKTICK_ESCAPES: u16 = 1 << 4;
    const CSHARP_VERBATIM: u16 = 1 << 5;
    const CPP_RAW_STRING: u16 = 1 << 6;
    const DIGIT_SEPARATOR: u16 = 1 << 7;
    const HASH_COMMENT: u16 = 1 << 8;
    const REGEX_LITERAL: u16 = 1 << 9;

    /// Returns `true` if double-quote strings are enabled.
    #[must_use]
    pub const fn double_quote(self) -> bool {
        self.flags & Self::DOUBLE_QUOTE != 0
    }
    /// Returns `true` if single-quote strings / char literals are enabled.
    #[must_use]
    pub const fn single_quote(self) -> bool {
        self.flags & Self::SINGLE_QUOTE != 0
    }
    /// Returns `true` if text blocks (`"""..."""`) are enabled.
    #[must_use]
    pub const fn text_block(self) -> bool {
        self.flags & Self::TEXT_BLOCK != 0
    }
    /// Returns `true` if backtick strings are enabled.
    #[must_use]
    pub const fn backtick_string(self) -> bool {
        self.flags & Self::BACKTICK_STRING != 0
    }
    /// Returns `true` if a backslash escapes the next byte inside backtick strings.
    #[must_use]
    pub const fn backtick_escapes(self) -> bool {
        self.flags & Self::BACKTICK_ESCAPES != 0
    }
    /// Returns `true` if C# verbatim strings (`@"..."`) are enabled.
    #[must_use]
    pub const fn csharp_verbatim(self) -> bool {
        self.flags & Self::CSHARP_VERBATIM != 0
    }
    /// Returns `true` if C++ raw string literals (`R"(...)"`) are enabled.
    #[must_use]
    pub const fn cpp_raw_string(self) -> bool {
        self.flags & Self::CPP_RAW_STRING != 0
    }
    /// Returns `true` if `'` after a digit is a digit separator (`1'000`).
    #[must_use]
    pub const fn digit_separator(self) -> bool {
        self.flags & Self::DIGIT_SEPARATOR != 0
    }
    /// Returns `true` if `#` starts a line comment.
    #[must_use]
    pub const fn hash_comment(self) -> bool {
        self.flags & Self::HASH_COMMENT != 0
    }

    /// Returns `true` if `/.../flags` regular expression literals are enabled.
    #[must_use]
    pub const fn regex_literal(self) -> bool {
        self.flags & Self::REGEX_LITERAL != 0
    }

    /// Sets the given flag bit and returns the modified options.
    #[must_use]
    pub const fn with_flag(mut self, flag: u16) -> Self {
        self.flags |= flag;
        self
    }

    /// C 用オプション (通常文字列と文字リテラルのみ)
    #[must_use]
    pub const fn c() -> Self {
        Self { flags: 0 }
            .with_flag(Self::DOUBLE_QUOTE)
            .with_flag(Self::SINGLE_QUOTE)
    }

    /// C++ 用オプション (Raw String と桁区切り対応)
    #[must_use]
    pub const fn cpp() -> Self {
        Self::c()
            .with_flag(Self::CPP_RAW_STRING)
            .with_flag(Self::DIGIT_SEPARATOR)
    }

    /// Java/Kotlin 用オプション (Text Block """...""" 対応)
    #[must_use]
    pub const fn java_kotlin() -> Self {
        Self::c().with_flag(Self::TEXT_BLOCK)
    }

    /// C# 用オプション (Verbatim String @"..." と Raw String """...""" 対応)
    #[must_use]
    pub const fn csharp() -> Self {
        Self::c()
            .with_flag(Self::TEXT_BLOCK)
            .with_flag(Self::CSHARP_VERBATIM)
    }

    /// Go 用オプション (バッククォートの Raw String はエスケープなし)
    #[must_use]
    pub const fn go() -> Self {
        Self::c().with_flag(Self::BACKTICK_STRING)
    }

    /// JavaScript/TypeScript 用オプション (テンプレートリテラルと正規表現リテラル対応)
    #[must_use]
    pub const fn javascript() -> Self {
        Self::c()
            .with_flag(Self::BACKTICK_STRING)
            .with_flag(Self::BACKTICK_ESCAPES)
            .with_flag(Self::REGEX_LITERAL)
    }

    /// PHP 用オプション (# 行コメント対応)
    #[must_use]
    pub const fn php() -> Self {
        Self::c().with_flag(Self::HASH_COMMENT)
    }
}
