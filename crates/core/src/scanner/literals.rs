// crates/core/src/scanner/literals.rs
//! リテラルのスキップ処理
//!
//! 各関数は開始デリミタの位置から始まるバイト列を受け取り、
//! リテラル全体の長さと、終端デリミタが見つかったかどうかを返す。

/// スキップ結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skipped {
    /// 開始デリミタを含むリテラルのバイト長
    pub len: usize,
    /// 終端デリミタで閉じられたか
    pub terminated: bool,
}

impl Skipped {
    const fn closed(len: usize) -> Self {
        Self {
            len,
            terminated: true,
        }
    }

    const fn open(len: usize) -> Self {
        Self {
            len,
            terminated: false,
        }
    }
}

/// 識別子に使える文字かどうかを判定
#[inline]
#[must_use]
pub const fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// 通常の文字列/文字リテラルをスキップ
/// 形式: "..." または '...' (バックスラッシュでエスケープ、改行で打ち切り)
#[must_use]
pub fn skip_quoted(bytes: &[u8], quote: u8) -> Skipped {
    let mut j = 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => {
                j += 2;
                continue;
            }
            b'\n' => return Skipped::open(j),
            b if b == quote => return Skipped::closed(j + 1),
            _ => {}
        }
        j += 1;
    }
    Skipped::open(bytes.len())
}

/// Java/Kotlin/C# Text Block (三重クォート) をスキップ
/// 形式: """...""" (複数行、内部の引用符やコメント記号は無効)
#[must_use]
pub fn skip_text_block(bytes: &[u8]) -> Skipped {
    let mut j = 3;
    while j < bytes.len() {
        if bytes[j] == b'\\' {
            j += 2;
            continue;
        }
        if bytes[j..].starts_with(b"\"\"\"") {
            return Skipped::closed(j + 3);
        }
        j += 1;
    }
    Skipped::open(bytes.len())
}

/// バッククォート文字列をスキップ (Go の Raw String / JS のテンプレートリテラル)
#[must_use]
pub fn skip_backtick(bytes: &[u8], escapes: bool) -> Skipped {
    let mut j = 1;
    while j < bytes.len() {
        if escapes && bytes[j] == b'\\' {
            j += 2;
            continue;
        }
        if bytes[j] == b'`' {
            return Skipped::closed(j + 1);
        }
        j += 1;
    }
    Skipped::open(bytes.len())
}

/// C# Verbatim String をスキップ
/// 形式: @"..." / $@"..." / @$"..." ( " は "" でエスケープ、\ はエスケープしない、改行可)
#[must_use]
pub fn skip_csharp_verbatim(bytes: &[u8]) -> Skipped {
    let mut j = bytes
        .iter()
        .position(|&b| b == b'"')
        .map_or(bytes.len(), |quote| quote + 1);
    while j < bytes.len() {
        if bytes[j] == b'"' {
            // ダブルクォート2つ ("") はエスケープされた " 1つとみなす
            if bytes.get(j + 1) == Some(&b'"') {
                j += 2;
                continue;
            }
            return Skipped::closed(j + 1);
        }
        j += 1;
    }
    Skipped::open(bytes.len())
}

/// C++ Raw String Literal をスキップ
/// 形式: R"delimiter(...)delimiter" (delimiterは0-16文字)
///
/// `R"` の後に有効なデリミタと `(` が続かない場合は `None`。
#[must_use]
pub fn skip_cpp_raw_string(bytes: &[u8]) -> Option<Skipped> {
    if bytes.len() < 3 || bytes[0] != b'R' || bytes[1] != b'"' {
        return None;
    }

    let delimiter_start = 2;
    let mut i = delimiter_start;
    while i < bytes.len() && bytes[i] != b'(' {
        if i - delimiter_start >= 16 || !is_ident_char(bytes[i]) {
            return None;
        }
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }

    let delimiter = &bytes[delimiter_start..i];
    i += 1;

    // 終端パターン: )delimiter" を探す
    while i < bytes.len() {
        if bytes[i] == b')' {
            let remaining = &bytes[i + 1..];
            if remaining.len() > delimiter.len()
                && remaining.starts_with(delimiter)
                && remaining[delimiter.len()] == b'"'
            {
                return Some(Skipped::closed(i + 1 + delimiter.len() + 1));
            }
        }
        i += 1;
    }
    Some(Skipped::open(bytes.len()))
}

/// 正規表現リテラルの直前に置ける語
const REGEX_PREFIX_WORDS: &[&[u8]] = &[
    b"return",
    b"typeof",
    b"instanceof",
    b"in",
    b"of",
    b"new",
    b"delete",
    b"void",
    b"throw",
    b"case",
    b"do",
    b"else",
    b"yield",
    b"await",
];

/// `pos` の `/` が正規表現リテラルを開始できるか (直前の有意な文字で判定)
///
/// 値の後 (識別子、数値、`)` `]` `}`、文字列の終端) では除算演算子。
#[must_use]
pub fn regex_allowed(bytes: &[u8], pos: usize) -> bool {
    let mut k = pos;
    while k > 0 && bytes[k - 1].is_ascii_whitespace() {
        k -= 1;
    }
    if k == 0 {
        return true;
    }
    let word_byte = |b: u8| is_ident_char(b) || b >= 0x80;
    let prev = bytes[k - 1];
    if word_byte(prev) {
        let mut start = k - 1;
        while start > 0 && word_byte(bytes[start - 1]) {
            start -= 1;
        }
        return REGEX_PREFIX_WORDS.contains(&&bytes[start..k]);
    }
    !matches!(prev, b')' | b']' | b'}' | b'"' | b'\'' | b'`')
}

/// JavaScript の正規表現リテラルをスキップ
/// 形式: /pattern/flags (文字クラス [...] 内の / は終端ではない)
///
/// 同じ行で閉じない場合は除算とみなして `None`。
#[must_use]
pub fn skip_regex(bytes: &[u8]) -> Option<Skipped> {
    let mut j = 1;
    let mut in_class = false;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => {
                if matches!(bytes.get(j + 1), Some(&(b'\n' | b'\r'))) {
                    return None;
                }
                j += 2;
                continue;
            }
            b'\n' | b'\r' => return None,
            b'[' => in_class = true,
            b']' => in_class = false,
            b'/' if !in_class => {
                j += 1;
                while j < bytes.len() && is_ident_char(bytes[j]) {
                    j += 1;
                }
                return Some(Skipped::closed(j));
            }
            _ => {}
        }
        j += 1;
    }
    None
}

/// `pos` の `'` が数値リテラル中の桁区切り (`1'000'000`) かどうか
#[must_use]
pub fn is_digit_separator(bytes: &[u8], pos: usize) -> bool {
    let mut k = pos;
    while k > 0 && (bytes[k - 1].is_ascii_alphanumeric() || matches!(bytes[k - 1], b'\'' | b'.')) {
        k -= 1;
    }
    k < pos && bytes[k].is_ascii_digit()
}
