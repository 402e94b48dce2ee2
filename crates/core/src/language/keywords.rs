// crates/core/src/language/keywords.rs
//! 言語ごとのキーワード表
//!
//! 型宣言・呼び出し可能単位・制御構文の判定に使う語彙をまとめたもの。

/// 呼び出し可能単位を決して導入しない制御キーワード
///
/// `name(...) {` の `name` がこれらの場合はメソッドではなくブロック。
pub const CONTROL_KEYWORDS: &[&str] = &[
    "if",
    "else",
    "elseif",
    "for",
    "foreach",
    "while",
    "do",
    "switch",
    "case",
    "catch",
    "try",
    "finally",
    "synchronized",
    "using",
    "lock",
    "fixed",
    "when",
    "return",
    "throw",
    "new",
    "sizeof",
    "typeof",
    "assert",
    "await",
    "yield",
    "match",
];

/// Kotlin で後続の `{` をラムダとみなさない語
pub const KOTLIN_BLOCK_WORDS: &[&str] = &[
    "else", "try", "finally", "do", "init", "when", "companion", "object",
];

/// 型本体内で修飾子として現れうる語 (初期化ブロック・コンパクトコンストラクタ判定用)
pub const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "static",
    "final",
    "abstract",
    "sealed",
    "open",
    "override",
    "virtual",
    "readonly",
    "partial",
    "const",
    "inline",
    "suspend",
    "data",
    "inner",
    "async",
    "extern",
    "unsafe",
    "strictfp",
    "synchronized",
    "native",
    "transient",
    "volatile",
    "default",
    "export",
];

/// C# のプロパティ/イベントのアクセサ
pub const ACCESSORS: &[&str] = &["get", "set", "init", "add", "remove"];

/// 名前空間のように透過的に扱うブロックの導入語
pub const NAMESPACE_WORDS: &[&str] = &["namespace", "module", "extern"];

#[inline]
#[must_use]
pub fn contains(table: &[&str], word: &str) -> bool {
    table.contains(&word)
}
