// crates/core/src/structure/header.rs
//! 宣言ヘッダの解析
//!
//! `{` の直前にあるトークン列 (ヘッダ) から、型宣言・呼び出し可能単位・
//! ラムダの開始を判定するための補助関数群。すべて `[from, to)` のトークン
//! 範囲を受け取り、括弧の内側は対応表 (`partners`) を使って読み飛ばす。

use crate::language::Language;
use crate::language::keywords::{self, CONTROL_KEYWORDS, KOTLIN_BLOCK_WORDS, MODIFIERS};
use crate::structure::TypeKind;
use crate::tokens::{Token, TokenKind};
use alloc::string::String;

/// Token indices of `[from, to)` that sit outside every bracket pair.
///
/// Openers are yielded and the iterator then jumps past their partner.
pub(crate) fn depth_zero<'t>(
    tokens: &'t [Token<'_>],
    partners: &'t [Option<usize>],
    from: usize,
    to: usize,
) -> impl Iterator<Item = usize> + 't {
    let mut k = from;
    core::iter::from_fn(move || {
        if k >= to {
            return None;
        }
        let current = k;
        k = match tokens[current].kind {
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace => {
                match partners[current] {
                    Some(close) if close < to => close + 1,
                    _ => current + 1,
                }
            }
            _ => current + 1,
        };
        Some(current)
    })
}

/// A type declaration found in a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    /// Index of the type keyword.
    pub keyword: usize,
    /// Kotlin `object :` / `object {` without a name.
    pub anonymous: bool,
}

/// Finds a type declaration (`class Foo`, Go `type Foo struct`, ...) in `[from, to)`.
///
/// `in_type_group` is set when the header sits inside a Go `type ( ... )` group.
pub(crate) fn find_type_decl(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    from: usize,
    to: usize,
    language: Language,
    in_type_group: bool,
) -> Option<TypeDecl> {
    for k in depth_zero(tokens, partners, from, to) {
        let token = tokens[k];
        if token.kind != TokenKind::Word {
            continue;
        }
        let Some(mut kind) = language.type_keyword(token.text) else {
            continue;
        };
        let prev = (k > from).then(|| tokens[k - 1]);
        if prev.is_some_and(|p| {
            matches!(
                p.kind,
                TokenKind::Dot
                    | TokenKind::DoubleColon
                    | TokenKind::Colon
                    | TokenKind::Comma
                    | TokenKind::Lt
                    | TokenKind::SafeCall
                    | TokenKind::OpenParen
            )
        }) {
            continue;
        }
        if token.text == "interface" && prev.is_some_and(|p| p.kind == TokenKind::At) {
            kind = TypeKind::Annotation;
        }

        if language.type_name_precedes_keyword() {
            let named = k > from
                && tokens[k - 1].kind == TokenKind::Word
                && ((k >= 2 && tokens[k - 2].is_word("type")) || in_type_group);
            if !named {
                continue;
            }
            return Some(TypeDecl {
                kind,
                name: String::from(tokens[k - 1].text),
                keyword: k,
                anonymous: false,
            });
        }

        // `enum class`, `enum struct`
        let mut keyword = k;
        while keyword + 1 < to
            && tokens[keyword + 1].kind == TokenKind::Word
            && language.type_keyword(tokens[keyword + 1].text).is_some()
        {
            keyword += 1;
        }

        let next = (keyword + 1 < to).then(|| tokens[keyword + 1]);
        let (name, name_end, anonymous) = match next {
            Some(n) if n.kind == TokenKind::Word => (String::from(n.text), keyword + 2, false),
            _ if token.text == "object" => {
                if prev.is_some_and(|p| p.is_word("companion")) {
                    (String::from("Companion"), keyword + 1, false)
                } else {
                    (String::from("<anonymous>"), keyword + 1, true)
                }
            }
            _ if matches!(language, Language::C | Language::Cpp) => {
                (String::from("<anonymous>"), keyword + 1, false)
            }
            _ => continue,
        };

        let rest = depth_zero(tokens, partners, name_end.min(to), to);
        let mut has_params = false;
        for r in rest {
            match tokens[r].kind {
                TokenKind::Assign => return None,
                TokenKind::OpenParen => has_params = true,
                _ => {}
            }
        }
        // C の `struct S *make(void) {` は構造体を返す関数
        if has_params && matches!(language, Language::C | Language::Cpp) {
            return None;
        }

        return Some(TypeDecl {
            kind: if anonymous { TypeKind::Anonymous } else { kind },
            name,
            keyword: k,
            anonymous,
        });
    }
    None
}

/// Name of the callable whose parameter list opens at `paren`, if one precedes it.
///
/// Understands generic arguments (`foo<T>(`), qualified names (`A::b(`),
/// destructors (`~A(`) and operator overloads (`operator==(`).
pub(crate) fn name_before(tokens: &[Token<'_>], paren: usize, from: usize) -> Option<String> {
    let mut j = paren.checked_sub(1).filter(|&j| j >= from)?;

    if tokens[j].kind == TokenKind::Gt {
        let mut depth = 0usize;
        loop {
            match tokens[j].kind {
                TokenKind::Gt => depth += 1,
                TokenKind::Lt => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                break;
            }
            j = j.checked_sub(1).filter(|&j| j >= from)?;
        }
        j = j.checked_sub(1).filter(|&j| j >= from)?;
    }

    let token = tokens[j];
    if token.kind != TokenKind::Word {
        let mut k = j;
        while k > from
            && matches!(
                tokens[k].kind,
                TokenKind::Other
                    | TokenKind::Assign
                    | TokenKind::Lt
                    | TokenKind::Gt
                    | TokenKind::AndAnd
                    | TokenKind::OrOr
                    | TokenKind::OpenBracket
                    | TokenKind::CloseBracket
                    | TokenKind::ThinArrow
            )
        {
            k -= 1;
        }
        if k < j && tokens[k].is_word("operator") {
            let mut name = String::from("operator");
            for t in &tokens[k + 1..=j] {
                name.push_str(t.text);
            }
            return Some(name);
        }
        return None;
    }

    let mut start = j;
    while start >= from + 2
        && tokens[start - 1].kind == TokenKind::DoubleColon
        && tokens[start - 2].kind == TokenKind::Word
    {
        start -= 2;
    }
    let mut name = String::new();
    if start > from && tokens[start - 1].text == "~" {
        name.push('~');
    }
    for t in &tokens[start..=j] {
        name.push_str(t.text);
    }
    Some(name)
}

/// Whether the `(` at `paren` opens the arguments of an annotation (`@Foo(...)`, `@a.b.C(...)`).
fn is_annotation_args(tokens: &[Token<'_>], paren: usize, from: usize) -> bool {
    let mut k = paren;
    while k > from && tokens[k - 1].kind == TokenKind::Word {
        k -= 1;
        if k > from && tokens[k - 1].kind == TokenKind::Dot {
            k -= 1;
        } else {
            break;
        }
    }
    k > from && k < paren && tokens[k - 1].kind == TokenKind::At
}

/// Parameter-list rule: `name(...) ... {` with no assignment in the header.
pub(crate) fn paren_callable(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    from: usize,
    to: usize,
) -> Option<String> {
    for k in depth_zero(tokens, partners, from, to) {
        match tokens[k].kind {
            TokenKind::Assign => return None,
            TokenKind::OpenParen => {
                if is_annotation_args(tokens, k, from) {
                    continue;
                }
                let name = name_before(tokens, k, from)?;
                if keywords::contains(CONTROL_KEYWORDS, &name) {
                    return None;
                }
                // `int F(int v) => v switch {` の `{` は本体ではない
                let expression_body = depth_zero(tokens, partners, k, to)
                    .any(|r| matches!(tokens[r].kind, TokenKind::Assign | TokenKind::FatArrow));
                return (!expression_body).then_some(name);
            }
            _ => {}
        }
    }
    None
}

/// A callable introduced by `fun` / `func` / `function`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CallableHead {
    pub keyword: usize,
    /// `None` for function literals.
    pub name: Option<String>,
}

/// Finds the language's callable keyword in `[from, to)` and reads the name after it.
///
/// Returns `None` when an `=` follows the keyword, since the body is then an
/// expression rather than the brace that ends the header.
pub(crate) fn find_callable_keyword(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    from: usize,
    to: usize,
    language: Language,
) -> Option<CallableHead> {
    let keyword_text = language.callable_keyword()?;
    let keyword = depth_zero(tokens, partners, from, to).find(|&k| {
        tokens[k].is_word(keyword_text)
            && !(k > from
                && matches!(tokens[k - 1].kind, TokenKind::Dot | TokenKind::SafeCall))
    })?;

    if depth_zero(tokens, partners, keyword, to).any(|k| tokens[k].kind == TokenKind::Assign) {
        return None;
    }

    let mut j = keyword + 1;
    if j < to && tokens[j].text == "*" {
        j += 1;
    }
    // Go のレシーバ `func (r *T) Name(...)`
    if language == Language::Go && j < to && tokens[j].kind == TokenKind::OpenParen {
        let close = partners[j].filter(|&c| c < to)?;
        let is_receiver = close + 2 < to
            && tokens[close + 1].kind == TokenKind::Word
            && tokens[close + 2].kind == TokenKind::OpenParen;
        if !is_receiver {
            return Some(CallableHead {
                keyword,
                name: None,
            });
        }
        j = close + 1;
    }

    let name = depth_zero(tokens, partners, j, to)
        .find(|&k| tokens[k].kind == TokenKind::OpenParen)
        .and_then(|paren| name_before(tokens, paren, j));
    Some(CallableHead { keyword, name })
}

/// Token index where the parameters of the lambda whose arrow sits at `arrow` begin.
pub(crate) fn lambda_params_start(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    arrow: usize,
    from: usize,
) -> usize {
    if arrow <= from {
        return arrow;
    }
    let prev = arrow - 1;
    let start = match tokens[prev].kind {
        TokenKind::CloseParen => partners[prev].unwrap_or(prev),
        // TypeScript `(x): T =>`
        TokenKind::Word
            if prev >= from + 2
                && tokens[prev - 1].kind == TokenKind::Colon
                && tokens[prev - 2].kind == TokenKind::CloseParen =>
        {
            partners[prev - 2].unwrap_or(prev)
        }
        _ => prev,
    };
    // `async (x) =>`
    if start > from && tokens[start - 1].is_word("async") {
        return start - 1;
    }
    start.max(from)
}

/// Index of `new` when the brace at `brace` follows `new Type(...)`.
pub(crate) fn anonymous_new(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    brace: usize,
    from: usize,
) -> Option<usize> {
    let close = brace.checked_sub(1)?;
    if tokens[close].kind != TokenKind::CloseParen {
        return None;
    }
    let mut k = partners[close]?;
    while k > from {
        k -= 1;
        match tokens[k].kind {
            TokenKind::Word if tokens[k].text == "new" => return Some(k),
            TokenKind::Word
            | TokenKind::Dot
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Comma
            | TokenKind::Question
            | TokenKind::DoubleColon => {}
            _ => return None,
        }
    }
    None
}

/// Type name following `new` (the last word before the arguments or generic list).
pub(crate) fn instantiated_name<'a>(tokens: &[Token<'a>], new: usize) -> &'a str {
    let mut name = "";
    for t in &tokens[new + 1..] {
        match t.kind {
            TokenKind::Word => name = t.text,
            TokenKind::Dot | TokenKind::DoubleColon => {}
            _ => break,
        }
    }
    name
}

/// Whether a Java switch-rule label (`case X ->`, `default ->`) owns the arrow.
pub(crate) fn is_case_arrow(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    from: usize,
    arrow: usize,
) -> bool {
    depth_zero(tokens, partners, from, arrow)
        .any(|k| tokens[k].is_word("case") || tokens[k].is_word("default"))
}

/// Whether the `{` at `brace` opens the arm list of a Kotlin `when` or C# switch expression.
pub(crate) fn opens_arms(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    brace: usize,
    language: Language,
) -> bool {
    let Some(style) = language.arm_style() else {
        return false;
    };
    let Some(prev) = brace.checked_sub(1) else {
        return false;
    };
    if tokens[prev].is_word(style.opener) {
        return true;
    }
    style.opener_takes_subject
        && tokens[prev].kind == TokenKind::CloseParen
        && partners[prev]
            .and_then(|open| open.checked_sub(1))
            .is_some_and(|k| tokens[k].is_word(style.opener))
}

/// Index of the first token after leading annotations and modifiers.
pub(crate) fn skip_modifiers(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    from: usize,
    to: usize,
) -> usize {
    let mut k = from;
    while k < to {
        let token = tokens[k];
        if token.kind == TokenKind::At {
            k += 1;
            while k + 1 < to && tokens[k].kind == TokenKind::Word && tokens[k + 1].kind == TokenKind::Dot {
                k += 2;
            }
            k += 1;
            if k < to && tokens[k].kind == TokenKind::OpenParen {
                k = partners[k].map_or(to, |c| c + 1);
            }
        } else if token.kind == TokenKind::OpenBracket && partners[k].is_some_and(|c| c < to) {
            // C# 属性 `[Obsolete]`
            k = partners[k].map_or(to, |c| c + 1);
        } else if token.kind == TokenKind::Word && keywords::contains(MODIFIERS, token.text) {
            k += 1;
        } else {
            break;
        }
    }
    k.min(to)
}

/// If `[from, to)` is modifiers followed by exactly one word, returns that word.
pub(crate) fn single_word_after_modifiers<'a>(
    tokens: &[Token<'a>],
    partners: &[Option<usize>],
    from: usize,
    to: usize,
) -> Option<&'a str> {
    let k = skip_modifiers(tokens, partners, from, to);
    (k + 1 == to && tokens[k].kind == TokenKind::Word).then(|| tokens[k].text)
}

/// Whether a Kotlin `{` at `brace` opens a lambda literal rather than a block.
pub(crate) fn kotlin_lambda_brace(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    brace: usize,
) -> bool {
    let Some(prev) = brace.checked_sub(1) else {
        return false;
    };
    let token = tokens[prev];
    match token.kind {
        TokenKind::Word => {
            !keywords::contains(KOTLIN_BLOCK_WORDS, token.text)
                && !keywords::contains(CONTROL_KEYWORDS, token.text)
        }
        TokenKind::CloseParen => partners[prev]
            .and_then(|open| open.checked_sub(1))
            .is_none_or(|k| {
                !(tokens[k].kind == TokenKind::Word
                    && keywords::contains(CONTROL_KEYWORDS, tokens[k].text))
            }),
        TokenKind::Assign | TokenKind::OpenParen | TokenKind::Comma => true,
        _ => false,
    }
}

/// Whether the statement `[from, to)` opens a namespace-like block.
pub(crate) fn is_namespace_header(tokens: &[Token<'_>], from: usize, to: usize) -> bool {
    tokens[from..to]
        .iter()
        .find(|t| !(t.is_word("export") || t.is_word("declare")))
        .is_some_and(|t| {
            t.kind == TokenKind::Word && keywords::contains(keywords::NAMESPACE_WORDS, t.text)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;
    use crate::tokens::{code_tokens, pair_brackets};
    use alloc::vec::Vec;

    fn lex(text: &str, language: Language) -> (Vec<Token<'_>>, Vec<Option<usize>>) {
        let out = scan(text, language.lex_options());
        let tokens = code_tokens(text, &out.spans, language);
        let partners = pair_brackets(&tokens);
        (tokens, partners)
    }

    #[test]
    fn finds_named_class_after_modifiers() {
        let (t, p) = lex("public static final class Inner extends Base", Language::Java);
        let decl = find_type_decl(&t, &p, 0, t.len(), Language::Java, false).unwrap();
        assert_eq!(decl.kind, TypeKind::Class);
        assert_eq!(decl.name, "Inner");
        assert_eq!(decl.keyword, 3);
    }

    #[test]
    fn class_literal_and_constraints_are_not_declarations() {
        let (t, p) = lex("Class<?> c = Foo.class", Language::Java);
        assert!(find_type_decl(&t, &p, 0, t.len(), Language::Java, false).is_none());
        let (t, p) = lex("void F<T>() where T : class", Language::CSharp);
        assert!(find_type_decl(&t, &p, 0, t.len(), Language::CSharp, false).is_none());
    }

    #[test]
    fn kotlin_enum_class_and_companion() {
        let (t, p) = lex("enum class Color", Language::Kotlin);
        let decl = find_type_decl(&t, &p, 0, t.len(), Language::Kotlin, false).unwrap();
        assert_eq!((decl.kind, decl.name.as_str()), (TypeKind::Enum, "Color"));

        let (t, p) = lex("companion object", Language::Kotlin);
        let decl = find_type_decl(&t, &p, 0, t.len(), Language::Kotlin, false).unwrap();
        assert_eq!(decl.name, "Companion");
        assert!(!decl.anonymous);

        let (t, p) = lex("val r = object : Runnable", Language::Kotlin);
        let decl = find_type_decl(&t, &p, 0, t.len(), Language::Kotlin, false).unwrap();
        assert!(decl.anonymous);
        assert_eq!(decl.kind, TypeKind::Anonymous);
    }

    #[test]
    fn go_type_name_precedes_keyword() {
        let (t, p) = lex("type Point struct", Language::Go);
        let decl = find_type_decl(&t, &p, 0, t.len(), Language::Go, false).unwrap();
        assert_eq!((decl.kind, decl.name.as_str()), (TypeKind::Struct, "Point"));

        let (t, p) = lex("x interface", Language::Go);
        assert!(find_type_decl(&t, &p, 0, t.len(), Language::Go, false).is_none());
    }

    #[test]
    fn c_function_returning_struct_is_not_a_type() {
        let (t, p) = lex("struct point make_point(int x)", Language::C);
        assert!(find_type_decl(&t, &p, 0, t.len(), Language::C, false).is_none());
        let (t, p) = lex("struct point p =", Language::C);
        assert!(find_type_decl(&t, &p, 0, t.len(), Language::C, false).is_none());
    }

    #[test]
    fn paren_callable_names() {
        let cases = [
            ("@Override public void run()", Some("run")),
            ("@SuppressWarnings(\"x\") <T> T pick(T a)", Some("pick")),
            ("public Foo(int a) : base(a)", Some("Foo")),
            ("void Shape::draw() const", Some("Shape::draw")),
            ("~Buffer()", Some("~Buffer")),
            ("bool operator==(const A& o)", Some("operator==")),
            ("if (x > 0)", None),
            ("int[] a = make()", None),
            ("string Kind(int v) => v switch", None),
        ];
        for (text, expected) in cases {
            let (t, p) = lex(text, Language::Cpp);
            assert_eq!(
                paren_callable(&t, &p, 0, t.len()).as_deref(),
                expected,
                "{text}"
            );
        }
    }

    #[test]
    fn callable_keyword_with_receiver_and_literals() {
        let (t, p) = lex("func (s *Server) Serve(l Listener) error", Language::Go);
        let head = find_callable_keyword(&t, &p, 0, t.len(), Language::Go).unwrap();
        assert_eq!(head.name.as_deref(), Some("Serve"));

        let (t, p) = lex("go func(x int)", Language::Go);
        let head = find_callable_keyword(&t, &p, 0, t.len(), Language::Go).unwrap();
        assert_eq!(head.name, None);

        let (t, p) = lex("fun <T> List<T>.second(): T", Language::Kotlin);
        let head = find_callable_keyword(&t, &p, 0, t.len(), Language::Kotlin).unwrap();
        assert_eq!(head.name.as_deref(), Some("second"));

        let (t, p) = lex("fun area() = run", Language::Kotlin);
        assert!(find_callable_keyword(&t, &p, 0, t.len(), Language::Kotlin).is_none());
    }

    #[test]
    fn anonymous_class_detection() {
        let (t, p) = lex("Runnable r = new java.lang.Runnable() {", Language::Java);
        let brace = t.len() - 1;
        let new = anonymous_new(&t, &p, brace, 0).unwrap();
        assert_eq!(t[new].text, "new");
        assert_eq!(instantiated_name(&t, new), "Runnable");

        let (t, p) = lex("foo(bar) {", Language::Java);
        assert!(anonymous_new(&t, &p, t.len() - 1, 0).is_none());
    }

    #[test]
    fn lambda_parameters() {
        let (t, p) = lex("list.forEach((a, b) ->", Language::Java);
        let arrow = t.len() - 1;
        let start = lambda_params_start(&t, &p, arrow, 4);
        assert_eq!(t[start].text, "(");

        let (t, p) = lex("const f = async x =>", Language::JavaScript);
        let start = lambda_params_start(&t, &p, t.len() - 1, 0);
        assert_eq!(t[start].text, "async");
    }

    #[test]
    fn when_and_switch_expression_arms() {
        let (t, p) = lex("when (x) {", Language::Kotlin);
        assert!(opens_arms(&t, &p, t.len() - 1, Language::Kotlin));
        let (t, p) = lex("if (x) {", Language::Kotlin);
        assert!(!opens_arms(&t, &p, t.len() - 1, Language::Kotlin));
        let (t, p) = lex("var s = v switch {", Language::CSharp);
        assert!(opens_arms(&t, &p, t.len() - 1, Language::CSharp));
        let (t, p) = lex("switch (v) {", Language::CSharp);
        assert!(!opens_arms(&t, &p, t.len() - 1, Language::CSharp));
    }

    #[test]
    fn kotlin_brace_lambdas() {
        for (text, expected) in [
            ("list.forEach {", true),
            ("val f = {", true),
            ("run(x) {", true),
            ("if (x) {", false),
            ("else {", false),
            ("try {", false),
        ] {
            let (t, p) = lex(text, Language::Kotlin);
            assert_eq!(kotlin_lambda_brace(&t, &p, t.len() - 1), expected, "{text}");
        }
    }

    #[test]
    fn modifiers_and_annotations_are_skipped() {
        let (t, p) = lex("@Deprecated(since = \"9\") public static Point", Language::Java);
        assert_eq!(single_word_after_modifiers(&t, &p, 0, t.len()), Some("Point"));
        let (t, p) = lex("[Obsolete] public get", Language::CSharp);
        assert_eq!(single_word_after_modifiers(&t, &p, 0, t.len()), Some("get"));
    }

    #[test]
    fn namespace_headers() {
        let (t, _) = lex("export declare namespace Shapes", Language::TypeScript);
        assert!(is_namespace_header(&t, 0, t.len()));
        let (t, _) = lex("class Shapes", Language::TypeScript);
        assert!(!is_namespace_header(&t, 0, t.len()));
    }
}
