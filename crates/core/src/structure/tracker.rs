// crates/core/src/structure/tracker.rs
//! 波括弧スタックによるスコープ木の構築
//!
//! トークン列を一度だけ走査し、`{` ごとに直前のヘッダを分類してフレームを
//! 積む。式本体のラムダ (`x -> x + 1`) や式本体メンバ (`int F() => x;`) は
//! 波括弧を持たないため、到達した区切り記号で閉じる。

use super::header::{
    anonymous_new, depth_zero, find_callable_keyword, find_type_decl, instantiated_name,
    is_case_arrow, is_namespace_header, kotlin_lambda_brace, lambda_params_start, opens_arms,
    paren_callable, single_word_after_modifiers, skip_modifiers,
};
use super::{ScopeId, ScopeKind, ScopeNode, ScopeTree, TypeKind};
use crate::diagnostics::{MalformedFlag, MalformedKind};
use crate::language::Language;
use crate::language::keywords::{self, ACCESSORS};
use crate::tokens::{Token, TokenKind};
use alloc::string::String;
use alloc::vec::Vec;

/// What a brace-delimited frame is the body of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Root,
    Namespace,
    TypeBody(TypeKind),
    /// Method, initializer or lambda body.
    Body,
    /// C# property or event accessor list.
    Property,
    /// Kotlin `when` / C# switch-expression arm list.
    Arms,
    Block,
}

#[derive(Debug)]
struct Frame {
    role: Role,
    /// Token index of the `{` (`None` for the unit root).
    brace: Option<usize>,
    /// Token index where the current statement's header starts.
    header: usize,
    /// Unclosed `(` / `[` inside this frame.
    parens: Vec<usize>,
    /// Enum body before its first `;`: headers are constant declarations.
    enum_constants: bool,
}

impl Frame {
    fn new(role: Role, brace: Option<usize>, header: usize) -> Self {
        Self {
            role,
            brace,
            header,
            parens: Vec::new(),
            enum_constants: role == Role::TypeBody(TypeKind::Enum),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Closer {
    /// Closed by the `}` of frame `frame`.
    Brace { frame: usize },
    /// Closed by `,` `;` `)` `]` `}` or a statement break at this level.
    Expr { frame: usize, parens: usize },
}

#[derive(Debug, Clone, Copy)]
struct Open {
    scope: ScopeId,
    closer: Closer,
}

/// A scope about to be opened by the brace under classification.
struct NewScope {
    kind: ScopeKind,
    type_kind: Option<TypeKind>,
    name: String,
    start: usize,
}

impl NewScope {
    fn new(kind: ScopeKind, name: impl Into<String>, start: usize) -> Self {
        Self {
            kind,
            type_kind: None,
            name: name.into(),
            start,
        }
    }

    fn of_type(type_kind: TypeKind, name: impl Into<String>, start: usize) -> Self {
        Self {
            kind: ScopeKind::Type,
            type_kind: Some(type_kind),
            name: name.into(),
            start,
        }
    }
}

/// Tracker output for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOutput {
    pub tree: ScopeTree,
    pub flags: Vec<MalformedFlag>,
}

/// Builds the scope tree from the code tokens of a unit.
///
/// `partners` is the bracket pairing of `tokens`
/// ([`pair_brackets`](crate::tokens::pair_brackets)) and `source` the text
/// they were cut from.
#[must_use]
pub fn track(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    source: &str,
    language: Language,
    unit_name: &str,
) -> TrackOutput {
    let mut tracker = Tracker {
        tokens,
        partners,
        language,
        breaks: statement_breaks(tokens, source, language),
        tree: ScopeTree::new(unit_name, source.len()),
        flags: Vec::new(),
        frames: alloc::vec![Frame::new(Role::Root, None, 0)],
        open: Vec::new(),
        source_len: source.len(),
    };
    tracker.run();
    tracker.finish()
}

/// Marks tokens preceded by a line break that ends a statement.
///
/// Only languages with optional semicolons get breaks; a line that ends in an
/// operator or is continued by one (`.x`, `: Base`, `{`) does not break.
fn statement_breaks(tokens: &[Token<'_>], source: &str, language: Language) -> Vec<bool> {
    let mut breaks = alloc::vec![false; tokens.len()];
    if !language.optional_semicolons() {
        return breaks;
    }
    for i in 1..tokens.len() {
        let prev = tokens[i - 1];
        let next = tokens[i];
        let gap = &source.as_bytes()[prev.end()..next.start];
        if memchr::memchr(b'\n', gap).is_none() {
            continue;
        }
        let continues = matches!(
            prev.kind,
            TokenKind::Comma
                | TokenKind::Assign
                | TokenKind::Dot
                | TokenKind::OpenParen
                | TokenKind::OpenBracket
                | TokenKind::AndAnd
                | TokenKind::OrOr
                | TokenKind::ThinArrow
                | TokenKind::FatArrow
                | TokenKind::Colon
                | TokenKind::Question
                | TokenKind::SafeCall
                | TokenKind::Coalesce
                | TokenKind::At
                | TokenKind::Other
        ) || matches!(
            next.kind,
            TokenKind::OpenBrace
                | TokenKind::CloseParen
                | TokenKind::CloseBracket
                | TokenKind::Dot
                | TokenKind::SafeCall
                | TokenKind::Colon
                | TokenKind::AndAnd
                | TokenKind::OrOr
                | TokenKind::Assign
                | TokenKind::ThinArrow
                | TokenKind::FatArrow
                | TokenKind::Question
                | TokenKind::Coalesce
                | TokenKind::Comma
        );
        breaks[i] = !continues;
    }
    breaks
}

struct Tracker<'t, 'a> {
    tokens: &'t [Token<'a>],
    partners: &'t [Option<usize>],
    language: Language,
    breaks: Vec<bool>,
    tree: ScopeTree,
    flags: Vec<MalformedFlag>,
    frames: Vec<Frame>,
    open: Vec<Open>,
    source_len: usize,
}

impl Tracker<'_, '_> {
    fn run(&mut self) {
        let arrow = self.language.lambda_arrow();
        for i in 0..self.tokens.len() {
            if self.breaks[i] && self.top().parens.is_empty() {
                self.end_statement(i);
                self.top_mut().header = i;
            }

            let token = self.tokens[i];
            match token.kind {
                TokenKind::Semicolon => {
                    let depth = self.top().parens.len();
                    self.close_exprs(i, |frame, parens| frame && parens == depth);
                    if depth == 0 {
                        self.end_statement(i);
                        let top = self.top_mut();
                        top.header = i + 1;
                        top.enum_constants = false;
                    }
                }
                TokenKind::Comma => {
                    let depth = self.top().parens.len();
                    self.close_exprs(i, |frame, parens| frame && parens == depth);
                }
                TokenKind::OpenParen | TokenKind::OpenBracket => self.top_mut().parens.push(i),
                TokenKind::CloseParen | TokenKind::CloseBracket => {
                    let depth = self.top().parens.len();
                    if depth > 0 {
                        self.close_exprs(i, |frame, parens| frame && parens == depth);
                        self.top_mut().parens.pop();
                    } else {
                        self.flags.push(MalformedFlag::new(
                            MalformedKind::UnbalancedScope,
                            token.start,
                        ));
                    }
                }
                TokenKind::OpenBrace => self.open_brace(i),
                TokenKind::CloseBrace => self.close_brace(i),
                TokenKind::ThinArrow | TokenKind::FatArrow
                    if arrow == Some(token.text)
                        && self
                            .tokens
                            .get(i + 1)
                            .is_none_or(|t| t.kind != TokenKind::OpenBrace) =>
                {
                    self.expression_arrow(i);
                }
                TokenKind::Assign if self.language == Language::Kotlin => {
                    self.kotlin_expression_body(i);
                }
                _ => {}
            }
        }
    }

    fn top(&self) -> &Frame {
        let last = self.frames.len() - 1;
        &self.frames[last]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn parent_scope(&self) -> ScopeId {
        self.open.last().map_or(ScopeId::ROOT, |o| o.scope)
    }

    /// Start of the header that belongs to the token at `i`.
    ///
    /// Inside an argument list that is the token after the innermost `(` or
    /// the last `,` at that level; otherwise the statement start.
    fn local_start(&self, i: usize) -> usize {
        let frame = self.top();
        let Some(&paren) = frame.parens.last() else {
            return frame.header;
        };
        let from = frame.header.max(paren + 1);
        depth_zero(self.tokens, self.partners, from, i)
            .filter(|&k| self.tokens[k].kind == TokenKind::Comma)
            .last()
            .map_or(from, |comma| comma + 1)
    }

    fn push_scope(&mut self, scope: NewScope, body_start: usize) -> ScopeId {
        let node = ScopeNode {
            kind: scope.kind,
            type_kind: scope.type_kind,
            name: scope.name,
            start: self.tokens[scope.start].start,
            end: self.source_len,
            body_start,
            parent: None,
            children: Vec::new(),
            unterminated: false,
        };
        let parent = self.parent_scope();
        self.tree.push(parent, node)
    }

    /// Closes expression scopes on top of the open stack that end before token `i`.
    ///
    /// `matches(same_frame, parens)` decides per scope.
    fn close_exprs(&mut self, i: usize, matches: impl Fn(bool, usize) -> bool) {
        let current = self.frames.len() - 1;
        while let Some(open) = self.open.last().copied() {
            let Closer::Expr { frame, parens } = open.closer else {
                break;
            };
            if !matches(frame == current, parens) {
                break;
            }
            self.open.pop();
            let end = self.tokens[..i].last().map_or(0, Token::end);
            self.tree.node_mut(open.scope).end = end;
        }
    }

    /// Ends the statement `[header, i)` of the top frame.
    fn end_statement(&mut self, i: usize) {
        self.close_exprs(i, |frame, parens| frame && parens == 0);

        let from = self.top().header;
        if from >= i || !self.language.bodyless_types() || self.top().enum_constants {
            return;
        }
        let Some(decl) = find_type_decl(self.tokens, self.partners, from, i, self.language, false)
        else {
            return;
        };
        if decl.anonymous {
            return;
        }
        let end = self.tokens[i - 1].end();
        let id = self.push_scope(NewScope::of_type(decl.kind, decl.name, from), end);
        self.tree.node_mut(id).end = end;
    }

    fn open_brace(&mut self, i: usize) {
        let (role, scope) = self.classify(i);
        let frame_index = self.frames.len();
        if let Some(scope) = scope {
            let id = self.push_scope(scope, self.tokens[i].start);
            self.open.push(Open {
                scope: id,
                closer: Closer::Brace { frame: frame_index },
            });
        }
        self.frames.push(Frame::new(role, Some(i), i + 1));
    }

    fn close_brace(&mut self, i: usize) {
        if self.frames.len() == 1 {
            self.flags.push(MalformedFlag::new(
                MalformedKind::UnbalancedScope,
                self.tokens[i].start,
            ));
            return;
        }

        self.end_statement(i);
        let closing = self.frames.len() - 1;
        let end = self.tokens[i].end();
        self.close_frame_scopes(closing, i, end, false);
        self.flag_open_parens(closing);
        self.frames.pop();

        let top = self.top_mut();
        if top.parens.is_empty() {
            top.header = i + 1;
        }
    }

    /// Flags every `(` / `[` of frame `index` that is still open.
    fn flag_open_parens(&mut self, index: usize) {
        let tokens = self.tokens;
        self.flags.extend(
            self.frames[index]
                .parens
                .iter()
                .map(|&p| MalformedFlag::new(MalformedKind::UnbalancedScope, tokens[p].start)),
        );
    }

    /// Pops every open scope that belongs to frame `index` or deeper.
    fn close_frame_scopes(&mut self, index: usize, i: usize, brace_end: usize, unterminated: bool) {
        let expr_end = self.tokens[..i].last().map_or(0, Token::end);
        while let Some(open) = self.open.last().copied() {
            match open.closer {
                Closer::Expr { frame, .. } if frame >= index => {
                    self.tree.node_mut(open.scope).end = expr_end;
                }
                Closer::Brace { frame } if frame >= index => {
                    let node = self.tree.node_mut(open.scope);
                    node.end = brace_end;
                    node.unterminated = unterminated;
                }
                _ => break,
            }
            self.open.pop();
        }
    }

    /// 直前のヘッダから `{` の役割と、開くスコープを決める
    fn classify(&self, i: usize) -> (Role, Option<NewScope>) {
        let tokens = self.tokens;
        let partners = self.partners;
        let language = self.language;
        let frame = self.top();
        let stmt = frame.header.min(i);
        let local = self.local_start(i);
        let at_statement = frame.parens.is_empty();
        let prev = i.checked_sub(1).map(|p| tokens[p]);

        // 1. ブロック本体のラムダ
        if let (Some(arrow), Some(p)) = (language.lambda_arrow(), prev)
            && p.is_arrow(arrow)
            && i > local
        {
            let switch_rule = is_case_arrow(tokens, partners, local, i - 1)
                || (frame.role == Role::Arms && at_statement);
            if switch_rule {
                return (Role::Block, None);
            }
            let start = lambda_params_start(tokens, partners, i - 1, local);
            return (
                Role::Body,
                Some(NewScope::new(ScopeKind::Lambda, "<lambda>", start)),
            );
        }

        // 2. 匿名クラス
        if language.anonymous_classes()
            && let Some(new) = anonymous_new(tokens, partners, i, local)
        {
            let name = instantiated_name(tokens, new);
            return (
                Role::TypeBody(TypeKind::Anonymous),
                Some(NewScope::of_type(TypeKind::Anonymous, name, new)),
            );
        }

        // 3. 型宣言
        let in_type_group = frame
            .parens
            .last()
            .and_then(|p| p.checked_sub(1))
            .is_some_and(|k| tokens[k].is_word("type"));
        if let Some(decl) = find_type_decl(tokens, partners, local, i, language, in_type_group) {
            let start = if decl.anonymous { decl.keyword } else { local };
            return (
                Role::TypeBody(decl.kind),
                Some(NewScope::of_type(decl.kind, decl.name, start)),
            );
        }

        // 4. fun / func / function
        if let Some(head) = find_callable_keyword(tokens, partners, local, i, language) {
            let scope = match head.name {
                Some(name) => NewScope::new(ScopeKind::Method, name, local),
                None => NewScope::new(ScopeKind::Lambda, "<lambda>", head.keyword),
            };
            return (Role::Body, Some(scope));
        }

        // 5. `name(...) {` のメソッド・コンストラクタ・関数
        let member_context = match frame.role {
            Role::TypeBody(_) => true,
            Role::Root | Role::Namespace => {
                language.free_functions() && language != Language::Kotlin
            }
            _ => false,
        };
        let in_enum_constants = frame.enum_constants;
        if member_context
            && at_statement
            && !in_enum_constants
            && let Some(name) = paren_callable(tokens, partners, stmt, i)
        {
            return (
                Role::Body,
                Some(NewScope::new(ScopeKind::Method, name, stmt)),
            );
        }

        // C++ ラムダ `[captures](params) {`
        if language == Language::Cpp
            && let Some(start) = cpp_lambda_start(tokens, partners, local, i)
        {
            return (
                Role::Body,
                Some(NewScope::new(ScopeKind::Lambda, "<lambda>", start)),
            );
        }

        if let Role::TypeBody(type_kind) = frame.role
            && at_statement
        {
            // 6. 初期化ブロック
            if !in_enum_constants {
                let header: Vec<&str> = tokens[stmt..i].iter().map(|t| t.text).collect();
                let name = match header.as_slice() {
                    [] => Some("<initializer>"),
                    ["static"] => Some("<static initializer>"),
                    ["init"] if language == Language::Kotlin => Some("<initializer>"),
                    _ => None,
                };
                if let Some(name) = name {
                    return (
                        Role::Body,
                        Some(NewScope::new(ScopeKind::Initializer, name, stmt)),
                    );
                }
            }

            // 7. レコードのコンパクトコンストラクタ
            if type_kind == TypeKind::Record
                && let Some(name) = single_word_after_modifiers(tokens, partners, stmt, i)
            {
                return (
                    Role::Body,
                    Some(NewScope::new(ScopeKind::Method, name, stmt)),
                );
            }

            // 8. 列挙定数の本体
            if type_kind == TypeKind::Enum
                && in_enum_constants
                && let Some(constant) = enum_constant(tokens, partners, stmt, i)
            {
                return (
                    Role::TypeBody(TypeKind::Anonymous),
                    Some(NewScope::of_type(
                        TypeKind::Anonymous,
                        tokens[constant].text,
                        constant,
                    )),
                );
            }
        }

        // C# のアクセサ `get { ... }`
        if frame.role == Role::Property
            && at_statement
            && let Some(word) = single_word_after_modifiers(tokens, partners, stmt, i)
            && keywords::contains(ACCESSORS, word)
        {
            return (
                Role::Body,
                Some(NewScope::new(ScopeKind::Method, word, stmt)),
            );
        }

        // 9. Kotlin のラムダ式 `list.map { ... }`
        if language.brace_lambdas() && kotlin_lambda_brace(tokens, partners, i) {
            return (
                Role::Body,
                Some(NewScope::new(ScopeKind::Lambda, "<lambda>", i)),
            );
        }

        // 10. スコープを持たないブロック
        let role = if matches!(frame.role, Role::Root | Role::Namespace)
            && at_statement
            && is_namespace_header(tokens, stmt, i)
        {
            Role::Namespace
        } else if opens_arms(tokens, partners, i, language) {
            Role::Arms
        } else if language == Language::CSharp
            && matches!(frame.role, Role::TypeBody(_))
            && at_statement
            && is_property_header(tokens, partners, stmt, i)
        {
            Role::Property
        } else {
            Role::Block
        };
        (role, None)
    }

    /// `=>` / `->` not followed by `{`: an expression lambda or an expression-bodied member.
    fn expression_arrow(&mut self, arrow: usize) {
        let frame = self.top();
        let at_statement = frame.parens.is_empty();
        let local = self.local_start(arrow);
        if is_case_arrow(self.tokens, self.partners, local, arrow)
            || (frame.role == Role::Arms && at_statement)
        {
            return;
        }

        let stmt = frame.header.min(arrow);
        let member = matches!(frame.role, Role::TypeBody(_) | Role::Property)
            && at_statement
            && !depth_zero(self.tokens, self.partners, stmt, arrow)
                .any(|k| self.tokens[k].kind == TokenKind::Assign);
        let scope = if member && stmt < arrow {
            let name = paren_callable(self.tokens, self.partners, stmt, arrow)
                .or_else(|| last_word(self.tokens, stmt, arrow))
                .unwrap_or_else(|| String::from("<member>"));
            NewScope::new(ScopeKind::Method, name, stmt)
        } else {
            let start = lambda_params_start(self.tokens, self.partners, arrow, local);
            NewScope::new(ScopeKind::Lambda, "<lambda>", start)
        };
        self.open_expr(scope, arrow);
    }

    /// Kotlin `fun f(x: Int) = expr` and accessor `get() = expr`.
    fn kotlin_expression_body(&mut self, assign: usize) {
        let frame = self.top();
        if !frame.parens.is_empty() {
            return;
        }
        let stmt = frame.header.min(assign);
        if depth_zero(self.tokens, self.partners, stmt, assign)
            .any(|k| self.tokens[k].kind == TokenKind::Assign)
        {
            return;
        }
        let name = match find_callable_keyword(self.tokens, self.partners, stmt, assign, self.language)
        {
            Some(head) => head.name,
            None if matches!(frame.role, Role::TypeBody(_)) => {
                paren_callable(self.tokens, self.partners, stmt, assign)
            }
            None => None,
        };
        if let Some(name) = name {
            self.open_expr(NewScope::new(ScopeKind::Method, name, stmt), assign);
        }
    }

    fn open_expr(&mut self, scope: NewScope, introducer: usize) {
        let body_start = self
            .tokens
            .get(introducer + 1)
            .map_or_else(|| self.tokens[introducer].end(), |t| t.start);
        let id = self.push_scope(scope, body_start);
        let frame = self.frames.len() - 1;
        let parens = self.top().parens.len();
        self.open.push(Open {
            scope: id,
            closer: Closer::Expr { frame, parens },
        });
    }

    fn finish(mut self) -> TrackOutput {
        let n = self.tokens.len();
        while self.frames.len() > 1 {
            self.end_statement(n);
            let index = self.frames.len() - 1;
            if let Some(brace) = self.frames[index].brace {
                self.flags.push(MalformedFlag::new(
                    MalformedKind::UnbalancedScope,
                    self.tokens[brace].start,
                ));
            }
            self.close_frame_scopes(index, n, self.source_len, true);
            self.flag_open_parens(index);
            self.frames.pop();
        }
        self.end_statement(n);
        self.close_frame_scopes(0, n, self.source_len, true);
        self.flag_open_parens(0);
        self.flags.sort_by_key(|f| f.offset);
        TrackOutput {
            tree: self.tree,
            flags: self.flags,
        }
    }
}

fn last_word(tokens: &[Token<'_>], from: usize, to: usize) -> Option<String> {
    tokens[from..to]
        .iter()
        .rev()
        .find(|t| t.kind == TokenKind::Word)
        .map(|t| String::from(t.text))
}

/// Token index of the enum constant whose body opens at `brace`.
fn enum_constant(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    stmt: usize,
    brace: usize,
) -> Option<usize> {
    let from = depth_zero(tokens, partners, stmt, brace)
        .filter(|&k| tokens[k].kind == TokenKind::Comma)
        .last()
        .map_or(stmt, |c| c + 1);
    let k = skip_modifiers(tokens, partners, from, brace);
    if k >= brace || tokens[k].kind != TokenKind::Word {
        return None;
    }
    match k + 1 {
        next if next == brace => Some(k),
        next if tokens[next].kind == TokenKind::OpenParen && partners[next] == Some(brace - 1) => {
            Some(k)
        }
        _ => None,
    }
}

/// `[captures](params) mutable -> T {` or `[captures] {`.
fn cpp_lambda_start(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    from: usize,
    brace: usize,
) -> Option<usize> {
    depth_zero(tokens, partners, from, brace)
        .find(|&k| {
            tokens[k].kind == TokenKind::OpenBracket
                && partners[k].is_some_and(|close| {
                    close + 1 == brace || tokens.get(close + 1).is_some_and(|t| t.kind == TokenKind::OpenParen)
                })
                && (k == 0
                    || !matches!(
                        tokens[k - 1].kind,
                        TokenKind::Word | TokenKind::CloseBracket | TokenKind::CloseParen
                    ))
        })
}

/// C# property header: `Type Name` or an indexer `Type this[...]`, without parameters or `=`.
fn is_property_header(
    tokens: &[Token<'_>],
    partners: &[Option<usize>],
    stmt: usize,
    brace: usize,
) -> bool {
    if stmt >= brace {
        return false;
    }
    let last = tokens[brace - 1].kind;
    matches!(last, TokenKind::Word | TokenKind::CloseBracket)
        && !depth_zero(tokens, partners, stmt, brace)
            .any(|k| matches!(tokens[k].kind, TokenKind::Assign | TokenKind::OpenParen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use crate::scanner::scan;
    use crate::tokens::{code_tokens, pair_brackets};

    fn track_text(text: &str, language: Language) -> TrackOutput {
        let out = scan(text, language.lex_options());
        let tokens = code_tokens(text, &out.spans, language);
        let partners = pair_brackets(&tokens);
        track(&tokens, &partners, text, language, "unit")
    }

    /// `kind name` for every node below the root, indented by depth.
    fn outline(text: &str, language: Language) -> Vec<String> {
        let out = track_text(text, language);
        out.tree
            .iter()
            .skip(1)
            .map(|(id, node)| {
                format!(
                    "{}{} {}",
                    "  ".repeat(out.tree.depth(id) - 1),
                    node.kind,
                    node.name
                )
            })
            .collect()
    }

    #[test]
    fn java_class_with_methods_and_constructor() {
        let text = "public class Shop {\n  private int n;\n  public Shop(int n) { this.n = n; }\n  @Override\n  public String toString() { return \"\"; }\n  void empty();\n}\n";
        assert_eq!(
            outline(text, Language::Java),
            ["type Shop", "  method Shop", "  method toString"]
        );
    }

    #[test]
    fn java_nested_anonymous_and_lambdas() {
        let text = "class A {\n  class B {\n    void run() {\n      Runnable r = new Runnable() {\n        public void run() { go(); }\n      };\n      list.forEach(x -> { use(x); });\n      list.map(y -> y + 1);\n    }\n  }\n  static { init(); }\n  { warm(); }\n}";
        assert_eq!(
            outline(text, Language::Java),
            [
                "type A",
                "  type B",
                "    method run",
                "      type Runnable",
                "        method run",
                "      lambda <lambda>",
                "      lambda <lambda>",
                "  initializer <static initializer>",
                "  initializer <initializer>",
            ]
        );
    }

    #[test]
    fn java_switch_rules_are_not_lambdas() {
        let text = "class S {\n  int f(int v) {\n    return switch (v) {\n      case 1 -> { yield 10; }\n      case 2 -> 20;\n      default -> 0;\n    };\n  }\n}";
        assert_eq!(outline(text, Language::Java), ["type S", "  method f"]);
    }

    #[test]
    fn java_records_and_enums() {
        let text = "record Point(int x, int y) {\n  Point {\n    if (x < 0) throw new IllegalArgumentException();\n  }\n}\nrecord Empty(int a) {}\nenum Op {\n  PLUS { int apply(int a, int b) { return a + b; } },\n  MINUS(1) { int apply(int a, int b) { return a - b; } };\n  abstract int apply(int a, int b);\n}";
        assert_eq!(
            outline(text, Language::Java),
            [
                "type Point",
                "  method Point",
                "type Empty",
                "type Op",
                "  type PLUS",
                "    method apply",
                "  type MINUS",
                "    method apply",
            ]
        );
    }

    #[test]
    fn scope_ranges_nest_and_follow_source_order() {
        let text = "class A {\n  void f() { Runnable r = () -> { }; }\n  void g() { }\n}";
        let out = track_text(text, Language::Java);
        let tree = &out.tree;
        for (id, node) in tree.iter().skip(1) {
            let parent = tree.get(node.parent.unwrap()).unwrap();
            assert!(parent.start <= node.start && node.end <= parent.end, "{id:?}");
            let siblings: Vec<_> = tree.children(node.parent.unwrap()).collect();
            for pair in siblings.windows(2) {
                assert!(pair[0].end <= pair[1].start);
            }
        }
        let class = &tree.iter().nth(1).unwrap().1;
        assert_eq!((class.start, class.end), (0, text.len()));
        let g = tree.iter().find(|(_, n)| n.name == "g").unwrap().1;
        assert_eq!(&text[g.start..g.end], "void g() { }");
        let lambda = tree.iter().find(|(_, n)| n.kind == ScopeKind::Lambda).unwrap().1;
        assert_eq!(&text[lambda.start..lambda.end], "() -> { }");
    }

    #[test]
    fn expression_lambda_ends_before_its_delimiter() {
        let text = "class A { void f() { call(a -> a * 2, b); } }";
        let out = track_text(text, Language::Java);
        let lambda = out
            .tree
            .iter()
            .find(|(_, n)| n.kind == ScopeKind::Lambda)
            .unwrap()
            .1;
        assert_eq!(&text[lambda.start..lambda.end], "a -> a * 2");
        assert!(!lambda.unterminated);
    }

    #[test]
    fn kotlin_declarations() {
        let text = "data class P(val x: Int)\n\nclass Q : Base() {\n  init { check() }\n  fun twice(v: Int) = v * 2\n  fun run() {\n    items.forEach { println(it) }\n    if (ok) { go() } else { stop() }\n  }\n  companion object {\n    fun create(): Q = Q()\n  }\n}\n\nfun main() {\n  val r = object : Runnable {\n    override fun run() {}\n  }\n}\n";
        assert_eq!(
            outline(text, Language::Kotlin),
            [
                "type P",
                "type Q",
                "  initializer <initializer>",
                "  method twice",
                "  method run",
                "    lambda <lambda>",
                "  type Companion",
                "    method create",
                "method main",
                "  type <anonymous>",
                "    method run",
            ]
        );
    }

    #[test]
    fn kotlin_when_arms_are_blocks() {
        let text = "fun f(x: Int) {\n  when (x) {\n    1 -> { a() }\n    else -> { b() }\n  }\n}";
        assert_eq!(outline(text, Language::Kotlin), ["method f"]);
    }

    #[test]
    fn csharp_members() {
        let text = "namespace App {\n  public record Person(string Name);\n  public class Svc : Base {\n    public Svc(int a) : base(a) { }\n    public int Count => items.Count;\n    public int Size { get { return n; } set { n = value; } }\n    public string Kind(int v) => v switch { 1 => \"one\", _ => \"many\" };\n    void Run() { items.ForEach(i => { Use(i); }); }\n  }\n}";
        assert_eq!(
            outline(text, Language::CSharp),
            [
                "type Person",
                "type Svc",
                "  method Svc",
                "  method Count",
                "  method get",
                "  method set",
                "  method Kind",
                "  method Run",
                "    lambda <lambda>",
            ]
        );
    }

    #[test]
    fn go_functions_and_types() {
        let text = "package main\n\ntype Server struct {\n  port int\n}\n\nfunc (s *Server) Start() error {\n  go func() {\n    s.serve()\n  }()\n  return nil\n}\n\nfunc main() {\n}\n";
        assert_eq!(
            outline(text, Language::Go),
            [
                "type Server",
                "method Start",
                "  lambda <lambda>",
                "method main",
            ]
        );
    }

    #[test]
    fn javascript_functions_classes_and_arrows() {
        let text = "function top(a) {\n  return a.map(x => x * 2);\n}\nclass Cart {\n  constructor() { this.items = []; }\n  total() { return this.items.reduce((s, i) => { return s + i; }, 0); }\n}\nconst handler = function () {};\nconst f = async (x) => x\nsetTimeout(() => {\n  run()\n}, 10)\n";
        assert_eq!(
            outline(text, Language::JavaScript),
            [
                "method top",
                "  lambda <lambda>",
                "type Cart",
                "  method constructor",
                "  method total",
                "    lambda <lambda>",
                "lambda <lambda>",
                "lambda <lambda>",
                "lambda <lambda>",
            ]
        );
    }

    #[test]
    fn c_and_cpp_functions() {
        let text = "struct point { int x; };\nstatic int add(int a, int b) {\n  return a + b;\n}\nnamespace geo {\nclass Shape {\npublic:\n  virtual ~Shape() {}\n};\nvoid Shape::draw() const {\n  auto f = [&](int x) { return x; };\n}\n}\n";
        assert_eq!(
            outline(text, Language::Cpp),
            [
                "type point",
                "method add",
                "type Shape",
                "  method ~Shape",
                "method Shape::draw",
                "  lambda <lambda>",
            ]
        );
    }

    #[test]
    fn control_blocks_at_top_level_are_not_functions() {
        let text = "<?php\nif ($a) {\n  echo 1;\n}\nfunction go($x) {\n  foreach ($x as $y) { }\n}\n";
        assert_eq!(outline(text, Language::Php), ["method go"]);
    }

    #[test]
    fn stray_close_brace_is_flagged() {
        let out = track_text("class A { }\n}", Language::Java);
        assert_eq!(
            out.flags,
            [MalformedFlag::new(MalformedKind::UnbalancedScope, 12)]
        );
        assert_eq!(out.tree.len(), 2);
    }

    #[test]
    fn unclosed_braces_close_at_end_of_unit() {
        let text = "class A {\n  void f() {\n    if (x) {\n";
        let out = track_text(text, Language::Java);
        let offsets: Vec<usize> = out.flags.iter().map(|f| f.offset).collect();
        assert_eq!(offsets, [8, 21, 34]);
        for (_, node) in out.tree.iter().skip(1) {
            assert!(node.unterminated);
            assert_eq!(node.end, text.len());
        }
    }

    #[test]
    fn unmatched_parens_are_flagged() {
        let out = track_text("class A { void f() { if (a && b { } } }", Language::Java);
        assert_eq!(
            out.flags,
            [MalformedFlag::new(MalformedKind::UnbalancedScope, 24)]
        );
        assert_eq!(
            outline("class A { void f() { if (a && b { } } }", Language::Java),
            ["type A", "  method f"]
        );

        let out = track_text("int g() { return h(1)); }\nint k(int a[) {", Language::C);
        let offsets: Vec<usize> = out.flags.iter().map(|f| f.offset).collect();
        assert_eq!(offsets, [21, 31, 40]);
    }

    #[test]
    fn directives_never_join_the_next_header() {
        let text = "#include <vector>\n\nnamespace helper { int f(int a) { if (a) return 1; return 0; } }\n#define SQ(x) ((x) * (x))\nint main() { return SQ(2); }\n#ifdef __cplusplus\nextern \"C\" {\n#endif\nint g(void) { return 0; }\n#ifdef __cplusplus\n}\n#endif\n";
        assert_eq!(
            outline(text, Language::Cpp),
            ["method f", "method main", "method g"]
        );
        assert!(track_text(text, Language::Cpp).flags.is_empty());
    }

    #[test]
    fn csharp_top_level_functions() {
        let text = "var app = new App();\nvoid Log(string m) { Console.WriteLine(m); }\nif (args.Length > 0) { Log(args[0]); }\nnamespace Tools {\n  class Util { int Twice(int x) { return 2 * x; } }\n}\n";
        assert_eq!(
            outline(text, Language::CSharp),
            ["method Log", "type Util", "  method Twice"]
        );
    }

    #[test]
    fn braces_in_comments_and_strings_are_ignored() {
        let text = "class A {\n  // }\n  String s = \"}\";\n  /* { */\n  void f() { }\n}";
        let out = track_text(text, Language::Java);
        assert!(out.flags.is_empty());
        assert_eq!(outline(text, Language::Java), ["type A", "  method f"]);
    }
}
