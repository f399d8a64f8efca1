//! Definition-file parser - splits source into statements and parses
//! annotated field declarations into the AST.
//!
//! The parser is deliberately shallow: it understands statement boundaries
//! (indentation, bracket nesting, string literals, line continuations),
//! class headers, and annotated field declarations. Every other statement
//! is preserved verbatim as an opaque payload.

use super::ast::{ClassDef, ClassStmt, FieldStmt, Module, Stmt, Target, TypeExpr};
use super::lexer::{LexError, SpannedToken, Token, tokenize};
use tracing::warn;

/// Parse error with location information.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Statements that can never be field declarations.
const COMPOUND_KEYWORDS: &[&str] = &[
    "def", "if", "elif", "else", "for", "while", "with", "try", "except", "finally", "class",
    "return", "raise", "pass", "break", "continue", "import", "from", "global", "nonlocal", "del",
    "assert", "yield", "lambda", "async", "await", "not",
];

/// Parse definition-file source into a [`Module`].
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    let (lines, final_state) = scan_lines(source)?;

    let last_line = lines.len().max(1);
    if final_state.triple.is_some() {
        return Err(ParseError {
            message: "unterminated string literal at end of file".to_string(),
            line: last_line,
            column: 1,
        });
    }
    if final_state.depth != 0 {
        return Err(ParseError {
            message: "unbalanced brackets at end of file".to_string(),
            line: last_line,
            column: 1,
        });
    }

    let mut statements = Vec::new();
    for chunk in split_statements(&lines, 0) {
        if !chunk.passive && is_class_header(chunk.first_text()) {
            statements.push(Stmt::Class(parse_class(&chunk)?));
        } else {
            statements.push(Stmt::Opaque(chunk.text()));
        }
    }

    Ok(Module { statements })
}

// ---------------------------------------------------------------------------
// Statement boundary scanning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct ScanState {
    /// Open bracket depth carried across physical lines.
    depth: i32,
    /// Quote character of an open triple-quoted string, if any.
    triple: Option<char>,
    /// Previous line ended with a backslash continuation.
    continuation: bool,
}

/// A physical source line annotated with the scanner state at its start.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    text: &'a str,
    state: ScanState,
}

impl Line<'_> {
    fn glued(&self) -> bool {
        self.state.depth > 0 || self.state.triple.is_some() || self.state.continuation
    }

    fn passive(&self) -> bool {
        let trimmed = self.text.trim_start();
        trimmed.is_empty() || trimmed.starts_with('#')
    }

    fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start().len()
    }
}

fn scan_lines(source: &str) -> Result<(Vec<Line<'_>>, ScanState), ParseError> {
    let mut lines = Vec::new();
    let mut state = ScanState::default();
    for (idx, text) in source.lines().enumerate() {
        let number = idx + 1;
        lines.push(Line {
            number,
            text,
            state,
        });
        state = scan_line(text, number, state)?;
    }
    Ok((lines, state))
}

/// Advance the scanner state across one physical line.
fn scan_line(text: &str, number: usize, mut state: ScanState) -> Result<ScanState, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    state.continuation = false;
    let mut i = 0;
    while i < chars.len() {
        if let Some(quote) = state.triple {
            if chars[i] == quote && chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote)
            {
                state.triple = None;
                i += 3;
            } else {
                i += 1;
            }
            continue;
        }
        let c = chars[i];
        match c {
            '#' => break,
            '\'' | '"' => {
                if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                    state.triple = Some(c);
                    i += 3;
                } else {
                    let mut j = i + 1;
                    loop {
                        match chars.get(j) {
                            Some('\\') => j += 2,
                            Some(&q) if q == c => break,
                            Some(_) => j += 1,
                            None => {
                                return Err(ParseError {
                                    message: "unterminated string literal".to_string(),
                                    line: number,
                                    column: i + 1,
                                });
                            }
                        }
                    }
                    i = j + 1;
                }
                continue;
            }
            '(' | '[' | '{' => state.depth += 1,
            ')' | ']' | '}' => state.depth -= 1,
            '\\' if i + 1 == chars.len() => state.continuation = true,
            _ => {}
        }
        i += 1;
    }
    Ok(state)
}

/// A run of physical lines forming one logical statement (or a passive run
/// of blank/comment lines between statements).
#[derive(Debug)]
struct Chunk<'a> {
    lines: Vec<Line<'a>>,
    passive: bool,
}

impl<'a> Chunk<'a> {
    fn start_line(&self) -> usize {
        self.lines.first().map(|l| l.number).unwrap_or(1)
    }

    fn first_text(&self) -> &'a str {
        self.lines.first().map(|l| l.text).unwrap_or("")
    }

    fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Group lines into statements starting at the given indent. Blank/comment
/// runs separate statements unless the next active line is still inside the
/// previous statement's block.
fn split_statements<'a>(lines: &[Line<'a>], indent: usize) -> Vec<Chunk<'a>> {
    let mut chunks: Vec<Chunk<'a>> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.glued() {
            match chunks.last_mut() {
                Some(current) => current.lines.push(line),
                None => chunks.push(Chunk {
                    lines: vec![line],
                    passive: false,
                }),
            }
            i += 1;
            continue;
        }
        if line.passive() {
            let run_start = i;
            while i < lines.len() && !lines[i].glued() && lines[i].passive() {
                i += 1;
            }
            let glues_back =
                i < lines.len() && (lines[i].glued() || lines[i].indent() > indent);
            match chunks.last_mut() {
                Some(current) if glues_back && !current.passive => {
                    current.lines.extend_from_slice(&lines[run_start..i]);
                }
                _ => chunks.push(Chunk {
                    lines: lines[run_start..i].to_vec(),
                    passive: true,
                }),
            }
            continue;
        }
        if line.indent() > indent
            && let Some(current) = chunks.last_mut()
            && !current.passive
        {
            current.lines.push(line);
            i += 1;
            continue;
        }
        chunks.push(Chunk {
            lines: vec![line],
            passive: false,
        });
        i += 1;
    }
    chunks
}

fn is_class_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("class")
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !is_ident_char(c)))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ---------------------------------------------------------------------------
// Declaration blocks
// ---------------------------------------------------------------------------

fn parse_class(chunk: &Chunk<'_>) -> Result<ClassDef, ParseError> {
    let text = chunk.text();
    let start_line = chunk.start_line();

    let colon = top_level_offsets(&text, start_line, ':')?
        .first()
        .copied()
        .ok_or_else(|| ParseError {
            message: "expected ':' in class header".to_string(),
            line: start_line,
            column: 1,
        })?;

    let header_region = &text[..=colon];
    let tokens = tokenize(header_region).map_err(|e| locate(e, &text, start_line))?;
    let name = match (tokens.first().map(|t| &t.token), tokens.get(1).map(|t| &t.token)) {
        (Some(Token::Identifier(kw)), Some(Token::Identifier(name))) if kw == "class" => {
            name.clone()
        }
        _ => {
            return Err(ParseError {
                message: "malformed class header".to_string(),
                line: start_line,
                column: 1,
            });
        }
    };

    // End of the physical line containing the header colon.
    let line_end = text[colon + 1..].find('\n').map(|p| colon + 1 + p);
    let after_colon = &text[colon + 1..line_end.unwrap_or(text.len())];

    // A trailing comment belongs to the header; real inline content becomes
    // an opaque member statement.
    let inline = after_colon.trim();
    let (header, inline_member) = if inline.is_empty() || inline.starts_with('#') {
        (
            text[..line_end.unwrap_or(text.len())].to_string(),
            None,
        )
    } else {
        (header_region.to_string(), Some(inline.to_string()))
    };

    let header_lines = match line_end {
        Some(end) => text[..=end].matches('\n').count(),
        None => chunk.lines.len(),
    };
    let body_lines = &chunk.lines[header_lines.min(chunk.lines.len())..];

    let body_indent = body_lines
        .iter()
        .find(|l| !l.passive())
        .map(|l| l.text[..l.indent()].to_string())
        .unwrap_or_else(|| "    ".to_string());

    let mut body = Vec::new();
    if let Some(inline) = inline_member {
        match parse_field(&inline, start_line)? {
            Some(field) => body.push(ClassStmt::Field(field)),
            None => body.push(ClassStmt::Opaque(format!("{}{}", body_indent, inline))),
        }
    }
    for member in split_statements(body_lines, body_indent.len()) {
        if member.passive {
            body.push(ClassStmt::Opaque(member.text()));
        } else {
            let member_text = member.text();
            match parse_field(&member_text, member.start_line())? {
                Some(field) => body.push(ClassStmt::Field(field)),
                None => body.push(ClassStmt::Opaque(member_text)),
            }
        }
    }

    Ok(ClassDef {
        name,
        header,
        body_indent,
        body,
    })
}

// ---------------------------------------------------------------------------
// Field declarations
// ---------------------------------------------------------------------------

/// Try to parse one member statement as an annotated field declaration.
/// Returns `Ok(None)` for members that are recognizably something else;
/// fails only when a statement committed to the field shape is malformed.
fn parse_field(text: &str, start_line: usize) -> Result<Option<FieldStmt>, ParseError> {
    let stripped = text.trim_start();
    let first_word: String = stripped.chars().take_while(|c| is_ident_char(*c)).collect();
    if first_word.is_empty()
        || first_word.chars().next().is_some_and(|c| c.is_ascii_digit())
        || COMPOUND_KEYWORDS.contains(&first_word.as_str())
    {
        return Ok(None);
    }

    // Split off the default expression at the first top-level `=`.
    let assign = find_assignment(text, start_line)?;
    let head = &text[..assign.unwrap_or(text.len())];

    // A field declaration carries a top-level annotation colon.
    let colons = top_level_offsets(head, start_line, ':')?;
    let Some(&colon_offset) = colons.first() else {
        return Ok(None);
    };

    let tokens = tokenize(head).map_err(|e| locate(e, head, start_line))?;
    let Some((target, colon_idx)) = parse_target(&tokens, head) else {
        warn!(
            "skipping member with unsupported assignment target: {}",
            stripped.lines().next().unwrap_or("")
        );
        return Ok(None);
    };

    let annotation_tokens = &tokens[colon_idx + 1..];
    if annotation_tokens.is_empty() {
        let (line, column) = position(head, colon_offset, start_line);
        return Err(ParseError {
            message: "missing type annotation after ':'".to_string(),
            line,
            column,
        });
    }
    let annotation = parse_annotation(annotation_tokens, head);
    let value = assign.map(|off| squash(&text[off + 1..]));

    Ok(Some(FieldStmt {
        target,
        annotation,
        value,
    }))
}

/// Parse the assignment target. Three shapes are supported: a bare name, an
/// attribute access, and an indexed access, all rooted at an identifier.
/// Returns the target and the token index of the annotation colon.
fn parse_target(tokens: &[SpannedToken], head: &str) -> Option<(Target, usize)> {
    let root = match &tokens.first()?.token {
        Token::Identifier(name) => name.clone(),
        _ => return None,
    };

    match tokens.get(1).map(|t| &t.token) {
        Some(Token::Colon) => Some((Target::Name(root), 1)),
        Some(Token::Dot) => {
            let mut i = 1;
            while matches!(tokens.get(i).map(|t| &t.token), Some(Token::Dot)) {
                match tokens.get(i + 1).map(|t| &t.token) {
                    Some(Token::Identifier(_)) => i += 2,
                    _ => return None,
                }
            }
            if !matches!(tokens.get(i).map(|t| &t.token), Some(Token::Colon)) {
                return None;
            }
            let raw = squash(&head[tokens[0].span.start..tokens[i - 1].span.end]);
            Some((Target::Attribute { root, raw }, i))
        }
        Some(Token::LBracket) => {
            let close = matching_bracket(tokens, 1)?;
            if !matches!(tokens.get(close + 1).map(|t| &t.token), Some(Token::Colon)) {
                return None;
            }
            let raw = squash(&head[tokens[0].span.start..tokens[close].span.end]);
            Some((Target::Index { root, raw }, close + 1))
        }
        _ => None,
    }
}

/// Parse a type annotation region. Exactly one shape is structured - a
/// (possibly dotted) wrapper name applied to a single bracketed argument;
/// everything else is a simple reference carried as raw text.
fn parse_annotation(tokens: &[SpannedToken], head: &str) -> TypeExpr {
    let raw = squash(region_text(tokens, head));

    if !matches!(tokens[0].token, Token::Identifier(_)) {
        return TypeExpr::Simple(raw);
    }
    let mut i = 1;
    while matches!(tokens.get(i).map(|t| &t.token), Some(Token::Dot)) {
        match tokens.get(i + 1).map(|t| &t.token) {
            Some(Token::Identifier(_)) => i += 2,
            _ => return TypeExpr::Simple(raw),
        }
    }
    if i == tokens.len() || !matches!(tokens[i].token, Token::LBracket) {
        return TypeExpr::Simple(raw);
    }
    let Some(close) = matching_bracket(tokens, i) else {
        return TypeExpr::Simple(raw);
    };
    if close != tokens.len() - 1 {
        // e.g. `list[int] | None` - not a plain wrapper application
        return TypeExpr::Simple(raw);
    }

    let wrapper = squash(&head[tokens[0].span.start..tokens[i].span.start]);
    let inner_tokens = &tokens[i + 1..close];
    if inner_tokens.is_empty() {
        return TypeExpr::Simple(raw);
    }

    let inner = if has_top_level_comma(inner_tokens) {
        // Multi-argument slices stay together as one inner expression.
        TypeExpr::Simple(squash(region_text(inner_tokens, head)))
    } else {
        parse_annotation(inner_tokens, head)
    };

    TypeExpr::Parametrized {
        wrapper,
        inner: Box::new(inner),
    }
}

fn region_text<'a>(tokens: &[SpannedToken], source: &'a str) -> &'a str {
    let start = tokens.first().map(|t| t.span.start).unwrap_or(0);
    let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
    &source[start..end]
}

/// Index of the bracket token matching the opener at `open`.
fn matching_bracket(tokens: &[SpannedToken], open: usize) -> Option<usize> {
    let mut depth = 0;
    for (j, t) in tokens.iter().enumerate().skip(open) {
        match t.token {
            Token::LBracket | Token::LParen | Token::LBrace => depth += 1,
            Token::RBracket | Token::RParen | Token::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
    }
    None
}

fn has_top_level_comma(tokens: &[SpannedToken]) -> bool {
    let mut depth = 0;
    for t in tokens {
        match t.token {
            Token::LBracket | Token::LParen | Token::LBrace => depth += 1,
            Token::RBracket | Token::RParen | Token::RBrace => depth -= 1,
            Token::Comma if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Raw text scanning helpers
// ---------------------------------------------------------------------------

/// Byte offsets of `target` occurrences at bracket depth zero, outside
/// strings and comments.
fn top_level_offsets(
    text: &str,
    start_line: usize,
    target: char,
) -> Result<Vec<usize>, ParseError> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut offsets = Vec::new();
    let mut depth: i32 = 0;
    let mut triple: Option<char> = None;
    let mut in_comment = false;
    let mut line = start_line;
    let mut i = 0;
    while i < chars.len() {
        let (off, c) = chars[i];
        if c == '\n' {
            line += 1;
            in_comment = false;
            i += 1;
            continue;
        }
        if in_comment {
            i += 1;
            continue;
        }
        if let Some(quote) = triple {
            if c == quote
                && chars.get(i + 1).map(|t| t.1) == Some(quote)
                && chars.get(i + 2).map(|t| t.1) == Some(quote)
            {
                triple = None;
                i += 3;
            } else {
                i += 1;
            }
            continue;
        }
        match c {
            '#' => in_comment = true,
            '\'' | '"' => {
                if chars.get(i + 1).map(|t| t.1) == Some(c)
                    && chars.get(i + 2).map(|t| t.1) == Some(c)
                {
                    triple = Some(c);
                    i += 3;
                } else {
                    let mut j = i + 1;
                    loop {
                        match chars.get(j).map(|t| t.1) {
                            Some('\\') => j += 2,
                            Some(q) if q == c => break,
                            Some('\n') | None => {
                                let (_, column) = position(text, off, start_line);
                                return Err(ParseError {
                                    message: "unterminated string literal".to_string(),
                                    line,
                                    column,
                                });
                            }
                            Some(_) => j += 1,
                        }
                    }
                    i = j + 1;
                }
                continue;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {
                if depth == 0 && c == target {
                    offsets.push(off);
                }
            }
        }
        i += 1;
    }
    Ok(offsets)
}

/// First top-level `=` that is an assignment, not part of a comparison or
/// augmented operator.
fn find_assignment(text: &str, start_line: usize) -> Result<Option<usize>, ParseError> {
    let bytes = text.as_bytes();
    for off in top_level_offsets(text, start_line, '=')? {
        if bytes.get(off + 1) == Some(&b'=') {
            continue;
        }
        if off > 0
            && matches!(
                bytes[off - 1],
                b'=' | b'!'
                    | b'<'
                    | b'>'
                    | b'+'
                    | b'-'
                    | b'*'
                    | b'/'
                    | b'%'
                    | b':'
                    | b'&'
                    | b'|'
                    | b'^'
                    | b'@'
                    | b'~'
            )
        {
            continue;
        }
        return Ok(Some(off));
    }
    Ok(None)
}

/// Collapse a multi-line expression into a single line of source text.
fn squash(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.contains('\n') {
        trimmed
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        trimmed.to_string()
    }
}

fn position(text: &str, offset: usize, start_line: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let line = start_line + text[..offset].matches('\n').count();
    let column = offset - text[..offset].rfind('\n').map(|p| p + 1).unwrap_or(0) + 1;
    (line, column)
}

fn locate(err: LexError, text: &str, start_line: usize) -> ParseError {
    let (line, column) = position(text, err.span.start, start_line);
    ParseError {
        message: err.message,
        line,
        column,
    }
}
