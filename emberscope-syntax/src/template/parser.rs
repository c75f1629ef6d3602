//! Recursive-descent parser for Glimmer templates.
//!
//! Produces the [`ast`](super::ast) tree: HTML elements with their attributes
//! and modifiers, mustaches, blocks with `{{else}}` / `{{else if}}` chains,
//! sub-expressions and comments. Mismatched or unclosed elements and blocks
//! are reported as [`SyntaxError::Template`] with a 1-based position.

use crate::{Result, SyntaxError};

use super::ast::{
    AttrValue, Attribute, Block, Call, ConcatPart, Element, Expression, HashPair, Literal,
    Mustache, PathExpression, Statement,
};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Characters that terminate a bare token inside a mustache.
const TOKEN_STOP: &[char] = &['=', '(', ')', '{', '}', '|', '~', '"', '\''];

/// Parse a template into its top-level statements.
pub fn parse(template: &str) -> Result<Vec<Statement>> {
    let mut parser = Parser {
        src: template,
        pos: 0,
    };
    let (body, stop) = parser.parse_children()?;
    match stop {
        Stop::Eof => Ok(body),
        Stop::CloseTag(name, at) => {
            Err(parser.error(at, format!("unexpected closing tag </{name}>")))
        }
        Stop::CloseBlock(name, at) => {
            Err(parser.error(at, format!("unexpected block close {{{{/{name}}}}}")))
        }
        Stop::Else(_, at) => Err(parser.error(at, "unexpected {{else}} outside of a block")),
    }
}

/// Why a run of sibling statements ended.
enum Stop {
    Eof,
    CloseTag(String, usize),
    CloseBlock(String, usize),
    /// `{{else}}`, or `{{else if ...}}` carrying the chained block opening.
    Else(Option<BlockOpen>, usize),
}

struct BlockOpen {
    call: Call,
    block_params: Vec<String>,
}

enum Curly {
    Statement(Statement),
    Stop(Stop),
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    // ── Statements ─────────────────────────────────────────────────

    fn parse_children(&mut self) -> Result<(Vec<Statement>, Stop)> {
        let mut out = Vec::new();
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Ok((out, Stop::Eof));
            }
            if rest.starts_with("{{") {
                match self.parse_curly()? {
                    Curly::Statement(statement) => out.push(statement),
                    Curly::Stop(stop) => return Ok((out, stop)),
                }
            } else if rest.starts_with("<!--") {
                let start = self.pos;
                let end = rest
                    .find("-->")
                    .ok_or_else(|| self.error(start, "unclosed HTML comment"))?;
                out.push(Statement::Comment(rest[4..end].to_string()));
                self.pos += end + 3;
            } else if rest.starts_with("</") {
                let start = self.pos;
                self.pos += 2;
                let name = self.take_while(|c| !c.is_whitespace() && c != '>');
                self.skip_ws();
                self.expect(">")?;
                return Ok((out, Stop::CloseTag(name, start)));
            } else if starts_element(rest) {
                out.push(Statement::Element(self.parse_element()?));
            } else {
                out.push(Statement::Text(self.parse_text()));
            }
        }
    }

    fn parse_text(&mut self) -> String {
        let start = self.pos;
        let mut text = String::new();
        while let Some(ch) = self.rest().chars().next() {
            let rest = self.rest();
            if rest.starts_with("\\{{") {
                text.push_str("{{");
                self.pos += 3;
                continue;
            }
            if rest.starts_with("{{") {
                break;
            }
            if self.pos > start
                && (starts_element(rest) || rest.starts_with("</") || rest.starts_with("<!--"))
            {
                break;
            }
            text.push(ch);
            self.pos += ch.len_utf8();
        }
        text
    }

    fn parse_curly(&mut self) -> Result<Curly> {
        let start = self.pos;
        if self.rest().starts_with("{{{") {
            return Ok(Curly::Statement(Statement::Mustache(self.parse_mustache()?)));
        }
        self.pos += 2;
        self.eat("~");

        if self.rest().starts_with('!') {
            let text = self.skip_mustache_comment(start)?;
            return Ok(Curly::Statement(Statement::MustacheComment(text)));
        }
        if self.eat("#") {
            let open = self.parse_block_open()?;
            let close_name = call_name(&open.call);
            let block = self.parse_block(open, start, &close_name)?;
            return Ok(Curly::Statement(Statement::Block(block)));
        }
        if self.eat("/") {
            self.skip_ws();
            let name = self.take_while(|c| !c.is_whitespace() && !TOKEN_STOP.contains(&c));
            self.close_curly()?;
            return Ok(Curly::Stop(Stop::CloseBlock(name, start)));
        }
        if self.eat("^") {
            self.close_curly()?;
            return Ok(Curly::Stop(Stop::Else(None, start)));
        }
        if self.rest().starts_with('>') {
            return Err(self.error(start, "partials are not supported"));
        }
        if self.at_keyword("else") {
            self.pos += "else".len();
            if self.at_close_curly() {
                self.close_curly()?;
                return Ok(Curly::Stop(Stop::Else(None, start)));
            }
            let open = self.parse_block_open()?;
            return Ok(Curly::Stop(Stop::Else(Some(open), start)));
        }

        let call = self.parse_call()?;
        self.close_curly()?;
        Ok(Curly::Statement(Statement::Mustache(Mustache {
            call,
            trusted: false,
        })))
    }

    /// A `{{...}}` or `{{{...}}}` in expression position (attribute values).
    fn parse_mustache(&mut self) -> Result<Mustache> {
        let start = self.pos;
        let trusted = self.rest().starts_with("{{{");
        self.pos += if trusted { 3 } else { 2 };
        self.eat("~");
        let call = self.parse_call()?;
        self.skip_ws();
        self.eat("~");
        let close = if trusted { "}}}" } else { "}}" };
        if !self.eat(close) {
            return Err(self.error(start, format!("expected `{close}`")));
        }
        Ok(Mustache { call, trusted })
    }

    fn skip_mustache_comment(&mut self, start: usize) -> Result<String> {
        let rest = self.rest();
        if let Some(body) = rest.strip_prefix("!--") {
            let (end, close_len) = find_comment_end(body)
                .ok_or_else(|| self.error(start, "unclosed mustache comment"))?;
            let text = body[..end].to_string();
            self.pos += 3 + end + close_len;
            return Ok(text);
        }
        let end = rest
            .find("}}")
            .ok_or_else(|| self.error(start, "unclosed mustache comment"))?;
        let text = rest[1..end].trim_end_matches('~').to_string();
        self.pos += end + 2;
        Ok(text)
    }

    fn parse_block_open(&mut self) -> Result<BlockOpen> {
        let call = self.parse_call()?;
        self.skip_ws();
        let block_params = if self.at_block_params() {
            self.pos += "as".len();
            self.skip_ws();
            self.parse_pipes()?
        } else {
            Vec::new()
        };
        self.close_curly()?;
        Ok(BlockOpen { call, block_params })
    }

    fn parse_block(&mut self, open: BlockOpen, start: usize, close_name: &str) -> Result<Block> {
        let (program, stop) = self.parse_children()?;
        let inverse = match stop {
            Stop::CloseBlock(name, at) => {
                self.check_block_close(&name, close_name, at)?;
                None
            }
            Stop::Else(None, _) => {
                let (inverse, stop) = self.parse_children()?;
                match stop {
                    Stop::CloseBlock(name, at) => self.check_block_close(&name, close_name, at)?,
                    Stop::Else(_, at) => {
                        return Err(self.error(
                            at,
                            format!("duplicate {{{{else}}}} in block {close_name}"),
                        ));
                    }
                    other => return Err(self.unclosed_block(other, start, close_name)),
                }
                Some(inverse)
            }
            Stop::Else(Some(chained), at) => {
                let nested = self.parse_block(chained, at, close_name)?;
                Some(vec![Statement::Block(nested)])
            }
            other => return Err(self.unclosed_block(other, start, close_name)),
        };
        Ok(Block {
            call: open.call,
            block_params: open.block_params,
            program,
            inverse,
        })
    }

    fn check_block_close(&self, name: &str, expected: &str, at: usize) -> Result<()> {
        if name == expected {
            Ok(())
        } else {
            Err(self.error(
                at,
                format!("block close {{{{/{name}}}}} does not match {{{{#{expected}}}}}"),
            ))
        }
    }

    fn unclosed_block(&self, stop: Stop, start: usize, name: &str) -> SyntaxError {
        match stop {
            Stop::CloseTag(tag, at) => self.error(
                at,
                format!("unexpected closing tag </{tag}> inside block {name}"),
            ),
            _ => self.error(start, format!("unclosed block {{{{#{name}}}}}")),
        }
    }

    // ── Elements ───────────────────────────────────────────────────

    fn parse_element(&mut self) -> Result<Element> {
        let start = self.pos;
        self.pos += 1;
        let tag = self.take_while(|c| !c.is_whitespace() && c != '/' && c != '>');
        let mut element = Element {
            tag,
            attributes: Vec::new(),
            modifiers: Vec::new(),
            block_params: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        };

        loop {
            self.skip_ws();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(start, format!("unclosed start tag <{}>", element.tag)));
            }
            if self.eat("/>") {
                element.self_closing = true;
                break;
            }
            if self.eat(">") {
                break;
            }
            if rest.starts_with("{{!") {
                let comment_start = self.pos;
                self.pos += 2;
                self.skip_mustache_comment(comment_start)?;
                continue;
            }
            if rest.starts_with("{{") {
                let modifier_start = self.pos;
                self.pos += 2;
                self.eat("~");
                let call = self.parse_call()?;
                self.close_curly()
                    .map_err(|_| self.error(modifier_start, "unclosed element modifier"))?;
                element.modifiers.push(call);
                continue;
            }

            let name = self.take_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/'));
            if name.is_empty() {
                return Err(self.error(
                    self.pos,
                    format!("unexpected character in <{}>", element.tag),
                ));
            }
            self.skip_ws();
            if name == "as" && self.rest().starts_with('|') {
                element.block_params = self.parse_pipes()?;
                continue;
            }
            let value = if self.eat("=") {
                self.skip_ws();
                self.parse_attr_value()?
            } else {
                AttrValue::Text(String::new())
            };
            element.attributes.push(Attribute { name, value });
        }

        if element.self_closing || VOID_ELEMENTS.contains(&element.tag.as_str()) {
            return Ok(element);
        }

        let (children, stop) = self.parse_children()?;
        match stop {
            Stop::CloseTag(name, _) if name == element.tag => {}
            Stop::CloseTag(name, at) => {
                return Err(self.error(
                    at,
                    format!("closing tag </{name}> did not match <{}>", element.tag),
                ));
            }
            Stop::CloseBlock(name, at) => {
                return Err(self.error(
                    at,
                    format!("unexpected block close {{{{/{name}}}}} inside <{}>", element.tag),
                ));
            }
            Stop::Else(_, at) => {
                return Err(self.error(
                    at,
                    format!("unexpected {{{{else}}}} inside <{}>", element.tag),
                ));
            }
            Stop::Eof => {
                return Err(self.error(start, format!("unclosed element <{}>", element.tag)));
            }
        }
        element.children = children;
        Ok(element)
    }

    fn parse_attr_value(&mut self) -> Result<AttrValue> {
        let rest = self.rest();
        if rest.starts_with("{{") {
            return Ok(AttrValue::Mustache(self.parse_mustache()?));
        }
        let Some(quote) = rest.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
            let text = self.take_while(|c| !c.is_whitespace() && c != '>');
            return Ok(AttrValue::Text(text));
        };

        let start = self.pos;
        self.pos += 1;
        let mut parts = Vec::new();
        let mut text = String::new();
        loop {
            let rest = self.rest();
            let Some(ch) = rest.chars().next() else {
                return Err(self.error(start, "unterminated attribute value"));
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if rest.starts_with("{{") {
                if !text.is_empty() {
                    parts.push(ConcatPart::Text(std::mem::take(&mut text)));
                }
                parts.push(ConcatPart::Mustache(self.parse_mustache()?));
                continue;
            }
            text.push(ch);
            self.pos += ch.len_utf8();
        }

        if parts.is_empty() {
            return Ok(AttrValue::Text(text));
        }
        if !text.is_empty() {
            parts.push(ConcatPart::Text(text));
        }
        Ok(AttrValue::Concat(parts))
    }

    fn parse_pipes(&mut self) -> Result<Vec<String>> {
        let start = self.pos;
        self.expect("|")?;
        let inner = self.take_while(|c| c != '|');
        if !self.eat("|") {
            return Err(self.error(start, "unterminated block params"));
        }
        Ok(inner.split_whitespace().map(str::to_string).collect())
    }

    // ── Expressions ────────────────────────────────────────────────

    fn parse_call(&mut self) -> Result<Call> {
        self.skip_ws();
        let path = self.parse_expression()?;
        let mut params = Vec::new();
        let mut hash = Vec::new();
        loop {
            self.skip_ws();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(self.pos, "unexpected end of template inside mustache"));
            }
            if rest.starts_with("}}") || rest.starts_with("~}}") || rest.starts_with(')') {
                break;
            }
            if self.at_block_params() {
                break;
            }
            if let Some(key) = self.peek_hash_key() {
                self.pos += key.len() + 1;
                self.skip_ws();
                let value = self.parse_expression()?;
                hash.push(HashPair { key, value });
            } else {
                params.push(self.parse_expression()?);
            }
        }
        Ok(Call { path, params, hash })
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        let start = self.pos;
        let Some(first) = self.rest().chars().next() else {
            return Err(self.error(start, "unexpected end of template"));
        };
        match first {
            '(' => {
                self.pos += 1;
                let call = self.parse_call()?;
                self.skip_ws();
                if !self.eat(")") {
                    return Err(self.error(start, "unclosed sub-expression"));
                }
                Ok(Expression::SubExpression(Box::new(call)))
            }
            '"' | '\'' => Ok(Expression::Literal(Literal::String(self.parse_string(first)?))),
            _ => {
                let token = self.take_while(|c| !c.is_whitespace() && !TOKEN_STOP.contains(&c));
                if token.is_empty() {
                    return Err(self.error(start, format!("unexpected `{first}` in mustache")));
                }
                Ok(classify_token(&token))
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((offset, ch)) = chars.next() {
            if ch == '\\' {
                if let Some((_, next)) = chars.clone().next().filter(|(_, next)| *next == quote) {
                    chars.next();
                    value.push(next);
                    continue;
                }
            }
            if ch == quote {
                self.pos += offset + 1;
                return Ok(value);
            }
            value.push(ch);
        }
        Err(self.error(start, "unterminated string literal"))
    }

    /// `key=` at the cursor, without consuming it.
    fn peek_hash_key(&self) -> Option<String> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || TOKEN_STOP.contains(&c))
            .unwrap_or(rest.len());
        if len > 0 && rest[len..].starts_with('=') {
            Some(rest[..len].to_string())
        } else {
            None
        }
    }

    // ── Cursor helpers ─────────────────────────────────────────────

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(self.pos, format!("expected `{token}`")))
        }
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let rest = self.rest();
        let len = rest.find(|c: char| !keep(c)).unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_string()
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.rest().strip_prefix(keyword).is_some_and(|after| {
            after.starts_with(|c: char| c.is_whitespace() || c == '~' || c == '}')
        })
    }

    fn at_close_curly(&self) -> bool {
        let rest = self.rest().trim_start();
        rest.starts_with("}}") || rest.starts_with("~}}")
    }

    fn at_block_params(&self) -> bool {
        self.rest()
            .strip_prefix("as")
            .is_some_and(|after| {
                after.starts_with(char::is_whitespace) && after.trim_start().starts_with('|')
            })
    }

    fn close_curly(&mut self) -> Result<()> {
        let start = self.pos;
        self.skip_ws();
        self.eat("~");
        if self.eat("}}") {
            Ok(())
        } else {
            Err(self.error(start, "expected `}}`"))
        }
    }

    fn error(&self, at: usize, message: impl Into<String>) -> SyntaxError {
        let before = &self.src[..at.min(self.src.len())];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit_once('\n')
            .map_or(before, |(_, tail)| tail)
            .chars()
            .count()
            + 1;
        SyntaxError::Template {
            line,
            column,
            message: message.into(),
        }
    }
}

fn starts_element(rest: &str) -> bool {
    rest.strip_prefix('<')
        .and_then(|after| after.chars().next())
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '@' || c == ':')
}

fn find_comment_end(body: &str) -> Option<(usize, usize)> {
    let plain = body.find("--}}").map(|idx| (idx, 4));
    let trimmed = body.find("--~}}").map(|idx| (idx, 5));
    match (plain, trimmed) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn classify_token(token: &str) -> Expression {
    let literal = match token {
        "true" => Some(Literal::Boolean(true)),
        "false" => Some(Literal::Boolean(false)),
        "null" => Some(Literal::Null),
        "undefined" => Some(Literal::Undefined),
        _ if is_number(token) => Some(Literal::Number(token.to_string())),
        _ => None,
    };
    literal.map_or_else(
        || Expression::Path(PathExpression::new(token)),
        Expression::Literal,
    )
}

fn is_number(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    digits.starts_with(|c: char| c.is_ascii_digit()) && digits.parse::<f64>().is_ok()
}

/// Name a block must be closed with: its head as written.
fn call_name(call: &Call) -> String {
    call.path.original().unwrap_or_default()
}
