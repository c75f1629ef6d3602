// Glimmer template syntax tree.
//
// Only the shapes the analyzer inspects are modelled: text and comments are
// kept as opaque strings, HTML attributes keep their dynamic parts.

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Text(String),
    Comment(String),
    MustacheComment(String),
    Mustache(Mustache),
    Block(Block),
    Element(Element),
}

/// `{{path params hash}}`, or `{{{...}}}` when `trusted`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mustache {
    pub call: Call,
    pub trusted: bool,
}

/// `{{#path params hash as |block params|}} program {{else}} inverse {{/path}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub call: Call,
    pub block_params: Vec<String>,
    pub program: Vec<Statement>,
    pub inverse: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Call>,
    pub block_params: Vec<String>,
    pub children: Vec<Statement>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Mustache(Mustache),
    Concat(Vec<ConcatPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConcatPart {
    Text(String),
    Mustache(Mustache),
}

/// Head expression applied to positional and named arguments. Shared by
/// mustaches, blocks, sub-expressions and element modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Vec<HashPair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Path(PathExpression),
    SubExpression(Box<Call>),
    Literal(Literal),
}

impl Expression {
    /// Source-like rendering: the path as written or the literal's value.
    pub fn original(&self) -> Option<String> {
        match self {
            Self::Path(path) => Some(path.original.clone()),
            Self::Literal(literal) => Some(literal.original()),
            Self::SubExpression(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathExpression> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    pub original: String,
    /// Leading `this` (`this`, `this.foo`).
    pub this: bool,
    /// Leading `@` (`@arg`).
    pub data: bool,
    pub parts: Vec<String>,
}

impl PathExpression {
    pub fn new(original: &str) -> Self {
        let data = original.starts_with('@');
        let this = original == "this"
            || original.starts_with("this.")
            || original.starts_with("this/");
        let tail = if data {
            &original[1..]
        } else if this {
            original
                .strip_prefix("this")
                .unwrap_or(original)
                .trim_start_matches(['.', '/'])
        } else {
            original
        };
        let parts = tail
            .split(['.', '/'])
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            original: original.to_string(),
            this,
            data,
            parts,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(String),
    Boolean(bool),
    Null,
    Undefined,
}

impl Literal {
    pub fn original(&self) -> String {
        match self {
            Self::String(value) | Self::Number(value) => value.clone(),
            Self::Boolean(value) => value.to_string(),
            Self::Null => "null".to_string(),
            Self::Undefined => "undefined".to_string(),
        }
    }
}
