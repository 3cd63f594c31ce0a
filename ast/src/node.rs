//! Node types
//!
//! `Node` is closed: every statement or expression kind the parser can
//! produce is one variant, so a `match` over it is checked for completeness.
//! `Program` is always the root and `Param` only appears inside a
//! `FunctionDecl`, so neither is a `Node` variant.

use crate::{SymbolId, Token, TokenKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    #[serde(default)]
    pub packages: Vec<PackageImport>,
    pub block: Block,
}

/// `import "math"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageImport {
    pub token: Token,
    pub name: String,
}

/// Declarations followed by the statements that use them
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub declarations: Vec<Node>,
    #[serde(default)]
    pub compound: Compound,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Compound {
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub var: Var,
    pub type_node: TypeRef,
}

/// A type name as written, e.g. `INTEGER`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub token: Token,
    pub name: String,
}

/// A variable reference; `symbol` is filled in by the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Var {
    pub token: Token,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinOp {
    pub left: Box<Node>,
    pub op: Token,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberValue {
    Integer(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Number {
    pub token: Token,
    pub value: NumberValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boolean {
    pub token: Token,
    pub value: bool,
}

/// Message literal, a string payload addressed to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub token: Token,
    #[serde(default)]
    pub items: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictEntry {
    pub key: String,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dict {
    pub token: Token,
    #[serde(default)]
    pub entries: Vec<DictEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOp {
    pub op: Token,
    pub expr: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub left: Box<Node>,
    pub op: Token,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub var: Var,
    pub type_node: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub token: Token,
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    pub block: Block,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
}

/// `f(a, b)` or `pkg.f(a, b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub token: Token,
    #[serde(default)]
    pub package: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
}

/// A function used as a value rather than called
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRef {
    pub token: Token,
    #[serde(default)]
    pub package: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    pub token: Token,
    pub statement: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Print {
    pub token: Token,
    pub statement: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct While {
    pub token: Token,
    pub condition: Box<Node>,
    #[serde(default)]
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub token: Token,
    pub condition: Box<Node>,
    #[serde(default)]
    pub then_branch: Vec<Node>,
    #[serde(default)]
    pub else_branch: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logical {
    pub left: Box<Node>,
    pub op: Token,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    Package(PackageImport),
    Block(Block),
    VarDecl(VarDecl),
    Type(TypeRef),
    BinOp(BinOp),
    Number(Number),
    String(StringLiteral),
    Boolean(Boolean),
    Message(Message),
    List(List),
    Dict(Dict),
    UnaryOp(UnaryOp),
    Compound(Compound),
    Assign(Assign),
    Var(Var),
    NoOp,
    FunctionDecl(FunctionDecl),
    FunctionCall(FunctionCall),
    FunctionRef(FunctionRef),
    Return(Return),
    Print(Print),
    While(While),
    If(If),
    Logical(Logical),
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Package(_) => "Package",
            Node::Block(_) => "Block",
            Node::VarDecl(_) => "VarDecl",
            Node::Type(_) => "Type",
            Node::BinOp(_) => "BinOp",
            Node::Number(_) => "Number",
            Node::String(_) => "String",
            Node::Boolean(_) => "Boolean",
            Node::Message(_) => "Message",
            Node::List(_) => "List",
            Node::Dict(_) => "Dict",
            Node::UnaryOp(_) => "UnaryOp",
            Node::Compound(_) => "Compound",
            Node::Assign(_) => "Assign",
            Node::Var(_) => "Var",
            Node::NoOp => "NoOp",
            Node::FunctionDecl(_) => "FunctionDecl",
            Node::FunctionCall(_) => "FunctionCall",
            Node::FunctionRef(_) => "FunctionRef",
            Node::Return(_) => "Return",
            Node::Print(_) => "Print",
            Node::While(_) => "While",
            Node::If(_) => "If",
            Node::Logical(_) => "Logical",
        }
    }

    /// The token that best locates this node in the source, if it has one
    pub fn token(&self) -> Option<&Token> {
        match self {
            Node::Package(n) => Some(&n.token),
            Node::VarDecl(n) => Some(&n.var.token),
            Node::Type(n) => Some(&n.token),
            Node::BinOp(n) => Some(&n.op),
            Node::Number(n) => Some(&n.token),
            Node::String(n) => Some(&n.token),
            Node::Boolean(n) => Some(&n.token),
            Node::Message(n) => Some(&n.token),
            Node::List(n) => Some(&n.token),
            Node::Dict(n) => Some(&n.token),
            Node::UnaryOp(n) => Some(&n.op),
            Node::Assign(n) => Some(&n.op),
            Node::Var(n) => Some(&n.token),
            Node::FunctionDecl(n) => Some(&n.token),
            Node::FunctionCall(n) => Some(&n.token),
            Node::FunctionRef(n) => Some(&n.token),
            Node::Return(n) => Some(&n.token),
            Node::Print(n) => Some(&n.token),
            Node::While(n) => Some(&n.token),
            Node::If(n) => Some(&n.token),
            Node::Logical(n) => Some(&n.op),
            Node::Block(_) | Node::Compound(_) | Node::NoOp => None,
        }
    }
}

// Constructors used when building trees by hand (tests, benchmarks, tools).

impl Var {
    pub fn new(name: impl Into<String>, line: usize, column: usize) -> Self {
        let name = name.into();
        Self {
            token: Token::id(name.clone(), line, column),
            name,
            symbol: None,
        }
    }
}

impl TypeRef {
    pub fn new(name: impl Into<String>, line: usize, column: usize) -> Self {
        let name = name.into();
        Self {
            token: Token::id(name.clone(), line, column),
            name,
        }
    }
}

impl VarDecl {
    /// `var <name> <type>` declared at `line`
    pub fn new(name: &str, type_name: &str, line: usize) -> Self {
        Self {
            var: Var::new(name, line, 5),
            type_node: TypeRef::new(type_name, line, 6 + name.len()),
        }
    }
}

impl Param {
    pub fn new(name: &str, type_name: &str, line: usize, column: usize) -> Self {
        Self {
            var: Var::new(name, line, column),
            type_node: TypeRef::new(type_name, line, column + name.len() + 1),
        }
    }
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, params: Vec<Param>, block: Block, line: usize) -> Self {
        let name = name.into();
        Self {
            token: Token::id(name.clone(), line, 6),
            name,
            params,
            return_type: None,
            block,
            symbol: None,
        }
    }
}

impl FunctionCall {
    pub fn new(
        package: Option<&str>,
        name: impl Into<String>,
        args: Vec<Node>,
        line: usize,
        column: usize,
    ) -> Self {
        let name = name.into();
        Self {
            token: Token::id(name.clone(), line, column),
            package: package.map(str::to_string),
            name,
            args,
            symbol: None,
        }
    }
}

impl PackageImport {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        let name = name.into();
        Self {
            token: Token::new(TokenKind::StringConst, name.clone(), line, 8),
            name,
        }
    }
}

impl Block {
    pub fn new(declarations: Vec<Node>, statements: Vec<Node>) -> Self {
        Self {
            declarations,
            compound: Compound {
                children: statements,
            },
        }
    }
}

impl Node {
    pub fn var(name: &str, line: usize, column: usize) -> Node {
        Node::Var(Var::new(name, line, column))
    }

    pub fn int(value: i64, line: usize, column: usize) -> Node {
        Node::Number(Number {
            token: Token::new(TokenKind::IntegerConst, value.to_string(), line, column),
            value: NumberValue::Integer(value),
        })
    }

    pub fn assign(target: Node, value: Node) -> Node {
        let op = target
            .token()
            .map(|t| Token::new(TokenKind::Assign, "=", t.line, t.column + t.width() + 1))
            .unwrap_or_else(|| Token::new(TokenKind::Assign, "=", 0, 0));
        Node::Assign(Assign {
            left: Box::new(target),
            op,
            right: Box::new(value),
        })
    }

    pub fn binary(left: Node, kind: TokenKind, lexeme: &str, right: Node) -> Node {
        let op = left
            .token()
            .map(|t| Token::new(kind, lexeme, t.line, t.column + t.width() + 1))
            .unwrap_or_else(|| Token::new(kind, lexeme, 0, 0));
        Node::BinOp(BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn print(statement: Node, line: usize) -> Node {
        Node::Print(Print {
            token: Token::new(TokenKind::Print, "print", line, 1),
            statement: Box::new(statement),
        })
    }
}

impl Program {
    /// Decode a program from the parser's JSON.
    ///
    /// Nesting is not limited here; the stack grows on demand and the
    /// analyzer's `max-depth` decides how deep a program may go.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let program = Program::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;
        Ok(program)
    }
}
