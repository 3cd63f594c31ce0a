//! AST builders shared by the analyzer scenario tests
#![allow(dead_code)]

use ast::*;
use semantic::{Analysis, Analyzer, SemanticError, Symbol};

pub fn program(packages: &[&str], declarations: Vec<Node>, statements: Vec<Node>) -> Program {
    Program {
        name: "test".to_string(),
        packages: packages
            .iter()
            .enumerate()
            .map(|(i, name)| PackageImport::new(*name, i + 1))
            .collect(),
        block: Block::new(declarations, statements),
    }
}

pub fn var_decl(name: &str, type_name: &str, line: usize) -> Node {
    Node::VarDecl(VarDecl::new(name, type_name, line))
}

pub fn func(
    name: &str,
    params: &[(&str, &str)],
    declarations: Vec<Node>,
    statements: Vec<Node>,
) -> Node {
    let params = params
        .iter()
        .enumerate()
        .map(|(i, (param, ty))| Param::new(param, ty, 1, 10 + i * 12))
        .collect();
    Node::FunctionDecl(FunctionDecl::new(name, params, Block::new(declarations, statements), 1))
}

pub fn call(name: &str, args: Vec<Node>, line: usize) -> Node {
    Node::FunctionCall(FunctionCall::new(None, name, args, line, 1))
}

pub fn qualified_call(package: &str, name: &str, args: Vec<Node>, line: usize) -> Node {
    Node::FunctionCall(FunctionCall::new(Some(package), name, args, line, package.len() + 2))
}

pub fn func_ref(package: Option<&str>, name: &str, line: usize) -> Node {
    Node::FunctionRef(FunctionRef {
        token: Token::id(name, line, 1),
        package: package.map(str::to_string),
        name: name.to_string(),
        symbol: None,
    })
}

pub fn while_loop(body: Vec<Node>, line: usize) -> Node {
    Node::While(While {
        token: Token::new(TokenKind::While, "while", line, 1),
        condition: Box::new(Node::Boolean(Boolean {
            token: Token::new(TokenKind::True, "true", line, 7),
            value: true,
        })),
        body,
    })
}

pub fn if_else(
    condition: Node,
    then_branch: Vec<Node>,
    else_branch: Vec<Node>,
    line: usize,
) -> Node {
    Node::If(If {
        token: Token::new(TokenKind::If, "if", line, 1),
        condition: Box::new(condition),
        then_branch,
        else_branch,
    })
}

pub fn ret(statement: Node, line: usize) -> Node {
    Node::Return(Return {
        token: Token::new(TokenKind::Return, "return", line, 1),
        statement: Box::new(statement),
    })
}

pub fn analyze(program: &mut Program) -> Result<Analysis, SemanticError> {
    semantic::logging::init_test();
    Analyzer::default().analyze(program)
}

/// Resolved symbol of the var reference `node`
pub fn resolved<'a>(analysis: &'a Analysis, node: &Node) -> &'a Symbol {
    let id = match node {
        Node::Var(var) => var.symbol,
        Node::FunctionCall(call) => call.symbol,
        Node::FunctionRef(func) => func.symbol,
        Node::FunctionDecl(decl) => decl.symbol,
        other => panic!("{} carries no symbol", other.kind_name()),
    };
    analysis
        .symbol(id.expect("node was not resolved"))
        .expect("dangling symbol id")
}

pub fn statements(program: &Program) -> &[Node] {
    &program.block.compound.children
}
