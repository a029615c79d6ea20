// AST (Abstract Syntax Tree) definitions for Lup programs

/// Source location information for error reporting.
///
/// Lines start at 1, columns at 0. Every token and every AST node carries its
/// own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 0)
    }
}

/// A reference to a variable by name
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub position: Position,
}

impl Variable {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Variable {
            name: name.into(),
            position,
        }
    }
}

/// Literal values and variable references
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String {
        value: String,
        position: Position,
    },
    /// Double-precision number. Integral vs fractional is decided by the
    /// value itself, not by the literal's spelling.
    Number {
        value: f64,
        position: Position,
    },
    Boolean {
        value: bool,
        position: Position,
    },
    Null {
        position: Position,
    },
    Variable(Variable),
    Array {
        values: Vec<Expression>,
        position: Position,
    },
}

impl Value {
    pub fn position(&self) -> Position {
        match self {
            Value::String { position, .. }
            | Value::Number { position, .. }
            | Value::Boolean { position, .. }
            | Value::Null { position }
            | Value::Array { position, .. } => *position,
            Value::Variable(variable) => variable.position,
        }
    }
}

/// Expressions: values, operator applications and function values/calls
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Value(Value),
    PrefixOp {
        op: String,
        operand: Box<Expression>,
        position: Position,
    },
    PostfixOp {
        op: String,
        operand: Box<Expression>,
        position: Position,
    },
    BinaryOp {
        op: String,
        left: Box<Expression>,
        right: Box<Expression>,
        position: Position,
    },
    /// Function declarations and calls used in value position
    Declaration(Declaration),
}

impl Expression {
    pub fn position(&self) -> Position {
        match self {
            Expression::Value(value) => value.position(),
            Expression::PrefixOp { position, .. }
            | Expression::PostfixOp { position, .. }
            | Expression::BinaryOp { position, .. } => *position,
            Expression::Declaration(decl) => decl.position(),
        }
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Expression::Value(value)
    }
}

/// Function parameter, optionally with a default value
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Plain(Variable),
    Defaulted {
        variable: Variable,
        default: Expression,
    },
}

impl Parameter {
    pub fn variable(&self) -> &Variable {
        match self {
            Parameter::Plain(variable) => variable,
            Parameter::Defaulted { variable, .. } => variable,
        }
    }

    pub fn position(&self) -> Position {
        self.variable().position
    }
}

/// `fn (params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct AnonFuncDecl {
    pub params: Vec<Parameter>,
    pub body: Program,
    pub position: Position,
}

/// `fn (params) { body } (args)`
#[derive(Debug, Clone, PartialEq)]
pub struct AnonFuncCall {
    pub decl: AnonFuncDecl,
    pub args: Vec<Expression>,
    pub position: Position,
}

/// `fn name(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct NamedFuncDecl {
    pub name: Variable,
    pub params: Vec<Parameter>,
    pub body: Program,
    pub position: Position,
}

/// `name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct NamedFuncCall {
    pub name: Variable,
    pub args: Vec<Expression>,
    pub position: Position,
}

/// Function declarations and calls
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    AnonFuncDecl(AnonFuncDecl),
    AnonFuncCall(AnonFuncCall),
    NamedFuncDecl(NamedFuncDecl),
    NamedFuncCall(NamedFuncCall),
}

impl Declaration {
    pub fn position(&self) -> Position {
        match self {
            Declaration::AnonFuncDecl(decl) => decl.position,
            Declaration::AnonFuncCall(call) => call.position,
            Declaration::NamedFuncDecl(decl) => decl.position,
            Declaration::NamedFuncCall(call) => call.position,
        }
    }
}

/// `else if condition { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub condition: Expression,
    pub body: Program,
    pub position: Position,
}

/// `else { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct Else {
    pub body: Program,
    pub position: Position,
}

/// `if` with its chain of alternatives. `else_branch`, when present, is
/// always the last alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expression,
    pub body: Program,
    pub elseifs: Vec<ElseIf>,
    pub else_branch: Option<Else>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    If(If),
    /// Unconditional loop
    Loop {
        body: Program,
        position: Position,
    },
    While {
        condition: Expression,
        body: Program,
        position: Position,
    },
    /// `for variable -> iterable { body }`; `variable` is scoped to `body`
    For {
        variable: Variable,
        iterable: Expression,
        body: Program,
        position: Position,
    },
}

impl ControlFlow {
    pub fn position(&self) -> Position {
        match self {
            ControlFlow::If(node) => node.position,
            ControlFlow::Loop { position, .. }
            | ControlFlow::While { position, .. }
            | ControlFlow::For { position, .. } => *position,
        }
    }
}

/// Statements making up a [`Program`]
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Return {
        value: Expression,
        position: Position,
    },
    Break {
        position: Position,
    },
    Continue {
        position: Position,
    },
    Import {
        target: Variable,
        position: Position,
    },
    Assignment {
        op: String,
        variable: Variable,
        value: Expression,
        position: Position,
    },
    Const {
        variable: Variable,
        value: Expression,
        position: Position,
    },
    LetValue {
        variable: Variable,
        value: Expression,
        position: Position,
    },
    /// Declared but not yet initialized
    LetVariable {
        variable: Variable,
        position: Position,
    },
    Declaration(Declaration),
    ControlFlow(ControlFlow),
    Expression(Expression),
}

impl Statement {
    /// Get the source position of this statement
    pub fn position(&self) -> Position {
        match self {
            Statement::Return { position, .. }
            | Statement::Break { position }
            | Statement::Continue { position }
            | Statement::Import { position, .. }
            | Statement::Assignment { position, .. }
            | Statement::Const { position, .. }
            | Statement::LetValue { position, .. }
            | Statement::LetVariable { position, .. } => *position,
            Statement::Declaration(decl) => decl.position(),
            Statement::ControlFlow(flow) => flow.position(),
            Statement::Expression(expr) => expr.position(),
        }
    }
}

/// An ordered sequence of statements: the whole file, or the body of a block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub position: Position,
}

impl Program {
    pub fn new(position: Position) -> Self {
        Program {
            statements: Vec::new(),
            position,
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
