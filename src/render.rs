//! Debug rendering of syntax trees
//!
//! Two styles are available. [`RenderStyle::Compact`] looks roughly like the
//! source, with every operator application parenthesized so that the tree
//! shape is visible. [`RenderStyle::Verbose`] tags every node with its kind.
//! Neither output is meant to be parsed back.
//!
//! `Display` on AST nodes uses the compact style.

use crate::parser::ast::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    #[default]
    Compact,
    Verbose,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Renderer { style }
    }

    pub fn style(&self) -> RenderStyle {
        self.style
    }

    fn verbose(&self) -> bool {
        self.style == RenderStyle::Verbose
    }

    pub fn program(&self, program: &Program) -> String {
        let (open, close) = if self.verbose() {
            ("Program(", ")")
        } else {
            ("{", "}")
        };

        if program.is_empty() {
            return format!("{}{}", open, close);
        }

        let mut out = String::from(open);
        for statement in &program.statements {
            for line in self.statement(statement).lines() {
                out.push_str("\n  ");
                out.push_str(line);
            }
        }
        out.push('\n');
        out.push_str(close);
        out
    }

    pub fn statement(&self, statement: &Statement) -> String {
        let v = self.verbose();
        match statement {
            Statement::Return { value, .. } => {
                let value = self.expression(value);
                if v {
                    format!("Return({})", value)
                } else {
                    format!("return {}", value)
                }
            }
            Statement::Break { .. } => String::from(if v { "Break" } else { "break" }),
            Statement::Continue { .. } => String::from(if v { "Continue" } else { "continue" }),
            Statement::Import { target, .. } => {
                if v {
                    format!("Import({})", target.name)
                } else {
                    format!("import {}", target.name)
                }
            }
            Statement::Assignment {
                op,
                variable,
                value,
                ..
            } => {
                let value = self.expression(value);
                if v {
                    format!("Assign(op={}; var={}; val={})", op, variable.name, value)
                } else {
                    format!("({} {} {})", variable.name, op, value)
                }
            }
            Statement::Const {
                variable, value, ..
            } => {
                let value = self.expression(value);
                if v {
                    format!("Const(var={}, val={})", variable.name, value)
                } else {
                    format!("(const {} = {})", variable.name, value)
                }
            }
            Statement::LetValue {
                variable, value, ..
            } => {
                let value = self.expression(value);
                if v {
                    format!("Let(var={}, val={})", variable.name, value)
                } else {
                    format!("(let {} = {})", variable.name, value)
                }
            }
            Statement::LetVariable { variable, .. } => {
                if v {
                    format!("Let({})", variable.name)
                } else {
                    format!("(let {})", variable.name)
                }
            }
            Statement::Declaration(decl) => self.declaration(decl),
            Statement::ControlFlow(flow) => self.control_flow(flow),
            Statement::Expression(expr) => self.expression(expr),
        }
    }

    pub fn expression(&self, expr: &Expression) -> String {
        let v = self.verbose();
        match expr {
            Expression::Value(value) => self.value(value),
            Expression::PrefixOp { op, operand, .. } => {
                let operand = self.expression(operand);
                if v {
                    format!("Pre(op={}; val={})", op, operand)
                } else {
                    format!("({} {})", op, operand)
                }
            }
            Expression::PostfixOp { op, operand, .. } => {
                let operand = self.expression(operand);
                if v {
                    format!("Post(op={}; val={})", op, operand)
                } else {
                    format!("({} {})", operand, op)
                }
            }
            Expression::BinaryOp {
                op, left, right, ..
            } => {
                let left = self.expression(left);
                let right = self.expression(right);
                if v {
                    format!("Bin(op={}; left={}; right={})", op, left, right)
                } else {
                    format!("({} {} {})", left, op, right)
                }
            }
            Expression::Declaration(decl) => self.declaration(decl),
        }
    }

    pub fn value(&self, value: &Value) -> String {
        let v = self.verbose();
        match value {
            Value::String { value, .. } => {
                if v {
                    format!("Str({})", value)
                } else {
                    format!("\"{}\"", value)
                }
            }
            Value::Number { value, .. } => {
                if v {
                    format!("Num({})", value)
                } else {
                    value.to_string()
                }
            }
            Value::Boolean { value, .. } => {
                if v {
                    format!("Bool({})", value)
                } else {
                    value.to_string()
                }
            }
            Value::Null { .. } => String::from(if v { "Null" } else { "null" }),
            Value::Variable(variable) => {
                if v {
                    format!("Var({})", variable.name)
                } else {
                    variable.name.clone()
                }
            }
            Value::Array { values, .. } => {
                let items = self.list(values, |e| self.expression(e));
                if v {
                    format!("Arr({})", items)
                } else {
                    format!("[{}]", items)
                }
            }
        }
    }

    pub fn parameter(&self, param: &Parameter) -> String {
        match (param, self.verbose()) {
            (Parameter::Plain(var), true) => format!("Param({})", var.name),
            (Parameter::Plain(var), false) => var.name.clone(),
            (Parameter::Defaulted { variable, default }, true) => {
                format!("Param({} = {})", variable.name, self.expression(default))
            }
            (Parameter::Defaulted { variable, default }, false) => {
                format!("{} = {}", variable.name, self.expression(default))
            }
        }
    }

    pub fn declaration(&self, decl: &Declaration) -> String {
        match decl {
            Declaration::AnonFuncDecl(func) => self.anon_func(func),
            Declaration::AnonFuncCall(call) => {
                let decl = self.anon_func(&call.decl);
                let args = self.list(&call.args, |e| self.expression(e));
                if self.verbose() {
                    format!("AnonFuncCall(args={}; decl={})", args, decl)
                } else {
                    format!("{}({})", decl, args)
                }
            }
            Declaration::NamedFuncDecl(func) => {
                let params = self.list(&func.params, |p| self.parameter(p));
                let body = self.program(&func.body);
                if self.verbose() {
                    format!("Func({}, args={}){{ {} }}", func.name.name, params, body)
                } else {
                    format!("fn {}({}) {}", func.name.name, params, body)
                }
            }
            Declaration::NamedFuncCall(call) => {
                let args = self.list(&call.args, |e| self.expression(e));
                if self.verbose() {
                    format!("FuncCall(func={}, args={})", call.name.name, args)
                } else {
                    format!("{}({})", call.name.name, args)
                }
            }
        }
    }

    fn anon_func(&self, func: &AnonFuncDecl) -> String {
        let params = self.list(&func.params, |p| self.parameter(p));
        let body = self.program(&func.body);
        if self.verbose() {
            format!("AnonFunc({}){{ {} }}", params, body)
        } else {
            format!("fn ({}) {}", params, body)
        }
    }

    pub fn control_flow(&self, flow: &ControlFlow) -> String {
        let v = self.verbose();
        match flow {
            ControlFlow::If(node) => {
                let condition = self.expression(&node.condition);
                let body = self.program(&node.body);
                let mut out = if v {
                    format!("If({}){{ {} }}", condition, body)
                } else {
                    format!("if {} {}", condition, body)
                };
                for elseif in &node.elseifs {
                    out.push(' ');
                    out.push_str(&self.else_if(elseif));
                }
                if let Some(else_branch) = &node.else_branch {
                    out.push(' ');
                    out.push_str(&self.else_branch(else_branch));
                }
                out
            }
            ControlFlow::Loop { body, .. } => {
                let body = self.program(body);
                if v {
                    format!("Loop{{ {} }}", body)
                } else {
                    format!("loop {}", body)
                }
            }
            ControlFlow::While {
                condition, body, ..
            } => {
                let condition = self.expression(condition);
                let body = self.program(body);
                if v {
                    format!("While({}){{ {} }}", condition, body)
                } else {
                    format!("while {} {}", condition, body)
                }
            }
            ControlFlow::For {
                variable,
                iterable,
                body,
                ..
            } => {
                let iterable = self.expression(iterable);
                let body = self.program(body);
                if v {
                    format!("For({} in {}){{ {} }}", variable.name, iterable, body)
                } else {
                    format!("for {} -> {} {}", variable.name, iterable, body)
                }
            }
        }
    }

    fn else_if(&self, node: &ElseIf) -> String {
        let condition = self.expression(&node.condition);
        let body = self.program(&node.body);
        if self.verbose() {
            format!("ElseIf({}){{ {} }}", condition, body)
        } else {
            format!("else if {} {}", condition, body)
        }
    }

    fn else_branch(&self, node: &Else) -> String {
        let body = self.program(&node.body);
        if self.verbose() {
            format!("Else({})", body)
        } else {
            format!("else {}", body)
        }
    }

    fn list<T>(&self, items: &[T], render: impl Fn(&T) -> String) -> String {
        items.iter().map(render).collect::<Vec<_>>().join(", ")
    }
}

macro_rules! compact_display {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&Renderer::default().$method(self))
                }
            }
        )*
    };
}

compact_display! {
    Program => program,
    Statement => statement,
    Expression => expression,
    Value => value,
    Parameter => parameter,
    Declaration => declaration,
    ControlFlow => control_flow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse_source;

    fn compact(source: &str) -> String {
        parse_source(source).unwrap().to_string()
    }

    fn verbose(source: &str) -> String {
        Renderer::new(RenderStyle::Verbose).program(&parse_source(source).unwrap())
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(compact(""), "{}");
        assert_eq!(verbose(""), "Program()");
    }

    #[test]
    fn test_compact_statements() {
        assert_eq!(
            compact("let x = 1_000; const s = 'hi'; let y; y += x * 2.5;"),
            "{\n  (let x = 1000)\n  (const s = \"hi\")\n  (let y)\n  (y += (x * 2.5))\n}"
        );
    }

    #[test]
    fn test_compact_nested_blocks_indent() {
        assert_eq!(
            compact("while a { if b { break; } }"),
            "{\n  while a {\n    if b {\n      break\n    }\n  }\n}"
        );
    }

    #[test]
    fn test_verbose_expressions() {
        assert_eq!(
            verbose("x = -a + [1, true, null];"),
            "Program(\n  Assign(op==; var=x; val=Bin(op=+; left=Pre(op=-; val=Var(a)); right=Arr(Num(1), Bool(true), Null)))\n)"
        );
    }

    #[test]
    fn test_postfix_rendering() {
        let expr = Expression::PostfixOp {
            op: "?".to_string(),
            operand: Box::new(Expression::Value(Value::Variable(Variable::new(
                "x",
                Position::default(),
            )))),
            position: Position::default(),
        };
        assert_eq!(expr.to_string(), "(x ?)");
        assert_eq!(
            Renderer::new(RenderStyle::Verbose).expression(&expr),
            "Post(op=?; val=Var(x))"
        );
    }

    #[test]
    fn test_default_is_compact() {
        assert_eq!(Renderer::default().style(), RenderStyle::Compact);
    }
}
