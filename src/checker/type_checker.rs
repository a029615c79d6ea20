//! Single-pass type checker
//!
//! [`TypeChecker::initial_pass`] walks a [`Program`] once, building the
//! [`ScopeTree`] as it goes. Every block that introduces names gets its own
//! scope; the scope currently being filled is the top of an explicit stack.
//!
//! What is checked:
//! - assignments target a declared, non-constant variable and keep its type
//! - variable references resolve to a binding with a known type
//! - both operands of a binary operator have the same type
//! - a called name is bound to a function
//!
//! Conditions of `if`, `while` and `else if` are not checked, and neither are
//! `return` values.

use super::scope::{self, ScopeId, ScopeTree, VariableState};
use super::types::Type;
use crate::errors::{CompileResult, CompilerError, ErrorKind};
use crate::observer::Observer;
use crate::parser::ast::*;
use crate::parser::operators;
use tracing::{debug, trace};

pub struct TypeChecker<'o> {
    scopes: ScopeTree,
    stack: Vec<ScopeId>,
    observer: Option<&'o mut dyn Observer>,
}

impl<'o> TypeChecker<'o> {
    pub fn new() -> Self {
        let scopes = ScopeTree::new();
        let root = scopes.root();
        TypeChecker {
            scopes,
            stack: vec![root],
            observer: None,
        }
    }

    /// Create a checker that reports every scope it opens to `observer`
    pub fn with_observer(observer: &'o mut dyn Observer) -> Self {
        TypeChecker {
            observer: Some(observer),
            ..Self::new()
        }
    }

    /// Check `program` inside a fresh `program` scope under the root
    pub fn initial_pass(&mut self, program: &Program) -> CompileResult<()> {
        self.enter_scope("program");
        self.check_program(program)?;
        self.exit_scope();

        debug!(scopes = self.scopes.len(), "type check complete");
        Ok(())
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn into_scopes(self) -> ScopeTree {
        self.scopes
    }

    /// The scope new bindings currently go into
    pub fn current_scope(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or_else(|| self.scopes.root())
    }

    fn enter_scope(&mut self, name: impl Into<String>) -> ScopeId {
        let parent = self.current_scope();
        let id = self.scopes.add_child(parent, name);
        self.stack.push(id);

        trace!(scope = %self.scopes.full_name(id), "entered scope");
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.scope_entered(&self.scopes, id);
        }
        id
    }

    fn exit_scope(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn declare(&mut self, name: &str, state: VariableState, ty: Option<Type>) {
        let id = self.current_scope();
        self.scopes
            .declare(id, scope::Variable::new(name, state, ty));
    }

    /// Check `body` in a new scope called `name`
    fn check_scoped(&mut self, name: impl Into<String>, body: &Program) -> CompileResult<()> {
        self.enter_scope(name);
        self.check_program(body)?;
        self.exit_scope();
        Ok(())
    }

    fn check_program(&mut self, program: &Program) -> CompileResult<()> {
        for statement in &program.statements {
            self.check_statement(statement)?;
        }
        Ok(())
    }

    fn check_statement(&mut self, statement: &Statement) -> CompileResult<()> {
        match statement {
            Statement::LetVariable { variable, .. } => {
                self.declare(&variable.name, VariableState::UninitializedLet, None);
            }

            Statement::LetValue {
                variable, value, ..
            } => {
                let ty = self.get_type(value)?;
                self.declare(&variable.name, VariableState::InitializedLet, Some(ty));
            }

            Statement::Const {
                variable, value, ..
            } => {
                let ty = self.get_type(value)?;
                self.declare(&variable.name, VariableState::Const, Some(ty));
            }

            Statement::Assignment {
                variable,
                value,
                position,
                ..
            } => self.check_assignment(variable, value, *position)?,

            Statement::Declaration(decl) => self.check_declaration(decl)?,

            Statement::ControlFlow(flow) => self.check_control_flow(flow)?,

            Statement::Expression(expr) => {
                self.get_type(expr)?;
            }

            Statement::Return { .. }
            | Statement::Break { .. }
            | Statement::Continue { .. }
            | Statement::Import { .. } => {}
        }
        Ok(())
    }

    fn check_assignment(
        &mut self,
        variable: &Variable,
        value: &Expression,
        position: Position,
    ) -> CompileResult<()> {
        let name = &variable.name;
        let scope = self.current_scope();

        let (state, current_ty) = match self.scopes.lookup(scope, name) {
            Some(var) => (var.state, var.ty),
            None => {
                return Err(CompilerError::new(
                    ErrorKind::AssignmentToUninitializedVariable(name.clone()),
                    position,
                ))
            }
        };

        if state == VariableState::Const {
            return Err(CompilerError::new(
                ErrorKind::AssignmentToConstantVariable(name.clone()),
                position,
            ));
        }

        let value_ty = self.get_type(value)?;
        match current_ty {
            Some(ty) if ty != value_ty => Err(CompilerError::new(
                ErrorKind::MismatchedTypes {
                    left: ty,
                    right: value_ty,
                },
                position,
            )),
            Some(_) => Ok(()),
            None => {
                if let Some(var) = self.scopes.lookup_mut(scope, name) {
                    var.ty = Some(value_ty);
                    if var.state == VariableState::UninitializedLet {
                        var.state = VariableState::InitializedLet;
                    }
                }
                Ok(())
            }
        }
    }

    fn check_declaration(&mut self, decl: &Declaration) -> CompileResult<()> {
        match decl {
            Declaration::NamedFuncDecl(func) => {
                self.declare(&func.name.name, VariableState::Const, Some(Type::Fn));
                self.check_function(format!("fn_{}", func.name.name), &func.params, &func.body)
            }

            Declaration::AnonFuncDecl(func) => {
                self.check_function("fn_anonymous", &func.params, &func.body)
            }

            Declaration::AnonFuncCall(call) => {
                self.check_function("fn_anonymous", &call.decl.params, &call.decl.body)
            }

            Declaration::NamedFuncCall(call) => {
                let name = &call.name.name;
                match self.scopes.lookup(self.current_scope(), name) {
                    None => Err(CompilerError::new(
                        ErrorKind::FunctionIsNotDefined(name.clone()),
                        call.position,
                    )),
                    Some(var) if var.ty != Some(Type::Fn) => Err(CompilerError::new(
                        ErrorKind::VariableIsNotCallable(name.clone()),
                        call.position,
                    )),
                    Some(_) => Ok(()),
                }
            }
        }
    }

    /// Parameters are constants whose type is unknown until call time
    fn check_function(
        &mut self,
        scope_name: impl Into<String>,
        params: &[Parameter],
        body: &Program,
    ) -> CompileResult<()> {
        self.enter_scope(scope_name);
        for param in params {
            self.declare(&param.variable().name, VariableState::Const, None);
        }
        self.check_program(body)?;
        self.exit_scope();
        Ok(())
    }

    fn check_control_flow(&mut self, flow: &ControlFlow) -> CompileResult<()> {
        match flow {
            ControlFlow::If(node) => {
                self.check_scoped("if", &node.body)?;
                for elseif in &node.elseifs {
                    self.check_scoped("elseif", &elseif.body)?;
                }
                if let Some(else_branch) = &node.else_branch {
                    self.check_scoped("else", &else_branch.body)?;
                }
                Ok(())
            }

            ControlFlow::Loop { body, .. } => self.check_scoped("loop", body),

            ControlFlow::While { body, .. } => self.check_scoped("while", body),

            ControlFlow::For {
                variable,
                iterable,
                body,
                ..
            } => {
                self.enter_scope("for");
                let ty = self.get_type(iterable)?;
                self.declare(&variable.name, VariableState::Const, Some(ty));
                self.check_program(body)?;
                self.exit_scope();
                Ok(())
            }
        }
    }

    /// Infer the type of an expression in the current scope
    pub fn get_type(&self, expr: &Expression) -> CompileResult<Type> {
        match expr {
            Expression::Value(value) => self.value_type(value),

            Expression::PrefixOp { operand, .. } | Expression::PostfixOp { operand, .. } => {
                self.get_type(operand)
            }

            Expression::BinaryOp {
                op,
                left,
                right,
                position,
            } => {
                let left_ty = self.get_type(left)?;
                let right_ty = self.get_type(right)?;

                if left_ty != right_ty {
                    return Err(CompilerError::new(
                        ErrorKind::MismatchedTypes {
                            left: left_ty,
                            right: right_ty,
                        },
                        *position,
                    ));
                }

                if operators::is_comparison(op) {
                    Ok(Type::Bool)
                } else {
                    Ok(left_ty)
                }
            }

            Expression::Declaration(Declaration::AnonFuncDecl(_)) => Ok(Type::Fn),

            // Calls have no return type to infer from. Well-formed programs
            // that bind a call result end up here and get an internal error.
            Expression::Declaration(decl) => Err(unexpected_node(decl.position())),
        }
    }

    fn value_type(&self, value: &Value) -> CompileResult<Type> {
        match value {
            Value::Boolean { .. } => Ok(Type::Bool),
            Value::Null { .. } => Ok(Type::Null),
            Value::Number { value, .. } => Ok(Type::of_number(*value)),
            Value::String { .. } => Ok(Type::Str),
            Value::Variable(variable) => self
                .scopes
                .lookup(self.current_scope(), &variable.name)
                .and_then(|var| var.ty)
                .ok_or_else(|| {
                    CompilerError::new(
                        ErrorKind::ReferenceToUninitializedVariable(variable.name.clone()),
                        variable.position,
                    )
                }),
            // Element types are not tracked, so arrays are untyped as well
            Value::Array { position, .. } => Err(unexpected_node(*position)),
        }
    }
}

impl Default for TypeChecker<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn unexpected_node(position: Position) -> CompilerError {
    CompilerError::new(
        ErrorKind::InternalTypeChecker("getType called on unexpected syntax node".to_string()),
        position,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse_source;

    fn check(source: &str) -> CompileResult<ScopeTree> {
        let program = parse_source(source).unwrap();
        let mut checker = TypeChecker::new();
        checker.initial_pass(&program)?;
        Ok(checker.into_scopes())
    }

    fn program_scope(tree: &ScopeTree) -> ScopeId {
        tree.child_named(tree.root(), "program").unwrap()
    }

    #[test]
    fn test_bindings_get_types() {
        let tree = check("let a = 1; let b = 1.5; const c = 'x'; let d; let e = true; let f = null;")
            .unwrap();
        let program = program_scope(&tree);
        let ty = |name: &str| tree.lookup(program, name).unwrap().ty;

        assert_eq!(ty("a"), Some(Type::Int));
        assert_eq!(ty("b"), Some(Type::Float));
        assert_eq!(ty("c"), Some(Type::Str));
        assert_eq!(ty("d"), None);
        assert_eq!(ty("e"), Some(Type::Bool));
        assert_eq!(ty("f"), Some(Type::Null));
        assert_eq!(
            tree.lookup(program, "c").unwrap().state,
            VariableState::Const
        );
    }

    #[test]
    fn test_assignment_to_constant() {
        let err = check("const x = 1; x = 2;").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::AssignmentToConstantVariable("x".to_string())
        );
        assert_eq!(err.position, Position::new(1, 13));
    }

    #[test]
    fn test_assignment_to_undeclared() {
        let err = check("x = 2;").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::AssignmentToUninitializedVariable("x".to_string())
        );
    }

    #[test]
    fn test_reference_to_uninitialized() {
        let err = check("let y; y + 1;").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::ReferenceToUninitializedVariable("y".to_string())
        );
        assert_eq!(err.position, Position::new(1, 7));

        let err = check("let z = w;").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::ReferenceToUninitializedVariable("w".to_string())
        );
    }

    #[test]
    fn test_assignment_infers_then_enforces() {
        let tree = check("let y; y = 1;").unwrap();
        let var = tree.lookup(program_scope(&tree), "y").unwrap();
        assert_eq!(var.ty, Some(Type::Int));
        assert_eq!(var.state, VariableState::InitializedLet);

        let err = check("let y; y = 1; y = \"a\";").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::MismatchedTypes {
                left: Type::Int,
                right: Type::Str,
            }
        );
        assert_eq!(err.position, Position::new(1, 14));
    }

    #[test]
    fn test_binary_operands_must_match() {
        let err = check("let a = 1 + 'b';").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::MismatchedTypes {
                left: Type::Int,
                right: Type::Str,
            }
        );
        assert_eq!(err.position, Position::new(1, 8));

        let err = check("let a = 1 + 0.5;").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MismatchedTypes { .. }));
    }

    #[test]
    fn test_comparison_yields_bool() {
        let tree = check("let a = 1 < 2; let b = -3; let c = 'x' + 'y';").unwrap();
        let program = program_scope(&tree);
        assert_eq!(tree.lookup(program, "a").unwrap().ty, Some(Type::Bool));
        assert_eq!(tree.lookup(program, "b").unwrap().ty, Some(Type::Int));
        assert_eq!(tree.lookup(program, "c").unwrap().ty, Some(Type::Str));
    }

    #[test]
    fn test_for_binds_loop_variable_in_own_scope() {
        let tree = check("let xs = 1; for x -> xs { let y = x; }").unwrap();
        let program = program_scope(&tree);
        let for_scope = tree.child_named(program, "for").unwrap();

        let x = tree.lookup(for_scope, "x").unwrap();
        assert_eq!(x.state, VariableState::Const);
        assert_eq!(x.ty, Some(Type::Int));
        assert_eq!(tree.lookup(for_scope, "y").unwrap().ty, Some(Type::Int));
        assert!(tree.lookup(program, "x").is_none());
    }

    #[test]
    fn test_function_scopes() {
        let tree = check("fn add(a, b = 1) { } add(1, 2);").unwrap();
        let program = program_scope(&tree);

        let add = tree.lookup(program, "add").unwrap();
        assert_eq!(add.ty, Some(Type::Fn));
        assert_eq!(add.state, VariableState::Const);

        let body = tree.child_named(program, "fn_add").unwrap();
        assert_eq!(tree.full_name(body), ".:program:fn_add");
        let a = tree.lookup(body, "a").unwrap();
        assert_eq!((a.state, a.ty), (VariableState::Const, None));
        assert!(tree.get(body).variables.contains_key("b"));
    }

    #[test]
    fn test_calls() {
        assert!(check("print('hi');").is_ok());

        let err = check("missing();").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::FunctionIsNotDefined("missing".to_string())
        );

        let err = check("let n = 1; n();").unwrap_err();
        assert_eq!(err.kind, ErrorKind::VariableIsNotCallable("n".to_string()));
        assert_eq!(err.position, Position::new(1, 11));

        assert!(check("let f = fn () { }; f();").is_ok());
    }

    #[test]
    fn test_control_flow_scopes_are_siblings() {
        let src = "if true { let a = 1; } else if false { } else { } while true { } loop { } fn () { }();";
        let tree = check(src).unwrap();
        let program = program_scope(&tree);
        let names: Vec<&str> = tree
            .children(program)
            .iter()
            .map(|&id| tree.get(id).name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["if", "elseif", "else", "while", "loop", "fn_anonymous"]
        );
        assert!(tree.lookup(program, "a").is_none());
    }

    #[test]
    fn test_inner_scope_sees_outer_bindings() {
        assert!(check("let x = 1; while true { x = 2; }").is_ok());

        let err = check("let x = 1; while true { x = 'no'; }").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MismatchedTypes { .. }));
    }

    #[test]
    fn test_redeclaration_replaces_binding() {
        let tree = check("let x = 1; let x = 'a'; x = 'b';").unwrap();
        let x = tree.lookup(program_scope(&tree), "x").unwrap();
        assert_eq!(x.ty, Some(Type::Str));
    }

    #[test]
    fn test_unexpected_nodes_are_internal() {
        let err = check("let a = [1, 2];").unwrap_err();
        assert!(err.is_internal());
        assert_eq!(err.position, Position::new(1, 8));

        let cases = [
            ("fn f() { } let r = f();", Position::new(1, 19)),
            ("let v = fn (a) { return a; }(3);", Position::new(1, 8)),
            ("for i -> [1, 2] { }", Position::new(1, 9)),
        ];
        for (source, position) in cases {
            let err = check(source).unwrap_err();
            assert_eq!(
                err.kind,
                ErrorKind::InternalTypeChecker(
                    "getType called on unexpected syntax node".to_string()
                ),
                "{}",
                source
            );
            assert_eq!(err.position, position, "{}", source);
        }
    }

    #[test]
    fn test_builtins_shadowable() {
        let tree = check("let print = 1;").unwrap();
        let program = program_scope(&tree);
        assert_eq!(tree.lookup(program, "print").unwrap().ty, Some(Type::Int));
        assert_eq!(
            tree.lookup(tree.root(), "print").unwrap().ty,
            Some(Type::Fn)
        );
    }
}
