//! Lexical scope tree
//!
//! Scopes live in an arena owned by [`ScopeTree`] and refer to each other by
//! [`ScopeId`]. Every scope but the root has exactly one parent; children are
//! kept in creation order. Name lookup walks from a scope up to the root and
//! stops at the first hit, so inner bindings shadow outer ones.

use super::types::Type;
use rustc_hash::FxHashMap;
use std::fmt;

/// Name of the root scope holding the builtins
pub const ROOT_SCOPE: &str = ".";

/// Builtin functions bound as constants in the root scope
pub const BUILTINS: &[&str] = &["print", "printf", "println", "printlnf"];

/// Index of a scope inside its [`ScopeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableState {
    /// `let x;` with no value yet
    UninitializedLet,
    InitializedLet,
    Const,
}

impl VariableState {
    pub fn name(self) -> &'static str {
        match self {
            VariableState::UninitializedLet => "UninitializedLet",
            VariableState::InitializedLet => "InitializedLet",
            VariableState::Const => "Const",
        }
    }
}

/// A binding recorded in a scope
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub state: VariableState,
    /// `None` until the variable has been given a value of known type
    pub ty: Option<Type>,
}

impl Variable {
    pub fn new(name: impl Into<String>, state: VariableState, ty: Option<Type>) -> Self {
        Variable {
            name: name.into(),
            state,
            ty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub name: String,
    pub parent: Option<ScopeId>,
    pub variables: FxHashMap<String, Variable>,
    pub children: Vec<ScopeId>,
}

impl Scope {
    fn new(name: impl Into<String>, parent: Option<ScopeId>) -> Self {
        Scope {
            name: name.into(),
            parent,
            variables: FxHashMap::default(),
            children: Vec::new(),
        }
    }

    /// Variables sorted by name, for stable output
    pub fn sorted_variables(&self) -> Vec<&Variable> {
        let mut vars: Vec<&Variable> = self.variables.values().collect();
        vars.sort_by(|a, b| a.name.cmp(&b.name));
        vars
    }
}

/// Arena of scopes rooted at [`ROOT_SCOPE`]
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// A tree containing only the root scope, with the builtins bound as
    /// `Const` functions.
    pub fn new() -> Self {
        let mut root = Scope::new(ROOT_SCOPE, None);
        for &builtin in BUILTINS {
            root.variables.insert(
                builtin.to_string(),
                Variable::new(builtin, VariableState::Const, Some(Type::Fn)),
            );
        }
        ScopeTree { scopes: vec![root] }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Create a new child of `parent`, appended after any existing children
    pub fn add_child(&mut self, parent: ScopeId, name: impl Into<String>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(name, Some(parent)));
        self.scopes[parent.0].children.push(id);
        id
    }

    /// Bind `variable` in `scope`, replacing any binding of the same name
    /// there
    pub fn declare(&mut self, scope: ScopeId, variable: Variable) {
        self.scopes[scope.0]
            .variables
            .insert(variable.name.clone(), variable);
    }

    /// Find the scope that binds `name`, searching from `scope` outward
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if s.variables.contains_key(name) {
                return Some(id);
            }
            current = s.parent;
        }
        None
    }

    /// Look up `name` from `scope` outward
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Variable> {
        self.resolve(scope, name)
            .and_then(|id| self.get(id).variables.get(name))
    }

    pub fn lookup_mut(&mut self, scope: ScopeId, name: &str) -> Option<&mut Variable> {
        let id = self.resolve(scope, name)?;
        self.scopes[id.0].variables.get_mut(name)
    }

    /// Names from the root down to `scope`, joined by `:`
    pub fn full_name(&self, scope: ScopeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            names.push(s.name.as_str());
            current = s.parent;
        }
        names.reverse();
        names.join(":")
    }

    /// Children of `scope` in creation order
    pub fn children(&self, scope: ScopeId) -> &[ScopeId] {
        &self.get(scope).children
    }

    /// Find a direct child of `scope` by name (first match)
    pub fn child_named(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        self.children(scope)
            .iter()
            .copied()
            .find(|&id| self.get(id).name == name)
    }

    fn fmt_scope(&self, f: &mut fmt::Formatter<'_>, id: ScopeId, depth: usize) -> fmt::Result {
        let scope = self.get(id);
        let indent = "  ".repeat(depth);
        writeln!(f, "{}{}", indent, scope.name)?;
        for var in scope.sorted_variables() {
            let ty = var.ty.map(Type::name).unwrap_or("?");
            writeln!(f, "{}  - {}: {} ({})", indent, var.name, ty, var.state.name())?;
        }
        for &child in &scope.children {
            self.fmt_scope(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScopeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_scope(f, self.root(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_has_builtins() {
        let tree = ScopeTree::new();
        let root = tree.root();
        for builtin in BUILTINS {
            let var = tree.lookup(root, builtin).unwrap();
            assert_eq!(var.state, VariableState::Const);
            assert_eq!(var.ty, Some(Type::Fn));
        }
        assert_eq!(tree.full_name(root), ".");
    }

    #[test]
    fn test_lookup_walks_outward_and_shadows() {
        let mut tree = ScopeTree::new();
        let program = tree.add_child(tree.root(), "program");
        let inner = tree.add_child(program, "while");

        tree.declare(program, Variable::new("x", VariableState::InitializedLet, Some(Type::Int)));
        assert_eq!(tree.lookup(inner, "x").unwrap().ty, Some(Type::Int));

        tree.declare(inner, Variable::new("x", VariableState::Const, Some(Type::Str)));
        assert_eq!(tree.lookup(inner, "x").unwrap().ty, Some(Type::Str));
        assert_eq!(tree.lookup(program, "x").unwrap().ty, Some(Type::Int));

        assert!(tree.lookup(program, "missing").is_none());
    }

    #[test]
    fn test_full_name_and_children_order() {
        let mut tree = ScopeTree::new();
        let program = tree.add_child(tree.root(), "program");
        let a = tree.add_child(program, "if");
        let b = tree.add_child(program, "else");
        let c = tree.add_child(b, "fn_f");

        assert_eq!(tree.children(program), &[a, b]);
        assert_eq!(tree.full_name(c), ".:program:else:fn_f");
        assert_eq!(tree.child_named(program, "else"), Some(b));
        assert_eq!(tree.get(c).parent, Some(b));
    }

    #[test]
    fn test_redeclaration_replaces() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.declare(root, Variable::new("x", VariableState::Const, Some(Type::Int)));
        tree.declare(root, Variable::new("x", VariableState::UninitializedLet, None));
        let var = tree.lookup(root, "x").unwrap();
        assert_eq!(var.state, VariableState::UninitializedLet);
        assert_eq!(var.ty, None);
    }

    #[test]
    fn test_display_lists_tree() {
        let mut tree = ScopeTree::new();
        let program = tree.add_child(tree.root(), "program");
        tree.declare(program, Variable::new("x", VariableState::UninitializedLet, None));
        let rendered = tree.to_string();
        assert!(rendered.starts_with(".\n"));
        assert!(rendered.contains("  - print: Fn (Const)\n"));
        assert!(rendered.contains("  program\n    - x: ? (UninitializedLet)\n"));
    }
}
