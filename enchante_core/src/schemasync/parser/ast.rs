//! Definition-file Abstract Syntax Tree.
//!
//! Statements the synchronizer does not interpret are carried verbatim as
//! opaque payloads so they survive a parse/render round trip untouched.

/// A parsed definition file.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub statements: Vec<Stmt>,
}

impl Module {
    /// Look up the top-level declaration block with the given name.
    pub fn find_class(&self, name: &str) -> Option<&ClassDef> {
        self.statements.iter().find_map(|stmt| match stmt {
            Stmt::Class(class) if class.name == name => Some(class),
            _ => None,
        })
    }

    pub fn find_class_mut(&mut self, name: &str) -> Option<&mut ClassDef> {
        self.statements.iter_mut().find_map(|stmt| match stmt {
            Stmt::Class(class) if class.name == name => Some(class),
            _ => None,
        })
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A class-like declaration block.
    Class(ClassDef),
    /// Anything else (imports, assignments, comments), kept verbatim.
    Opaque(String),
}

/// A named declaration block and its ordered member statements.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    /// The header text up to and including the colon, verbatim.
    pub header: String,
    /// Leading whitespace of the block's member statements.
    pub body_indent: String,
    pub body: Vec<ClassStmt>,
}

/// A member statement inside a declaration block.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassStmt {
    /// An annotated field declaration.
    Field(FieldStmt),
    /// Any other member (method, nested class, docstring), kept verbatim.
    Opaque(String),
}

impl ClassStmt {
    pub fn as_field(&self) -> Option<&FieldStmt> {
        match self {
            ClassStmt::Field(field) => Some(field),
            ClassStmt::Opaque(_) => None,
        }
    }
}

/// An annotated field declaration: `target: annotation` with an optional
/// `= value` default whose expression text is carried uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStmt {
    pub target: Target,
    pub annotation: TypeExpr,
    pub value: Option<String>,
}

impl FieldStmt {
    /// Re-emit the statement as a single source line, without indentation.
    pub fn render(&self) -> String {
        match &self.value {
            Some(value) => format!(
                "{}: {} = {}",
                self.target.raw(),
                self.annotation.render(),
                value
            ),
            None => format!("{}: {}", self.target.raw(), self.annotation.render()),
        }
    }
}

/// The left-hand side of a field declaration. All three shapes normalize to
/// the same root identifier for matching purposes.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A bare identifier: `uid`.
    Name(String),
    /// An attribute access rooted at an identifier: `self.uid`.
    Attribute { root: String, raw: String },
    /// An indexed access rooted at an identifier: `extras["uid"]`.
    Index { root: String, raw: String },
}

impl Target {
    /// The logical key a field is matched by.
    pub fn root_id(&self) -> &str {
        match self {
            Target::Name(name) => name,
            Target::Attribute { root, .. } => root,
            Target::Index { root, .. } => root,
        }
    }

    /// The target exactly as written in source.
    pub fn raw(&self) -> &str {
        match self {
            Target::Name(name) => name,
            Target::Attribute { raw, .. } => raw,
            Target::Index { raw, .. } => raw,
        }
    }
}

/// A type annotation expression. Parametrized annotations apply one wrapper
/// to exactly one inner expression; anything else (unions, literals, forward
/// references) is a simple reference carried as raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Simple(String),
    Parametrized {
        wrapper: String,
        inner: Box<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn is_parametrized(&self) -> bool {
        matches!(self, TypeExpr::Parametrized { .. })
    }

    /// The immediate inner expression of a parametrized annotation, if any.
    pub fn inner(&self) -> Option<&TypeExpr> {
        match self {
            TypeExpr::Simple(_) => None,
            TypeExpr::Parametrized { inner, .. } => Some(inner),
        }
    }

    pub fn render(&self) -> String {
        match self {
            TypeExpr::Simple(text) => text.clone(),
            TypeExpr::Parametrized { wrapper, inner } => {
                format!("{}[{}]", wrapper, inner.render())
            }
        }
    }
}
