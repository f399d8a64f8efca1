//! Definition-file parser for the synchronization engine.
//!
//! Parses the Python definition files enchante scaffolds (SQLAlchemy models
//! and Pydantic schemas) into a shallow statement tree: class declarations
//! with their annotated field members are structured, everything else is
//! carried verbatim so a parse/render round trip leaves it untouched.
//!
//! # Example
//!
//! ```
//! use enchante_core::schemasync::parser::parse_module;
//!
//! let module = parse_module("class User(Base):\n    uid: int\n").unwrap();
//! assert!(module.find_class("User").is_some());
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{ClassDef, ClassStmt, FieldStmt, Module, Stmt, Target, TypeExpr};
pub use lexer::LexError;
pub use parser::{ParseError, parse_module};
