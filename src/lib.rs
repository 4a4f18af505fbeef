//! # varenv - Variable Environments for a JavaScript-like Interpreter
//!
//! This crate models how a tree-walking interpreter of a JavaScript-like
//! language resolves identifiers and where `var`, `let` and `const`
//! declarations create bindings. The model lives in [`scope`]; the rest of
//! the crate is a small script language that exercises it end to end.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [strip_comments] → Source without comments
//!     ↓
//! [Lexer] → Token Stream
//!     ↓
//! [Parser] → AST (ast::Program)
//!     ↓
//! [Interpreter] → Output, global scope  ←→  [Scopes] (declaration & lookup)
//! ```
//!
//! ## Scoping Rules
//!
//! - `var` hoists to the nearest function scope (or the global scope) and may
//!   be redeclared freely; the last declaration wins.
//! - `let` and `const` bind in the scope they appear in and cannot be
//!   declared twice in that scope. Inner scopes may shadow them.
//! - Lookup walks from the current scope outwards until a binding is found.
//!
//! ```text
//! var a = 1;        // global
//! function f() {
//!     {
//!         var b = 2; // hoisted into f's scope
//!         let c = 3; // only visible inside this block
//!     }
//!     return b;      // 2
//! }
//! ```
//!
//! ## Scope Lifetime
//!
//! Scopes live in an arena and refer to their parent through generation
//! checked handles. The evaluator releases a scope when the construct that
//! created it finishes; a scope captured by a function value stays alive for
//! as long as that function value does.
//!
//! ## Module Structure
//!
//! - [`scope`] - Scope arena, declaration rules and identifier resolution
//! - [`lexer`] - Tokenization using lachs
//! - [`ast`] - Abstract Syntax Tree definitions
//! - [`parser`] - Parsing using combinator-based grammar
//! - [`interpreter`] - Runtime evaluation and execution
//!
//! ## Getting Started
//!
//! 1. Strip comments with [`lexer::strip_comments()`] and lex with `Token::lex`
//! 2. Parse with [`parser::parse()`]
//! 3. Run with [`interpreter::Interpreter::run()`], or do all three with
//!    [`interpreter::execute()`]

pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod scope;
