//! # Breeze Query Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the Breeze query
//! language, a small pipeline language for filtering, sorting, grouping, and
//! transforming collections of JSON documents.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, field references,
//!   function calls, arithmetic)
//! - **[operators]** - Check and arithmetic operators
//! - **[stages]** - Pipeline stages (filter, sort, group, map)
//!
//! ## Quick Start
//!
//! ```text
//! filter status = "error" | sort latency desc | group count latency by host
//! ```
//!
//! This query keeps error documents, sorts them by latency, and counts them
//! per host.
//!
//! ## Core Concepts
//!
//! ### Pipeline Structure
//!
//! Every query is a sequence of stages separated by `|`:
//!
//! ```text
//! stage | stage | ...
//! ```
//!
//! ### The Four Stages
//!
//! - **filter** - Keep or discard documents based on checks
//! - **sort** - Order documents by one field
//! - **group** - Aggregate documents, optionally keyed by a field
//! - **map** - Assign computed values to fields
//!
//! ### Field References
//!
//! Inside expressions a field is referenced with a leading dot (`.price`);
//! a reference to an absent field yields the `Missing` sentinel rather than
//! an error. Check and assignment targets use the bare field name.
//!
//! ## Examples
//!
//! ### Filter with mixed checks
//!
//! ```text
//! filter status > 499 trace_id exists
//! ```
//!
//! ### Aggregation
//!
//! ```text
//! group stddev latency by endpoint
//! ```
//!
//! ### Derived fields
//!
//! ```text
//! map total = .price * .quantity squared = pow(.a, 2)
//! ```
pub mod expressions;
pub mod operators;
pub mod stages;
pub mod tokens;

pub use expressions::{Expr, ScalarKind};
pub use operators::{ArithOp, CheckOp, UnaryOp};
pub use stages::{BinaryCheck, FieldAssignment, Stage, UnaryCheck};
pub use tokens::{Token, TokenKind};
