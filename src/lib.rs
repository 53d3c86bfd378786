pub mod aggregate;
pub mod ast;
pub mod compare;
pub mod engine;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod table;
pub mod value;

pub use aggregate::{AggFunc, Aggregator};
pub use ast::{ArithOp, CheckOp, Expr, ScalarKind, Stage, Token, TokenKind, UnaryOp};
pub use compare::{Comparison, compare};
pub use engine::{Error, Stream, VecStream, execute, find};
pub use evaluator::{EvalError, Evaluator};
pub use functions::{Function, FunctionRegistry};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser, parse};
pub use table::Table;
pub use value::{Datum, Value};
