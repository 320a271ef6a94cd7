extern crate self as facetq;

pub mod catalog;
pub mod codec;
pub mod compiler;
pub mod config;
pub mod error;
pub mod model;
pub mod scope;
pub mod tokenizer;

pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::codec::{decode, encode, Codec};
    pub use crate::compiler::{compile, Compiler};
    pub use crate::config::*;
    pub use crate::error::{Diagnostic, Error};
    pub use crate::model::*;
    pub use crate::scope::{Scope, ScopeCodes};
    pub use crate::Code;
}

pub use facetq_macros::Code;
pub use scope::Code;

pub use codec::{decode, encode};
pub use compiler::compile;

pub use ::chumsky;
