//! Semantic model: types, class-likes and reflection.
//!
//! Sits between the tolerant syntax layer and the completion features.
//! Names coming out of here are fully qualified; members of a class-like
//! include what it inherits.
//!
//! ## Key Types
//!
//! - [`Type`] - a candidate static type (primitive or class-like)
//! - [`ClassLike`] - a class or interface with its members
//! - [`SymbolContext`] - symbol name, candidate types and issues at an offset
//! - [`Reflector`] - the reflection seam, implemented by [`SourceReflector`]

mod class_like;
mod infer;
mod reflect;
mod symbol_context;
mod types;

pub use class_like::{literal_type, ClassLike, ClassLikeKind, Constant, Method, Parameter, Property};
pub use reflect::{ReflectError, Reflector, SourceReflector};
pub use symbol_context::SymbolContext;
pub use types::{declared_name, without_null, Type, TypeScope, Types};
