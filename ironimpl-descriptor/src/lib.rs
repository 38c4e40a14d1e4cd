//! # IronImpl Descriptor
//!
//! Java type descriptors and the type library that supplies them.
//!
//! This crate provides:
//! - Immutable descriptors for types, members and parameters
//! - XML type library parsing
//! - Library validation
//! - Resolution of qualified names, including primitives and arrays

pub mod error;
pub mod library;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{LibraryError, ParseError};
pub use library::TypeLibrary;
pub use parser::{parse_library, parse_library_file};
pub use types::{
    JavaType, MemberKey, MemberSignature, Parameter, PrimitiveType, TypeDescriptor, TypeKind,
};
pub use validation::validate_library;
