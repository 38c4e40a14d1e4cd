//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use ironimpl::prelude::*;
//! ```

// Descriptor types
pub use ironimpl_descriptor::{
    JavaType, LibraryError, MemberSignature, Parameter, ParseError, PrimitiveType,
    TypeDescriptor, TypeKind, TypeLibrary, parse_library, parse_library_file, validate_library,
};

// Generation types
pub use ironimpl_codegen::{
    CodegenError, GeneratedSource, Generator, PathResolver, SourceEmitter, TypeInspector,
};

// Build types
pub use ironimpl_build::{
    ArchiveWriter, BuildError, BuildOrchestrator, BuildReport, BuildStage, CompileStatus,
    JarWriter, JavacToolchain, OrchestratorBuilder, Toolchain,
};
