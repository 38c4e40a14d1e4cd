//! # IronImpl
//!
//! Generates default-valued Java implementations of interfaces and abstract
//! classes.
//!
//! Given a type described in an XML type library, IronImpl writes a
//! `<Name>Impl` class that provides every member of the type with a trivial
//! body: `true` for booleans, `0` for other primitives, `null` for references
//! and nothing for `void`. Package mode additionally compiles the class and
//! stores it in a runnable jar.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ironimpl::prelude::*;
//! use std::path::Path;
//!
//! let library = parse_library_file(Path::new("types.xml"))?;
//! validate_library(&library)?;
//!
//! // Source mode
//! let path = Generator::new(&library).implement_named("com.example.Shape", Path::new("out"))?;
//!
//! // Package mode
//! let report = OrchestratorBuilder::new()
//!     .build(&library)
//!     .package_named("com.example.Shape", Path::new("shape.jar"))?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`descriptor`] - Type descriptors, type library parsing and validation
//! - [`codegen`] - Member inspection and Java source generation
//! - [`build`] - Compile and archive pipeline
//! - [`cli`] - Command-line front end

pub mod cli;
pub mod prelude;

/// Type descriptors and the type library.
pub mod descriptor {
    pub use ironimpl_descriptor::*;
}

/// Java source generation.
pub mod codegen {
    pub use ironimpl_codegen::*;
}

/// Compile and archive pipeline.
pub mod build {
    pub use ironimpl_build::*;
}
