//! # IronImpl Codegen
//!
//! Java stub implementation generation from type descriptors.
//!
//! This crate provides:
//! - Member enumeration across supertypes
//! - Java source rendering with default-valued method bodies
//! - Package directory layout and atomic file output

pub mod error;
pub mod generator;
pub mod inspector;
pub mod java;
pub mod path;

pub use error::CodegenError;
pub use generator::Generator;
pub use inspector::TypeInspector;
pub use java::{GeneratedSource, SourceEmitter};
pub use path::{PathResolver, class_file_for, staging_file};

use ironimpl_descriptor::TypeLibrary;

/// Generates the implementation of one type from a type library XML string.
///
/// # Arguments
/// * `xml` - Type library XML content
/// * `type_name` - Qualified binary name of the target type
///
/// # Returns
/// Generated Java source as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation, resolution or generation fails.
pub fn generate_from_xml(xml: &str, type_name: &str) -> Result<String, CodegenError> {
    let library = ironimpl_descriptor::parse_library(xml)?;
    render_from_library(&library, type_name)
}

/// Generates the implementation of one type from a type library file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(path: &std::path::Path, type_name: &str) -> Result<String, CodegenError> {
    let library = ironimpl_descriptor::parse_library_file(path)?;
    render_from_library(&library, type_name)
}

fn render_from_library(library: &TypeLibrary, type_name: &str) -> Result<String, CodegenError> {
    ironimpl_descriptor::validate_library(library)?;
    let generator = Generator::new(library);
    let descriptor = generator.resolve_target(type_name)?;
    Ok(generator.render(&descriptor)?.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_from_xml() {
        let xml = r#"<typeLibrary>
            <type name="Task"><method name="run"/></type>
        </typeLibrary>"#;

        let text = generate_from_xml(xml, "Task").expect("Failed to generate");
        assert_eq!(
            text,
            "public class TaskImpl implements Task {\n\n    public void run() {\n    }\n}\n"
        );
    }

    #[test]
    fn test_generate_from_xml_unknown_type() {
        let result = generate_from_xml("<typeLibrary/>", "Task");
        assert!(matches!(result, Err(CodegenError::Resolve(_))));
    }
}
