//! Type library validation utilities.
//!
//! This module checks a parsed library for names and structures that could
//! never produce a compilable implementation.

use crate::error::LibraryError;
use crate::library::TypeLibrary;
use crate::types::{JavaType, MemberSignature, PrimitiveType, TypeDescriptor};
use std::collections::HashSet;

/// Java reserved words that can never be used as identifiers.
const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null", "_",
];

/// Validates a parsed type library for correctness.
///
/// # Arguments
/// * `library` - The library to validate
///
/// # Returns
/// Ok(()) if valid, or LibraryError describing the issue.
///
/// # Errors
/// Returns `LibraryError` if validation fails.
pub fn validate_library(library: &TypeLibrary) -> Result<(), LibraryError> {
    for descriptor in library.iter() {
        validate_type(descriptor)?;
    }
    validate_supertype_graph(library)?;
    Ok(())
}

/// Returns true if `s` is a legal Java identifier.
#[must_use]
pub fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !RESERVED.contains(&s)
}

/// Returns true if every dot- and dollar-separated segment of a binary name is
/// a legal identifier.
#[must_use]
pub fn is_binary_name(s: &str) -> bool {
    s.split(['.', '$']).all(is_java_identifier)
}

fn validate_type_name(name: &str, context: &str) -> Result<(), LibraryError> {
    let mut element = match JavaType::parse(name) {
        Some(ty) => ty,
        None => {
            return Err(LibraryError::validation(format!(
                "Empty type name in {context}"
            )));
        }
    };
    let mut is_array = false;
    while let JavaType::Array(inner) = element {
        is_array = true;
        element = *inner;
    }
    match element {
        JavaType::Reference(ref binary) if !is_binary_name(binary) => Err(
            LibraryError::validation(format!("Invalid type name '{name}' in {context}")),
        ),
        JavaType::Primitive(PrimitiveType::Void) if is_array => Err(LibraryError::validation(
            format!("Array of void '{name}' in {context}"),
        )),
        _ => Ok(()),
    }
}

/// Validates one type definition.
fn validate_type(descriptor: &TypeDescriptor) -> Result<(), LibraryError> {
    let name = &descriptor.qualified_name;
    if !is_binary_name(name) {
        return Err(LibraryError::validation(format!("Invalid type name '{name}'")));
    }

    for supertype in &descriptor.supertypes {
        match JavaType::parse(supertype) {
            Some(JavaType::Reference(ref binary)) if is_binary_name(binary) => {}
            _ => {
                return Err(LibraryError::validation(format!(
                    "Invalid supertype '{supertype}' of type '{name}'"
                )));
            }
        }
    }

    let mut seen_keys = HashSet::new();
    for member in &descriptor.members {
        validate_member(descriptor, member)?;
        let key = member.key();
        if !seen_keys.insert(key.clone()) {
            return Err(LibraryError::validation(format!(
                "Duplicate member '{key}' in type '{name}'"
            )));
        }
    }

    Ok(())
}

/// Validates one member signature.
fn validate_member(owner: &TypeDescriptor, member: &MemberSignature) -> Result<(), LibraryError> {
    let context = format!("{}#{}", owner.qualified_name, member.name);
    if !is_java_identifier(&member.name) {
        return Err(LibraryError::validation(format!(
            "Invalid member name '{}' in type '{}'",
            member.name, owner.qualified_name
        )));
    }

    validate_type_name(&member.return_type.binary_name(), &context)?;

    let mut seen_names = HashSet::new();
    for param in &member.parameters {
        if param.ty.is_void() {
            return Err(LibraryError::validation(format!(
                "Parameter '{}' of {context} cannot be void",
                param.name
            )));
        }
        if !is_java_identifier(&param.name) {
            return Err(LibraryError::validation(format!(
                "Invalid parameter name '{}' in {context}",
                param.name
            )));
        }
        if !seen_names.insert(&param.name) {
            return Err(LibraryError::validation(format!(
                "Duplicate parameter name '{}' in {context}",
                param.name
            )));
        }
        validate_type_name(&param.ty.binary_name(), &context)?;
    }

    for exception in &member.exceptions {
        if !matches!(exception, JavaType::Reference(_)) {
            return Err(LibraryError::validation(format!(
                "Exception type '{exception}' of {context} must be a class"
            )));
        }
        validate_type_name(&exception.binary_name(), &context)?;
    }

    Ok(())
}

/// Rejects supertype chains that loop back on themselves.
fn validate_supertype_graph(library: &TypeLibrary) -> Result<(), LibraryError> {
    let mut finished: HashSet<&str> = HashSet::new();

    for descriptor in library.iter() {
        let mut path = Vec::new();
        visit_supertypes(library, &descriptor.qualified_name, &mut path, &mut finished)?;
    }

    Ok(())
}

fn visit_supertypes<'a>(
    library: &'a TypeLibrary,
    name: &'a str,
    path: &mut Vec<&'a str>,
    finished: &mut HashSet<&'a str>,
) -> Result<(), LibraryError> {
    if finished.contains(name) {
        return Ok(());
    }
    if path.contains(&name) {
        path.push(name);
        return Err(LibraryError::CircularReference {
            path: path.join(" -> "),
        });
    }

    // Supertypes outside the library are opaque leaves.
    let Some(descriptor) = library.get_type(name) else {
        return Ok(());
    };

    path.push(name);
    for supertype in &descriptor.supertypes {
        visit_supertypes(library, supertype, path, finished)?;
    }
    path.pop();
    finished.insert(name);

    Ok(())
}
