//! Type library: the set of described types available for generation.

use crate::error::{LibraryError, ParseError};
use crate::types::{JavaType, TypeDescriptor};
use std::collections::HashMap;

/// Collection of type descriptors, indexed by binary name.
#[derive(Debug, Clone, Default)]
pub struct TypeLibrary {
    /// Type descriptors in declaration order.
    pub types: Vec<TypeDescriptor>,
    /// Type lookup map (built while adding types).
    type_map: HashMap<String, usize>,
}

impl TypeLibrary {
    /// Creates a new empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type descriptor to the library.
    ///
    /// # Errors
    /// Returns `ParseError::DuplicateDefinition` if a type with the same
    /// qualified name is already present.
    pub fn add_type(&mut self, descriptor: TypeDescriptor) -> Result<(), ParseError> {
        if self.has_type(&descriptor.qualified_name) {
            return Err(ParseError::duplicate("type", &descriptor.qualified_name));
        }
        let index = self.types.len();
        self.type_map
            .insert(descriptor.qualified_name.clone(), index);
        self.types.push(descriptor);
        Ok(())
    }

    /// Looks up a declared type by binary name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.type_map.get(name).map(|&idx| &self.types[idx])
    }

    /// Returns true if a type with the given name is declared.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// Returns the number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over declared types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    /// Moves every type of `other` into this library.
    ///
    /// # Errors
    /// Returns `ParseError::DuplicateDefinition` on the first name declared in both.
    pub fn merge(&mut self, other: Self) -> Result<(), ParseError> {
        for descriptor in other.types {
            self.add_type(descriptor)?;
        }
        Ok(())
    }

    /// Resolves a qualified name the way a class loader would.
    ///
    /// Primitive keywords resolve to primitive descriptors and `[]`-suffixed
    /// names to array descriptors; everything else must be declared.
    ///
    /// # Errors
    /// Returns `LibraryError::TypeNotFound` if the name cannot be resolved.
    pub fn resolve(&self, name: &str) -> Result<TypeDescriptor, LibraryError> {
        let name = name.trim();
        match JavaType::parse(name) {
            Some(JavaType::Primitive(prim)) => Ok(TypeDescriptor::primitive(prim)),
            Some(JavaType::Array(element)) => Ok(TypeDescriptor::array(&element)),
            Some(JavaType::Reference(binary)) => self
                .get_type(&binary)
                .cloned()
                .ok_or_else(|| LibraryError::not_found(binary)),
            None => Err(LibraryError::not_found(name)),
        }
    }
}
