//! Type descriptor definitions.
//!
//! This module contains the immutable data structures describing Java types
//! and their members, as produced by the type library parser.

use std::fmt;

/// Java primitive types, including `void`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `boolean`.
    Boolean,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// UTF-16 code unit.
    Char,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Absence of a value (return types only).
    Void,
}

impl PrimitiveType {
    /// All primitive types in keyword order.
    pub const ALL: [Self; 9] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Char,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Void,
    ];

    /// Returns the Java keyword for this type.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }

    /// Parses a primitive type from its Java keyword.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == s)
    }

    /// Returns true for the numeric primitives (everything but `boolean` and `void`).
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        !matches!(self, Self::Boolean | Self::Void)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A reference to a Java type as it appears in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    /// Primitive type or `void`.
    Primitive(PrimitiveType),
    /// Class or interface, by binary name (`java.util.Map$Entry`).
    Reference(String),
    /// Array of the element type.
    Array(Box<JavaType>),
}

impl JavaType {
    /// Parses a type name: a primitive keyword, a binary class name, or either
    /// followed by one or more `[]` suffixes.
    ///
    /// Returns `None` for an empty name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(element) = name.strip_suffix("[]") {
            return Self::parse(element).map(|e| Self::Array(Box::new(e)));
        }
        if name.is_empty() {
            return None;
        }
        Some(
            PrimitiveType::from_keyword(name)
                .map_or_else(|| Self::Reference(name.to_string()), Self::Primitive),
        )
    }

    /// Shorthand for a reference type.
    #[must_use]
    pub fn reference(binary_name: impl Into<String>) -> Self {
        Self::Reference(binary_name.into())
    }

    /// Returns the canonical source-level name (`java.util.Map.Entry[]`).
    #[must_use]
    pub fn canonical_name(&self) -> String {
        match self {
            Self::Primitive(p) => p.keyword().to_string(),
            Self::Reference(name) => name.replace('$', "."),
            Self::Array(element) => format!("{}[]", element.canonical_name()),
        }
    }

    /// Returns the binary name used in the type library (`java.util.Map$Entry[]`).
    #[must_use]
    pub fn binary_name(&self) -> String {
        match self {
            Self::Primitive(p) => p.keyword().to_string(),
            Self::Reference(name) => name.clone(),
            Self::Array(element) => format!("{}[]", element.binary_name()),
        }
    }

    /// Returns true if this is `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveType::Void))
    }

    /// Returns true if this is an array type.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// Kind of a described type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    /// Interface (implemented with `implements`).
    #[default]
    Interface,
    /// Class (implemented with `extends`).
    Class,
    /// Primitive type; never a valid generation target.
    Primitive,
    /// Array type; never a valid generation target.
    Array,
}

impl TypeKind {
    /// Parses a type kind from the library `kind` attribute.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "interface" => Some(Self::Interface),
            "class" | "abstract-class" => Some(Self::Class),
            _ => None,
        }
    }
}

/// Method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub ty: JavaType,
}

impl Parameter {
    /// Creates a new parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: JavaType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Returns the name reflection reports for an unnamed parameter at `index`.
    #[must_use]
    pub fn default_name(index: usize) -> String {
        format!("arg{index}")
    }
}

/// Identity of a member: its name plus parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberKey {
    /// Member name.
    pub name: String,
    /// Binary names of the parameter types, in order.
    pub parameter_types: Vec<String>,
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.parameter_types.join(", "))
    }
}

/// One publicly exposed member of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSignature {
    /// Member name.
    pub name: String,
    /// Return type.
    pub return_type: JavaType,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Checked exception types in declaration order.
    pub exceptions: Vec<JavaType>,
    /// Annotation texts, rendered verbatim above the member.
    pub annotations: Vec<String>,
    /// Whether the member is `static`.
    pub is_static: bool,
    /// Whether the member is `final`.
    pub is_final: bool,
}

impl MemberSignature {
    /// Creates a new member with no parameters, exceptions, or annotations.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: JavaType) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters: Vec::new(),
            exceptions: Vec::new(),
            annotations: Vec::new(),
            is_static: false,
            is_final: false,
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, ty: JavaType) -> Self {
        self.parameters.push(Parameter::new(name, ty));
        self
    }

    /// Adds a checked exception.
    #[must_use]
    pub fn with_exception(mut self, ty: JavaType) -> Self {
        self.exceptions.push(ty);
        self
    }

    /// Adds an annotation text.
    #[must_use]
    pub fn with_annotation(mut self, text: impl Into<String>) -> Self {
        self.annotations.push(text.into());
        self
    }

    /// Returns the identity of this member.
    #[must_use]
    pub fn key(&self) -> MemberKey {
        MemberKey {
            name: self.name.clone(),
            parameter_types: self.parameters.iter().map(|p| p.ty.binary_name()).collect(),
        }
    }

    /// Returns true if an implementing class can override this member.
    #[must_use]
    pub const fn is_implementable(&self) -> bool {
        !self.is_static && !self.is_final
    }
}

/// Description of a Java type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Binary qualified name (`com.example.Outer$Inner`).
    pub qualified_name: String,
    /// Simple name (`Inner`).
    pub simple_name: String,
    /// Package name; empty for the default package.
    pub package: String,
    /// Type kind.
    pub kind: TypeKind,
    /// Whether the type is `final`.
    pub is_final: bool,
    /// Direct supertypes (binary names), in declaration order.
    pub supertypes: Vec<String>,
    /// Declared public members, in declaration order.
    pub members: Vec<MemberSignature>,
}

impl TypeDescriptor {
    /// Creates a descriptor for a declared type, splitting the binary name
    /// into package and simple name.
    #[must_use]
    pub fn new(qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        let qualified_name = qualified_name.into();
        let (package, simple_name) = split_binary_name(&qualified_name);
        Self {
            package,
            simple_name,
            qualified_name,
            kind,
            is_final: false,
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Creates the descriptor reported for a primitive type.
    #[must_use]
    pub fn primitive(prim: PrimitiveType) -> Self {
        Self::new(prim.keyword(), TypeKind::Primitive)
    }

    /// Creates the descriptor reported for an array type.
    #[must_use]
    pub fn array(element: &JavaType) -> Self {
        let name = format!("{}[]", element.binary_name());
        let mut descriptor = Self::new(name.clone(), TypeKind::Array);
        descriptor.package = String::new();
        descriptor.simple_name = JavaType::Array(Box::new(element.clone()))
            .canonical_name()
            .rsplit('.')
            .next()
            .unwrap_or(&name)
            .to_string();
        descriptor
    }

    /// Adds a direct supertype.
    #[must_use]
    pub fn with_supertype(mut self, binary_name: impl Into<String>) -> Self {
        self.supertypes.push(binary_name.into());
        self
    }

    /// Adds a declared member.
    #[must_use]
    pub fn with_member(mut self, member: MemberSignature) -> Self {
        self.members.push(member);
        self
    }

    /// Returns true if the type is an interface.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    /// Returns true if the type is primitive.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive)
    }

    /// Returns true if the type is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array)
    }

    /// Returns true if the type is nested inside another type.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.qualified_name.contains('$')
    }

    /// Returns the canonical name (`com.example.Outer.Inner`).
    #[must_use]
    pub fn canonical_name(&self) -> String {
        self.qualified_name.replace('$', ".")
    }

    /// Returns the package as path segments; empty for the default package.
    #[must_use]
    pub fn package_segments(&self) -> Vec<&str> {
        if self.package.is_empty() {
            Vec::new()
        } else {
            self.package.split('.').collect()
        }
    }
}

/// Splits a binary name into `(package, simple name)`.
fn split_binary_name(name: &str) -> (String, String) {
    let (package, class_part) = match name.rfind('.') {
        Some(idx) => (&name[..idx], &name[idx + 1..]),
        None => ("", name),
    };
    let simple = class_part.rsplit('$').next().unwrap_or(class_part);
    (package.to_string(), simple.to_string())
}
