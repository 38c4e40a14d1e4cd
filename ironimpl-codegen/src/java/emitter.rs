//! Implementation class rendering.

use crate::java::body::ReturnCategory;
use crate::java::signature::SignatureRenderer;
use ironimpl_descriptor::{MemberSignature, TypeDescriptor};

/// Suffix appended to the target's simple name to form the class name.
pub const IMPL_SUFFIX: &str = "Impl";

/// Default indentation width in spaces.
pub const DEFAULT_INDENT: usize = 4;

/// Rendered source of one implementation class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// Package of the class; empty for the default package.
    pub package: String,
    /// Simple class name (`ShapeImpl`).
    pub class_name: String,
    /// Full source text.
    pub text: String,
}

impl GeneratedSource {
    /// Returns the fully-qualified class name (`com.example.ShapeImpl`).
    #[must_use]
    pub fn qualified_class_name(&self) -> String {
        if self.package.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package, self.class_name)
        }
    }
}

/// Renders implementation classes.
///
/// Every step returns its text; the emitter holds configuration only, so one
/// instance can render any number of classes.
#[derive(Debug, Clone)]
pub struct SourceEmitter {
    indent: String,
}

impl SourceEmitter {
    /// Creates an emitter with the default indentation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    /// Creates an emitter indenting with `width` spaces.
    #[must_use]
    pub fn with_indent(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }

    /// Returns the implementation class name for a target.
    #[must_use]
    pub fn class_name(descriptor: &TypeDescriptor) -> String {
        format!("{}{}", descriptor.simple_name, IMPL_SUFFIX)
    }

    /// Renders the full implementation of `descriptor` providing `members`.
    #[must_use]
    pub fn render(&self, descriptor: &TypeDescriptor, members: &[MemberSignature]) -> GeneratedSource {
        let mut output = String::new();

        output.push_str(&self.render_package(descriptor));
        output.push_str(&self.render_class_header(descriptor));
        for member in members {
            output.push('\n');
            output.push_str(&self.render_member(member));
        }
        output.push_str("}\n");

        GeneratedSource {
            package: descriptor.package.clone(),
            class_name: Self::class_name(descriptor),
            text: output,
        }
    }

    /// Renders the package declaration, or nothing for the default package.
    #[must_use]
    pub fn render_package(&self, descriptor: &TypeDescriptor) -> String {
        if descriptor.package.is_empty() {
            String::new()
        } else {
            format!("package {};\n\n", descriptor.package)
        }
    }

    /// Renders the class declaration line.
    #[must_use]
    pub fn render_class_header(&self, descriptor: &TypeDescriptor) -> String {
        let relation = if descriptor.is_interface() {
            "implements"
        } else {
            "extends"
        };
        // Nested types are not visible by simple name from a top-level class.
        let target = if descriptor.is_nested() {
            descriptor.canonical_name()
        } else {
            descriptor.simple_name.clone()
        };
        format!(
            "public class {} {} {} {{\n",
            Self::class_name(descriptor),
            relation,
            target
        )
    }

    /// Renders one member: annotations, header and stub body.
    #[must_use]
    pub fn render_member(&self, member: &MemberSignature) -> String {
        let mut output = String::new();

        for annotation in &member.annotations {
            output.push_str(&format!("{}{}\n", self.indent, annotation));
        }

        output.push_str(&format!(
            "{}{} {{\n",
            self.indent,
            SignatureRenderer::header(member)
        ));
        if let Some(statement) = ReturnCategory::of(&member.return_type).return_statement() {
            output.push_str(&format!("{}{}{}\n", self.indent, self.indent, statement));
        }
        output.push_str(&format!("{}}}\n", self.indent));

        output
    }
}

impl Default for SourceEmitter {
    fn default() -> Self {
        Self::new()
    }
}
