//! Member signature rendering.

use ironimpl_descriptor::{JavaType, MemberSignature, Parameter};

/// Renders member headers with fully-qualified types.
pub struct SignatureRenderer;

impl SignatureRenderer {
    /// Renders the parameter list without parentheses.
    ///
    /// Each parameter becomes `<canonical type> <name>`, joined by `, ` in
    /// declaration order.
    #[must_use]
    pub fn parameters(parameters: &[Parameter]) -> String {
        parameters
            .iter()
            .map(|p| format!("{} {}", p.ty.canonical_name(), p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders the throws clause with a leading space, or nothing when the
    /// member declares no checked exceptions.
    #[must_use]
    pub fn throws_clause(exceptions: &[JavaType]) -> String {
        if exceptions.is_empty() {
            return String::new();
        }
        let names: Vec<String> = exceptions.iter().map(JavaType::canonical_name).collect();
        format!(" throws {}", names.join(", "))
    }

    /// Renders the full member header up to, but excluding, the opening brace.
    #[must_use]
    pub fn header(member: &MemberSignature) -> String {
        format!(
            "public {} {}({}){}",
            member.return_type.canonical_name(),
            member.name,
            Self::parameters(&member.parameters),
            Self::throws_clause(&member.exceptions)
        )
    }
}
