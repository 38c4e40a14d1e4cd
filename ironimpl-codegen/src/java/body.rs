//! Stub body synthesis.

use ironimpl_descriptor::{JavaType, PrimitiveType};

/// Category of a member's return type, which decides its stub body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCategory {
    /// `boolean`.
    Boolean,
    /// `void`; the body stays empty.
    Void,
    /// Any other primitive.
    Numeric,
    /// Class, interface or array.
    Reference,
}

impl ReturnCategory {
    /// Classifies a return type.
    #[must_use]
    pub fn of(ty: &JavaType) -> Self {
        match ty {
            JavaType::Primitive(PrimitiveType::Boolean) => Self::Boolean,
            JavaType::Primitive(PrimitiveType::Void) => Self::Void,
            JavaType::Primitive(_) => Self::Numeric,
            JavaType::Reference(_) | JavaType::Array(_) => Self::Reference,
        }
    }

    /// Returns the literal the stub returns, or `None` for `void`.
    #[must_use]
    pub const fn default_literal(&self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("true"),
            Self::Void => None,
            Self::Numeric => Some("0"),
            Self::Reference => Some("null"),
        }
    }

    /// Returns the single statement of the stub body, if any.
    #[must_use]
    pub fn return_statement(&self) -> Option<String> {
        self.default_literal()
            .map(|literal| format!("return {literal};"))
    }
}
