//! Member enumeration for generation targets.

use crate::error::CodegenError;
use ironimpl_descriptor::{JavaType, MemberKey, MemberSignature, TypeDescriptor, TypeKind, TypeLibrary};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

const OBJECT: &str = "java.lang.Object";

/// Derives the ordered set of members an implementation must provide.
///
/// Members come from the target itself and, transitively, from every
/// supertype declared in the library. Order is stable: the target's own
/// members first, then each supertype depth-first in declaration order. The
/// first occurrence of a name + parameter types wins, so redeclarations in a
/// subtype shadow inherited ones.
///
/// When unrelated supertypes both declare a member, the implementation keeps
/// the first position but takes the more specific return type and only the
/// checked exceptions every declaration allows.
pub struct TypeInspector<'a> {
    library: &'a TypeLibrary,
}

/// Where a member key was first met.
enum Slot {
    /// Final, so it cannot be overridden at all.
    Sealed,
    /// Index into the collected members and the type that declared it.
    Kept { index: usize, owner: String },
}

impl<'a> TypeInspector<'a> {
    /// Creates a new inspector over the given library.
    #[must_use]
    pub fn new(library: &'a TypeLibrary) -> Self {
        Self { library }
    }

    /// Checks that a type can be implemented at all.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidTarget` for primitives, arrays, final
    /// classes, and descriptors without a name.
    pub fn check_target(&self, descriptor: &TypeDescriptor) -> Result<(), CodegenError> {
        let name = &descriptor.qualified_name;
        if name.trim().is_empty() {
            return Err(CodegenError::invalid_target(name, "no target type given"));
        }
        match descriptor.kind {
            TypeKind::Primitive => Err(CodegenError::invalid_target(
                name,
                "primitive types have no members to implement",
            )),
            TypeKind::Array => Err(CodegenError::invalid_target(
                name,
                "array types have no members to implement",
            )),
            TypeKind::Class if descriptor.is_final => Err(CodegenError::invalid_target(
                name,
                "final classes cannot be extended",
            )),
            TypeKind::Interface | TypeKind::Class => Ok(()),
        }
    }

    /// Returns every member the implementation of `descriptor` must provide.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidTarget` if the type cannot be implemented.
    pub fn members(&self, descriptor: &TypeDescriptor) -> Result<Vec<MemberSignature>, CodegenError> {
        self.check_target(descriptor)?;

        let mut visited = HashSet::new();
        let mut slots = HashMap::new();
        let mut members = Vec::new();
        self.collect(descriptor, &mut visited, &mut slots, &mut members);

        tracing::debug!(
            "Inspected {}: {} members to implement",
            descriptor.qualified_name,
            members.len()
        );
        Ok(members)
    }

    fn collect(
        &self,
        descriptor: &TypeDescriptor,
        visited: &mut HashSet<String>,
        slots: &mut HashMap<MemberKey, Slot>,
        members: &mut Vec<MemberSignature>,
    ) {
        if !visited.insert(descriptor.qualified_name.clone()) {
            return;
        }

        for member in &descriptor.members {
            // Static members are not inherited; they neither need nor block an override.
            if member.is_static {
                continue;
            }
            match slots.entry(member.key()) {
                Entry::Vacant(slot) if member.is_final => {
                    slot.insert(Slot::Sealed);
                }
                Entry::Vacant(slot) => {
                    slot.insert(Slot::Kept {
                        index: members.len(),
                        owner: descriptor.qualified_name.clone(),
                    });
                    members.push(member.clone());
                }
                Entry::Occupied(mut slot) => {
                    let Slot::Kept { index, owner } = slot.get_mut() else {
                        continue;
                    };
                    if self.is_subtype(owner, &descriptor.qualified_name) {
                        continue;
                    }
                    let kept = &mut members[*index];
                    kept.exceptions.retain(|e| member.exceptions.contains(e));
                    if self.is_more_specific(&member.return_type, &kept.return_type) {
                        tracing::debug!(
                            "{} from {} narrows the return type of {}",
                            member.name,
                            descriptor.qualified_name,
                            owner
                        );
                        kept.return_type = member.return_type.clone();
                        *owner = descriptor.qualified_name.clone();
                    }
                }
            }
        }

        for supertype in &descriptor.supertypes {
            match self.library.get_type(supertype) {
                Some(parent) => self.collect(parent, visited, slots, members),
                None => tracing::debug!(
                    "Supertype {} of {} is not in the library; treating it as opaque",
                    supertype,
                    descriptor.qualified_name
                ),
            }
        }
    }

    /// Returns true if `sub` is `sup` or reaches it through library supertypes.
    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        let mut pending = vec![sub];
        let mut visited = HashSet::new();
        while let Some(name) = pending.pop() {
            if name == sup {
                return true;
            }
            if !visited.insert(name) {
                continue;
            }
            if let Some(descriptor) = self.library.get_type(name) {
                pending.extend(descriptor.supertypes.iter().map(String::as_str));
            }
        }
        false
    }

    /// Returns true if `candidate` can override a member returning `current`
    /// but not the other way around.
    fn is_more_specific(&self, candidate: &JavaType, current: &JavaType) -> bool {
        match (candidate, current) {
            (JavaType::Primitive(_), JavaType::Primitive(_)) => false,
            (JavaType::Primitive(_), _) => true,
            (_, JavaType::Primitive(_)) => false,
            (_, JavaType::Reference(name)) if name == OBJECT => {
                !matches!(candidate, JavaType::Reference(n) if n == OBJECT)
            }
            (JavaType::Reference(sub), JavaType::Reference(sup)) => {
                sub != sup && self.is_subtype(sub, sup)
            }
            (JavaType::Array(sub), JavaType::Array(sup)) => {
                !matches!(**sub, JavaType::Primitive(_))
                    && !matches!(**sup, JavaType::Primitive(_))
                    && self.is_more_specific(sub, sup)
            }
            _ => false,
        }
    }
}
