//! Synthetic type libraries for benchmarks.

use ironimpl_descriptor::{JavaType, MemberSignature, PrimitiveType, TypeDescriptor, TypeKind, TypeLibrary};
use std::fmt::Write;

const RETURN_TYPES: [&str; 4] = ["int", "boolean", "java.lang.String", "void"];

fn return_type(i: usize) -> JavaType {
    match i % RETURN_TYPES.len() {
        0 => JavaType::Primitive(PrimitiveType::Int),
        1 => JavaType::Primitive(PrimitiveType::Boolean),
        2 => JavaType::reference("java.lang.String"),
        _ => JavaType::Primitive(PrimitiveType::Void),
    }
}

/// Builds an interface `bench.Wide` declaring `methods` members with one
/// parameter and one checked exception each.
#[must_use]
pub fn wide_interface(methods: usize) -> TypeLibrary {
    let mut wide = TypeDescriptor::new("bench.Wide", TypeKind::Interface);
    for i in 0..methods {
        wide = wide.with_member(
            MemberSignature::new(format!("method{i}"), return_type(i))
                .with_parameter("value", JavaType::Primitive(PrimitiveType::Long))
                .with_exception(JavaType::reference("java.io.IOException")),
        );
    }

    let mut library = TypeLibrary::new();
    // Single type, the name cannot collide.
    let _ = library.add_type(wide);
    library
}

/// Builds a chain `bench.Level0 extends bench.Level1 ... bench.Level{depth-1}`
/// where every level declares `per_level` members of its own.
#[must_use]
pub fn deep_hierarchy(depth: usize, per_level: usize) -> TypeLibrary {
    let mut library = TypeLibrary::new();
    for level in 0..depth {
        let mut descriptor = TypeDescriptor::new(format!("bench.Level{level}"), TypeKind::Interface);
        if level + 1 < depth {
            descriptor = descriptor.with_supertype(format!("bench.Level{}", level + 1));
        }
        for i in 0..per_level {
            descriptor = descriptor.with_member(MemberSignature::new(
                format!("level{level}Method{i}"),
                return_type(i),
            ));
        }
        let _ = library.add_type(descriptor);
    }
    library
}

/// Renders a type library document with `types` interfaces of `methods`
/// members each.
#[must_use]
pub fn library_xml(types: usize, methods: usize) -> String {
    let mut xml = String::from("<typeLibrary>\n");
    for t in 0..types {
        let _ = writeln!(xml, "    <type name=\"bench.Type{t}\">");
        if t > 0 {
            let _ = writeln!(xml, "        <extends type=\"bench.Type{}\"/>", t - 1);
        }
        for m in 0..methods {
            let _ = writeln!(
                xml,
                "        <method name=\"m{m}\" returns=\"{}\"><param name=\"x\" type=\"int\"/></method>",
                RETURN_TYPES[m % RETURN_TYPES.len()]
            );
        }
        xml.push_str("    </type>\n");
    }
    xml.push_str("</typeLibrary>\n");
    xml
}
