//! Type library XML parser.
//!
//! This module reads a `<typeLibrary>` document describing Java types and
//! their public members into a [`TypeLibrary`].

use crate::error::ParseError;
use crate::library::TypeLibrary;
use crate::types::{
    JavaType, MemberSignature, Parameter, PrimitiveType, TypeDescriptor, TypeKind,
};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Parses a type library from a string.
///
/// # Arguments
/// * `xml` - Type library XML content
///
/// # Returns
/// Parsed library or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or contains invalid descriptors.
pub fn parse_library(xml: &str) -> Result<TypeLibrary, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut library: Option<TypeLibrary> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "typeLibrary" => library = Some(TypeLibrary::new()),
                    "type" => {
                        let descriptor = parse_type(&mut reader, e, true)?;
                        library
                            .as_mut()
                            .ok_or_else(missing_root)?
                            .add_type(descriptor)?;
                    }
                    _ => skip_to_end(&mut reader)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "typeLibrary" => library = Some(TypeLibrary::new()),
                    "type" => {
                        let descriptor = parse_type(&mut reader, e, false)?;
                        library
                            .as_mut()
                            .ok_or_else(missing_root)?
                            .add_type(descriptor)?;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let library = library.ok_or_else(missing_root)?;
    tracing::debug!("Parsed type library with {} types", library.len());
    Ok(library)
}

/// Parses a type library from a file.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or parsed.
pub fn parse_library_file(path: &Path) -> Result<TypeLibrary, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_library(&xml)
}

fn missing_root() -> ParseError {
    ParseError::InvalidStructure {
        message: "No typeLibrary element found".to_string(),
    }
}

/// Collects the unescaped attributes of an element.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let raw = std::str::from_utf8(&attr.value)?;
        attrs.push((key.to_string(), unescape(raw)?.into_owned()));
    }
    Ok(attrs)
}

fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::invalid_attr(element, attribute, value)),
    }
}

fn parse_java_type(element: &str, attribute: &str, value: &str) -> Result<JavaType, ParseError> {
    JavaType::parse(value).ok_or_else(|| ParseError::invalid_attr(element, attribute, value))
}

/// Reads the required `type` attribute of a leaf element such as `<extends>`.
fn type_attribute(element: &str, e: &BytesStart<'_>) -> Result<String, ParseError> {
    attributes(e)?
        .into_iter()
        .find(|(key, _)| key == "type")
        .map(|(_, value)| value)
        .ok_or_else(|| ParseError::missing_attr(element, "type"))
}

/// Parses a type element. When `has_body` is false the element was empty.
fn parse_type(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_body: bool,
) -> Result<TypeDescriptor, ParseError> {
    let mut name = None;
    let mut kind = TypeKind::Interface;
    let mut is_final = false;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "kind" => {
                kind = TypeKind::parse(&value)
                    .ok_or_else(|| ParseError::invalid_attr("type", "kind", &value))?
            }
            "final" => is_final = parse_bool("type", "final", &value)?,
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("type", "name"))?;
    match JavaType::parse(&name) {
        Some(JavaType::Reference(_)) => {}
        _ => return Err(ParseError::invalid_attr("type", "name", name)),
    }

    let mut descriptor = TypeDescriptor::new(name, kind);
    descriptor.is_final = is_final;

    if !has_body {
        return Ok(descriptor);
    }

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                match tag_name {
                    "extends" | "implements" => {
                        descriptor.supertypes.push(type_attribute(tag_name, e)?);
                        skip_to_end(reader)?;
                    }
                    "method" => {
                        let member = parse_method(reader, e, true)?;
                        descriptor.members.push(member);
                    }
                    _ => skip_to_end(reader)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                match tag_name {
                    "extends" | "implements" => {
                        descriptor.supertypes.push(type_attribute(tag_name, e)?);
                    }
                    "method" => {
                        let member = parse_method(reader, e, false)?;
                        descriptor.members.push(member);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(descriptor)
}

/// Parses a method element and its parameters, exceptions and annotations.
fn parse_method(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_body: bool,
) -> Result<MemberSignature, ParseError> {
    let mut name = None;
    let mut return_type = None;
    let mut is_static = false;
    let mut is_final = false;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "returns" => return_type = Some(parse_java_type("method", "returns", &value)?),
            "static" => is_static = parse_bool("method", "static", &value)?,
            "final" => is_final = parse_bool("method", "final", &value)?,
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("method", "name"))?;
    let return_type = return_type.unwrap_or(JavaType::Primitive(PrimitiveType::Void));

    let mut member = MemberSignature::new(name, return_type);
    member.is_static = is_static;
    member.is_final = is_final;

    if !has_body {
        return Ok(member);
    }

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                match tag_name {
                    "param" => {
                        let index = member.parameters.len();
                        member.parameters.push(parse_parameter(e, index)?);
                    }
                    "throws" => {
                        let value = type_attribute("throws", e)?;
                        member
                            .exceptions
                            .push(parse_java_type("throws", "type", &value)?);
                    }
                    "annotation" => {
                        let text = attributes(e)?
                            .into_iter()
                            .find(|(key, _)| key == "text")
                            .map(|(_, value)| value)
                            .ok_or_else(|| ParseError::missing_attr("annotation", "text"))?;
                        member.annotations.push(text);
                    }
                    _ => {}
                }
            }
            // Leaf children written with explicit end tags close here too.
            Ok(Event::End(ref end)) => {
                if end.name().as_ref() == b"method" {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(member)
}

/// Parses a parameter element; unnamed parameters get the reflective `argN` name.
fn parse_parameter(e: &BytesStart<'_>, index: usize) -> Result<Parameter, ParseError> {
    let mut name = None;
    let mut ty = None;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" if !value.is_empty() => name = Some(value),
            "type" => ty = Some(parse_java_type("param", "type", &value)?),
            _ => {}
        }
    }

    let ty = ty.ok_or_else(|| ParseError::missing_attr("param", "type"))?;
    let name = name.unwrap_or_else(|| Parameter::default_name(index));

    Ok(Parameter::new(name, ty))
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
