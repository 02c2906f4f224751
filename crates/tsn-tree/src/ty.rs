//! Source-level types as resolved by the type checker.
//!
//! The numeric model is collapsed: there is exactly one `Number` type, and
//! integers, when the language wants them, are simulated on top of it.

use std::fmt;

use crate::decl::DeclId;

/// Where an object property was declared.
///
/// Only property assignments (object literals) and property declarations
/// (class fields) occupy storage; the remaining kinds are rejected when a
/// layout is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertySource {
    /// `{ name: value }` in an object literal.
    Assignment,
    /// `name: T;` in a class body.
    Declaration,
    /// `name() { ... }` in an object literal or class body.
    Method,
    /// `{ name }` shorthand in an object literal.
    Shorthand,
    /// `get name()` / `set name(v)`.
    Accessor,
}

impl PropertySource {
    /// Whether a property from this source is a stored field.
    pub fn is_stored(self) -> bool {
        matches!(self, PropertySource::Assignment | PropertySource::Declaration)
    }
}

impl fmt::Display for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertySource::Assignment => "PropertyAssignment",
            PropertySource::Declaration => "PropertyDeclaration",
            PropertySource::Method => "MethodDeclaration",
            PropertySource::Shorthand => "ShorthandPropertyAssignment",
            PropertySource::Accessor => "AccessorDeclaration",
        };
        f.write_str(name)
    }
}

/// One own property of an object type.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTy {
    pub name: String,
    pub ty: Ty,
    pub source: PropertySource,
}

impl PropertyTy {
    pub fn new(name: impl Into<String>, ty: Ty, source: PropertySource) -> Self {
        PropertyTy { name: name.into(), ty, source }
    }
}

/// The structure of an object type with no declaration identity, such as
/// the inferred type of an object literal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectShape {
    pub properties: Vec<PropertyTy>,
}

impl ObjectShape {
    pub fn new(properties: Vec<PropertyTy>) -> Self {
        ObjectShape { properties }
    }

    /// Shape of an object literal whose properties are all plain assignments.
    pub fn literal<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Ty)>,
        S: Into<String>,
    {
        ObjectShape {
            properties: fields
                .into_iter()
                .map(|(name, ty)| PropertyTy::new(name, ty, PropertySource::Assignment))
                .collect(),
        }
    }
}

/// A resolved source type.
#[derive(Clone, Debug, PartialEq)]
pub enum Ty {
    Boolean,
    Number,
    String,
    Void,
    /// The dynamic escape hatch. Never lowerable.
    Any,
    /// Instance type of a declared class.
    Class(DeclId),
    /// An anonymous object type.
    Object(ObjectShape),
    /// Any other type the checker produced (unions, arrays, `bigint`, ...),
    /// kept only by its printed name.
    Other(String),
}

impl Ty {
    pub fn class(id: DeclId) -> Ty {
        Ty::Class(id)
    }

    pub fn object(shape: ObjectShape) -> Ty {
        Ty::Object(shape)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Ty::Any)
    }

    /// The declaration identity of a nominal object type, if any.
    pub fn decl_id(&self) -> Option<DeclId> {
        match self {
            Ty::Class(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Boolean => write!(f, "boolean"),
            Ty::Number => write!(f, "number"),
            Ty::String => write!(f, "string"),
            Ty::Void => write!(f, "void"),
            Ty::Any => write!(f, "any"),
            Ty::Class(id) => write!(f, "class#{}", id.0),
            Ty::Object(shape) => {
                write!(f, "{{ ")?;
                for (i, prop) in shape.properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", prop.name, prop.ty)?;
                }
                write!(f, " }}")
            }
            Ty::Other(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_primitives() {
        assert_eq!(Ty::Number.to_string(), "number");
        assert_eq!(Ty::Any.to_string(), "any");
        assert_eq!(Ty::Other("bigint".into()).to_string(), "bigint");
    }

    #[test]
    fn display_object_shape() {
        let ty = Ty::object(ObjectShape::literal([("a", Ty::Number), ("b", Ty::String)]));
        assert_eq!(ty.to_string(), "{ a: number; b: string }");
    }

    #[test]
    fn only_assignments_and_declarations_are_stored() {
        assert!(PropertySource::Assignment.is_stored());
        assert!(PropertySource::Declaration.is_stored());
        assert!(!PropertySource::Method.is_stored());
        assert!(!PropertySource::Accessor.is_stored());
    }
}
