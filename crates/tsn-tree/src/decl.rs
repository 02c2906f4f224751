//! Class declarations and the table the type checker exposes for them.

use rustc_hash::FxHashMap;

use crate::ty::{PropertySource, PropertyTy, Ty};

/// Identity of a class declaration.
///
/// Two declarations that happen to share a name in different lexical scopes
/// get different ids, so anything keyed by `DeclId` never conflates them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

/// A member of a class body, in source order.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassMember {
    /// A data field. Occupies a slot in the instance layout.
    Field { name: String, ty: Ty },
    /// A method. Lives in the class scope, not in instance memory.
    Method { name: String },
    Constructor,
}

impl ClassMember {
    pub fn field(name: impl Into<String>, ty: Ty) -> Self {
        ClassMember::Field { name: name.into(), ty }
    }

    pub fn method(name: impl Into<String>) -> Self {
        ClassMember::Method { name: name.into() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub id: DeclId,
    pub name: String,
    pub members: Vec<ClassMember>,
}

impl ClassDecl {
    /// Data fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Ty)> {
        self.members.iter().filter_map(|m| match m {
            ClassMember::Field { name, ty } => Some((name.as_str(), ty)),
            _ => None,
        })
    }

    /// Position of a data field among its sibling data fields.
    ///
    /// Methods and the constructor do not count; they are not part of the
    /// instance layout.
    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.fields().position(|(field, _)| field == name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.members
            .iter()
            .any(|m| matches!(m, ClassMember::Method { name: n } if n == name))
    }
}

/// Every class declaration the front end has processed, by identity.
#[derive(Debug, Default)]
pub struct Declarations {
    classes: FxHashMap<DeclId, ClassDecl>,
    next_id: u32,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. The member list is built with the class's own id in
    /// hand so fields may refer to the class itself.
    pub fn add_class<F>(&mut self, name: impl Into<String>, members: F) -> DeclId
    where
        F: FnOnce(DeclId) -> Vec<ClassMember>,
    {
        let id = DeclId(self.next_id);
        self.next_id += 1;
        let decl = ClassDecl {
            id,
            name: name.into(),
            members: members(id),
        };
        self.classes.insert(id, decl);
        id
    }

    pub fn class(&self, id: DeclId) -> Option<&ClassDecl> {
        self.classes.get(&id)
    }

    /// Own properties of an object type, in the type's enumeration order.
    ///
    /// For a class this is its data fields. Returns `None` for types that
    /// are not object-shaped or for an unknown declaration.
    pub fn properties_of(&self, ty: &Ty) -> Option<Vec<PropertyTy>> {
        match ty {
            Ty::Class(id) => {
                let decl = self.class(*id)?;
                Some(
                    decl.fields()
                        .map(|(name, ty)| PropertyTy::new(name, ty.clone(), PropertySource::Declaration))
                        .collect(),
                )
            }
            Ty::Object(shape) => Some(shape.properties.clone()),
            _ => None,
        }
    }
}
