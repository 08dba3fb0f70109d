// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{fmt, sync::Arc};

use super::WheelCollider;

/// Which instance fields a lookup may see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Public fields only.
    Public,
    /// Public and non-public fields.
    Any,
}

/// An assembly-qualified type name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    assembly: String,
    type_name: String,
}

impl QualifiedName {
    pub fn new(assembly: &str, type_name: &str) -> QualifiedName {
        QualifiedName {
            assembly: assembly.to_string(),
            type_name: type_name.to_string(),
        }
    }

    pub fn assembly(&self) -> &str {
        &self.assembly
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.type_name, self.assembly)
    }
}

/// A resolved instance field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldInfo {
    owner: String,
    name: String,
    public: bool,
}

impl FieldInfo {
    pub fn new(owner: &str, name: &str, public: bool) -> FieldInfo {
        FieldInfo {
            owner: owner.to_string(),
            name: name.to_string(),
            public,
        }
    }

    /// The name of the type declaring this field.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Returns true if a lookup with the given visibility may see this field.
    pub fn visible(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::Public => self.public,
            Visibility::Any => true,
        }
    }
}

/// Runtime metadata for a type.
pub trait TypeInfo: Send + Sync {
    fn name(&self) -> &str;

    /// Lists the instance fields visible with the given visibility.
    fn fields(&self, visibility: Visibility) -> Vec<FieldInfo>;

    /// Looks up a single instance field by name.
    fn field(&self, name: &str, visibility: Visibility) -> Option<FieldInfo> {
        self.fields(visibility)
            .into_iter()
            .find(|field| field.name() == name)
    }
}

/// The host's metadata query facility.
pub trait TypeRegistry: Send + Sync {
    /// Resolves a type by its qualified name. None if the assembly isn't loaded or the
    /// type doesn't exist.
    fn resolve(&self, name: &QualifiedName) -> Option<Arc<dyn TypeInfo>>;
}

/// An object whose fields can be read by name at runtime.
pub trait Reflect: Send + Sync {
    fn type_name(&self) -> &str;

    /// Reads a field. Fields the object doesn't have read as [`Value::Null`].
    fn get_value(&self, field: &FieldInfo) -> Value;
}

/// A field value read through reflection.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Float(f64),
    Object(Arc<dyn Reflect>),
    List(Vec<Value>),
    Collider(Arc<dyn WheelCollider>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<dyn Reflect>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_collider(&self) -> Option<Arc<dyn WheelCollider>> {
        match self {
            Value::Collider(collider) => Some(Arc::clone(collider)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(value) => write!(f, "Bool({})", value),
            Value::Float(value) => write!(f, "Float({})", value),
            Value::Object(object) => write!(f, "Object({})", object.type_name()),
            Value::List(list) => f.debug_list().entries(list.iter()).finish(),
            Value::Collider(_) => write!(f, "Collider"),
        }
    }
}
