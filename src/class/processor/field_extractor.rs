use log::{trace, warn};

use crate::class::registry::TypeRegistry;
use crate::class::types::{DeclaredType, FieldValue, StaticFieldAccessor, TypeDescriptor, Visibility};
use crate::error::{ReflectError, Result};
use crate::utils::names;

/// Outcome of reading one non-private static field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRead {
    Read { name: String, value: FieldValue },
    Skipped(ReflectError),
}

impl FieldRead {
    pub fn value(&self) -> Option<&FieldValue> {
        match self {
            FieldRead::Read { value, .. } => Some(value),
            FieldRead::Skipped(_) => None,
        }
    }
}

/// Read every non-private static field declared on `ty`, in declaration order
pub fn read_static_fields(ty: &DeclaredType) -> Vec<FieldRead> {
    read_fields(ty.qualified_name(), ty.static_fields())
}

/// Values of every readable non-private static field declared on `ty`
///
/// Unreadable fields are left out and reported through the log.
pub fn extract_static_fields(ty: &DeclaredType) -> Vec<FieldValue> {
    read_static_fields(ty)
        .into_iter()
        .filter_map(|read| match read {
            FieldRead::Read { value, .. } => Some(value),
            FieldRead::Skipped(err) => {
                warn!("{}", err);
                None
            }
        })
        .collect()
}

fn read_fields<A: StaticFieldAccessor>(owner: &str, fields: &[A]) -> Vec<FieldRead> {
    fields.iter()
        .filter(|field| field.visibility() != Visibility::Private)
        .map(|field| match field.read_value() {
            Ok(value) => {
                trace!("Read {}.{} = {}", owner, field.name(), value);
                FieldRead::Read {
                    name: field.name().to_string(),
                    value,
                }
            }
            Err(reason) => FieldRead::Skipped(ReflectError::UnreadableMember {
                owner: owner.to_string(),
                field: field.name().to_string(),
                reason,
            }),
        })
        .collect()
}

/// Resolves types by name and extracts their static field values
#[derive(Debug)]
pub struct StaticFieldExtractor<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> StaticFieldExtractor<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Values of the readable non-private static fields of the named type
    pub fn extract(&self, qualified_name: &str) -> Result<Vec<FieldValue>> {
        let ty = self.resolve(qualified_name)?;
        Ok(extract_static_fields(ty))
    }

    /// Per-field outcomes for the named type
    pub fn read(&self, qualified_name: &str) -> Result<Vec<FieldRead>> {
        let ty = self.resolve(qualified_name)?;
        Ok(read_static_fields(ty))
    }

    fn resolve(&self, qualified_name: &str) -> Result<&'a DeclaredType> {
        let name = names::validate_qualified_name(qualified_name, "type")?;
        self.registry
            .get(name)
            .map(|ty| ty.as_ref())
            .ok_or_else(|| ReflectError::invalid("type", format!("'{}' is not registered", name)))
    }
}
