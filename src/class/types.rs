use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::utils::names;

/// Separator marking a nested or compiler-generated type in a simple name
pub const NESTING_SEPARATOR: char = '$';

/// Kind of a declared type
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    AbstractClass,
    Interface,
}

/// Visibility of a declared static field
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Package,
    Private,
}

/// Runtime value held by a static field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Reference {
        #[serde(rename = "ref")]
        target: String,
    },
    Array(Vec<FieldValue>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(n) => write!(f, "{}", n),
            FieldValue::String(s) => write!(f, "\"{}\"", s),
            FieldValue::Reference { target } => write!(f, "ref:{}", target),
            FieldValue::Array(items) => {
                let items = items.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{}]", items)
            }
        }
    }
}

/// Closure evaluated each time a registered field is read
#[derive(Clone)]
pub struct FieldReader(Arc<dyn Fn() -> Result<FieldValue, String> + Send + Sync>);

impl FieldReader {
    pub fn new<F>(read: F) -> Self
    where
        F: Fn() -> Result<FieldValue, String> + Send + Sync + 'static,
    {
        Self(Arc::new(read))
    }

    pub fn read(&self) -> Result<FieldValue, String> {
        (self.0)()
    }
}

impl fmt::Debug for FieldReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldReader(..)")
    }
}

impl PartialEq for FieldReader {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Access to a single static field of a type
pub trait StaticFieldAccessor {
    /// Name of the field as declared
    fn name(&self) -> &str;

    fn visibility(&self) -> Visibility;

    /// Read the current value of the field in static context
    fn read_value(&self) -> Result<FieldValue, String>;
}

/// A static field declared directly on a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticField {
    /// Field name
    pub name: String,

    /// Declared visibility, package-private when omitted
    #[serde(default)]
    pub visibility: Visibility,

    /// Constant value, if the field holds one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,

    /// Reason the runtime refuses to read this field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied: Option<String>,

    /// Reader registered in code, takes precedence over `value`
    #[serde(skip)]
    pub reader: Option<FieldReader>,
}

impl StaticField {
    /// Create a field holding a constant value
    pub fn constant(name: impl Into<String>, visibility: Visibility, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            visibility,
            value: Some(value),
            denied: None,
            reader: None,
        }
    }

    /// Create a field whose value is computed on every read
    pub fn computed<F>(name: impl Into<String>, visibility: Visibility, read: F) -> Self
    where
        F: Fn() -> Result<FieldValue, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            visibility,
            value: None,
            denied: None,
            reader: Some(FieldReader::new(read)),
        }
    }

    /// Create a field the runtime refuses to read
    pub fn denied(name: impl Into<String>, visibility: Visibility, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility,
            value: None,
            denied: Some(reason.into()),
            reader: None,
        }
    }

    /// Freeze a computed field into a constant (or denial) so it can be persisted
    pub fn snapshot(&self) -> Self {
        match &self.reader {
            Some(reader) => match reader.read() {
                Ok(value) => Self::constant(self.name.clone(), self.visibility, value),
                Err(reason) => Self::denied(self.name.clone(), self.visibility, reason),
            },
            None => self.clone(),
        }
    }
}

impl StaticFieldAccessor for StaticField {
    fn name(&self) -> &str {
        &self.name
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn read_value(&self) -> Result<FieldValue, String> {
        if let Some(reader) = &self.reader {
            return reader.read();
        }
        if let Some(reason) = &self.denied {
            return Err(reason.clone());
        }
        // A field declared without an initializer reads as null
        Ok(self.value.clone().unwrap_or(FieldValue::Null))
    }
}

/// Queryable attributes of a candidate type
pub trait TypeDescriptor {
    /// Fully-qualified dotted name
    fn qualified_name(&self) -> &str;

    fn is_interface(&self) -> bool;

    fn is_abstract(&self) -> bool;

    /// Whether the type was generated rather than declared
    fn is_synthetic(&self) -> bool {
        false
    }

    /// Last segment of the qualified name
    fn simple_name(&self) -> &str {
        names::simple_name_of(self.qualified_name())
    }

    /// Everything before the last segment, empty for the root package
    fn package(&self) -> &str {
        names::package_of(self.qualified_name())
    }

    fn is_nested(&self) -> bool {
        self.is_synthetic() || self.simple_name().contains(NESTING_SEPARATOR)
    }
}

/// A type registered with the classpath
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredType {
    /// Fully-qualified name, e.g. `com.acme.tasks.Ping`
    pub qualified_name: String,

    #[serde(default)]
    pub kind: TypeKind,

    /// Qualified names of the direct supertypes and implemented interfaces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,

    /// Static fields in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<StaticField>,
}

impl DeclaredType {
    pub fn new(qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            supertypes: Vec::new(),
            synthetic: false,
            fields: Vec::new(),
        }
    }

    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, TypeKind::Class)
    }

    pub fn abstract_class(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, TypeKind::AbstractClass)
    }

    pub fn interface(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, TypeKind::Interface)
    }

    /// Add a direct supertype or implemented interface
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn with_field(mut self, field: StaticField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// Static fields declared directly on this type
    pub fn static_fields(&self) -> &[StaticField] {
        &self.fields
    }
}

impl TypeDescriptor for DeclaredType {
    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    fn is_abstract(&self) -> bool {
        self.kind == TypeKind::AbstractClass
    }

    fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

/// A discovered type together with the marker it is assignable to
#[derive(Debug, Clone, PartialEq)]
pub struct Subtype {
    marker: String,
    ty: Arc<DeclaredType>,
}

impl Subtype {
    pub(crate) fn new(marker: impl Into<String>, ty: Arc<DeclaredType>) -> Self {
        Self {
            marker: marker.into(),
            ty,
        }
    }

    /// The marker this type was found assignable to
    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn ty(&self) -> &Arc<DeclaredType> {
        &self.ty
    }

    pub fn into_inner(self) -> Arc<DeclaredType> {
        self.ty
    }
}

/// Configuration options for classpath loading and discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// File suffixes recognised as type manifests
    pub manifest_extensions: Vec<String>,

    /// Whether to log verbose error information
    pub verbose_errors: bool,

    /// Maximum number of manifests to load
    pub max_files: Option<usize>,

    /// Number of parallel threads to use for loading
    pub parallel_threads: Option<usize>,

    /// Show a progress bar while loading large classpaths
    pub show_progress: bool,

    /// Match exclusions on whole package segments instead of raw string prefixes
    pub segment_aware_excludes: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            manifest_extensions: vec!["types.json".to_string()],
            verbose_errors: false,
            max_files: None,
            parallel_threads: None,
            show_progress: false,
            segment_aware_excludes: false,
        }
    }
}

/// Statistics about loading a classpath
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoadStats {
    /// Total number of manifests processed
    pub total_files: usize,

    /// Total number of types registered
    pub total_types: usize,

    /// Number of manifests declaring no types
    pub empty_files: usize,

    /// Number of manifests declaring at least one type
    pub files_with_types: usize,

    /// Number of manifests that failed to load
    pub error_files: usize,

    /// Paths to manifests that failed to load
    pub error_file_paths: Vec<PathBuf>,

    /// Types dropped because another manifest registered the same name first
    pub duplicate_types: usize,
}
