use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ReflectError, Result};

// Dotted path of Unicode identifiers; `$` is allowed so nested type names validate
static QUALIFIED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{XID_Start}_$][\p{XID_Continue}$]*(\.[\p{XID_Start}_$][\p{XID_Continue}$]*)*$")
        .expect("qualified name pattern is valid")
});

/// Check that a required dotted name is present and well formed
pub fn validate_qualified_name<'a>(name: &'a str, what: &'static str) -> Result<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ReflectError::invalid(what, "cannot be empty"));
    }
    if !QUALIFIED_NAME_RE.is_match(trimmed) {
        return Err(ReflectError::invalid(
            what,
            format!("'{}' is not a dotted identifier path", trimmed),
        ));
    }
    Ok(trimmed)
}

/// Enclosing package of a qualified name, empty for the root package
pub fn package_of(qualified_name: &str) -> &str {
    match qualified_name.rfind('.') {
        Some(idx) => &qualified_name[..idx],
        None => "",
    }
}

/// Last segment of a qualified name
pub fn simple_name_of(qualified_name: &str) -> &str {
    match qualified_name.rfind('.') {
        Some(idx) => &qualified_name[idx + 1..],
        None => qualified_name,
    }
}

/// Join a package and a simple name
pub fn qualify(package: &str, simple_name: &str) -> String {
    if package.is_empty() {
        simple_name.to_string()
    } else {
        format!("{}.{}", package, simple_name)
    }
}

/// Whether `name` is `package` itself or lies inside it, on segment boundaries
pub fn is_within_package(name: &str, package: &str) -> bool {
    name == package
        || (name.starts_with(package) && name[package.len()..].starts_with('.'))
}
