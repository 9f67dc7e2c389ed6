use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;

use log::{debug, warn};

use crate::class::scanner::{ClasspathScanner, PackageExclusions};
use crate::class::types::DeclaredType;

/// Load-time registration table standing in for a live classpath
///
/// Types are keyed by qualified name and kept in name order. Once built the
/// registry is read-only, so it can be shared freely between threads.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: BTreeMap<String, Arc<DeclaredType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, returning `false` if the name was already taken
    pub fn register(&mut self, ty: DeclaredType) -> bool {
        if self.types.contains_key(&ty.qualified_name) {
            warn!("Type {} is already registered, ignoring duplicate", ty.qualified_name);
            return false;
        }
        debug!("Registering type {}", ty.qualified_name);
        self.types.insert(ty.qualified_name.clone(), Arc::new(ty));
        true
    }

    /// Register several types, returning how many were accepted
    pub fn register_all(&mut self, types: impl IntoIterator<Item = DeclaredType>) -> usize {
        types.into_iter()
            .map(|ty| self.register(ty))
            .filter(|accepted| *accepted)
            .count()
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Arc<DeclaredType>> {
        self.types.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<DeclaredType>> {
        self.types.values()
    }

    /// All transitive supertypes of a type; unregistered supertypes are leaves
    pub fn ancestors_of(&self, qualified_name: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(qualified_name);

        while let Some(current) = queue.pop_front() {
            let Some(ty) = self.types.get(current) else {
                continue;
            };
            for parent in &ty.supertypes {
                if seen.insert(parent.clone()) {
                    queue.push_back(parent);
                }
            }
        }

        seen
    }
}

impl FromIterator<DeclaredType> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = DeclaredType>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.register_all(iter);
        registry
    }
}

impl ClasspathScanner for TypeRegistry {
    fn scan(&self, package: &str, exclusions: &PackageExclusions) -> Vec<Arc<DeclaredType>> {
        // Every allowed name starts with the package, so a range walk suffices
        let found: Vec<_> = self.types
            .range(package.to_string()..)
            .take_while(|(name, _)| name.starts_with(package))
            .filter(|(name, _)| exclusions.allows(name))
            .map(|(_, ty)| Arc::clone(ty))
            .collect();

        debug!("Scanned {} candidate types under {}", found.len(), package);
        found
    }

    fn is_assignable(&self, type_name: &str, marker: &str) -> bool {
        type_name == marker || self.ancestors_of(type_name).contains(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> TypeRegistry {
        [
            DeclaredType::interface("a.Task").extends("java.lang.Runnable"),
            DeclaredType::abstract_class("a.BaseTask").extends("a.Task"),
            DeclaredType::class("a.Ping").extends("a.BaseTask"),
            DeclaredType::class("a.Loop").extends("a.Loop"),
            DeclaredType::class("ab.Other"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn assignability_is_transitive() {
        let registry = registry();
        assert!(registry.is_assignable("a.Ping", "java.lang.Runnable"));
        assert!(registry.is_assignable("a.Ping", "a.Task"));
        assert!(registry.is_assignable("a.Ping", "a.Ping"));
        assert!(!registry.is_assignable("a.Task", "a.Ping"));
        assert!(!registry.is_assignable("ab.Other", "a.Task"));
    }

    #[test]
    fn self_referencing_hierarchy_terminates() {
        let registry = registry();
        assert!(!registry.is_assignable("a.Loop", "a.Task"));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut registry = registry();
        assert!(!registry.register(DeclaredType::class("a.Ping")));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn scan_uses_literal_prefix() {
        let registry = registry();
        let names: Vec<_> = registry
            .scan("a", &PackageExclusions::new("a", &[] as &[&str]))
            .iter()
            .map(|ty| ty.qualified_name.clone())
            .collect();
        assert_eq!(names, vec!["a.BaseTask", "a.Loop", "a.Ping", "a.Task", "ab.Other"]);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn registry_is_shareable_across_threads() {
        assert_send_sync::<TypeRegistry>();
        assert_send_sync::<DeclaredType>();
        assert_send_sync::<crate::class::types::StaticField>();

        let registry = Arc::new(registry());
        let shared = Arc::clone(&registry);
        let assignable = std::thread::spawn(move || shared.is_assignable("a.Ping", "a.Task"))
            .join()
            .unwrap();
        assert!(assignable);
    }
}
