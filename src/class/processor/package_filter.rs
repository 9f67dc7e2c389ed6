use std::sync::Arc;

use log::{debug, trace};

use crate::class::scanner::{ClasspathScanner, PackageExclusions};
use crate::class::types::{DeclaredType, ScanOptions, Subtype, TypeDescriptor};
use crate::error::Result;
use crate::utils::names;

use super::stats::{DiscardReason, FilterStats};

/// Parameters of a discovery query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    /// Package to scan
    pub package: String,

    /// Include sub-packages
    pub recursive: bool,

    pub keep_interfaces: bool,

    pub keep_abstracts: bool,

    /// Prefixes of names to leave out of the scan
    pub exclude_packages: Vec<String>,
}

impl FindQuery {
    /// Query for concrete, non-nested types directly inside `package`
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn keep_interfaces(mut self, keep: bool) -> Self {
        self.keep_interfaces = keep;
        self
    }

    pub fn keep_abstracts(mut self, keep: bool) -> Self {
        self.keep_abstracts = keep;
        self
    }

    pub fn exclude(mut self, package: impl Into<String>) -> Self {
        self.exclude_packages.push(package.into());
        self
    }
}

/// Finds the types of a package that are assignable to a marker type
#[derive(Debug)]
pub struct PackageFilter<'a, S: ClasspathScanner + ?Sized> {
    scanner: &'a S,
    segment_aware_excludes: bool,
}

impl<'a, S: ClasspathScanner + ?Sized> PackageFilter<'a, S> {
    pub fn new(scanner: &'a S) -> Self {
        Self {
            scanner,
            segment_aware_excludes: false,
        }
    }

    pub fn with_options(scanner: &'a S, options: &ScanOptions) -> Self {
        Self {
            scanner,
            segment_aware_excludes: options.segment_aware_excludes,
        }
    }

    /// Types equal or assignable to `marker` that pass the query's filters
    pub fn find_types(&self, marker: &str, query: &FindQuery) -> Result<Vec<Arc<DeclaredType>>> {
        self.find_with_stats(marker, query).map(|(types, _)| types)
    }

    /// Same as [`find_types`](Self::find_types), each result tagged with the marker
    pub fn find_subtypes(&self, marker: &str, query: &FindQuery) -> Result<Vec<Subtype>> {
        let marker = names::validate_qualified_name(marker, "marker")?;
        let types = self.find_types(marker, query)?;
        Ok(types.into_iter().map(|ty| Subtype::new(marker, ty)).collect())
    }

    /// Run the query and report how many candidates each rule removed
    pub fn find_with_stats(
        &self,
        marker: &str,
        query: &FindQuery,
    ) -> Result<(Vec<Arc<DeclaredType>>, FilterStats)> {
        let marker = names::validate_qualified_name(marker, "marker")?;
        let package = names::validate_qualified_name(&query.package, "package")?;

        let exclusions = PackageExclusions::new(package, query.exclude_packages.as_slice())
            .segment_aware(self.segment_aware_excludes);
        let candidates = self.scanner.scan(package, &exclusions);

        let mut stats = FilterStats {
            candidates: candidates.len(),
            ..FilterStats::default()
        };
        let mut found = Vec::new();

        for candidate in candidates {
            match self.discard_reason(candidate.as_ref(), marker, package, query) {
                Some(reason) => {
                    trace!("Discarding {}: {:?}", candidate.qualified_name(), reason);
                    stats.record(reason);
                }
                None => found.push(candidate),
            }
        }
        stats.accepted = found.len();

        debug!(
            "Found {} types assignable to {} in {} ({} candidates)",
            stats.accepted, marker, package, stats.candidates
        );
        Ok((found, stats))
    }

    /// First rule the candidate fails, in evaluation order
    fn discard_reason(
        &self,
        candidate: &DeclaredType,
        marker: &str,
        package: &str,
        query: &FindQuery,
    ) -> Option<DiscardReason> {
        if !query.keep_interfaces && candidate.is_interface() {
            return Some(DiscardReason::Interface);
        }
        if !query.keep_abstracts && candidate.is_abstract() {
            return Some(DiscardReason::Abstract);
        }
        if candidate.is_nested() {
            return Some(DiscardReason::Nested);
        }
        if !query.recursive && !candidate.package().eq_ignore_ascii_case(package) {
            return Some(DiscardReason::OutsidePackage);
        }
        if !self.scanner.is_assignable(candidate.qualified_name(), marker) {
            return Some(DiscardReason::NotAssignable);
        }
        None
    }
}

/// Positional form of [`PackageFilter::find_types`]
pub fn find<S: ClasspathScanner + ?Sized>(
    scanner: &S,
    marker: &str,
    package: &str,
    recursive: bool,
    keep_interfaces: bool,
    keep_abstracts: bool,
    exclude_packages: &[&str],
) -> Result<Vec<Arc<DeclaredType>>> {
    let query = FindQuery {
        package: package.to_string(),
        recursive,
        keep_interfaces,
        keep_abstracts,
        exclude_packages: exclude_packages.iter().map(|p| p.to_string()).collect(),
    };
    PackageFilter::new(scanner).find_types(marker, &query)
}
