mod file_collector;
mod manifest;
mod progress;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::class::registry::TypeRegistry;
use crate::class::types::{DeclaredType, LoadStats, ScanOptions};
use crate::utils::names;

pub use file_collector::FileCollector;
pub use manifest::{LoadedManifest, ManifestParser, ManifestType, TypeManifest};
pub use progress::ProgressTracker;

/// Source of raw candidate types for a package
///
/// This is the seam between discovery and whatever holds the type universe.
pub trait ClasspathScanner {
    /// Every type under `package` that the exclusion predicate allows
    fn scan(&self, package: &str, exclusions: &PackageExclusions) -> Vec<Arc<DeclaredType>>;

    /// Whether `type_name` equals `marker` or has it as a transitive supertype
    fn is_assignable(&self, type_name: &str, marker: &str) -> bool;
}

/// Include/exclude predicate applied to qualified type names during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageExclusions {
    include: String,
    excluded: Vec<String>,
    segment_aware: bool,
}

impl PackageExclusions {
    /// Include names prefixed by `package` unless prefixed by an excluded entry
    pub fn new<S: AsRef<str>>(package: &str, excluded: &[S]) -> Self {
        Self {
            include: package.to_string(),
            excluded: excluded.iter()
                .map(|e| e.as_ref().trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            segment_aware: false,
        }
    }

    /// Match on whole package segments, so `foo.bar` no longer covers `foo.barbaz`
    pub fn segment_aware(mut self, enabled: bool) -> Self {
        self.segment_aware = enabled;
        self
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Whether a qualified name passes the predicate
    pub fn allows(&self, qualified_name: &str) -> bool {
        if !self.matches(qualified_name, &self.include) {
            return false;
        }
        !self.excluded.iter().any(|prefix| self.matches(qualified_name, prefix))
    }

    fn matches(&self, qualified_name: &str, prefix: &str) -> bool {
        if self.segment_aware {
            prefix.is_empty() || names::is_within_package(qualified_name, prefix)
        } else {
            qualified_name.starts_with(prefix)
        }
    }
}

/// Result of loading a classpath
#[derive(Debug, Clone)]
pub struct ClasspathLoadResult {
    /// Registry holding every successfully loaded type
    pub registry: TypeRegistry,

    /// Manifests that parsed, in path order
    pub manifests: Vec<LoadedManifest>,

    pub stats: LoadStats,
}

/// Builds a type registry from manifests found under classpath roots
#[derive(Debug)]
pub struct ClasspathLoader {
    options: ScanOptions,
    file_collector: FileCollector,
    parser: ManifestParser,
    progress_tracker: ProgressTracker,
}

impl ClasspathLoader {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            file_collector: FileCollector::with_suffixes(options.manifest_extensions.clone()),
            parser: ManifestParser::new(options.verbose_errors),
            progress_tracker: ProgressTracker::new(options.show_progress),
            options,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScanOptions::default())
    }

    /// Collect manifests from every root, in root order
    pub fn collect_files(&self, roots: &[impl AsRef<Path>]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in roots {
            files.extend(self.file_collector.collect_files(root)?);
        }
        Ok(files)
    }

    /// Walk the roots and load every manifest found
    pub fn load_roots(&self, roots: &[impl AsRef<Path>]) -> Result<ClasspathLoadResult> {
        let files = self.collect_files(roots)?;
        info!("Found {} manifests on the classpath", files.len());
        self.load_files(&files)
    }

    /// Load specific manifest files
    ///
    /// Broken manifests are logged and recorded in the stats; they never fail the load.
    pub fn load_files(&self, files: &[PathBuf]) -> Result<ClasspathLoadResult> {
        let files = match self.options.max_files {
            Some(max_files) if files.len() > max_files => {
                warn!("Limiting to {} manifests out of {}", max_files, files.len());
                &files[..max_files]
            }
            _ => files,
        };

        let thread_count = self.options.parallel_threads.unwrap_or_else(|| {
            let available = num_cpus::get();
            let used = std::cmp::max(1, available.saturating_sub(1));
            debug!("Using {} threads for manifest loading (available: {})", used, available);
            used
        });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build()
            .context("Failed to build manifest loading thread pool")?;

        let results = pool.install(|| {
            self.progress_tracker.track_parallel(files, |file| {
                (file.clone(), self.parser.parse_file(file))
            })
        });

        let mut stats = LoadStats {
            total_files: results.len(),
            ..LoadStats::default()
        };
        let mut registry = TypeRegistry::new();
        let mut manifests = Vec::new();

        for (file, outcome) in results {
            let manifest = match outcome {
                Ok(manifest) => manifest,
                Err(e) => {
                    if self.options.verbose_errors {
                        warn!("Failed to load manifest {}: {:#}", file.display(), e);
                    } else {
                        warn!("Failed to load manifest {}: {}", file.display(), e);
                    }
                    stats.error_files += 1;
                    stats.error_file_paths.push(file);
                    continue;
                }
            };

            if manifest.types.is_empty() {
                stats.empty_files += 1;
            } else {
                stats.files_with_types += 1;
            }

            for ty in &manifest.types {
                if registry.register(ty.clone()) {
                    stats.total_types += 1;
                } else {
                    stats.duplicate_types += 1;
                }
            }
            manifests.push(manifest);
        }

        info!(
            "Loaded {} manifests, registered {} types ({} failed)",
            stats.total_files, stats.total_types, stats.error_files
        );

        Ok(ClasspathLoadResult {
            registry,
            manifests,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("foo.bar.Baz", false ; "excluded package")]
    #[test_case("foo.barbaz.Qux", false ; "literal prefix also excludes sibling")]
    #[test_case("foo.Main", true ; "kept")]
    #[test_case("other.Main", false ; "outside include prefix")]
    fn literal_prefix_exclusion(name: &str, allowed: bool) {
        let exclusions = PackageExclusions::new("foo", &["foo.bar"]);
        assert_eq!(exclusions.allows(name), allowed);
    }

    #[test_case("foo.bar.Baz", false ; "excluded package")]
    #[test_case("foo.barbaz.Qux", true ; "sibling survives")]
    #[test_case("foobar.Main", false ; "include is segment aware too")]
    fn segment_aware_exclusion(name: &str, allowed: bool) {
        let exclusions = PackageExclusions::new("foo", &["foo.bar"]).segment_aware(true);
        assert_eq!(exclusions.allows(name), allowed);
    }

    #[test]
    fn blank_exclusions_are_ignored() {
        let exclusions = PackageExclusions::new("foo", &["", "  "]);
        assert!(exclusions.excluded().is_empty());
        assert!(exclusions.allows("foo.Main"));
    }
}
