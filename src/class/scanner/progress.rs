use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use rayon::prelude::*;

// Below this many items a progress bar is more noise than help
const MIN_ITEMS_FOR_BAR: usize = 10;

/// Progress reporting for parallel manifest loading
#[derive(Debug, Default)]
pub struct ProgressTracker {
    enabled: bool,
}

impl ProgressTracker {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Map every item in parallel, keeping input order
    pub fn track_parallel<T, F, R>(&self, items: &[T], operation: F) -> Vec<R>
    where
        T: Sync,
        F: Fn(&T) -> R + Sync + Send,
        R: Send,
    {
        let progress_bar = if self.enabled && items.len() > MIN_ITEMS_FOR_BAR {
            let pb = ProgressBar::new(items.len() as u64);
            match ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} manifests ({eta})")
            {
                Ok(style) => pb.set_style(style.progress_chars("#>-")),
                Err(e) => warn!("Invalid progress template: {}", e),
            }
            Some(pb)
        } else {
            None
        };

        let processed = AtomicUsize::new(0);

        let results: Vec<R> = items.par_iter()
            .map(|item| {
                let current = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(pb) = &progress_bar {
                    pb.set_position(current as u64);
                }
                operation(item)
            })
            .collect();

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Classpath loaded");
        }

        results
    }
}
