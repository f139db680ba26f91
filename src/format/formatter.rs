//! Memoizing formatter shared by the answer panels.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use lru::LruCache;

use super::pipeline::Pipeline;
use super::{FormatOptions, FormattedMarkup, RawText};

type Cache = LruCache<String, FormattedMarkup>;

/// Formatter with fixed options and an LRU cache keyed on the input text,
/// so re-rendering an unchanged answer skips the regex passes.
#[derive(Debug)]
pub struct Formatter {
    options: FormatOptions,
    pipeline: Pipeline,
    cache: Option<Mutex<Cache>>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

impl Formatter {
    pub const DEFAULT_CACHE_CAPACITY: usize = 64;

    pub fn new(options: FormatOptions) -> Self {
        Self::with_cache_capacity(options, Self::DEFAULT_CACHE_CAPACITY)
    }

    /// A capacity of 0 disables memoization.
    pub fn with_cache_capacity(options: FormatOptions, capacity: usize) -> Self {
        Formatter {
            options,
            pipeline: Pipeline::new(&options),
            cache: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Stage names in the order they run.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.pipeline.stage_names().collect()
    }

    /// Number of memoized answers.
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| lock(c).len())
    }

    pub fn format<'a>(&self, text: impl Into<RawText<'a>>) -> FormattedMarkup {
        let raw = text.into();
        if raw.is_empty() {
            return FormattedMarkup::default();
        }
        let Some(cache) = &self.cache else {
            return super::run(&self.pipeline, raw.as_str());
        };
        if let Some(hit) = lock(cache).get(raw.as_str()) {
            log::debug!("format cache hit ({} bytes)", raw.as_str().len());
            return hit.clone();
        }
        log::debug!("format cache miss ({} bytes)", raw.as_str().len());
        // Lock is released while the pipeline runs; a racing caller may
        // format the same text, both results are identical.
        let markup = super::run(&self.pipeline, raw.as_str());
        lock(cache).put(raw.as_str().to_string(), markup.clone());
        markup
    }

    /// Format several answers at once (one per mode panel), in input order.
    ///
    /// Work is split into at most `available_parallelism` contiguous chunks,
    /// so the thread count does not grow with the number of answers.
    pub fn format_panels<S>(&self, answers: &[S]) -> Vec<FormattedMarkup>
    where
        S: AsRef<str> + Sync,
    {
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        if answers.len() < 2 || workers < 2 {
            return self.format_all(answers);
        }
        let chunk_len = answers.len().div_ceil(workers);
        thread::scope(|scope| {
            let handles: Vec<_> = answers
                .chunks(chunk_len)
                .map(|chunk| {
                    let handle = thread::Builder::new()
                        .name("format-panels".to_string())
                        .spawn_scoped(scope, move || self.format_all(chunk));
                    (chunk, handle)
                })
                .collect();
            let mut out = Vec::with_capacity(answers.len());
            for (chunk, handle) in handles {
                match handle {
                    Ok(handle) => match handle.join() {
                        Ok(markups) => out.extend(markups),
                        Err(_) => out.extend(self.format_all(chunk)),
                    },
                    Err(e) => {
                        log::debug!("format worker not started ({}), formatting inline", e);
                        out.extend(self.format_all(chunk));
                    }
                }
            }
            out
        })
    }

    fn format_all<S: AsRef<str>>(&self, answers: &[S]) -> Vec<FormattedMarkup> {
        answers.iter().map(|a| self.format(a.as_ref())).collect()
    }
}

fn lock(cache: &Mutex<Cache>) -> MutexGuard<'_, Cache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}
