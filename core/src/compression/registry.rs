//! compression/registry.rs
//! Codec registry: method id -> encoder factory, plus memoized instances.
//!
//! Design notes:
//! - An encoder is constructed the first time its method is resolved and
//!   reused for every later trial of that method on the same registry.
//! - Tuning is applied once, at construction, and only the properties that
//!   belong to the method family are passed on.
//! - A method without a factory is unavailable; that is a hard failure at
//!   resolution time, not at configuration time.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compression::codecs::{Bzip2Encoder, DeflateEncoder, StoreEncoder};
use crate::compression::types::{CoderProperty, CompressionError, CompressionMethod, Encoder};

pub type EncoderFactory = Box<dyn Fn() -> Result<Box<dyn Encoder>, CompressionError> + Send + Sync>;

/// Optional codec tuning. `None` keeps the codec default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecTuning {
    pub num_passes: Option<u32>,
    pub num_fast_bytes: Option<u32>,
    pub match_finder_cycles: Option<u32>,
    pub dictionary_size: Option<u32>,
    pub num_threads: Option<u32>,
}

impl CodecTuning {
    /// Properties relevant to `method`'s family, in application order.
    pub fn properties_for(&self, method: CompressionMethod) -> Vec<CoderProperty> {
        let candidates = match method {
            CompressionMethod::Deflate | CompressionMethod::Deflate64 => [
                self.num_passes.map(CoderProperty::NumPasses),
                self.num_fast_bytes.map(CoderProperty::NumFastBytes),
                self.match_finder_cycles.map(CoderProperty::MatchFinderCycles),
            ],
            CompressionMethod::BZip2 => [
                self.dictionary_size.map(CoderProperty::DictionarySize),
                self.num_passes.map(CoderProperty::NumPasses),
                self.num_threads.map(CoderProperty::NumThreads),
            ],
            CompressionMethod::Store => return Vec::new(),
        };
        candidates.into_iter().flatten().collect()
    }
}

pub struct CodecRegistry {
    factories: HashMap<CompressionMethod, EncoderFactory>,
    instances: HashMap<CompressionMethod, Box<dyn Encoder>>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut available: Vec<_> = self.factories.keys().copied().collect();
        available.sort_by_key(|m| m.id());
        let mut constructed: Vec<_> = self.instances.keys().copied().collect();
        constructed.sort_by_key(|m| m.id());
        f.debug_struct("CodecRegistry")
            .field("available", &available)
            .field("constructed", &constructed)
            .finish()
    }
}

impl CodecRegistry {
    /// Registry with no encoders at all.
    pub fn empty() -> Self {
        Self { factories: HashMap::new(), instances: HashMap::new() }
    }

    /// Store, Deflate and BZip2. Deflate64 has no built-in encoder.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(CompressionMethod::Store, || Ok(Box::new(StoreEncoder::new())));
        registry.register(CompressionMethod::Deflate, || Ok(Box::new(DeflateEncoder::new())));
        registry.register(CompressionMethod::BZip2, || Ok(Box::new(Bzip2Encoder::new())));
        registry
    }

    /// Install or replace the factory for `method`. A cached instance built
    /// by a previous factory is dropped.
    pub fn register<F>(&mut self, method: CompressionMethod, factory: F)
    where
        F: Fn() -> Result<Box<dyn Encoder>, CompressionError> + Send + Sync + 'static,
    {
        self.factories.insert(method, Box::new(factory));
        self.instances.remove(&method);
    }

    pub fn is_available(&self, method: CompressionMethod) -> bool {
        self.factories.contains_key(&method)
    }

    pub fn is_constructed(&self, method: CompressionMethod) -> bool {
        self.instances.contains_key(&method)
    }

    /// Drop all memoized encoders; the next resolve rebuilds and re-tunes.
    pub fn clear_instances(&mut self) {
        self.instances.clear();
    }

    /// Return the encoder for `method`, constructing and tuning it on first use.
    pub fn resolve(
        &mut self,
        method: CompressionMethod,
        tuning: &CodecTuning,
    ) -> Result<&mut dyn Encoder, CompressionError> {
        match self.instances.entry(method) {
            Entry::Occupied(slot) => Ok(slot.into_mut().as_mut()),
            Entry::Vacant(slot) => {
                let factory = self
                    .factories
                    .get(&method)
                    .ok_or(CompressionError::UnsupportedMethod { method_id: method.id() })?;
                let mut encoder = factory()?;
                let props = tuning.properties_for(method);
                if !props.is_empty() {
                    encoder.set_properties(&props)?;
                }
                debug!(method = %method, properties = props.len(), "constructed encoder");
                Ok(slot.insert(encoder).as_mut())
            }
        }
    }
}
