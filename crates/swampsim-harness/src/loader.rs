//! Dataset loading
//!
//! Loaders return a tensor in the representation a factorizer asks for and
//! never mutate their source.

use crate::factorizer::{Representation, TensorInput};
use anyhow::anyhow;
use std::collections::BTreeMap;
use swampsim_core::DenseND;

/// Source of named tensors
pub trait DatasetLoader {
    fn load(&self, name: &str, representation: Representation) -> anyhow::Result<TensorInput>;
}

/// Loader over tensors held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    datasets: BTreeMap<String, DenseND<f64>>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tensor, returning any previous one under the same name
    pub fn insert(&mut self, name: impl Into<String>, tensor: DenseND<f64>) -> Option<DenseND<f64>> {
        self.datasets.insert(name.into(), tensor)
    }

    pub fn with_dataset(mut self, name: impl Into<String>, tensor: DenseND<f64>) -> Self {
        self.insert(name, tensor);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl DatasetLoader for InMemoryLoader {
    fn load(&self, name: &str, representation: Representation) -> anyhow::Result<TensorInput> {
        let tensor = self
            .datasets
            .get(name)
            .ok_or_else(|| anyhow!("unknown dataset '{}'", name))?;
        Ok(TensorInput::from_dense(tensor.clone(), representation)?)
    }
}
