// src/engine.rs
use crate::error::StencilError;
use crate::executor::{Executor, ExecutorImpl, SyncExecutor};
use crate::loader::{parse_dataset, parse_template};
use stencil_jpath::Scope;
use stencil_template::{Assembly, EngineConfig, assemble_with, assemble_with_report, resolve_in};
use stencil_types::{Condition, Dataset, Document, Template};

/// The evaluation engine: a configuration plus the executor used for batches.
///
/// An `Engine` holds no per-document state, so one instance can serve any
/// number of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
    executor: ExecutorImpl,
}

impl Engine {
    /// An engine with default limits and the default executor.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn executor(&self) -> &ExecutorImpl {
        &self.executor
    }

    /// Resolves `template` against `dataset`.
    pub fn assemble(&self, template: &Template, dataset: &Dataset) -> Document {
        assemble_with(template, dataset, &self.config)
    }

    /// Like [`Engine::assemble`], also returning loop truncations and bad
    /// `foreach` sources.
    pub fn assemble_with_report(&self, template: &Template, dataset: &Dataset) -> Assembly {
        assemble_with_report(template, dataset, &self.config)
    }

    /// Parses both inputs from JSON and assembles them.
    pub fn assemble_json(&self, template: &str, dataset: &str) -> Result<Document, StencilError> {
        let template = parse_template(template)?;
        let dataset = parse_dataset(dataset)?;
        Ok(self.assemble(&template, &dataset))
    }

    /// Evaluates one template against many datasets. Results are returned in
    /// the order of `datasets`.
    pub fn assemble_batch(&self, template: &Template, datasets: Vec<Dataset>) -> Vec<Document> {
        log::debug!(
            "Assembling {} datasets on {} (parallelism {})",
            datasets.len(),
            self.executor.name(),
            self.executor.parallelism()
        );
        let config = self.config;
        self.executor
            .execute_all(datasets, |dataset| assemble_with(template, &dataset, &config))
    }

    /// Evaluates a standalone condition.
    pub fn check(&self, condition: &Condition, dataset: &Dataset) -> bool {
        stencil_rules::evaluate_in(condition, dataset)
    }

    /// Resolves the placeholders of a single string.
    pub fn resolve(&self, text: &str, dataset: &Dataset) -> String {
        resolve_in(text, &Scope::new(dataset), self.config.math_precision())
    }
}

/// A builder for creating an [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    executor: Option<ExecutorImpl>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Lowers the `for` ceiling. Values above the hard limit are clamped.
    pub fn with_for_ceiling(mut self, ceiling: usize) -> Self {
        self.config = self.config.with_for_ceiling(ceiling);
        self
    }

    pub fn with_foreach_ceiling(mut self, ceiling: usize) -> Self {
        self.config = self.config.with_foreach_ceiling(ceiling);
        self
    }

    pub fn with_while_ceiling(mut self, ceiling: usize) -> Self {
        self.config = self.config.with_while_ceiling(ceiling);
        self
    }

    /// Sets the vertical gap between loop-generated siblings.
    pub fn with_stack_gap(mut self, gap: f64) -> Self {
        self.config = self.config.with_stack_gap(gap);
        self
    }

    /// Sets the number of decimals in `{math:...}` results.
    pub fn with_math_precision(mut self, precision: usize) -> Self {
        self.config = self.config.with_math_precision(precision);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_executor(mut self, executor: ExecutorImpl) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Forces batches to run on the calling thread.
    pub fn sequential(self) -> Self {
        self.with_executor(ExecutorImpl::Sync(SyncExecutor::new()))
    }

    pub fn build(self) -> Engine {
        Engine {
            config: self.config,
            executor: self.executor.unwrap_or_default(),
        }
    }
}
