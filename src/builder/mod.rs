//! Pipeline assembly.
//!
//! [`FluxQueryBuilder`] appends one stage per call and owns the options and
//! parameter table of the build. [`FluxQueryBuilder::build`] consumes it and
//! returns the finished [`FluxQuery`].
//!
//! ```
//! use flux_builder::prelude::*;
//!
//! let query = FluxQueryBuilder::default()
//!     .from("telegraf")?
//!     .range(FluxTime::ago(FluxDuration::hours(1)), None)?
//!     .filter(RecordKey::MEASUREMENT.eq("cpu"))?
//!     .build();
//! assert!(query.to_flux_notation().starts_with("option params = {"));
//! # Ok::<(), flux_builder::FluxError>(())
//! ```

pub mod aggregates;
pub mod query;

use tracing::debug;

use crate::error::{FluxError, FluxResult};
use crate::filter::Condition;
use crate::options::FluxBuilderOptions;
use crate::params::Parameters;
use crate::template::FluxTemplate;
use crate::types::FluxTime;

pub use self::aggregates::{AggregateWindowOptions, WindowOptions};
pub use self::query::{FluxQuery, QueryRequest};

const PIPE: &str = "  |> ";

/// Builds one Flux query. Single use: [`build`](Self::build) consumes it.
#[derive(Debug, Clone, Default)]
pub struct FluxQueryBuilder {
    body: String,
    options: FluxBuilderOptions,
    params: Parameters,
}

impl FluxQueryBuilder {
    pub fn new(options: FluxBuilderOptions) -> Self {
        let params = Parameters::new(options.parameterized_types());
        Self {
            body: String::new(),
            options,
            params,
        }
    }

    pub fn options(&self) -> &FluxBuilderOptions {
        &self.options
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Append `|> <stage>` on a new line.
    fn pipe(&mut self, stage: &str) {
        if !self.body.is_empty() {
            self.body.push('\n');
        }
        self.body.push_str(PIPE);
        self.body.push_str(stage);
    }

    /// Sources open the pipeline, so they are only accepted first.
    fn ensure_source_first(&self, name: &str) -> FluxResult<()> {
        if self.body.is_empty() {
            Ok(())
        } else {
            Err(FluxError::invalid(
                name,
                "A source must be the first stage of the query.",
            ))
        }
    }

    /// `from(bucket: <bucket>)`
    pub fn from(mut self, bucket: &str) -> FluxResult<Self> {
        self.ensure_source_first("bucket")?;
        let bucket = self.params.bind("from_bucket", bucket)?;
        self.body.push_str(&format!("from(bucket: {})", bucket));
        Ok(self)
    }

    /// A custom source. Template arguments are bound.
    pub fn from_custom_flux(mut self, template: FluxTemplate) -> FluxResult<Self> {
        self.ensure_source_first("template")?;
        let text = self.params.bind_template(&template, "fromCustomFlux")?;
        self.body.push_str(&text);
        Ok(self)
    }

    /// A custom source built by `f`, with no protection against injection.
    pub fn from_custom_flux_unsafe<F>(mut self, f: F) -> FluxResult<Self>
    where
        F: FnOnce(&mut Parameters) -> FluxResult<String>,
    {
        self.ensure_source_first("flux")?;
        let text = f(&mut self.params)?;
        self.body.push_str(&text);
        Ok(self)
    }

    /// `range(start: .., stop: ..)`
    pub fn range(mut self, start: impl Into<FluxTime>, stop: Option<FluxTime>) -> FluxResult<Self> {
        let start: FluxTime = start.into();
        let mut stage = format!(
            "range(start: {}",
            start.render("range_start", &mut self.params)?
        );
        if let Some(stop) = stop {
            stage.push_str(", stop: ");
            stage.push_str(&stop.render("range_stop", &mut self.params)?);
        }
        stage.push(')');
        self.pipe(&stage);
        Ok(self)
    }

    /// `filter(fn: (r) => <condition>)`
    pub fn filter(mut self, condition: impl Into<Condition>) -> FluxResult<Self> {
        let condition = condition.into();
        let mut predicate = String::new();
        condition.evaluate(&mut predicate, &mut self.options, &mut self.params)?;
        self.pipe(&format!("filter(fn: (r) => {})", predicate));
        Ok(self)
    }

    /// `yield()` or `yield(name: ..)`. A blank name is treated as none.
    pub fn yield_(mut self, name: Option<&str>) -> FluxResult<Self> {
        let stage = match name.filter(|n| !n.trim().is_empty()) {
            Some(name) => format!("yield(name: {})", self.params.bind("yield_name", name)?),
            None => "yield()".to_string(),
        };
        self.pipe(&stage);
        Ok(self)
    }

    /// Adjust imports or `now` in the middle of a build.
    pub fn configure<F>(mut self, f: F) -> FluxResult<Self>
    where
        F: FnOnce(&mut FluxBuilderOptions) -> FluxResult<()>,
    {
        f(&mut self.options)?;
        Ok(self)
    }

    pub fn build(self) -> FluxQuery {
        debug!(
            parameters = self.params.len(),
            imports = self.options.imports().len(),
            "Built Flux query"
        );
        FluxQuery::new(self.body, self.options, self.params)
    }
}
