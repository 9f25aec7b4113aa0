use chrono::{DateTime, TimeZone, Utc};

use super::duration::FluxDuration;
use crate::error::FluxResult;
use crate::options::{FluxBuilderOptions, FluxPackage};
use crate::params::Parameters;

/// A bound of a `range` stage.
#[derive(Debug, Clone, PartialEq)]
pub enum FluxTime {
    /// A fixed instant.
    Absolute(DateTime<Utc>),
    /// Relative to `now()`; negative durations point into the past.
    Relative(FluxDuration),
    /// `now()`, honouring an `option now` override.
    Now,
}

impl FluxTime {
    /// A relative bound `d` before now.
    pub fn ago(d: impl Into<FluxDuration>) -> Self {
        FluxTime::Relative(d.into().negate())
    }

    /// Render the bound, binding the instant or duration under `prefix`.
    pub fn render(&self, prefix: &str, params: &mut Parameters) -> FluxResult<String> {
        match self {
            FluxTime::Absolute(instant) => params.bind(prefix, instant),
            FluxTime::Relative(duration) => params.bind(prefix, duration),
            FluxTime::Now => Ok("now()".to_string()),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FluxTime {
    fn from(instant: DateTime<Tz>) -> Self {
        FluxTime::Absolute(instant.with_timezone(&Utc))
    }
}

impl From<FluxDuration> for FluxTime {
    fn from(duration: FluxDuration) -> Self {
        FluxTime::Relative(duration)
    }
}

impl From<chrono::Duration> for FluxTime {
    fn from(duration: chrono::Duration) -> Self {
        FluxTime::Relative(duration.into())
    }
}

/// Time zone used by window stages.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FluxLocation {
    #[default]
    Utc,
    /// IANA zone name, e.g. `Europe/Prague`.
    Named(String),
    /// Fixed offset from UTC.
    Fixed(FluxDuration),
}

impl FluxLocation {
    pub fn named(name: impl Into<String>) -> Self {
        FluxLocation::Named(name.into())
    }

    pub fn fixed(offset: impl Into<FluxDuration>) -> Self {
        FluxLocation::Fixed(offset.into())
    }

    /// Render a `timezone` package expression and register the import.
    pub fn render(
        &self,
        options: &mut FluxBuilderOptions,
        params: &mut Parameters,
    ) -> FluxResult<String> {
        options.import_package(FluxPackage::TIMEZONE);
        match self {
            FluxLocation::Utc => Ok("timezone.utc".to_string()),
            FluxLocation::Named(name) => Ok(format!(
                "timezone.location(name: {})",
                params.bind("location_name", name.as_str())?
            )),
            FluxLocation::Fixed(offset) => Ok(format!(
                "timezone.fixed(offset: {})",
                params.bind("location_offset", offset)?
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParameterizedTypes;

    #[test]
    fn test_ago_is_negative() {
        let t = FluxTime::ago(FluxDuration::hours(1));
        assert_eq!(t, FluxTime::Relative(FluxDuration::hours(1).negate()));
    }

    #[test]
    fn test_render_now() {
        let mut params = Parameters::new(ParameterizedTypes::ALL);
        assert_eq!(FluxTime::Now.render("range_start", &mut params).unwrap(), "now()");
        assert!(params.is_empty());
    }

    #[test]
    fn test_location_imports_timezone() {
        let mut options = FluxBuilderOptions::default();
        let mut params = Parameters::new(ParameterizedTypes::NONE);
        let text = FluxLocation::named("Europe/Prague")
            .render(&mut options, &mut params)
            .unwrap();
        assert_eq!(text, r#"timezone.location(name: "Europe/Prague")"#);
        assert!(options.imports().contains(&FluxPackage::TIMEZONE));

        let fixed = FluxLocation::fixed(FluxDuration::hours(2))
            .render(&mut options, &mut params)
            .unwrap();
        assert_eq!(fixed, "timezone.fixed(offset: 2h)");
        assert_eq!(options.imports().len(), 1);
    }
}
