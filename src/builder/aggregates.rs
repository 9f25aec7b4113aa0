//! Aggregate and window stages.

use crate::error::{FluxError, FluxResult};
use crate::options::FluxBuilderOptions;
use crate::params::Parameters;
use crate::types::{FluxDuration, FluxIdentifier, FluxLocation};

use super::FluxQueryBuilder;

/// Optional arguments of `window()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowOptions {
    pub period: Option<FluxDuration>,
    pub offset: Option<FluxDuration>,
    pub location: Option<FluxLocation>,
    pub time_column: Option<String>,
    pub start_column: Option<String>,
    pub stop_column: Option<String>,
    /// Flux default is `false`.
    pub create_empty: bool,
}

/// Optional arguments of `aggregateWindow()`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateWindowOptions {
    pub period: Option<FluxDuration>,
    pub offset: Option<FluxDuration>,
    pub location: Option<FluxLocation>,
    pub column: Option<String>,
    pub time_src: Option<String>,
    pub time_dst: Option<String>,
    /// Flux default is `true`.
    pub create_empty: bool,
}

impl Default for AggregateWindowOptions {
    fn default() -> Self {
        Self {
            period: None,
            offset: None,
            location: None,
            column: None,
            time_src: None,
            time_dst: None,
            create_empty: true,
        }
    }
}

/// Named call arguments, each value bound under `<function>_<argument>`.
struct Arguments<'a> {
    function: &'a str,
    params: &'a mut Parameters,
    parts: Vec<String>,
}

impl<'a> Arguments<'a> {
    fn new(function: &'a str, params: &'a mut Parameters) -> Self {
        Self {
            function,
            params,
            parts: Vec::new(),
        }
    }

    fn raw(&mut self, name: &str, text: impl Into<String>) {
        self.parts.push(format!("{}: {}", name, text.into()));
    }

    fn bind(&mut self, name: &str, value: impl crate::types::ToFluxValue) -> FluxResult<()> {
        let prefix = format!("{}_{}", self.function, name);
        let text = self.params.bind(&prefix, value)?;
        self.raw(name, text);
        Ok(())
    }

    fn bind_opt<T: crate::types::ToFluxValue>(&mut self, name: &str, value: Option<T>) -> FluxResult<()> {
        match value {
            Some(value) => self.bind(name, value),
            None => Ok(()),
        }
    }

    fn location(
        &mut self,
        location: Option<&FluxLocation>,
        options: &mut FluxBuilderOptions,
    ) -> FluxResult<()> {
        if let Some(location) = location {
            let text = location.render(options, self.params)?;
            self.raw("location", text);
        }
        Ok(())
    }

    fn finish(self) -> String {
        format!("{}({})", self.function, self.parts.join(", "))
    }
}

impl FluxQueryBuilder {
    /// `<function>()` or `<function>(column: ..)`.
    pub fn aggregate(mut self, function: FluxIdentifier, column: Option<&str>) -> FluxResult<Self> {
        let mut args = Arguments::new(function.as_str(), &mut self.params);
        args.bind_opt("column", column)?;
        let stage = args.finish();
        self.pipe(&stage);
        Ok(self)
    }

    pub fn sum(self, column: Option<&str>) -> FluxResult<Self> {
        self.aggregate(FluxIdentifier::SUM, column)
    }

    pub fn count(self, column: Option<&str>) -> FluxResult<Self> {
        self.aggregate(FluxIdentifier::COUNT, column)
    }

    pub fn mean(self, column: Option<&str>) -> FluxResult<Self> {
        self.aggregate(FluxIdentifier::MEAN, column)
    }

    pub fn mode(self, column: Option<&str>) -> FluxResult<Self> {
        self.aggregate(FluxIdentifier::MODE, column)
    }

    pub fn spread(self, column: Option<&str>) -> FluxResult<Self> {
        self.aggregate(FluxIdentifier::SPREAD, column)
    }

    /// `movingAverage(n: ..)`; `n` must be at least 1.
    pub fn moving_average(mut self, n: u32) -> FluxResult<Self> {
        if n == 0 {
            return Err(FluxError::invalid("n", "The moving average needs at least one point."));
        }
        let mut args = Arguments::new("movingAverage", &mut self.params);
        args.bind("n", i64::from(n))?;
        let stage = args.finish();
        self.pipe(&stage);
        Ok(self)
    }

    pub fn timed_moving_average(
        mut self,
        every: FluxDuration,
        period: FluxDuration,
        column: Option<&str>,
    ) -> FluxResult<Self> {
        let mut args = Arguments::new("timedMovingAverage", &mut self.params);
        args.bind("every", every)?;
        args.bind("period", period)?;
        args.bind_opt("column", column)?;
        let stage = args.finish();
        self.pipe(&stage);
        Ok(self)
    }

    pub fn window(mut self, every: FluxDuration, options: WindowOptions) -> FluxResult<Self> {
        let mut args = Arguments::new("window", &mut self.params);
        args.bind("every", every)?;
        args.bind_opt("period", options.period)?;
        args.bind_opt("offset", options.offset)?;
        args.location(options.location.as_ref(), &mut self.options)?;
        args.bind_opt("timeColumn", options.time_column)?;
        args.bind_opt("startColumn", options.start_column)?;
        args.bind_opt("stopColumn", options.stop_column)?;
        if options.create_empty {
            args.bind("createEmpty", true)?;
        }
        let stage = args.finish();
        self.pipe(&stage);
        Ok(self)
    }

    pub fn aggregate_window(
        mut self,
        function: FluxIdentifier,
        every: FluxDuration,
        options: AggregateWindowOptions,
    ) -> FluxResult<Self> {
        let mut args = Arguments::new("aggregateWindow", &mut self.params);
        args.bind("every", every)?;
        args.raw("fn", function.as_str());
        args.bind_opt("period", options.period)?;
        args.bind_opt("offset", options.offset)?;
        args.location(options.location.as_ref(), &mut self.options)?;
        args.bind_opt("column", options.column)?;
        args.bind_opt("timeSrc", options.time_src)?;
        args.bind_opt("timeDst", options.time_dst)?;
        if !options.create_empty {
            args.bind("createEmpty", false)?;
        }
        let stage = args.finish();
        self.pipe(&stage);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{FluxPackage, ParameterizedTypes};
    use pretty_assertions::assert_eq;

    fn inline() -> FluxQueryBuilder {
        FluxQueryBuilder::new(FluxBuilderOptions::new(ParameterizedTypes::NONE))
            .from("b")
            .unwrap()
    }

    fn last_stage(builder: FluxQueryBuilder) -> String {
        let query = builder.build();
        query
            .body()
            .rsplit("|> ")
            .next()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_simple_aggregates() {
        assert_eq!(last_stage(inline().sum(None).unwrap()), "sum()");
        assert_eq!(last_stage(inline().count(Some("host")).unwrap()), r#"count(column: "host")"#);
        assert_eq!(last_stage(inline().mean(None).unwrap()), "mean()");
        assert_eq!(last_stage(inline().mode(None).unwrap()), "mode()");
        assert_eq!(last_stage(inline().spread(None).unwrap()), "spread()");
        assert_eq!(
            last_stage(inline().aggregate(FluxIdentifier::MEDIAN, None).unwrap()),
            "median()"
        );
    }

    #[test]
    fn test_column_bound_per_function() {
        let query = FluxQueryBuilder::default()
            .mean(Some("usage"))
            .unwrap()
            .build();
        assert_eq!(query.body(), "  |> mean(column: params.mean_column_0)");
    }

    #[test]
    fn test_moving_averages() {
        assert_eq!(last_stage(inline().moving_average(5).unwrap()), "movingAverage(n: 5)");
        assert!(inline().moving_average(0).is_err());
        assert_eq!(
            last_stage(
                inline()
                    .timed_moving_average(FluxDuration::minutes(1), FluxDuration::minutes(5), None)
                    .unwrap()
            ),
            "timedMovingAverage(every: 1m, period: 5m)"
        );
    }

    #[test]
    fn test_window() {
        let stage = last_stage(
            inline()
                .window(
                    FluxDuration::hours(1),
                    WindowOptions {
                        offset: Some(FluxDuration::minutes(15)),
                        location: Some(FluxLocation::named("Europe/Prague")),
                        create_empty: true,
                        ..Default::default()
                    },
                )
                .unwrap(),
        );
        assert_eq!(
            stage,
            r#"window(every: 1h, offset: 15m, location: timezone.location(name: "Europe/Prague"), createEmpty: true)"#
        );
        assert_eq!(
            last_stage(inline().window(FluxDuration::days(1), WindowOptions::default()).unwrap()),
            "window(every: 1d)"
        );
    }

    #[test]
    fn test_aggregate_window() {
        let builder = inline()
            .aggregate_window(
                FluxIdentifier::MEAN,
                FluxDuration::minutes(10),
                AggregateWindowOptions {
                    location: Some(FluxLocation::Utc),
                    create_empty: false,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(builder.options().imports().contains(&FluxPackage::TIMEZONE));
        assert_eq!(
            last_stage(builder),
            "aggregateWindow(every: 10m, fn: mean, location: timezone.utc, createEmpty: false)"
        );
        assert_eq!(
            last_stage(
                inline()
                    .aggregate_window(
                        FluxIdentifier::MAX,
                        FluxDuration::hours(1),
                        AggregateWindowOptions::default()
                    )
                    .unwrap()
            ),
            "aggregateWindow(every: 1h, fn: max)"
        );
    }
}
