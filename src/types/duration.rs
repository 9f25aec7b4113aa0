use serde::{Deserialize, Serialize};

use crate::error::{FluxError, FluxResult};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Units of a Flux duration literal, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DurationUnit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    /// Fixed-length units used when encoding a nanosecond count, largest first.
    const FIXED: [DurationUnit; 7] = [
        DurationUnit::Day,
        DurationUnit::Hour,
        DurationUnit::Minute,
        DurationUnit::Second,
        DurationUnit::Millisecond,
        DurationUnit::Microsecond,
        DurationUnit::Nanosecond,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            DurationUnit::Nanosecond => "ns",
            DurationUnit::Microsecond => "us",
            DurationUnit::Millisecond => "ms",
            DurationUnit::Second => "s",
            DurationUnit::Minute => "m",
            DurationUnit::Hour => "h",
            DurationUnit::Day => "d",
            DurationUnit::Week => "w",
            DurationUnit::Month => "mo",
            DurationUnit::Year => "y",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "ns" => Some(DurationUnit::Nanosecond),
            "us" | "µs" => Some(DurationUnit::Microsecond),
            "ms" => Some(DurationUnit::Millisecond),
            "s" => Some(DurationUnit::Second),
            "m" => Some(DurationUnit::Minute),
            "h" => Some(DurationUnit::Hour),
            "d" => Some(DurationUnit::Day),
            "w" => Some(DurationUnit::Week),
            "mo" => Some(DurationUnit::Month),
            "y" => Some(DurationUnit::Year),
            _ => None,
        }
    }

    /// Length in nanoseconds. `None` for calendar units.
    pub fn nanos(&self) -> Option<i128> {
        match self {
            DurationUnit::Nanosecond => Some(1),
            DurationUnit::Microsecond => Some(1_000),
            DurationUnit::Millisecond => Some(1_000_000),
            DurationUnit::Second => Some(NANOS_PER_SECOND),
            DurationUnit::Minute => Some(60 * NANOS_PER_SECOND),
            DurationUnit::Hour => Some(3_600 * NANOS_PER_SECOND),
            DurationUnit::Day => Some(86_400 * NANOS_PER_SECOND),
            DurationUnit::Week => Some(7 * 86_400 * NANOS_PER_SECOND),
            DurationUnit::Month | DurationUnit::Year => None,
        }
    }

    pub fn is_calendar(&self) -> bool {
        self.nanos().is_none()
    }
}

/// A Flux duration: a sign plus magnitude/unit components.
///
/// Components are kept largest unit first with no zero magnitudes and at
/// most one entry per unit, so two durations built from the same parts in
/// any order compare equal and render identically. Flux reads each
/// magnitude as an int64, so none exceeds [`FluxDuration::MAX_MAGNITUDE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FluxDuration {
    negative: bool,
    components: Vec<(DurationUnit, i64)>,
}

impl FluxDuration {
    pub const MAX_MAGNITUDE: u64 = i64::MAX as u64;

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn new(magnitude: u32, unit: DurationUnit) -> Self {
        let mut duration = Self::zero();
        if magnitude > 0 {
            duration.components.push((unit, i64::from(magnitude)));
        }
        duration
    }

    /// Single-component duration of any magnitude up to
    /// [`MAX_MAGNITUDE`](Self::MAX_MAGNITUDE).
    pub fn try_new(magnitude: u64, unit: DurationUnit) -> FluxResult<Self> {
        Self::zero().with(magnitude, unit)
    }

    pub fn years(n: u32) -> Self {
        Self::new(n, DurationUnit::Year)
    }

    pub fn months(n: u32) -> Self {
        Self::new(n, DurationUnit::Month)
    }

    pub fn weeks(n: u32) -> Self {
        Self::new(n, DurationUnit::Week)
    }

    pub fn days(n: u32) -> Self {
        Self::new(n, DurationUnit::Day)
    }

    pub fn hours(n: u32) -> Self {
        Self::new(n, DurationUnit::Hour)
    }

    pub fn minutes(n: u32) -> Self {
        Self::new(n, DurationUnit::Minute)
    }

    pub fn seconds(n: u32) -> Self {
        Self::new(n, DurationUnit::Second)
    }

    pub fn milliseconds(n: u32) -> Self {
        Self::new(n, DurationUnit::Millisecond)
    }

    pub fn microseconds(n: u32) -> Self {
        Self::new(n, DurationUnit::Microsecond)
    }

    pub fn nanoseconds(n: u32) -> Self {
        Self::new(n, DurationUnit::Nanosecond)
    }

    /// Add `magnitude` of `unit`, merging with an existing component.
    ///
    /// Fails when the magnitude, or the merged one, exceeds
    /// [`MAX_MAGNITUDE`](Self::MAX_MAGNITUDE).
    pub fn with(mut self, magnitude: u64, unit: DurationUnit) -> FluxResult<Self> {
        let too_large = || {
            FluxError::invalid(
                "duration",
                format!(
                    "magnitude of '{}' exceeds {}",
                    unit.suffix(),
                    Self::MAX_MAGNITUDE
                ),
            )
        };
        let magnitude = i64::try_from(magnitude).map_err(|_| too_large())?;
        if magnitude == 0 {
            return Ok(self);
        }
        match self.components.binary_search_by(|(u, _)| unit.cmp(u)) {
            Ok(i) => {
                let existing = &mut self.components[i].1;
                *existing = existing.checked_add(magnitude).ok_or_else(too_large)?;
            }
            Err(i) => self.components.insert(i, (unit, magnitude)),
        }
        Ok(self)
    }

    /// Flip the sign. The zero duration stays unsigned.
    pub fn negate(mut self) -> Self {
        self.negative = !self.negative && !self.is_zero();
        self
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether any component is a calendar unit (`mo`, `y`).
    pub fn is_calendar(&self) -> bool {
        self.components.iter().any(|(unit, _)| unit.is_calendar())
    }

    /// Components, largest unit first.
    pub fn components(&self) -> &[(DurationUnit, i64)] {
        &self.components
    }

    /// Canonical encoding of a fixed-length duration.
    ///
    /// Every host duration type goes through here: the count is split into
    /// days down to nanoseconds, dropping empty units. Fails when the day
    /// count would not fit a Flux magnitude.
    pub fn from_nanos(nanos: i128) -> FluxResult<Self> {
        let abs = nanos.unsigned_abs();
        let secs = u64::try_from(abs / NANOS_PER_SECOND as u128).map_err(|_| {
            FluxError::invalid("duration", format!("{}ns is too long for Flux", nanos))
        })?;
        let subsec = (abs % NANOS_PER_SECOND as u128) as u32;
        Ok(Self::from_parts(nanos < 0, secs, subsec))
    }

    /// Split whole seconds and a sub-second remainder into fixed units.
    /// `secs / 86_400` stays below 2^47, so every magnitude fits.
    fn from_parts(negative: bool, secs: u64, subsec_nanos: u32) -> Self {
        let mut remaining = u128::from(secs) * NANOS_PER_SECOND as u128 + u128::from(subsec_nanos);
        let mut duration = Self::zero();
        for unit in DurationUnit::FIXED {
            let size = unit.nanos().unwrap_or(1) as u128;
            let count = remaining / size;
            remaining %= size;
            if count > 0 {
                duration.components.push((unit, count as i64));
            }
        }
        if negative { duration.negate() } else { duration }
    }

    /// Total length in nanoseconds. Fails for calendar durations, whose
    /// length depends on the date they are applied to.
    pub fn total_nanos(&self) -> FluxResult<i128> {
        let mut total: i128 = 0;
        for (unit, magnitude) in &self.components {
            let size = unit.nanos().ok_or_else(|| {
                FluxError::invalid(
                    "duration",
                    format!("'{}' is a calendar unit with no fixed length", unit.suffix()),
                )
            })?;
            total = total.saturating_add(size.saturating_mul(i128::from(*magnitude)));
        }
        Ok(if self.negative { -total } else { total })
    }
}

/// Deserialized components go back through [`FluxDuration::with`], so the
/// magnitude bound and the canonical order hold for stored durations too.
impl<'de> Deserialize<'de> for FluxDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Stored {
            negative: bool,
            components: Vec<(DurationUnit, u64)>,
        }

        let stored = Stored::deserialize(deserializer)?;
        let duration = stored
            .components
            .into_iter()
            .try_fold(Self::zero(), |d, (unit, magnitude)| d.with(magnitude, unit))
            .map_err(serde::de::Error::custom)?;
        Ok(if stored.negative { duration.negate() } else { duration })
    }
}

impl From<std::time::Duration> for FluxDuration {
    fn from(d: std::time::Duration) -> Self {
        Self::from_parts(false, d.as_secs(), d.subsec_nanos())
    }
}

impl From<chrono::Duration> for FluxDuration {
    fn from(d: chrono::Duration) -> Self {
        // Whole seconds and the sub-second remainder share the sign of `d`.
        let secs = d.num_seconds();
        let rem = (d - chrono::Duration::seconds(secs))
            .num_nanoseconds()
            .unwrap_or(0);
        Self::from_parts(
            secs < 0 || rem < 0,
            secs.unsigned_abs(),
            rem.unsigned_abs() as u32,
        )
    }
}

impl std::fmt::Display for FluxDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::notation::ToFlux;
        f.write_str(&self.to_flux_notation())
    }
}

impl std::str::FromStr for FluxDuration {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_duration(s)
    }
}
