//! Rewriting the simulation window of a feeder.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{GlmError, Result};
use crate::glm::{BlockKind, Tree, ARGUMENT, NAME};

/// Directive argument prefix carrying the solver's time step.
const MINIMUM_TIMESTEP: &str = "minimum_timestep";
/// Placeholder file name of template meter recorders.
const METER_RECORDER_TEMPLATE: &str = "meterRecorder_XXX.csv";

/// Unit of the simulation length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Self::Minutes => 60,
            Self::Hours => 3600,
            Self::Days => 86_400,
        }
    }

    /// Recording interval in seconds; days are still sampled hourly.
    pub fn interval(&self) -> i64 {
        match self {
            Self::Minutes => 60,
            Self::Hours | Self::Days => 3600,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = GlmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            other => Err(GlmError::time_adjustment(format!("unknown time unit '{other}'"))),
        }
    }
}

/// Move the simulation window to start at `start_date` (`YYYY-MM-DD`) and
/// run for `length` units.
///
/// - clock blocks get quoted `starttime`, `timestamp` and `stoptime`;
/// - recorders and collectors get the matching `interval`, and a template
///   meter recorder file is renamed after its recorder;
/// - a `minimum_timestep=...` directive is set to the interval.
///
/// Only root nodes are touched.
pub fn adjust_time(tree: &mut Tree, length: i64, unit: TimeUnit, start_date: &str) -> Result<()> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
        .map_err(|e| GlmError::time_adjustment(format!("invalid start date '{start_date}': {e}")))?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| GlmError::time_adjustment("invalid start time"))?;
    let stop = length
        .checked_mul(unit.seconds())
        .and_then(TimeDelta::try_seconds)
        .and_then(|span| start.checked_add_signed(span))
        .ok_or_else(|| GlmError::time_adjustment(format!("simulation length {length} out of range")))?;
    let interval = unit.interval().to_string();

    for (_, node) in tree.iter_mut() {
        match node.kind() {
            Some(BlockKind::Clock) => {
                node.set("starttime", quoted(&start));
                node.set("timestamp", quoted(&start));
                node.set("stoptime", quoted(&stop));
            }
            Some(BlockKind::Object)
                if matches!(node.object_type(), Some("recorder") | Some("collector")) =>
            {
                node.set("interval", interval.as_str());
                if node.get("file") == Some(METER_RECORDER_TEMPLATE) {
                    let file = format!("meterRecorder_{}.csv", node.get(NAME).unwrap_or_default());
                    node.set("file", file);
                }
            }
            Some(BlockKind::Directive)
                if node.get(ARGUMENT).is_some_and(|a| a.starts_with(MINIMUM_TIMESTEP)) =>
            {
                node.set(ARGUMENT, format!("{MINIMUM_TIMESTEP}={interval}"));
            }
            _ => {}
        }
    }
    Ok(())
}

fn quoted(time: &NaiveDateTime) -> String {
    format!("'{}'", time.format("%Y-%m-%d %H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glm::{self, NodeId};

    const FEEDER: &str = "#set minimum_timestep=60;\n\
        clock { timezone PST+8PDT; starttime '2000-01-01 0:00:00'; };\n\
        object recorder { name r1; file meterRecorder_XXX.csv; interval 60; };\n\
        object collector { name c1; file losses.csv; };\n\
        object node { name n1; };";

    #[test]
    fn test_adjust_hours() {
        let mut tree = glm::parse(FEEDER).unwrap();
        adjust_time(&mut tree, 100, TimeUnit::Hours, "2000-09-01").unwrap();

        let directive = tree.get(NodeId(0)).unwrap();
        assert_eq!(directive.get(ARGUMENT), Some("minimum_timestep=3600"));

        let clock = tree.get(NodeId(1)).unwrap();
        assert_eq!(clock.get("starttime"), Some("'2000-09-01 00:00:00'"));
        assert_eq!(clock.get("timestamp"), Some("'2000-09-01 00:00:00'"));
        assert_eq!(clock.get("stoptime"), Some("'2000-09-05 04:00:00'"));
        assert_eq!(clock.get("timezone"), Some("PST+8PDT"));

        let recorder = tree.get(NodeId(2)).unwrap();
        assert_eq!(recorder.get("interval"), Some("3600"));
        assert_eq!(recorder.get("file"), Some("meterRecorder_r1.csv"));

        let collector = tree.get(NodeId(3)).unwrap();
        assert_eq!(collector.get("interval"), Some("3600"));
        assert_eq!(collector.get("file"), Some("losses.csv"));

        assert!(!tree.get(NodeId(4)).unwrap().contains_key("interval"));
    }

    #[test]
    fn test_adjust_minutes_and_days() {
        let mut tree = glm::parse(FEEDER).unwrap();
        adjust_time(&mut tree, 90, TimeUnit::Minutes, "2012-02-28").unwrap();
        let clock = tree.get(NodeId(1)).unwrap();
        assert_eq!(clock.get("stoptime"), Some("'2012-02-28 01:30:00'"));
        assert_eq!(tree.get(NodeId(2)).unwrap().get("interval"), Some("60"));

        adjust_time(&mut tree, 2, TimeUnit::Days, "2012-02-28").unwrap();
        let clock = tree.get(NodeId(1)).unwrap();
        assert_eq!(clock.get("stoptime"), Some("'2012-03-01 00:00:00'"));
        assert_eq!(tree.get(NodeId(2)).unwrap().get("interval"), Some("3600"));
    }

    #[test]
    fn test_time_unit_from_str() {
        assert_eq!("Hours".parse::<TimeUnit>().unwrap(), TimeUnit::Hours);
        assert!("weeks".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn test_invalid_start_date() {
        let mut tree = glm::parse(FEEDER).unwrap();
        let err = adjust_time(&mut tree, 1, TimeUnit::Days, "09/01/2000").unwrap_err();
        assert!(matches!(err, GlmError::InvalidTimeAdjustment { .. }));
    }
}
