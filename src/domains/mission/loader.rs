use serde_yaml::Value;

use super::ports::MissionSource;
use super::types::{MissionPlan, Waypoint};
use crate::common::{MissionLoadError, MissionLoadResult};
use crate::domains::logger::MissionLogger;

/// Top-level key holding the waypoint list.
pub const WAYPOINTS_KEY: &str = "waypoints";

/// Read the mission document from `source` and turn it into a plan.
///
/// Only informational lines are written here; reporting a failure is left to
/// the caller so that a failed load produces exactly one error line.
pub fn load_mission(
    source: &dyn MissionSource,
    logger: &dyn MissionLogger,
) -> MissionLoadResult<MissionPlan> {
    let location = source.location();
    logger.info(&format!("Looking for mission file at {}", location));

    let text = source
        .read_mission()
        .map_err(|source| MissionLoadError::ConfigUnreadable {
            location: location.clone(),
            source,
        })?;

    let plan = parse_mission(&text)?;
    logger.info(&format!(
        "Mission file loaded: {} waypoint(s) from {}",
        plan.len(),
        location
    ));
    Ok(plan)
}

/// Parse a YAML mission document of the form `waypoints: [[x, y], ...]`.
pub fn parse_mission(text: &str) -> MissionLoadResult<MissionPlan> {
    let document: Value =
        serde_yaml::from_str(text).map_err(|e| MissionLoadError::ConfigMalformed {
            reason: e.to_string(),
        })?;

    let mapping = match document {
        Value::Mapping(mapping) => mapping,
        Value::Null => {
            return Err(MissionLoadError::ConfigMalformed {
                reason: "document is empty".to_string(),
            })
        }
        other => {
            return Err(MissionLoadError::ConfigMalformed {
                reason: format!("expected a mapping at top level, found {}", kind_of(&other)),
            })
        }
    };

    let raw = match mapping.get(WAYPOINTS_KEY) {
        None | Some(Value::Null) => return Err(MissionLoadError::ConfigMissingWaypoints),
        Some(value) => value.clone(),
    };

    let pairs: Vec<[f64; 2]> =
        serde_yaml::from_value(raw).map_err(|e| MissionLoadError::ConfigMalformed {
            reason: format!("'{}' must be a list of [x, y] pairs: {}", WAYPOINTS_KEY, e),
        })?;

    if let Some(index) = pairs
        .iter()
        .position(|[x, y]| !x.is_finite() || !y.is_finite())
    {
        return Err(MissionLoadError::ConfigMalformed {
            reason: format!("waypoint {} has a non-finite coordinate", index + 1),
        });
    }

    MissionPlan::new(pairs.into_iter().map(Waypoint::from).collect())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
