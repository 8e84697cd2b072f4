//! Attaching measurement recorders and collectors to a feeder.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::topology::{FROM, TO};
use crate::error::{GlmError, Result};
use crate::glm::{Node, Tree, NAME, OBJECT, PARENT};

/// Recorder group assigned to links touching a swing bus.
pub const SWING_GROUP: &str = "swingKids";

const LOSS_PROPERTIES: &str = "sum(power_losses_A.real),sum(power_losses_A.imag),\
sum(power_losses_B.real),sum(power_losses_B.imag),\
sum(power_losses_C.real),sum(power_losses_C.imag)";

/// The measurement templates that can be attached to a feeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderKind {
    Regulator,
    Voltage,
    Capacitor,
    Climate,
    Inverter,
    Windmill,
    CollectorVoltage,
    OverheadLosses,
    UndergroundLosses,
    TriplexLosses,
    TransformerLosses,
}

/// What a recorder kind attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderTemplate {
    /// `recorder` (per parent object) or `collector` (per object class)
    pub object: &'static str,
    /// Comma-separated list of recorded properties
    pub property: &'static str,
    /// Output file; for recorders this is replaced per parent
    pub file: &'static str,
    /// Collector group expression, `class=<type>`
    pub group: Option<&'static str>,
}

impl RecorderKind {
    /// Every kind.
    pub const ALL: [RecorderKind; 11] = [
        Self::Regulator,
        Self::Voltage,
        Self::Capacitor,
        Self::Climate,
        Self::Inverter,
        Self::Windmill,
        Self::CollectorVoltage,
        Self::OverheadLosses,
        Self::UndergroundLosses,
        Self::TriplexLosses,
        Self::TransformerLosses,
    ];

    /// The name used in file names and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Regulator => "Regulator",
            Self::Voltage => "Voltage",
            Self::Capacitor => "Capacitor",
            Self::Climate => "Climate",
            Self::Inverter => "Inverter",
            Self::Windmill => "Windmill",
            Self::CollectorVoltage => "CollectorVoltage",
            Self::OverheadLosses => "OverheadLosses",
            Self::UndergroundLosses => "UndergroundLosses",
            Self::TriplexLosses => "TriplexLosses",
            Self::TransformerLosses => "TransformerLosses",
        }
    }

    /// The template attached for this kind.
    pub fn template(&self) -> RecorderTemplate {
        let recorder = |property: &'static str, file: &'static str| RecorderTemplate {
            object: "recorder",
            property,
            file,
            group: None,
        };
        let collector = |group: &'static str, property: &'static str, file: &'static str| RecorderTemplate {
            object: "collector",
            property,
            file,
            group: Some(group),
        };
        match self {
            Self::Regulator => recorder(
                "tap_A,tap_B,tap_C,power_in_A.real,power_in_A.imag,power_in_B.real,power_in_B.imag,\
                 power_in_C.real,power_in_C.imag,power_in.real,power_in.imag",
                "Regulator_Y.csv",
            ),
            Self::Voltage => recorder(
                "voltage_1.real,voltage_1.imag,voltage_2.real,voltage_2.imag,voltage_12.real,voltage_12.imag",
                "Voltage_Y.csv",
            ),
            Self::Capacitor => recorder("switchA,switchB,switchC", "Capacitor_Y.csv"),
            Self::Climate => recorder(
                "temperature,solar_direct,wind_speed,rainfall,snowdepth",
                "climate.csv",
            ),
            Self::Inverter => recorder(
                "power_A.real,power_A.imag,power_B.real,power_B.imag,power_C.real,power_C.imag",
                "inverter_Y.csv",
            ),
            Self::Windmill => recorder(
                "voltage_A.real,voltage_A.imag,voltage_B.real,voltage_B.imag,voltage_C.real,voltage_C.imag,\
                 current_A.real,current_A.imag,current_B.real,current_B.imag,current_C.real,current_C.imag",
                "windmill_Y.csv",
            ),
            Self::CollectorVoltage => collector(
                "class=triplex_meter",
                "min(voltage_12.mag),mean(voltage_12.mag),max(voltage_12.mag),std(voltage_12.mag)",
                "VoltageJiggle.csv",
            ),
            Self::OverheadLosses => {
                collector("class=overhead_line", LOSS_PROPERTIES, "OverheadLosses.csv")
            }
            Self::UndergroundLosses => {
                collector("class=underground_line", LOSS_PROPERTIES, "UndergroundLosses.csv")
            }
            Self::TriplexLosses => collector("class=triplex_line", LOSS_PROPERTIES, "TriplexLosses.csv"),
            Self::TransformerLosses => {
                collector("class=transformer", LOSS_PROPERTIES, "TransformerLosses.csv")
            }
        }
    }
}

impl fmt::Display for RecorderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecorderKind {
    type Err = GlmError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GlmError::UnknownRecorder { name: s.to_string() })
    }
}

impl RecorderTemplate {
    /// Build the node for this template.
    fn to_node(&self) -> Node {
        let mut node = Node::object(self.object);
        if let Some(group) = self.group {
            node.set("group", group);
        }
        node.with("property", self.property)
            .with("file", self.file)
            .with("interval", "1")
            .with("limit", "0")
    }
}

/// Attach recorders of `kind` to the feeder.
///
/// Recorder kinds attach one recorder to every named root node whose `key`
/// equals `value`, writing to `<Kind>_<name>.csv`. Collector kinds ignore
/// `key`/`value` and attach a single collector when an object of their class
/// is present. Returns the number of nodes added.
pub fn attach_recorders(
    tree: &mut Tree,
    kind: RecorderKind,
    key: &str,
    value: &str,
) -> Result<usize> {
    let template = kind.template();

    if let Some(group) = template.group {
        let class = group.trim_start_matches("class=");
        if tree.objects_of_type(class).next().is_none() {
            debug!(%kind, class, "no objects for collector");
            return Ok(0);
        }
        tree.push(template.to_node())?;
        return Ok(1);
    }

    let parents: Vec<String> = tree
        .iter()
        .filter(|(_, node)| node.get(key) == Some(value))
        .filter_map(|(_, node)| node.name().map(str::to_string))
        .collect();

    for parent in &parents {
        let node = template
            .to_node()
            .with(PARENT, parent.as_str())
            .with("file", format!("{kind}_{parent}.csv"));
        tree.push(node)?;
    }
    debug!(%kind, count = parents.len(), "attached recorders");
    Ok(parents.len())
}

/// Tag every link touching a swing bus and attach one power collector per
/// link type.
///
/// Swing buses are root nodes with `bustype SWING`; their links get
/// `groupid swingKids`. Returns the number of collectors added.
pub fn group_swing_kids(tree: &mut Tree) -> Result<usize> {
    let swing_names: Vec<String> = tree
        .iter()
        .filter(|(_, node)| node.get("bustype") == Some("SWING"))
        .filter_map(|(_, node)| node.get(NAME).map(str::to_string))
        .collect();

    let mut link_types: Vec<String> = Vec::new();
    for (_, node) in tree.iter_mut() {
        let (Some(from), Some(to)) = (node.get(FROM), node.get(TO)) else {
            continue;
        };
        if !swing_names.iter().any(|name| name == from || name == to) {
            continue;
        }
        node.set("groupid", SWING_GROUP);
        if let Some(object_type) = node.get(OBJECT) {
            if !link_types.iter().any(|t| t == object_type) {
                link_types.push(object_type.to_string());
            }
        }
    }

    for object_type in &link_types {
        let collector = Node::object("collector")
            .with("group", format!("class={object_type} AND groupid={SWING_GROUP}"))
            .with("property", "sum(power_in.real),sum(power_in.imag)")
            .with("file", format!("SwingKids_{object_type}.csv"))
            .with("interval", "1")
            .with("limit", "0");
        tree.push(collector)?;
    }
    Ok(link_types.len())
}
