//! The table of interventions that can be applied to an intersection.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The static parameters of an intersection intervention.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "InterventionRecord"))]
pub struct InterventionSpec {
    /// Short machine-friendly identifier, e.g. `roundabout`.
    id: String,
    /// Display name, unique within a catalog.
    name: String,
    /// Throughput multiplier relative to a baseline of 1.0.
    efficiency: f64,
    /// Wait time in seconds when throughput exactly matches demand.
    base_wait_seconds: f64,
    /// One-off cost of building the intervention.
    implementation_cost: f64,
    /// Recurring yearly maintenance cost.
    annual_maintenance_cost: f64,
    description: String,
}

/// The attributes of an intervention, prior to validation.
#[derive(Clone, Copy, Debug)]
pub struct InterventionAttributes<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub efficiency: f64,
    pub base_wait_seconds: f64,
    pub implementation_cost: f64,
    pub annual_maintenance_cost: f64,
    pub description: &'a str,
}

/// The serialized form of an intervention, validated on the way in.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct InterventionRecord {
    id: String,
    name: String,
    efficiency: f64,
    base_wait_seconds: f64,
    implementation_cost: f64,
    annual_maintenance_cost: f64,
    #[serde(default)]
    description: String,
}

#[cfg(feature = "serde")]
impl TryFrom<InterventionRecord> for InterventionSpec {
    type Error = Error;

    fn try_from(record: InterventionRecord) -> Result<Self> {
        InterventionSpec::new(&InterventionAttributes {
            id: &record.id,
            name: &record.name,
            efficiency: record.efficiency,
            base_wait_seconds: record.base_wait_seconds,
            implementation_cost: record.implementation_cost,
            annual_maintenance_cost: record.annual_maintenance_cost,
            description: &record.description,
        })
    }
}

impl InterventionSpec {
    /// Creates a new intervention, checking that its parameters are usable by the engine.
    pub fn new(attribs: &InterventionAttributes) -> Result<Self> {
        if attribs.name.is_empty() {
            return Err(Error::invalid("name", "must not be empty"));
        }
        if !(attribs.efficiency.is_finite() && attribs.efficiency > 0.0) {
            return Err(Error::invalid(
                "efficiency",
                format!("must be positive, got {}", attribs.efficiency),
            ));
        }
        if !(attribs.base_wait_seconds.is_finite() && attribs.base_wait_seconds > 0.0) {
            return Err(Error::invalid(
                "base wait",
                format!("must be positive, got {}", attribs.base_wait_seconds),
            ));
        }
        for (name, cost) in [
            ("implementation cost", attribs.implementation_cost),
            ("maintenance cost", attribs.annual_maintenance_cost),
        ] {
            if !(cost.is_finite() && cost >= 0.0) {
                return Err(Error::invalid(name, format!("must not be negative, got {}", cost)));
            }
        }

        Ok(Self {
            id: attribs.id.to_owned(),
            name: attribs.name.to_owned(),
            efficiency: attribs.efficiency,
            base_wait_seconds: attribs.base_wait_seconds,
            implementation_cost: attribs.implementation_cost,
            annual_maintenance_cost: attribs.annual_maintenance_cost,
            description: attribs.description.to_owned(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The throughput multiplier, always positive.
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// The wait time in seconds with no backlog, always positive.
    pub fn base_wait_seconds(&self) -> f64 {
        self.base_wait_seconds
    }

    pub fn implementation_cost(&self) -> f64 {
        self.implementation_cost
    }

    pub fn annual_maintenance_cost(&self) -> f64 {
        self.annual_maintenance_cost
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// An immutable, ordered set of interventions keyed by name.
#[derive(Clone, Debug)]
pub struct Catalog {
    specs: Vec<InterventionSpec>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Creates a catalog from the given interventions, preserving their order.
    pub fn new(specs: Vec<InterventionSpec>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(specs.len());
        for (idx, spec) in specs.iter().enumerate() {
            if by_name.insert(spec.name.clone(), idx).is_some() {
                return Err(Error::DuplicateName {
                    name: spec.name.clone(),
                });
            }
        }
        Ok(Self { specs, by_name })
    }

    /// Gets the built-in catalog of interventions.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Looks up an intervention by its display name.
    pub fn lookup(&self, name: &str) -> Result<&InterventionSpec> {
        self.by_name
            .get(name)
            .map(|idx| &self.specs[*idx])
            .ok_or_else(|| Error::NotFound {
                name: name.to_owned(),
            })
    }

    /// Looks up an intervention by its short identifier.
    pub fn lookup_id(&self, id: &str) -> Result<&InterventionSpec> {
        self.specs
            .iter()
            .find(|spec| spec.id == id)
            .ok_or_else(|| Error::NotFound { name: id.to_owned() })
    }

    /// Returns the registered names in insertion order.
    pub fn list_names(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.name()).collect()
    }

    /// Returns an iterator over the interventions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &InterventionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

const BUILTIN_ATTRIBUTES: [InterventionAttributes<'static>; 6] = [
    InterventionAttributes {
        id: "traffic_lights",
        name: "Traffic Lights",
        efficiency: 0.8,
        base_wait_seconds: 45.0,
        implementation_cost: 2_500_000.0,
        annual_maintenance_cost: 100_000.0,
        description: "Traditional traffic lights with timer system and backup power",
    },
    InterventionAttributes {
        id: "redesigned_lanes",
        name: "Redesigned Lanes",
        efficiency: 1.2,
        base_wait_seconds: 30.0,
        implementation_cost: 7_500_000.0,
        annual_maintenance_cost: 200_000.0,
        description: "Optimized lane layout with dedicated turn lanes and improved signage",
    },
    InterventionAttributes {
        id: "roundabout",
        name: "Roundabout",
        efficiency: 1.0,
        base_wait_seconds: 20.0,
        implementation_cost: 10_000_000.0,
        annual_maintenance_cost: 300_000.0,
        description: "Modern roundabout with yield signs and proper lighting",
    },
    InterventionAttributes {
        id: "u_turn",
        name: "U-Turn Slot System",
        efficiency: 0.9,
        base_wait_seconds: 25.0,
        implementation_cost: 5_000_000.0,
        annual_maintenance_cost: 150_000.0,
        description: "Strategic U-turn slots to reduce intersection crossing",
    },
    InterventionAttributes {
        id: "overpass",
        name: "Overpass Bridge",
        efficiency: 1.6,
        base_wait_seconds: 10.0,
        implementation_cost: 25_000_000.0,
        annual_maintenance_cost: 800_000.0,
        description: "Elevated road structure with pedestrian walkway",
    },
    InterventionAttributes {
        id: "widening",
        name: "Road Widening",
        efficiency: 1.3,
        base_wait_seconds: 15.0,
        implementation_cost: 20_000_000.0,
        annual_maintenance_cost: 400_000.0,
        description: "Expanded road capacity with additional lanes and sidewalks",
    },
];

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    let specs = BUILTIN_ATTRIBUTES
        .iter()
        .map(InterventionSpec::new)
        .collect::<Result<Vec<_>>>()
        .expect("Invalid built-in intervention");
    Catalog::new(specs).expect("Duplicate built-in intervention")
});
