//! Point-of-interest data model.
//!
//! A [`Poi`] is a navigable destination with an anchor position on the
//! navigation mesh. POIs flagged as emergency exits are excluded from the
//! ordinary destination list and form the candidate set for emergency-mode
//! retargeting. A [`Space`] holds the POIs of one scanned building area and
//! is supplied in-memory by the host's data layer at session start.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::core::Point3;

/// Global counter for generating unique POI IDs.
static POI_ID_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Generate a unique POI ID.
pub fn generate_poi_id() -> PoiId {
    PoiId(POI_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Unique identifier of a POI within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoiId(pub u32);

impl std::fmt::Display for PoiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "poi#{}", self.0)
    }
}

/// Category of a POI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoiKind {
    TutorialRoom,
    LectureHall,
    Staircase,
    Elevator,
}

/// A point of interest: a navigable destination with an anchor position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poi {
    /// Unique identifier for this POI.
    pub id: PoiId,

    /// Display name (e.g. room number or hall name).
    pub name: String,

    /// Category of the POI.
    pub kind: PoiKind,

    /// Anchor position on the navigation mesh (meters, world frame).
    pub anchor: Point3,

    /// Emergency exits are hidden from the ordinary destination list and
    /// only targeted while emergency mode is active.
    pub is_emergency_exit: bool,
}

impl Poi {
    /// Create a new POI with a generated ID.
    pub fn new(name: impl Into<String>, kind: PoiKind, anchor: Point3) -> Self {
        Self {
            id: generate_poi_id(),
            name: name.into(),
            kind,
            anchor,
            is_emergency_exit: false,
        }
    }

    /// Flag this POI as an emergency exit.
    pub fn with_emergency_exit(mut self) -> Self {
        self.is_emergency_exit = true;
        self
    }
}

/// An area in real life covered by one scanned environment, holding the
/// POIs that can be navigated to inside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Space {
    /// Title of the space.
    pub title: String,

    pois: Vec<Poi>,
}

impl Space {
    /// Create an empty space.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pois: Vec::new(),
        }
    }

    /// Add a POI, returning its ID. Duplicate IDs are ignored.
    pub fn add_poi(&mut self, poi: Poi) -> PoiId {
        let id = poi.id;
        if !self.pois.iter().any(|p| p.id == id) {
            self.pois.push(poi);
        }
        id
    }

    /// All POIs of this space, in insertion order.
    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    /// Look up a POI by ID.
    pub fn get(&self, id: PoiId) -> Option<&Poi> {
        self.pois.iter().find(|p| p.id == id)
    }

    /// Emergency-exit candidates, in insertion order.
    ///
    /// Iteration order matters: the retargeter breaks distance ties by
    /// taking the first minimum it encounters.
    pub fn exits(&self) -> impl Iterator<Item = &Poi> {
        self.pois.iter().filter(|p| p.is_emergency_exit)
    }

    /// POIs for the destination list: exits filtered out, sorted by name.
    pub fn listable(&self) -> Vec<&Poi> {
        let mut items: Vec<&Poi> = self.pois.iter().filter(|p| !p.is_emergency_exit).collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// Case-insensitive title search over the destination list.
    pub fn search(&self, term: &str) -> Vec<&Poi> {
        let needle = term.to_lowercase();
        self.listable()
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }
}
