//! Static NOTAM category catalog.
//!
//! This module contains the fixed lookup table mapping each NOTAM category
//! tag to its display color, general relevance level, and description, plus
//! the fixed badge palettes used when rendering.

use crate::record::ImpactLevel;

/// Display color assigned to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColor {
    /// Critical categories.
    Red,
    /// Routine but operationally relevant categories.
    Yellow,
    /// Low-relevance categories.
    Green,
    /// Informational categories.
    Blue,
    /// Elevated-attention categories.
    Orange,
}

impl CategoryColor {
    /// Hex value used for the category header and badge background.
    #[must_use]
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Yellow => "#f1c40f",
            Self::Red => "#e74c3c",
            Self::Green => "#2ecc71",
            Self::Blue => "#3498db",
            Self::Orange => "#e67e22",
        }
    }
}

/// Fallback hex for categories outside the catalog.
pub const UNKNOWN_CATEGORY_HEX: &str = "#7f8c8d";

/// Fallback hex for badges with an unparseable level.
pub const UNKNOWN_BADGE_HEX: &str = "#95a5a6";

/// Hex value of the relevance/impact badge for a level.
#[must_use]
pub fn badge_hex(level: ImpactLevel) -> &'static str {
    match level {
        ImpactLevel::Low => "#2ecc71",
        ImpactLevel::Medium => "#f1c40f",
        ImpactLevel::High => "#e67e22",
        ImpactLevel::Critical => "#e74c3c",
    }
}

/// One entry of the category catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    /// The category tag as stored in `tag_type`.
    pub name: &'static str,
    /// Display color.
    pub color: CategoryColor,
    /// General relevance of the category.
    pub relevance: ImpactLevel,
    /// Prose description shown to the reviewer.
    pub description: &'static str,
}

/// The full catalog, in the stable order used for the correction dropdown.
pub const CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo {
        name: "RWY CLSD",
        color: CategoryColor::Red,
        relevance: ImpactLevel::Critical,
        description: "A NOTAM indicating a runway closure, no matter for how long and no matter the reasons.",
    },
    CategoryInfo {
        name: "RWY RESTR",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "A NOTAM indicating partial limitations and changes into a runway operativity. These will involve the runway itself or its adjacent terrain.",
    },
    CategoryInfo {
        name: "TWY CLSD",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "A NOTAM indicating that one (or more than one) regular taxiway are closed, no matter for how long and no matter the reasons. Such a NOTAM will not include apron taxiways.",
    },
    CategoryInfo {
        name: "TWY RESTR",
        color: CategoryColor::Green,
        relevance: ImpactLevel::Low,
        description: "A NOTAM reporting different kinds of limitations, events or conditions that are affecting the operational activities in a taxiway. Such a NOTAM will not include apron taxiways.",
    },
    CategoryInfo {
        name: "ATC NOT AVLB",
        color: CategoryColor::Red,
        relevance: ImpactLevel::Critical,
        description: "A NOTAM reporting that Air Traffic Control primary and most needed services for IFR are unavailable.",
    },
    CategoryInfo {
        name: "APPR NOT AVLB",
        color: CategoryColor::Red,
        relevance: ImpactLevel::Critical,
        description: "A NOTAM that indicates urgent or temporary limitations/unavailability of published approach procedures. These may require the attention of the crew when planning flight activities.",
    },
    CategoryInfo {
        name: "AIRPORT RESTRICTIONS",
        color: CategoryColor::Red,
        relevance: ImpactLevel::Critical,
        description: "A NOTAM indicating operational and administrative restrictions affecting airport accessibility for landing. Also includes access restrictions based on aircraft type.",
    },
    CategoryInfo {
        name: "ILS",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "A NOTAM reporting all communications, issues and updates regarding the ILS (Instrumental Landing System) apparatus of the specific aerodrome.",
    },
    CategoryInfo {
        name: "APPROACH PROCEDURES",
        color: CategoryColor::Orange,
        relevance: ImpactLevel::High,
        description: "A NOTAM reporting modifications, restrictions, or temporary unavailability of published instrument or visual approach procedures (might include changes to minima, navigation aid availability, missed approach instructions, charted waypoints, or required equipment).",
    },
    CategoryInfo {
        name: "AIRSPACE",
        color: CategoryColor::Orange,
        relevance: ImpactLevel::High,
        description: "A NOTAM that describes the structure or status of the surrounding airspace itself, such as with activation/withdrawal of restricted, prohibited or segregated areas, or changes in control zones. Also includes modification of the availability and geometry of an airspace.",
    },
    CategoryInfo {
        name: "FLIGHT PROCEDURES",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "A NOTAM that covers how flights are managed within existing airspace. Might include changes to routings, altitude restrictions, handoff procedures, slot/flow management.",
    },
    CategoryInfo {
        name: "WEATHER WARNING",
        color: CategoryColor::Red,
        relevance: ImpactLevel::Critical,
        description: "A NOTAM reporting both adverse meteorological conditions or the absence of required minimum weather parameters/apparatus an airport should normally have. Includes also so-called SNOWTAMS (describing surface conditions like snow, ice and slush on airport movements areas) and ASHTAMs (providing information on changes in volcanic ash or other dust contamination that affects airport operations).",
    },
    CategoryInfo {
        name: "COMMUNICATIONS",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "A NOTAM reporting degradation, frequency changes, frequency deletion, or whatever information that regards the overall radio communication system from air to ground.",
    },
    CategoryInfo {
        name: "AIP CHANGE",
        color: CategoryColor::Green,
        relevance: ImpactLevel::Low,
        description: "A NOTAM that reports permanent or temporary changes published via AIP that are deemed to be operationally significant (even if not immediately). Trigger NOTAMs are included into this category.",
    },
    CategoryInfo {
        name: "NAVAIDS",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "A NOTAM indicating outages, degradations, or limitations of ground-based navigation aids such as VOR, DME, NDB. Might report complete unavailability, reduced accuracy, false indications, restricted operating hours, or interference.",
    },
    CategoryInfo {
        name: "OBSTACLES",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "Physical, fixed or temporary structures protruding into standard flight profiles near the aerodrome. Typically includes cranes, antennas, buildings, or uncharted tall objects. Primarily impacts departure and arrival procedures. Must include the nature of the obstacle, the position of the obstacle written as a latitude and longitude, as well as its elevation.",
    },
    CategoryInfo {
        name: "AERODROME OPERATIONS AND MAINTENANCE",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "A NOTAM that reports operational changes or maintenance activities at the aerodrome. It may include closures of aprons, stands, maintenance work on airport facilities and secondary infrastructure (e.g., lighting), changes in the availability of ground handling or fueling services, or the temporary relocation of services.",
    },
    CategoryInfo {
        name: "EMERGENCY SERVICES",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "A NOTAM in this category will report the operational status of airport rescue and firefighting services (ARFF). A typical message might include downgrading of fire fighting category, temporary unavailability of rescue services or changes in ARFF operating hours.",
    },
    CategoryInfo {
        name: "ADMINISTRATIVE",
        color: CategoryColor::Green,
        relevance: ImpactLevel::Low,
        description: "A NOTAM that regards information outside the operational framework such as updated contact details, hours of service (not for the airport), slot procedures, airport minor services.",
    },
    CategoryInfo {
        name: "RADAR SERVICES",
        color: CategoryColor::Yellow,
        relevance: ImpactLevel::Medium,
        description: "A NOTAM with precise information and updates regarding the radar services of an aerodrome, both primary and secondary surveillance radars.",
    },
    CategoryInfo {
        name: "HAZARDS",
        color: CategoryColor::Orange,
        relevance: ImpactLevel::High,
        description: "A NOTAM of this category will describe dynamic, mobile, or uncontrolled activities posing a risk to the aircraft. Might include drones (UAS), laser interference, aerobatic flights, bird activity, and parachute drops.",
    },
    CategoryInfo {
        name: "MILITARY",
        color: CategoryColor::Green,
        relevance: ImpactLevel::Low,
        description: "Includes NOTAMs starting with [US DOD PROCEDURAL NOTAM] as well as other specific information that only military crews should know.",
    },
];

/// Look up a category by its tag.
#[must_use]
pub fn lookup(tag: &str) -> Option<&'static CategoryInfo> {
    CATEGORIES.iter().find(|c| c.name == tag)
}

/// All category names in stable order, for the correction dropdown.
#[must_use]
pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|c| c.name).collect()
}
