use serde::{Deserialize, Serialize};

/// A point on the map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Orphanage as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orphanage {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub about: String,
    pub instructions: String,
    pub opening_hours: String,
    pub open_on_weekends: bool,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
    #[serde(default)]
    pub images: Vec<OrphanageImage>,
}

impl Orphanage {
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanageImage {
    pub id: i64,
    pub url: String,
}

/// The two mutually exclusive answers of the weekend toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekendChoice {
    Yes,
    No,
}

impl WeekendChoice {
    pub const fn as_bool(self) -> bool {
        matches!(self, Self::Yes)
    }

    pub const fn from_bool(open: bool) -> Self {
        if open {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Yes),
            1 => Some(Self::No),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}
