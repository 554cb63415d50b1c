use sqlx::FromRow;

/// Represents an orphanage row in the database
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct OrphanageRecord {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub about: String,
    pub instructions: String,
    pub opening_hours: String,
    pub open_on_weekends: bool,
    pub whatsapp_number: Option<String>,
}

/// Represents an image row; `path` is relative to the uploads directory
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: i64,
    pub path: String,
    pub orphanage_id: i64,
}

/// An orphanage together with its images, in upload order
#[derive(Debug, Clone, PartialEq)]
pub struct OrphanageWithImages {
    pub orphanage: OrphanageRecord,
    pub images: Vec<ImageRecord>,
}

/// Parameters for creating a new orphanage
#[derive(Debug, Clone)]
pub struct NewOrphanage {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub about: String,
    pub instructions: String,
    pub opening_hours: String,
    pub open_on_weekends: bool,
    pub whatsapp_number: Option<String>,
    pub image_paths: Vec<String>,
}
