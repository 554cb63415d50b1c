use serde::Serialize;

use crate::db::models::{ImageRecord, OrphanageWithImages};

/// JSON shape of an orphanage as served by the API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrphanageView {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub about: String,
    pub instructions: String,
    pub opening_hours: String,
    pub open_on_weekends: bool,
    pub whatsapp_number: Option<String>,
    pub images: Vec<ImageView>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageView {
    pub id: i64,
    pub url: String,
}

impl ImageView {
    fn render(image: &ImageRecord, public_url: &str) -> Self {
        Self {
            id: image.id,
            url: format!("{public_url}/uploads/{}", image.path),
        }
    }
}

impl OrphanageView {
    pub fn render(entry: OrphanageWithImages, public_url: &str) -> Self {
        let OrphanageWithImages { orphanage, images } = entry;
        Self {
            id: orphanage.id,
            name: orphanage.name,
            latitude: orphanage.latitude,
            longitude: orphanage.longitude,
            about: orphanage.about,
            instructions: orphanage.instructions,
            opening_hours: orphanage.opening_hours,
            open_on_weekends: orphanage.open_on_weekends,
            whatsapp_number: orphanage.whatsapp_number,
            images: images
                .iter()
                .map(|image| ImageView::render(image, public_url))
                .collect(),
        }
    }

    pub fn render_many(entries: Vec<OrphanageWithImages>, public_url: &str) -> Vec<Self> {
        entries
            .into_iter()
            .map(|entry| Self::render(entry, public_url))
            .collect()
    }
}
