//! The orphanage creation form: field state, image attachments and the
//! submission state machine.
//!
//! `Empty -> Editing -> Submitting -> Succeeded | Failed(message)`. Any
//! mutation moves to `Editing`; `Failed` may be edited or retried.

pub mod images;
pub mod payload;

use std::fmt::Display;

use crate::domain::{Coordinates, WeekendChoice};
use crate::error::FormError;
use images::{ImageAttachment, PreviewRegistry, SelectedFile};
use payload::SubmissionPayload;

pub const ABOUT_MAX_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Empty,
    Editing,
    Submitting,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    About,
    Instructions,
    OpeningHours,
}

impl TextField {
    /// Multi-part entry name.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::About => "about",
            Self::Instructions => "instructions",
            Self::OpeningHours => "opening_hours",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::About => "About",
            Self::Instructions => "Instructions",
            Self::OpeningHours => "Opening hours",
        }
    }

    pub const fn max_chars(self) -> Option<usize> {
        match self {
            Self::About => Some(ABOUT_MAX_CHARS),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct CreateOrphanageForm {
    position: Option<Coordinates>,
    name: String,
    about: String,
    instructions: String,
    opening_hours: String,
    open_on_weekends: bool,
    images: Vec<ImageAttachment>,
    next_image_id: u64,
    previews: PreviewRegistry,
    phase: FormPhase,
}

impl Default for CreateOrphanageForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateOrphanageForm {
    pub fn new() -> Self {
        Self {
            position: None,
            name: String::new(),
            about: String::new(),
            instructions: String::new(),
            opening_hours: String::new(),
            open_on_weekends: true,
            images: Vec::new(),
            next_image_id: 1,
            previews: PreviewRegistry::default(),
            phase: FormPhase::Empty,
        }
    }

    pub const fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub const fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting)
    }

    pub const fn position(&self) -> Option<Coordinates> {
        self.position
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::About => &self.about,
            TextField::Instructions => &self.instructions,
            TextField::OpeningHours => &self.opening_hours,
        }
    }

    pub const fn open_on_weekends(&self) -> bool {
        self.open_on_weekends
    }

    pub const fn weekend_choice(&self) -> WeekendChoice {
        WeekendChoice::from_bool(self.open_on_weekends)
    }

    pub fn attachments(&self) -> &[ImageAttachment] {
        &self.images
    }

    pub fn images(&self) -> Vec<&SelectedFile> {
        self.images.iter().map(|a| &a.file).collect()
    }

    pub fn preview_images(&self) -> Vec<&str> {
        self.images.iter().map(|a| a.preview.as_str()).collect()
    }

    pub const fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    fn ensure_mutable(&self) -> Result<(), FormError> {
        match self.phase {
            FormPhase::Submitting => Err(FormError::Submitting),
            FormPhase::Succeeded => Err(FormError::Finished),
            FormPhase::Empty | FormPhase::Editing | FormPhase::Failed(_) => Ok(()),
        }
    }

    fn touch(&mut self) {
        self.phase = FormPhase::Editing;
    }

    /// Replaces the position with the clicked coordinate.
    pub fn handle_map_click(&mut self, click: Coordinates) -> Result<(), FormError> {
        self.ensure_mutable()?;
        self.position = Some(click);
        self.touch();
        Ok(())
    }

    pub fn push_char(&mut self, field: TextField, c: char) -> Result<(), FormError> {
        self.ensure_mutable()?;
        if let Some(max) = field.max_chars() {
            if self.text(field).chars().count() >= max {
                return Err(FormError::TooLong {
                    field: field.key(),
                    max,
                });
            }
        }
        self.text_mut(field).push(c);
        self.touch();
        Ok(())
    }

    pub fn pop_char(&mut self, field: TextField) -> Result<(), FormError> {
        self.ensure_mutable()?;
        self.text_mut(field).pop();
        self.touch();
        Ok(())
    }

    pub fn set_text(&mut self, field: TextField, value: &str) -> Result<(), FormError> {
        self.ensure_mutable()?;
        if let Some(max) = field.max_chars() {
            if value.chars().count() > max {
                return Err(FormError::TooLong {
                    field: field.key(),
                    max,
                });
            }
        }
        value.clone_into(self.text_mut(field));
        self.touch();
        Ok(())
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Name => &mut self.name,
            TextField::About => &mut self.about,
            TextField::Instructions => &mut self.instructions,
            TextField::OpeningHours => &mut self.opening_hours,
        }
    }

    pub fn select_weekends(&mut self, choice: WeekendChoice) -> Result<(), FormError> {
        self.ensure_mutable()?;
        self.open_on_weekends = choice.as_bool();
        self.touch();
        Ok(())
    }

    /// Appends every selected file in order. Returns how many were added.
    pub fn handle_select_images(&mut self, selection: Vec<SelectedFile>) -> Result<usize, FormError> {
        self.ensure_mutable()?;
        if selection.is_empty() {
            return Ok(0);
        }

        let added = selection.len();
        for file in selection {
            let attachment = ImageAttachment::new(self.next_image_id, file);
            self.next_image_id += 1;
            self.previews.register(&attachment.preview);
            self.images.push(attachment);
        }
        self.touch();
        Ok(added)
    }

    /// Removes the image at `index` if its preview is still `preview`.
    pub fn handle_cancel_image(
        &mut self,
        preview: &str,
        index: usize,
    ) -> Result<SelectedFile, FormError> {
        self.ensure_mutable()?;
        if self.images.get(index).map(|a| a.preview.as_str()) != Some(preview) {
            return Err(FormError::StaleSelection { index });
        }

        let removed = self.images.remove(index);
        self.previews.revoke(&removed.preview);
        self.touch();
        Ok(removed.file)
    }

    /// Snapshots the form and enters `Submitting`.
    ///
    /// Allowed from `Editing` and, as a retry, from `Failed`.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, FormError> {
        match self.phase {
            FormPhase::Submitting => return Err(FormError::Submitting),
            FormPhase::Succeeded => return Err(FormError::Finished),
            FormPhase::Empty => return Err(FormError::Empty),
            FormPhase::Editing | FormPhase::Failed(_) => {}
        }

        let payload = self.snapshot();
        self.phase = FormPhase::Submitting;
        tracing::info!(
            name = %self.name,
            images = self.images.len(),
            "submitting orphanage"
        );
        Ok(payload)
    }

    /// Applies the outcome of the request started by [`Self::begin_submit`].
    pub fn finish_submit<T, E: Display>(&mut self, outcome: &Result<T, E>) -> Result<(), FormError> {
        if !self.is_submitting() {
            return Err(FormError::NotSubmitting);
        }

        self.phase = match outcome {
            Ok(_) => {
                tracing::info!(name = %self.name, "orphanage created");
                FormPhase::Succeeded
            }
            Err(e) => {
                tracing::warn!(error = %e, "orphanage submission failed");
                FormPhase::Failed(e.to_string())
            }
        };
        Ok(())
    }

    fn snapshot(&self) -> SubmissionPayload {
        // The API expects numbers; an unset position goes out as 0,0
        let position = self.position.unwrap_or(Coordinates::new(0.0, 0.0));

        let fields = vec![
            (TextField::Name.key(), self.name.clone()),
            (TextField::About.key(), self.about.clone()),
            ("latitude", position.lat.to_string()),
            ("longitude", position.lng.to_string()),
            (TextField::Instructions.key(), self.instructions.clone()),
            (TextField::OpeningHours.key(), self.opening_hours.clone()),
            ("open_on_weekends", self.open_on_weekends.to_string()),
        ];
        let images = self.images.iter().map(|a| a.file.clone()).collect();

        SubmissionPayload::new(fields, images)
    }
}
