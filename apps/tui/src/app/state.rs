use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::layout::Rect;
use std::cell::Cell;
use std::sync::Arc;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::api::OrphanageApi;
use crate::app::actions::AppActions;
use crate::config::ClientConfig;
use crate::domain::Orphanage;
use crate::error::ApiClientError;
use crate::form::{CreateOrphanageForm, FormPhase, TextField};
use crate::map::{MapIconConfig, MapViewport};

pub type SubmitOutcome = Result<Option<Orphanage>, ApiClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Orphanages,
    Details,
    Create,
    Created,
}

/// Focusable rows of the create screen, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateField {
    Map,
    Name,
    About,
    Instructions,
    OpeningHours,
    OpenOnWeekends,
    Images,
    Confirm,
}

impl CreateField {
    const ORDER: [Self; 8] = [
        Self::Map,
        Self::Name,
        Self::About,
        Self::Instructions,
        Self::OpeningHours,
        Self::OpenOnWeekends,
        Self::Images,
        Self::Confirm,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub const fn text_field(self) -> Option<TextField> {
        match self {
            Self::Name => Some(TextField::Name),
            Self::About => Some(TextField::About),
            Self::Instructions => Some(TextField::Instructions),
            Self::OpeningHours => Some(TextField::OpeningHours),
            _ => None,
        }
    }
}

/// Everything the create screen owns besides the form itself.
#[derive(Debug)]
pub struct CreateScreenState {
    pub form: CreateOrphanageForm,
    pub field: CreateField,
    pub editing: bool, // Whether keys go into the focused field
    pub viewport: MapViewport,
    pub image_index: usize,
    pub path_input: String,
    pub popup: Option<String>,
}

impl CreateScreenState {
    pub fn new(viewport: MapViewport) -> Self {
        Self {
            form: CreateOrphanageForm::new(),
            field: CreateField::Map,
            editing: false,
            viewport,
            image_index: 0,
            path_input: String::new(),
            popup: None,
        }
    }

    /// Keeps the image cursor inside the list after removals.
    pub fn clamp_image_index(&mut self) {
        let len = self.form.attachments().len();
        if self.image_index >= len {
            self.image_index = len.saturating_sub(1);
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub status_message: String,
    pub show_help: bool,
    pub actions: AppActions,
    pub orphanages: Vec<Orphanage>,
    pub selected_orphanage_index: usize,
    pub search_active: bool,
    pub search_query: String,
    pub filtered_orphanage_indices: Vec<usize>,
    pub list_zoom: u8,
    pub details: Option<Orphanage>,
    pub create: Option<CreateScreenState>,
    pub created: Option<Orphanage>,
    pub created_name: String,
    pub icon: MapIconConfig,
    pub default_viewport: MapViewport,
    pub throbber: ThrobberState,
    pub pending_submission: Option<oneshot::Receiver<SubmitOutcome>>,
    /// Map area drawn in the last frame, for mouse hit testing
    pub map_area: Cell<Option<Rect>>,
}

impl App {
    pub fn new(config: &ClientConfig, api: Arc<dyn OrphanageApi>) -> Self {
        Self {
            running: true,
            screen: AppScreen::Orphanages,
            status_message: String::new(),
            show_help: false,
            actions: AppActions::new(api),
            orphanages: Vec::new(),
            selected_orphanage_index: 0,
            search_active: false,
            search_query: String::new(),
            filtered_orphanage_indices: Vec::new(),
            list_zoom: config.viewport.zoom,
            details: None,
            create: None,
            created: None,
            created_name: String::new(),
            icon: config.icon.clone(),
            default_viewport: config.viewport,
            throbber: ThrobberState::default(),
            pending_submission: None,
            map_area: Cell::new(None),
        }
    }

    /// Advances the spinner while a submission is in flight.
    pub fn update(&mut self) {
        if self.pending_submission.is_some() {
            self.throbber.calc_next();
        }
    }

    pub async fn refresh_orphanages(&mut self) {
        match self.actions.fetch_orphanages().await {
            Ok(orphanages) => {
                self.status_message = format!("Loaded {} orphanage(s)", orphanages.len());
                self.orphanages = orphanages;
                self.apply_search();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load orphanages");
                self.status_message = format!("Could not load orphanages: {e}");
            }
        }
    }

    /// Rows shown in the list, as indices into `orphanages`.
    pub fn visible_indices(&self) -> Vec<usize> {
        if self.search_active && !self.search_query.is_empty() {
            self.filtered_orphanage_indices.clone()
        } else {
            (0..self.orphanages.len()).collect()
        }
    }

    pub fn selected_orphanage(&self) -> Option<&Orphanage> {
        self.visible_indices()
            .get(self.selected_orphanage_index)
            .and_then(|&i| self.orphanages.get(i))
    }

    /// Recomputes the fuzzy name filter, best matches first.
    pub fn apply_search(&mut self) {
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, usize)> = self
            .orphanages
            .iter()
            .enumerate()
            .filter_map(|(i, o)| {
                matcher
                    .fuzzy_match(&o.name, &self.search_query)
                    .map(|score| (score, i))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        self.filtered_orphanage_indices = scored.into_iter().map(|(_, i)| i).collect();

        let total = self.visible_indices().len();
        if self.selected_orphanage_index >= total {
            self.selected_orphanage_index = total.saturating_sub(1);
        }
    }

    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.filtered_orphanage_indices.clear();
        self.selected_orphanage_index = 0;
    }

    pub async fn open_details(&mut self) {
        let Some(id) = self.selected_orphanage().map(|o| o.id) else {
            return;
        };

        match self.actions.fetch_orphanage(id).await {
            Ok(orphanage) => {
                self.details = Some(orphanage);
                self.screen = AppScreen::Details;
                self.status_message.clear();
            }
            Err(e) => {
                self.status_message = format!("Could not load orphanage {id}: {e}");
            }
        }
    }

    pub fn open_create_form(&mut self) {
        self.create = Some(CreateScreenState::new(self.default_viewport));
        self.screen = AppScreen::Create;
        self.status_message.clear();
    }

    /// Leaves the create screen, dropping the form and its previews.
    pub fn close_create_form(&mut self) -> bool {
        if self.pending_submission.is_some() {
            self.status_message = "Submission in progress".to_owned();
            return false;
        }
        self.create = None;
        self.screen = AppScreen::Orphanages;
        true
    }

    /// Starts the request in a background task; the result is picked up by
    /// [`Self::poll_submission`].
    pub fn start_submit(&mut self) {
        let Some(create) = &mut self.create else {
            return;
        };

        let payload = match create.form.begin_submit() {
            Ok(payload) => payload,
            Err(e) => {
                self.status_message = e.to_string();
                return;
            }
        };

        self.created_name = create.form.text(TextField::Name).to_owned();
        let api = self.actions.api();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcome = api.create_orphanage(payload).await;
            if tx.send(outcome).is_err() {
                tracing::warn!("submission result dropped");
            }
        });

        self.pending_submission = Some(rx);
        self.status_message = "Submitting...".to_owned();
    }

    /// Applies a finished submission. Returns true when one was applied.
    pub async fn poll_submission(&mut self) -> bool {
        let Some(rx) = &mut self.pending_submission else {
            return false;
        };

        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err(ApiClientError::Interrupted),
        };
        self.pending_submission = None;
        self.finish_submit(outcome).await;
        true
    }

    pub async fn finish_submit(&mut self, outcome: SubmitOutcome) {
        let Some(create) = &mut self.create else {
            return;
        };

        if let Err(e) = create.form.finish_submit(&outcome) {
            self.status_message = e.to_string();
            return;
        }

        match create.form.phase().clone() {
            FormPhase::Succeeded => {
                self.created = outcome.ok().flatten();
                self.create = None;
                self.screen = AppScreen::Created;
                self.status_message = format!("Created {}", self.created_name);
                self.refresh_orphanages().await;
            }
            FormPhase::Failed(message) => {
                self.status_message = format!("Submission failed: {message}");
                if let Some(create) = &mut self.create {
                    create.popup = Some(message);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::form::payload::SubmissionPayload;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records creations and answers with a fixed outcome.
    #[derive(Default)]
    struct FakeApi {
        orphanages: Vec<Orphanage>,
        fail_with: Option<u16>,
        created: Mutex<Vec<SubmissionPayload>>,
    }

    #[async_trait]
    impl OrphanageApi for FakeApi {
        async fn list_orphanages(&self) -> Result<Vec<Orphanage>, ApiClientError> {
            Ok(self.orphanages.clone())
        }

        async fn get_orphanage(&self, id: i64) -> Result<Orphanage, ApiClientError> {
            self.orphanages
                .iter()
                .find(|o| o.id == id)
                .cloned()
                .ok_or(ApiClientError::Rejected {
                    status: 404,
                    body: String::new(),
                })
        }

        async fn create_orphanage(
            &self,
            payload: SubmissionPayload,
        ) -> Result<Option<Orphanage>, ApiClientError> {
            if let Ok(mut created) = self.created.lock() {
                created.push(payload);
            }
            match self.fail_with {
                Some(status) => Err(ApiClientError::Rejected {
                    status,
                    body: "boom".to_owned(),
                }),
                None => Ok(None),
            }
        }
    }

    fn orphanage(id: i64, name: &str) -> Orphanage {
        Orphanage {
            id,
            name: name.to_owned(),
            latitude: -22.9,
            longitude: -47.0,
            about: String::new(),
            instructions: String::new(),
            opening_hours: String::new(),
            open_on_weekends: true,
            whatsapp_number: None,
            images: Vec::new(),
        }
    }

    fn app_with(api: FakeApi) -> (App, Arc<FakeApi>) {
        let api = Arc::new(api);
        let app = App::new(&ClientConfig::default(), Arc::clone(&api) as Arc<dyn OrphanageApi>);
        (app, api)
    }

    async fn wait_for_submission(app: &mut App) {
        for _ in 0..100 {
            if app.poll_submission().await {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("submission never finished");
    }

    fn fill(app: &mut App) {
        let create = app.create.as_mut().expect("create screen");
        create.form.set_text(TextField::Name, "Lar Feliz").expect("name");
        create
            .form
            .handle_map_click(Coordinates::new(-22.9, -47.0))
            .expect("click");
    }

    #[tokio::test]
    async fn test_fuzzy_search_filters_by_name() {
        let (mut app, _) = app_with(FakeApi {
            orphanages: vec![orphanage(1, "Lar Feliz"), orphanage(2, "Casa Aberta")],
            ..FakeApi::default()
        });
        app.refresh_orphanages().await;

        app.search_active = true;
        app.search_query = "casa".to_owned();
        app.apply_search();

        assert_eq!(app.visible_indices(), [1]);
        assert_eq!(app.selected_orphanage().map(|o| o.id), Some(2));

        app.clear_search();
        assert_eq!(app.visible_indices(), [0, 1]);
    }

    #[tokio::test]
    async fn test_successful_submit_navigates_to_created() {
        let (mut app, api) = app_with(FakeApi::default());
        app.open_create_form();
        fill(&mut app);

        app.start_submit();
        assert!(app.create.as_ref().is_some_and(|c| c.form.is_submitting()));

        // A second submit while the first is in flight is refused
        app.start_submit();
        assert_eq!(app.status_message, "a submission is already in progress");

        wait_for_submission(&mut app).await;
        assert_eq!(app.screen, AppScreen::Created);
        assert!(app.create.is_none());
        assert_eq!(app.created_name, "Lar Feliz");
        assert_eq!(api.created.lock().map(|c| c.len()).unwrap_or_default(), 1);
    }

    #[tokio::test]
    async fn test_failed_submit_stays_on_form() {
        let (mut app, _) = app_with(FakeApi {
            fail_with: Some(500),
            ..FakeApi::default()
        });
        app.open_create_form();
        fill(&mut app);

        app.start_submit();
        wait_for_submission(&mut app).await;

        assert_eq!(app.screen, AppScreen::Create);
        let create = app.create.as_ref().expect("form kept");
        assert!(matches!(create.form.phase(), FormPhase::Failed(_)));
        assert_eq!(create.form.text(TextField::Name), "Lar Feliz");
        assert!(create.popup.as_deref().is_some_and(|m| m.contains("500")));
    }

    #[tokio::test]
    async fn test_cannot_leave_while_submitting() {
        let (mut app, _) = app_with(FakeApi::default());
        app.open_create_form();
        fill(&mut app);
        app.start_submit();

        assert!(!app.close_create_form());
        assert_eq!(app.screen, AppScreen::Create);

        wait_for_submission(&mut app).await;
    }

    #[test]
    fn create_fields_wrap_around() {
        assert_eq!(CreateField::Confirm.next(), CreateField::Map);
        assert_eq!(CreateField::Map.prev(), CreateField::Confirm);
        assert_eq!(CreateField::About.text_field(), Some(TextField::About));
        assert_eq!(CreateField::Images.text_field(), None);
    }
}
