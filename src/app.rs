use crate::config::{self, Settings};
use crate::image_pipeline;
use crate::message::Message;
use crate::model::{
    AnalysisWorkflow, AssessAction, ContentVariant, Identity, LayoutController, LayoutEvent,
    PatientLookup, PatientQuery, Phase, RecordWorkflow, Ticket, ViewRouter, ViewSelector,
    WorkflowAction,
};
use crate::services::{
    run_assessment, run_inference, FileSession, InferenceEngine, InferenceRequest,
    JsonPatientStore, PatientCache, PatientService, RecordEngine, SessionSource,
    SimulatedInference,
};
use crate::views::{backdrop, diagnostic, header, overview, patients, sidebar, tabular};
use iced::widget::{column, container, opaque, row, scrollable, stack};
use iced::{application, event, Element, Length, Size, Subscription, Task, Theme};
use rfd::AsyncFileDialog;
use std::path::PathBuf;
use std::sync::Arc;

const APP_TITLE: &str = "HealthAI Dashboard";

pub fn run() -> iced::Result {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .try_init();

    let config_dir = config::config_dir();
    let settings = config::load_settings(&config_dir);
    let window_size = Size::new(settings.window.width, settings.window.height);

    application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .window_size(window_size)
        .run_with(move || App::new(settings))
}

/// State owned by the view currently shown in the content area. Replacing it
/// unmounts the previous view, which drops any running workflow.
struct Mounted {
    ticket: Ticket,
    lookup: PatientLookup,
    content: Content,
}

enum Content {
    Overview,
    Patients,
    ImageTool {
        workflow: AnalysisWorkflow,
        notice: Option<String>,
    },
    Tabular {
        workflow: RecordWorkflow,
    },
}

impl Mounted {
    fn new(variant: ContentVariant, recent_count: u32) -> Self {
        let query = match variant {
            ContentVariant::Overview => PatientQuery::page(1, recent_count.max(1)),
            _ => PatientQuery::all(),
        };

        let content = if let Some(tool) = variant.image_tool() {
            Content::ImageTool {
                workflow: AnalysisWorkflow::new(tool),
                notice: None,
            }
        } else if let Some(tool) = variant.tabular_tool() {
            Content::Tabular {
                workflow: RecordWorkflow::new(tool),
            }
        } else if variant == ContentVariant::PatientManagement {
            Content::Patients
        } else {
            Content::Overview
        };

        Self {
            ticket: Ticket::next(),
            lookup: PatientLookup::new(query),
            content,
        }
    }
}

pub struct App {
    settings: Settings,
    router: ViewRouter,
    layout: LayoutController,
    identity: Identity,
    patients: Arc<PatientCache>,
    engine: Arc<dyn InferenceEngine>,
    records: Arc<dyn RecordEngine>,
    mounted: Mounted,
}

impl App {
    fn new(settings: Settings) -> (Self, Task<Message>) {
        let user = FileSession::new(settings.data.session_file.clone()).current_user();
        let identity = Identity::from_user(user.as_ref());
        let store = JsonPatientStore::new(settings.data.patients_file.clone());
        let patients = Arc::new(PatientCache::new(Arc::new(store)));
        let simulated = Arc::new(SimulatedInference::new(settings.simulated_delay()));
        let engine: Arc<dyn InferenceEngine> = simulated.clone();
        let records: Arc<dyn RecordEngine> = simulated;

        let app = Self::with_services(settings, identity, patients, engine, records);
        let task = app.fetch_patients();
        (app, task)
    }

    fn with_services(
        settings: Settings,
        identity: Identity,
        patients: Arc<PatientCache>,
        engine: Arc<dyn InferenceEngine>,
        records: Arc<dyn RecordEngine>,
    ) -> Self {
        let router = ViewRouter::new(settings.start_view());
        let layout = LayoutController::new(settings.window.width, settings.window.height);
        let mounted = Mounted::new(router.render(), settings.patients.recent_count);
        log::info!(
            "Starting on {} as {}",
            router.current().key(),
            identity.name
        );

        Self {
            settings,
            router,
            layout,
            identity,
            patients,
            engine,
            records,
            mounted,
        }
    }

    pub fn title(&self) -> String {
        format!("{APP_TITLE} - {}", self.router.current_title())
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(view) => self.navigate(view),
            Message::ToggleSidebar => {
                self.layout.toggle();
                Task::none()
            }
            Message::Layout(event) => {
                self.layout.handle(event);
                Task::none()
            }
            Message::PatientsLoaded { mount, result } => {
                if mount != self.mounted.ticket {
                    log::debug!("Dropping patient list fetched for an unmounted view");
                    return Task::none();
                }
                if let Err(err) = &result {
                    log::warn!("Patient fetch failed: {err}");
                }
                self.mounted.lookup.fetched(result);
                Task::none()
            }
            Message::RefreshPatients => {
                self.patients.invalidate();
                self.mounted.lookup.reload();
                self.fetch_patients()
            }
            Message::PatientSearch(term) => {
                self.mounted.lookup.set_term(term);
                Task::none()
            }
            Message::PatientSelected(id) => {
                let Mounted {
                    lookup, content, ..
                } = &mut self.mounted;
                match content {
                    Content::Tabular { workflow } => {
                        let patient = lookup
                            .page()
                            .and_then(|page| page.patients.iter().find(|p| p.id == id));
                        if let Some(patient) = patient {
                            if workflow.select_patient(patient) {
                                lookup.select(id);
                            }
                        }
                    }
                    _ => lookup.toggle_selected(id),
                }
                Task::none()
            }
            Message::PickFile => {
                if self.workflow().map(AnalysisWorkflow::phase) != Some(Phase::Idle) {
                    return Task::none();
                }
                let mount = self.mounted.ticket;
                Task::perform(pick_scan(), move |path| Message::FilePicked { mount, path })
            }
            Message::FilePicked { mount, path } => {
                if mount != self.mounted.ticket {
                    log::debug!("Dropping file picked for an unmounted view");
                    return Task::none();
                }
                let Some(path) = path else {
                    return Task::none();
                };
                let action = self.stage(path);
                self.dispatch(action)
            }
            Message::PreviewLoaded { ticket, result } => {
                if let Some(workflow) = self.workflow_mut() {
                    workflow.preview_loaded(ticket, result);
                }
                Task::none()
            }
            Message::Submit => match &mut self.mounted.content {
                Content::ImageTool { workflow, .. } => {
                    let action = workflow.submit();
                    self.dispatch(action)
                }
                Content::Tabular { workflow } => {
                    let action = workflow.submit();
                    self.dispatch_assessment(action)
                }
                _ => Task::none(),
            },
            Message::Cancel => {
                match &mut self.mounted.content {
                    Content::ImageTool { workflow, .. } => {
                        workflow.cancel();
                    }
                    Content::Tabular { workflow } => {
                        workflow.cancel();
                    }
                    _ => {}
                }
                Task::none()
            }
            Message::Reset => {
                match &mut self.mounted.content {
                    Content::ImageTool { workflow, notice } => {
                        workflow.reset();
                        *notice = None;
                    }
                    Content::Tabular { workflow } => {
                        workflow.reset();
                        self.mounted.lookup.clear_selected();
                    }
                    _ => {}
                }
                Task::none()
            }
            Message::InferenceFinished { ticket, outcome } => {
                if let Some(workflow) = self.workflow_mut() {
                    workflow.inference_completed(ticket, outcome);
                }
                Task::none()
            }
            Message::RecordFieldChanged { key, value } => {
                if let Some(workflow) = self.record_mut() {
                    workflow.set_field(key, value);
                }
                Task::none()
            }
            Message::LoadSampleRecord => {
                if let Some(workflow) = self.record_mut() {
                    workflow.load_sample();
                }
                Task::none()
            }
            Message::BackToPatients => {
                if let Content::Tabular { workflow } = &mut self.mounted.content {
                    if workflow.back_to_patients() {
                        self.mounted.lookup.clear_selected();
                    }
                }
                Task::none()
            }
            Message::BackToEntry => {
                if let Some(workflow) = self.record_mut() {
                    workflow.back_to_entry();
                }
                Task::none()
            }
            Message::AssessmentFinished { ticket, outcome } => {
                if let Some(workflow) = self.record_mut() {
                    workflow.assessment_completed(ticket, outcome);
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content = column![
            header(&self.router, &self.identity, self.layout.is_mobile()),
            scrollable(container(self.content()).padding(24).width(Length::Fill))
                .height(Length::Fill),
        ]
        .width(Length::Fill)
        .height(Length::Fill);

        if !self.layout.sidebar_open() {
            return content.into();
        }

        let panel = sidebar(self.router.current(), self.layout.is_mobile());
        if self.layout.is_mobile() {
            stack![content, row![opaque(panel), opaque(backdrop())]].into()
        } else {
            row![panel, content].into()
        }
    }

    /// Resize events are always observed. Pointer events only matter while
    /// the panel overlays the content and can be dismissed.
    pub fn subscription(&self) -> Subscription<Message> {
        let resize = event::listen_with(|event, _status, _window| {
            LayoutEvent::from_resize(&event).map(Message::Layout)
        });

        if self.layout.is_dismissible() {
            let pointer = event::listen_with(|event, _status, _window| {
                LayoutEvent::from_pointer(&event).map(Message::Layout)
            });
            Subscription::batch([resize, pointer])
        } else {
            resize
        }
    }

    pub fn theme(&self) -> Theme {
        if self.settings.appearance.dark_theme {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn content(&self) -> Element<'_, Message> {
        let lookup = &self.mounted.lookup;
        match &self.mounted.content {
            Content::Overview => overview(&self.identity, lookup),
            Content::Patients => patients(lookup),
            Content::ImageTool { workflow, notice } => {
                diagnostic(workflow, notice.as_deref(), lookup)
            }
            Content::Tabular { workflow } => tabular(workflow, lookup),
        }
    }

    fn navigate(&mut self, view: ViewSelector) -> Task<Message> {
        self.layout.on_navigate(view);
        if view == self.router.current() {
            return Task::none();
        }

        log::info!("Navigating to {}", view.key());
        self.router.select(view);
        self.mounted = Mounted::new(self.router.render(), self.settings.patients.recent_count);
        self.fetch_patients()
    }

    fn workflow(&self) -> Option<&AnalysisWorkflow> {
        match &self.mounted.content {
            Content::ImageTool { workflow, .. } => Some(workflow),
            _ => None,
        }
    }

    fn workflow_mut(&mut self) -> Option<&mut AnalysisWorkflow> {
        match &mut self.mounted.content {
            Content::ImageTool { workflow, .. } => Some(workflow),
            _ => None,
        }
    }

    fn record_mut(&mut self) -> Option<&mut RecordWorkflow> {
        match &mut self.mounted.content {
            Content::Tabular { workflow } => Some(workflow),
            _ => None,
        }
    }

    /// Validates a picked file and hands it to the mounted workflow.
    fn stage(&mut self, path: PathBuf) -> Option<WorkflowAction> {
        let Content::ImageTool { workflow, notice } = &mut self.mounted.content else {
            return None;
        };

        match image_pipeline::inspect_file(path) {
            Ok(file) => {
                *notice = None;
                workflow.select_file(Some(file))
            }
            Err(err) => {
                log::warn!("{}: rejected file: {err}", workflow.tool());
                *notice = Some(err.to_string());
                None
            }
        }
    }

    fn dispatch(&self, action: Option<WorkflowAction>) -> Task<Message> {
        match action {
            None => Task::none(),
            Some(WorkflowAction::LoadPreview { ticket, file }) => Task::perform(
                async move {
                    image_pipeline::load_preview(file)
                        .await
                        .map_err(|err| err.to_string())
                },
                move |result| Message::PreviewLoaded { ticket, result },
            ),
            Some(WorkflowAction::RunInference {
                ticket,
                file,
                cancel,
            }) => {
                let Some(tool) = self.workflow().map(AnalysisWorkflow::tool) else {
                    return Task::none();
                };
                let request = InferenceRequest {
                    tool,
                    file,
                    patient_id: self.mounted.lookup.selected_id().map(str::to_string),
                };
                Task::perform(
                    run_inference(
                        Arc::clone(&self.engine),
                        request,
                        self.settings.inference_timeout(),
                        cancel,
                    ),
                    move |outcome| Message::InferenceFinished { ticket, outcome },
                )
            }
        }
    }

    fn dispatch_assessment(&self, action: Option<AssessAction>) -> Task<Message> {
        let Some(AssessAction {
            ticket,
            request,
            cancel,
        }) = action
        else {
            return Task::none();
        };
        Task::perform(
            run_assessment(
                Arc::clone(&self.records),
                request,
                self.settings.inference_timeout(),
                cancel,
            ),
            move |outcome| Message::AssessmentFinished { ticket, outcome },
        )
    }

    fn fetch_patients(&self) -> Task<Message> {
        let mount = self.mounted.ticket;
        let query = self.mounted.lookup.query();
        let patients = Arc::clone(&self.patients);
        Task::perform(
            async move {
                patients
                    .get_patients(query)
                    .await
                    .map_err(|err| err.to_string())
            },
            move |result| Message::PatientsLoaded { mount, result },
        )
    }
}

async fn pick_scan() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .add_filter("Medical images", &["png", "jpg", "jpeg", "dcm"])
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}
