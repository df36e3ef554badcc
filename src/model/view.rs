use super::tool::{ImageTool, TabularTool};

/// Identifies the screen shown in the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewSelector {
    #[default]
    Overview,
    Patients,
    Diabetes,
    BrainTumor,
    Alzheimer,
    BreastCancer,
    Covid,
    Pneumonia,
}

impl ViewSelector {
    /// Sidebar order.
    pub const ALL: [ViewSelector; 8] = [
        ViewSelector::Overview,
        ViewSelector::Patients,
        ViewSelector::Diabetes,
        ViewSelector::BreastCancer,
        ViewSelector::BrainTumor,
        ViewSelector::Alzheimer,
        ViewSelector::Covid,
        ViewSelector::Pneumonia,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ViewSelector::Overview => "overview",
            ViewSelector::Patients => "patients",
            ViewSelector::Diabetes => "diabetes",
            ViewSelector::BrainTumor => "brain-tumor",
            ViewSelector::Alzheimer => "alzheimer",
            ViewSelector::BreastCancer => "breast-cancer",
            ViewSelector::Covid => "covid",
            ViewSelector::Pneumonia => "pneumonia",
        }
    }

    /// Resolves a view key. Unknown keys fall back to the overview.
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|view| view.key() == key.trim())
            .unwrap_or_default()
    }

    pub fn metadata(self) -> &'static ViewMetadata {
        VIEW_METADATA
            .iter()
            .find(|(view, _)| *view == self)
            .map(|(_, metadata)| metadata)
            .unwrap_or(&DEFAULT_METADATA)
    }

    /// Short label used by the navigation panel.
    pub fn nav_label(self) -> &'static str {
        match self {
            ViewSelector::Overview => "Dashboard",
            ViewSelector::Patients => "Patients",
            ViewSelector::Diabetes => "Diabetes",
            ViewSelector::BrainTumor => "Brain Tumor",
            ViewSelector::Alzheimer => "Alzheimer's",
            ViewSelector::BreastCancer => "Breast Cancer",
            ViewSelector::Covid => "COVID-19",
            ViewSelector::Pneumonia => "Pneumonia",
        }
    }

    pub fn is_diagnostic(self) -> bool {
        !matches!(self, ViewSelector::Overview | ViewSelector::Patients)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewMetadata {
    pub title: &'static str,
    pub description: &'static str,
}

const DEFAULT_METADATA: ViewMetadata = ViewMetadata {
    title: "Dashboard Overview",
    description: "Summary of your patients and quick access to the diagnostic tools",
};

const VIEW_METADATA: [(ViewSelector, ViewMetadata); 8] = [
    (ViewSelector::Overview, DEFAULT_METADATA),
    (
        ViewSelector::Patients,
        ViewMetadata {
            title: "Patient Management",
            description: "Browse patient records and start health assessments",
        },
    ),
    (
        ViewSelector::Diabetes,
        ViewMetadata {
            title: "Diabetes Risk Assessment",
            description: "Estimate diabetes risk from tabular patient health data",
        },
    ),
    (
        ViewSelector::BrainTumor,
        ViewMetadata {
            title: "Brain Tumor Detection",
            description: "Analyze brain MRI scans for potential tumors",
        },
    ),
    (
        ViewSelector::Alzheimer,
        ViewMetadata {
            title: "Alzheimer's Detection",
            description: "Stage Alzheimer's disease from brain MRI scans",
        },
    ),
    (
        ViewSelector::BreastCancer,
        ViewMetadata {
            title: "Breast Cancer Classification",
            description: "Classify tumors as benign or malignant from cell measurements",
        },
    ),
    (
        ViewSelector::Covid,
        ViewMetadata {
            title: "COVID-19 Detection",
            description: "Detect COVID-19 signs in chest X-ray images",
        },
    ),
    (
        ViewSelector::Pneumonia,
        ViewMetadata {
            title: "Pneumonia Detection",
            description: "Detect pneumonia in chest X-ray images",
        },
    ),
];

/// What the content area renders for a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentVariant {
    Overview,
    PatientManagement,
    Diabetes,
    BrainTumor,
    Alzheimer,
    BreastCancer,
    Covid,
    Pneumonia,
}

impl ContentVariant {
    pub fn image_tool(self) -> Option<ImageTool> {
        match self {
            ContentVariant::BrainTumor => Some(ImageTool::BrainTumor),
            ContentVariant::Alzheimer => Some(ImageTool::Alzheimer),
            ContentVariant::Covid => Some(ImageTool::Covid),
            ContentVariant::Pneumonia => Some(ImageTool::Pneumonia),
            _ => None,
        }
    }

    pub fn tabular_tool(self) -> Option<TabularTool> {
        match self {
            ContentVariant::Diabetes => Some(TabularTool::Diabetes),
            ContentVariant::BreastCancer => Some(TabularTool::BreastCancer),
            _ => None,
        }
    }
}

pub fn render(view: ViewSelector) -> ContentVariant {
    match view {
        ViewSelector::Overview => ContentVariant::Overview,
        ViewSelector::Patients => ContentVariant::PatientManagement,
        ViewSelector::Diabetes => ContentVariant::Diabetes,
        ViewSelector::BrainTumor => ContentVariant::BrainTumor,
        ViewSelector::Alzheimer => ContentVariant::Alzheimer,
        ViewSelector::BreastCancer => ContentVariant::BreastCancer,
        ViewSelector::Covid => ContentVariant::Covid,
        ViewSelector::Pneumonia => ContentVariant::Pneumonia,
    }
}

/// Holds the active view. Only `select` mutates it.
#[derive(Debug, Default)]
pub struct ViewRouter {
    active: ViewSelector,
}

impl ViewRouter {
    pub fn new(initial: ViewSelector) -> Self {
        Self { active: initial }
    }

    pub fn select(&mut self, view: ViewSelector) {
        self.active = view;
    }

    pub fn current(&self) -> ViewSelector {
        self.active
    }

    pub fn current_title(&self) -> &'static str {
        self.active.metadata().title
    }

    pub fn current_description(&self) -> &'static str {
        self.active.metadata().description
    }

    pub fn render(&self) -> ContentVariant {
        render(self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_overview() {
        let router = ViewRouter::default();
        assert_eq!(router.current(), ViewSelector::Overview);
        assert_eq!(router.current_title(), "Dashboard Overview");
        assert_eq!(router.render(), ContentVariant::Overview);
    }

    #[test]
    fn test_covid_resolves_to_covid_metadata() {
        let mut router = ViewRouter::default();
        router.select(ViewSelector::from_key("covid"));

        assert_eq!(router.current(), ViewSelector::Covid);
        assert_eq!(router.current_title(), "COVID-19 Detection");
        assert_eq!(
            router.current_description(),
            "Detect COVID-19 signs in chest X-ray images"
        );
        for other in ViewSelector::ALL {
            if other != ViewSelector::Covid {
                assert_ne!(other.metadata(), ViewSelector::Covid.metadata());
            }
        }
    }

    #[test]
    fn test_unknown_key_falls_back_to_overview() {
        let mut router = ViewRouter::new(ViewSelector::Pneumonia);
        router.select(ViewSelector::from_key("covd"));

        assert_eq!(router.current(), ViewSelector::Overview);
        assert_eq!(router.current_title(), DEFAULT_METADATA.title);
        assert_eq!(router.current_description(), DEFAULT_METADATA.description);
        assert_eq!(router.render(), ContentVariant::Overview);
        assert_eq!(ViewSelector::from_key(""), ViewSelector::Overview);
    }

    #[test]
    fn test_keys_round_trip_and_trim() {
        for view in ViewSelector::ALL {
            assert_eq!(ViewSelector::from_key(view.key()), view);
        }
        assert_eq!(
            ViewSelector::from_key(" brain-tumor "),
            ViewSelector::BrainTumor
        );
    }

    #[test]
    fn test_render_is_one_to_one() {
        let variants: std::collections::HashSet<ContentVariant> =
            ViewSelector::ALL.into_iter().map(render).collect();
        assert_eq!(variants.len(), 8);

        let image_tools = ViewSelector::ALL
            .into_iter()
            .filter(|view| render(*view).image_tool().is_some())
            .count();
        assert_eq!(image_tools, 4);
    }

    #[test]
    fn test_every_view_has_distinct_title() {
        let mut titles: Vec<&str> = ViewSelector::ALL
            .into_iter()
            .map(|view| view.metadata().title)
            .collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), ViewSelector::ALL.len());
    }
}
