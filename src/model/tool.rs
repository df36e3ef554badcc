//! Static configuration for the diagnostic tools.

use std::fmt;

/// Image-based tools. Each mounts its own analysis workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageTool {
    BrainTumor,
    Alzheimer,
    Covid,
    Pneumonia,
}

/// Tools that work on tabular health records instead of images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabularTool {
    Diabetes,
    BreastCancer,
}

/// How a prediction label maps onto the positive/negative result band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Positive only when the prediction equals this label.
    PositiveLabel(&'static str),
    /// Positive for every prediction except this label.
    NegativeLabel(&'static str),
}

impl Framing {
    pub fn is_positive(self, prediction: &str) -> bool {
        let prediction = prediction.trim();
        match self {
            Framing::PositiveLabel(label) => prediction.eq_ignore_ascii_case(label),
            Framing::NegativeLabel(label) => !prediction.eq_ignore_ascii_case(label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageToolProfile {
    pub name: &'static str,
    pub modality: &'static str,
    pub about: &'static str,
    pub framing: Framing,
    pub positive_headline: &'static str,
    pub negative_headline: &'static str,
    pub analyzing_label: &'static str,
}

impl ImageTool {
    pub const ALL: [ImageTool; 4] = [
        ImageTool::BrainTumor,
        ImageTool::Alzheimer,
        ImageTool::Covid,
        ImageTool::Pneumonia,
    ];

    pub fn profile(self) -> &'static ImageToolProfile {
        match self {
            ImageTool::BrainTumor => &BRAIN_TUMOR,
            ImageTool::Alzheimer => &ALZHEIMER,
            ImageTool::Covid => &COVID,
            ImageTool::Pneumonia => &PNEUMONIA,
        }
    }
}

impl fmt::Display for ImageTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().name)
    }
}

impl TabularTool {
    pub const ALL: [TabularTool; 2] = [TabularTool::Diabetes, TabularTool::BreastCancer];

    pub fn name(self) -> &'static str {
        match self {
            TabularTool::Diabetes => "Diabetes Risk Assessment",
            TabularTool::BreastCancer => "Breast Cancer Classification",
        }
    }

    pub fn about(self) -> &'static str {
        match self {
            TabularTool::Diabetes => {
                "Estimates the likelihood of diabetes from demographics, medical history, \
                 BMI, HbA1c and blood glucose recorded for the selected patient."
            }
            TabularTool::BreastCancer => {
                "Classifies a breast mass as benign or malignant from cell nucleus \
                 measurements taken from a fine needle aspirate."
            }
        }
    }

    pub fn positive_headline(self) -> &'static str {
        match self {
            TabularTool::Diabetes => "Diabetes Risk Detected",
            TabularTool::BreastCancer => "Malignant Tumor Indicated",
        }
    }

    pub fn negative_headline(self) -> &'static str {
        match self {
            TabularTool::Diabetes => "Low Diabetes Risk",
            TabularTool::BreastCancer => "Benign Tumor Indicated",
        }
    }

    pub fn analyzing_label(self) -> &'static str {
        match self {
            TabularTool::Diabetes => "Assessing diabetes risk...",
            TabularTool::BreastCancer => "Classifying cell measurements...",
        }
    }
}

impl fmt::Display for TabularTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const BRAIN_TUMOR: ImageToolProfile = ImageToolProfile {
    name: "Brain Tumor Detection",
    modality: "MRI Scan",
    about: "Uses deep learning to detect brain tumors from MRI scans. The model was trained \
            on thousands of MRI images.",
    framing: Framing::PositiveLabel("tumor"),
    positive_headline: "Tumor Detected",
    negative_headline: "No Tumor Detected",
    analyzing_label: "Analyzing MRI scan...",
};

const ALZHEIMER: ImageToolProfile = ImageToolProfile {
    name: "Alzheimer's Detection",
    modality: "MRI Scan",
    about: "Classifies brain MRI scans into normal, mild, moderate or severe Alzheimer's \
            categories.",
    framing: Framing::NegativeLabel("normal"),
    positive_headline: "Alzheimer's Signs Detected",
    negative_headline: "No Alzheimer's Signs Detected",
    analyzing_label: "Analyzing brain MRI...",
};

const COVID: ImageToolProfile = ImageToolProfile {
    name: "COVID-19 Detection",
    modality: "Chest X-ray",
    about: "Detects COVID-19 patterns such as ground-glass opacities in chest X-ray images.",
    framing: Framing::PositiveLabel("covid"),
    positive_headline: "COVID-19 Signs Detected",
    negative_headline: "No COVID-19 Signs Detected",
    analyzing_label: "Analyzing chest X-ray...",
};

const PNEUMONIA: ImageToolProfile = ImageToolProfile {
    name: "Pneumonia Detection",
    modality: "Chest X-ray",
    about: "Detects pneumonia infiltrates and consolidation in chest X-ray images.",
    framing: Framing::PositiveLabel("pneumonia"),
    positive_headline: "Pneumonia Detected",
    negative_headline: "No Pneumonia Detected",
    analyzing_label: "Analyzing chest X-ray...",
};
