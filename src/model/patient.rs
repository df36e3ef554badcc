use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    #[serde(other)]
    Other,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// A patient record as returned by the patient service. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

impl Patient {
    /// `first_name + " " + last_name`, the string the lookup filter matches on.
    pub fn search_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn display_name(&self) -> String {
        match &self.full_name {
            Some(full_name) if !full_name.trim().is_empty() => full_name.trim().to_string(),
            _ => self.search_name().trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PatientQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PatientQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientPage {
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl PatientPage {
    pub fn total(&self) -> usize {
        self.pagination
            .map(|pagination| pagination.total)
            .unwrap_or(self.patients.len())
    }
}

/// Stable, case-insensitive substring filter over name and email.
///
/// A blank term returns the input unchanged.
pub fn filter(patients: &[Patient], term: &str) -> Vec<Patient> {
    let term = term.trim();
    if term.is_empty() {
        return patients.to_vec();
    }

    let needle = term.to_lowercase();
    patients
        .iter()
        .filter(|patient| matches(patient, &needle))
        .cloned()
        .collect()
}

fn matches(patient: &Patient, needle: &str) -> bool {
    let name = patient.search_name().to_lowercase();
    let email = patient.email.as_deref().unwrap_or_default().to_lowercase();
    name.contains(needle) || email.contains(needle)
}
