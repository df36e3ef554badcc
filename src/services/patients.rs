//! Patient collaborator: the fetch contract plus a file-backed store and a
//! shared cache keyed by query.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::patient::Pagination;
use crate::model::{Patient, PatientPage, PatientQuery};

pub const DEFAULT_PER_PAGE: u32 = 10;

#[async_trait]
pub trait PatientService: Send + Sync {
    async fn get_patients(&self, query: PatientQuery) -> Result<PatientPage>;
}

/// Reads `patients.json`: a bare array or a `{"patients": [...]}` document.
#[derive(Debug, Clone)]
pub struct JsonPatientStore {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatientDocument {
    List(Vec<Patient>),
    Page(PatientPage),
}

impl JsonPatientStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_all(&self) -> Result<Vec<Patient>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::patient_store(format!(
                    "no patient data at {}",
                    self.path.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };

        let patients = match serde_json::from_str(&content)? {
            PatientDocument::List(patients) => patients,
            PatientDocument::Page(page) => page.patients,
        };
        Ok(patients)
    }
}

#[async_trait]
impl PatientService for JsonPatientStore {
    async fn get_patients(&self, query: PatientQuery) -> Result<PatientPage> {
        let mut patients = self.read_all().await?;
        log::debug!(
            "Read {} patients from {}",
            patients.len(),
            self.path.display()
        );

        if query.page.is_none() && query.per_page.is_none() {
            return Ok(PatientPage {
                patients,
                pagination: None,
            });
        }

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
        let total = patients.len();
        let pages = total.div_ceil(per_page as usize) as u32;

        patients.sort_by_key(|patient| patient.last_name.to_lowercase());
        let start = (page as usize - 1).saturating_mul(per_page as usize);
        let patients = patients
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        Ok(PatientPage {
            patients,
            pagination: Some(Pagination {
                total,
                page,
                per_page,
                pages,
            }),
        })
    }
}

/// One accessor shared by every view. Failed fetches are not cached.
pub struct PatientCache {
    source: Arc<dyn PatientService>,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    /// Bumped by every invalidation; a fetch that started under an older
    /// generation returns its page without storing it.
    generation: u64,
    entries: HashMap<PatientQuery, PatientPage>,
}

impl PatientCache {
    pub fn new(source: Arc<dyn PatientService>) -> Self {
        Self {
            source,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn invalidate(&self) {
        let dropped = {
            let mut state = self.state.lock();
            state.generation += 1;
            let count = state.entries.len();
            state.entries.clear();
            count
        };
        log::debug!("Patient cache invalidated ({dropped} entries)");
    }
}

#[async_trait]
impl PatientService for PatientCache {
    async fn get_patients(&self, query: PatientQuery) -> Result<PatientPage> {
        let generation = {
            let state = self.state.lock();
            if let Some(page) = state.entries.get(&query) {
                return Ok(page.clone());
            }
            state.generation
        };

        let page = self.source.get_patients(query).await?;

        let mut state = self.state.lock();
        if state.generation == generation {
            state.entries.insert(query, page.clone());
        } else {
            log::debug!("Discarding patient page fetched before invalidation");
        }
        Ok(page)
    }
}
