//! Per-view patient panel: what was fetched, the search term, and the
//! selected patient.

use super::patient::{filter, Patient, PatientPage, PatientQuery};

#[derive(Debug, Clone, Default)]
pub enum FetchState {
    #[default]
    Loading,
    Loaded(PatientPage),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PatientLookup {
    query: PatientQuery,
    fetch: FetchState,
    term: String,
    selected: Option<String>,
}

impl PatientLookup {
    pub fn new(query: PatientQuery) -> Self {
        Self {
            query,
            fetch: FetchState::Loading,
            term: String::new(),
            selected: None,
        }
    }

    pub fn query(&self) -> PatientQuery {
        self.query
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn set_term(&mut self, term: String) {
        self.term = term;
    }

    pub fn reload(&mut self) {
        self.fetch = FetchState::Loading;
    }

    /// Stores a fetch result. A selection that no longer exists is dropped.
    pub fn fetched(&mut self, result: Result<PatientPage, String>) {
        self.fetch = match result {
            Ok(page) => {
                if let Some(id) = &self.selected {
                    if !page.patients.iter().any(|patient| &patient.id == id) {
                        self.selected = None;
                    }
                }
                FetchState::Loaded(page)
            }
            Err(message) => FetchState::Failed(message),
        };
    }

    pub fn page(&self) -> Option<&PatientPage> {
        match &self.fetch {
            FetchState::Loaded(page) => Some(page),
            _ => None,
        }
    }

    /// Fetched patients narrowed by the current term.
    pub fn visible(&self) -> Vec<Patient> {
        self.page()
            .map(|page| filter(&page.patients, &self.term))
            .unwrap_or_default()
    }

    /// Selects `id`, or clears the selection when it is already selected.
    pub fn toggle_selected(&mut self, id: String) {
        if self.selected.as_deref() == Some(id.as_str()) {
            self.selected = None;
        } else {
            self.selected = Some(id);
        }
    }

    pub fn select(&mut self, id: String) {
        self.selected = Some(id);
    }

    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_patient(&self) -> Option<&Patient> {
        let id = self.selected.as_deref()?;
        self.page()?.patients.iter().find(|patient| patient.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::patient::Gender;

    fn patient(id: &str, first: &str, last: &str) -> Patient {
        Patient {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            full_name: None,
            age: None,
            gender: Gender::Other,
            email: None,
            phone: None,
            date_of_birth: None,
        }
    }

    fn page(patients: Vec<Patient>) -> PatientPage {
        PatientPage {
            patients,
            pagination: None,
        }
    }

    #[test]
    fn test_starts_loading_with_nothing_visible() {
        let lookup = PatientLookup::new(PatientQuery::all());
        assert!(matches!(lookup.fetch_state(), FetchState::Loading));
        assert!(lookup.visible().is_empty());
        assert!(lookup.selected_patient().is_none());
    }

    #[test]
    fn test_visible_applies_term() {
        let mut lookup = PatientLookup::new(PatientQuery::all());
        lookup.fetched(Ok(page(vec![
            patient("1", "Ann", "Lee"),
            patient("2", "Bob", "Stone"),
        ])));

        assert_eq!(lookup.visible().len(), 2);
        lookup.set_term("  STONE ".to_string());
        let visible = lookup.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "2");
    }

    #[test]
    fn test_toggle_selection() {
        let mut lookup = PatientLookup::new(PatientQuery::all());
        lookup.fetched(Ok(page(vec![patient("1", "Ann", "Lee")])));

        lookup.toggle_selected("1".to_string());
        assert_eq!(lookup.selected_patient().map(|p| p.id.as_str()), Some("1"));

        lookup.toggle_selected("1".to_string());
        assert_eq!(lookup.selected_id(), None);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut lookup = PatientLookup::new(PatientQuery::all());
        lookup.select("1".to_string());
        lookup.select("1".to_string());
        assert_eq!(lookup.selected_id(), Some("1"));

        lookup.clear_selected();
        assert_eq!(lookup.selected_id(), None);
    }

    #[test]
    fn test_refetch_drops_missing_selection() {
        let mut lookup = PatientLookup::new(PatientQuery::all());
        lookup.fetched(Ok(page(vec![patient("1", "Ann", "Lee")])));
        lookup.toggle_selected("1".to_string());

        lookup.reload();
        lookup.fetched(Ok(page(vec![patient("2", "Bob", "Stone")])));
        assert_eq!(lookup.selected_id(), None);
    }

    #[test]
    fn test_failure_is_kept_for_display() {
        let mut lookup = PatientLookup::new(PatientQuery::page(1, 5));
        lookup.fetched(Err("no patient data".to_string()));

        assert!(matches!(lookup.fetch_state(), FetchState::Failed(msg) if msg == "no patient data"));
        assert!(lookup.visible().is_empty());
        assert_eq!(lookup.query(), PatientQuery::page(1, 5));
    }
}
