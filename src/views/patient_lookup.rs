use crate::components::ghost_button;
use crate::components::palette::card_style;
use crate::message::Message;
use crate::model::{FetchState, Patient, PatientLookup};
use iced::widget::text::Wrapping;
use iced::widget::{button, column, container, row, text, text_input, Column};
use iced::{Element, Length};

/// Search box plus a selectable patient list.
pub fn patient_lookup<'a>(lookup: &'a PatientLookup, title: &'static str) -> Element<'a, Message> {
    let search = text_input("Search by name or email", lookup.term())
        .on_input(Message::PatientSearch)
        .padding(8);

    let mut panel = column![text(title).size(18), search].spacing(12);

    panel = match lookup.fetch_state() {
        FetchState::Loading => panel.push(text("Loading patients…")),
        FetchState::Failed(message) => panel.push(fetch_error(message)),
        FetchState::Loaded(_) => {
            let visible = lookup.visible();
            if visible.is_empty() {
                panel.push(text("No patients match this search"))
            } else {
                panel.push(patient_rows(visible, lookup.selected_id()))
            }
        }
    };

    if let Some(patient) = lookup.selected_patient() {
        panel = panel.push(
            text(format!("Linked to {}", patient.display_name()))
                .size(13)
                .wrapping(Wrapping::Word),
        );
    }

    container(panel)
        .padding(16)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

pub fn fetch_error(message: &str) -> Element<'_, Message> {
    column![
        text(format!("Could not load patients: {message}")).wrapping(Wrapping::Word),
        ghost_button("Retry", Message::RefreshPatients),
    ]
    .spacing(8)
    .into()
}

fn patient_rows(patients: Vec<Patient>, selected: Option<&str>) -> Column<'static, Message> {
    patients
        .into_iter()
        .fold(column![].spacing(4), |column, patient| {
            let is_selected = selected == Some(patient.id.as_str());
            let marker = if is_selected { "▶ " } else { "" };
            let email = patient.email.clone().unwrap_or_default();

            column.push(
                button(
                    row![
                        text(format!("{marker}{}", patient.display_name()))
                            .width(Length::FillPortion(3)),
                        text(email).size(13).width(Length::FillPortion(2)),
                    ]
                    .spacing(8),
                )
                .width(Length::Fill)
                .style(if is_selected {
                    button::primary
                } else {
                    button::text
                })
                .on_press(Message::PatientSelected(patient.id)),
            )
        })
}
