use crate::components::ghost_button;
use crate::components::palette::card_style;
use crate::message::Message;
use crate::model::{FetchState, Patient, PatientLookup};
use crate::views::patient_lookup::fetch_error;
use iced::widget::{column, container, horizontal_space, row, text, text_input, Column};
use iced::{Alignment, Element, Length};

pub fn patients(lookup: &PatientLookup) -> Element<'_, Message> {
    let toolbar = row![
        text_input("Search by name or email", lookup.term())
            .on_input(Message::PatientSearch)
            .padding(8)
            .width(Length::FillPortion(3)),
        horizontal_space(),
        ghost_button("Refresh", Message::RefreshPatients),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let body: Element<'_, Message> = match lookup.fetch_state() {
        FetchState::Loading => text("Loading patients…").into(),
        FetchState::Failed(message) => fetch_error(message),
        FetchState::Loaded(page) => {
            let visible = lookup.visible();
            column![
                text(format!("Showing {} of {} patients", visible.len(), page.total())).size(13),
                directory(visible),
            ]
            .spacing(8)
            .into()
        }
    };

    container(column![toolbar, body].spacing(16))
        .padding(16)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

fn directory(patients: Vec<Patient>) -> Column<'static, Message> {
    let heading = row![
        text("Name").width(Length::FillPortion(3)),
        text("Gender").width(Length::FillPortion(1)),
        text("Age").width(Length::FillPortion(1)),
        text("Email").width(Length::FillPortion(3)),
        text("Phone").width(Length::FillPortion(2)),
    ]
    .spacing(12);

    patients
        .into_iter()
        .fold(column![heading].spacing(8), |table, patient| {
            let age = patient.age.map(|age| age.to_string()).unwrap_or_default();
            table.push(
                row![
                    text(patient.display_name()).width(Length::FillPortion(3)),
                    text(patient.gender.label()).width(Length::FillPortion(1)),
                    text(age).width(Length::FillPortion(1)),
                    text(patient.email.unwrap_or_default()).width(Length::FillPortion(3)),
                    text(patient.phone.unwrap_or_default()).width(Length::FillPortion(2)),
                ]
                .spacing(12),
            )
        })
}
