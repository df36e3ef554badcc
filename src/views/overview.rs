use crate::components::palette::card_style;
use crate::message::Message;
use crate::model::{FetchState, Identity, ImageTool, PatientLookup, TabularTool, ViewSelector};
use crate::views::patient_lookup::fetch_error;
use iced::widget::{button, column, container, row, text, Column};
use iced::{Element, Length};

pub fn overview<'a>(identity: &Identity, lookup: &'a PatientLookup) -> Element<'a, Message> {
    let total = match lookup.fetch_state() {
        FetchState::Loaded(page) => page.total().to_string(),
        FetchState::Loading => "…".to_string(),
        FetchState::Failed(_) => "-".to_string(),
    };
    let stats = row![
        stat_card("Patients", total),
        stat_card("Imaging tools", ImageTool::ALL.len().to_string()),
        stat_card("Record tools", TabularTool::ALL.len().to_string()),
    ]
    .spacing(16);

    column![
        text(format!("Welcome back, {}", identity.greeting_name)).size(20),
        stats,
        row![recent_patients(lookup), tool_shortcuts()].spacing(16),
    ]
    .spacing(24)
    .into()
}

fn stat_card(label: &'static str, value: String) -> Element<'static, Message> {
    container(column![text(label).size(14), text(value).size(28)].spacing(6))
        .padding(16)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

fn recent_patients(lookup: &PatientLookup) -> Element<'_, Message> {
    let mut list = column![text("Recent patients").size(18)].spacing(8);

    list = match lookup.fetch_state() {
        FetchState::Loading => list.push(text("Loading patients…")),
        FetchState::Failed(message) => list.push(fetch_error(message)),
        FetchState::Loaded(page) if page.patients.is_empty() => {
            list.push(text("No patients on record"))
        }
        FetchState::Loaded(page) => page.patients.iter().fold(list, |list, patient| {
            let detail = match patient.age {
                Some(age) => format!("{}, {age}", patient.gender.label()),
                None => patient.gender.label().to_string(),
            };
            list.push(
                row![
                    text(patient.display_name()).width(Length::FillPortion(3)),
                    text(detail).size(13).width(Length::FillPortion(2)),
                ]
                .spacing(8),
            )
        }),
    };

    container(list)
        .padding(16)
        .width(Length::FillPortion(3))
        .style(card_style)
        .into()
}

fn tool_shortcuts() -> Element<'static, Message> {
    let shortcuts: Column<'static, Message> = ViewSelector::ALL
        .into_iter()
        .filter(|view| view.is_diagnostic())
        .fold(
            column![text("Diagnostic tools").size(18)].spacing(8),
            |column, view| {
                column.push(
                    button(text(view.metadata().title))
                        .width(Length::Fill)
                        .style(button::secondary)
                        .on_press(Message::Navigate(view)),
                )
            },
        );

    container(shortcuts)
        .padding(16)
        .width(Length::FillPortion(2))
        .style(card_style)
        .into()
}
