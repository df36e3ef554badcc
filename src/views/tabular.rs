use crate::components::palette::{band_style, card_style, risk_color, POSITIVE_BAND};
use crate::message::Message;
use crate::model::record::{FieldKind, FieldSpec};
use crate::model::{PatientLookup, RecordForm, RecordResult, RecordStep, RecordWorkflow};
use crate::utils::formatting::{format_percent, region_label};
use crate::views::patient_lookup::patient_lookup;
use iced::widget::text::Wrapping;
use iced::widget::{
    button, column, container, pick_list, progress_bar, row, text, text_input, Column,
};
use iced::{Alignment, Element, Length};

pub fn tabular<'a>(
    workflow: &'a RecordWorkflow,
    lookup: &'a PatientLookup,
) -> Element<'a, Message> {
    let tool = workflow.tool();

    let intro = column![
        text(tool.name()).size(20),
        text(tool.about()).wrapping(Wrapping::Word),
        text(step_label(workflow.step())).size(13),
    ]
    .spacing(6);

    let main = match (workflow.step(), workflow.result()) {
        (RecordStep::SelectPatient, _) => patient_lookup(lookup, "Select a patient"),
        (RecordStep::Analyzing, _) => analyzing_panel(workflow),
        (RecordStep::Result, Some(result)) => result_panel(workflow, result),
        _ => entry_panel(workflow),
    };

    column![intro, main].spacing(16).into()
}

fn step_label(step: RecordStep) -> &'static str {
    match step {
        RecordStep::SelectPatient => "Step 1 of 3: select a patient",
        RecordStep::EnterData | RecordStep::Failed => "Step 2 of 3: enter health data",
        RecordStep::Analyzing | RecordStep::Result => "Step 3 of 3: results",
    }
}

fn patient_line(workflow: &RecordWorkflow) -> String {
    match workflow.patient() {
        Some(patient) => format!("Patient: {}", patient.name),
        None => String::new(),
    }
}

fn entry_panel(workflow: &RecordWorkflow) -> Element<'_, Message> {
    let form = workflow.form();

    let mut header = row![text(patient_line(workflow)).size(16).width(Length::Fill)]
        .spacing(12)
        .align_y(Alignment::Center);
    if workflow.step() == RecordStep::EnterData {
        header = header.push(
            button("Change Patient")
                .style(button::text)
                .on_press(Message::BackToPatients),
        );
    }

    let fields = form
        .fields()
        .iter()
        .fold(column![].spacing(12), |fields, spec| {
            fields.push(field_row(form, spec))
        });

    let mut panel = column![header, fields].spacing(16);

    if let Some(reason) = workflow.failure() {
        panel = panel.push(
            container(text(reason).wrapping(Wrapping::Word))
                .padding(12)
                .width(Length::Fill)
                .style(band_style(true)),
        );
    }

    let submit = if workflow.step() == RecordStep::Failed {
        "Retry"
    } else {
        "Analyze"
    };
    panel = panel.push(
        row![
            button("Load Sample Data")
                .style(button::secondary)
                .on_press(Message::LoadSampleRecord),
            button("Reset")
                .style(button::secondary)
                .on_press(Message::Reset),
            button(submit).on_press(Message::Submit),
        ]
        .spacing(12),
    );

    container(panel)
        .padding(16)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

fn field_row<'a>(form: &'a RecordForm, spec: &'static FieldSpec) -> Element<'a, Message> {
    let key = spec.key;
    let value = form.value(key);

    let input: Element<'a, Message> = match spec.kind {
        FieldKind::Number { range } => {
            let placeholder = match range {
                Some((min, max)) => format!("{min} to {max}"),
                None => "Value".to_string(),
            };
            text_input(&placeholder, value)
                .on_input(move |value| Message::RecordFieldChanged { key, value })
                .into()
        }
        FieldKind::Choice(options) => pick_list(
            options,
            options.iter().copied().find(|option| *option == value),
            move |option: &'static str| Message::RecordFieldChanged {
                key,
                value: option.to_string(),
            },
        )
        .width(Length::Fill)
        .into(),
    };

    let mut entry = column![row![
        text(spec.label).width(Length::FillPortion(1)),
        container(input).width(Length::FillPortion(2)),
    ]
    .spacing(12)
    .align_y(Alignment::Center)]
    .spacing(4);

    if let Some(error) = form.error(key) {
        entry = entry.push(
            text(format!("{}: {error}", spec.label))
                .size(13)
                .color(POSITIVE_BAND),
        );
    }
    entry.into()
}

fn analyzing_panel(workflow: &RecordWorkflow) -> Element<'_, Message> {
    container(
        column![
            text(patient_line(workflow)).size(16),
            row![
                text(workflow.tool().analyzing_label()),
                button("Cancel")
                    .style(button::secondary)
                    .on_press(Message::Cancel),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        ]
        .spacing(12),
    )
    .padding(16)
    .width(Length::Fill)
    .style(card_style)
    .into()
}

fn result_panel<'a>(
    workflow: &'a RecordWorkflow,
    result: &'a RecordResult,
) -> Element<'a, Message> {
    let tool = workflow.tool();
    let headline = if result.positive {
        tool.positive_headline()
    } else {
        tool.negative_headline()
    };

    let band = container(
        column![
            text(headline).size(18),
            text(format!("Prediction: {}", result.prediction)).size(14),
        ]
        .spacing(4),
    )
    .padding(12)
    .width(Length::Fill)
    .style(band_style(result.positive));

    let confidence = column![
        row![
            text("Confidence"),
            text(format_percent(result.confidence())),
        ]
        .spacing(12),
        progress_bar(0.0..=1.0, result.confidence())
            .height(Length::Fixed(10.0))
            .style(if result.positive {
                progress_bar::danger
            } else {
                progress_bar::success
            }),
    ]
    .spacing(6);

    let mut panel = column![text(patient_line(workflow)).size(16), band, confidence].spacing(16);

    if !result.risk_factors.is_empty() {
        panel = panel.push(risk_factors(result));
    }
    if !result.feature_importance.is_empty() {
        panel = panel.push(feature_importance(workflow.form(), result));
    }

    panel = panel.push(
        row![
            button("Edit Data")
                .style(button::secondary)
                .on_press(Message::BackToEntry),
            button("New Assessment").on_press(Message::Reset),
        ]
        .spacing(12),
    );

    container(panel)
        .padding(16)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

fn risk_factors(result: &RecordResult) -> Column<'_, Message> {
    result.risk_factors.iter().fold(
        column![text("Risk factors").size(16)].spacing(8),
        |column, factor| {
            column.push(
                column![
                    row![
                        text(factor.factor.as_str()).width(Length::FillPortion(2)),
                        text(factor.value.as_str()).width(Length::FillPortion(1)),
                        text(factor.level.label())
                            .size(13)
                            .color(risk_color(factor.level)),
                    ]
                    .spacing(12),
                    text(factor.description.as_str())
                        .size(13)
                        .wrapping(Wrapping::Word),
                ]
                .spacing(2),
            )
        },
    )
}

fn feature_importance<'a>(form: &RecordForm, result: &'a RecordResult) -> Column<'a, Message> {
    result.feature_importance.iter().fold(
        column![text("Feature importance").size(16)].spacing(6),
        |column, (feature, weight)| {
            let label = form
                .fields()
                .iter()
                .find(|spec| spec.key == feature.as_str())
                .map(|spec| spec.label.to_string())
                .unwrap_or_else(|| region_label(feature));
            column.push(
                row![
                    text(label).width(Length::FillPortion(1)),
                    progress_bar(0.0..=1.0, *weight)
                        .height(Length::Fixed(8.0))
                        .width(Length::FillPortion(3)),
                    text(format_percent(*weight)).width(Length::Fixed(64.0)),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            )
        },
    )
}
