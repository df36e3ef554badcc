use crate::components::palette::{band_style, card_style, severity_color};
use crate::image_pipeline::MAX_FILE_BYTES;
use crate::message::Message;
use crate::model::tool::ImageToolProfile;
use crate::model::{AnalysisResult, AnalysisWorkflow, Finding, PatientLookup, Phase};
use crate::utils::formatting::{format_file_size, format_percent, region_label, truncate};
use crate::views::image_viewer::preview_panel;
use crate::views::patient_lookup::patient_lookup;
use iced::widget::text::Wrapping;
use iced::widget::{button, column, container, progress_bar, row, text, Column};
use iced::{Alignment, Color, Element, Length};

const MAX_NAME_CHARS: usize = 48;

pub fn diagnostic<'a>(
    workflow: &'a AnalysisWorkflow,
    notice: Option<&'a str>,
    lookup: &'a PatientLookup,
) -> Element<'a, Message> {
    let profile = workflow.tool().profile();

    let intro = column![
        text(profile.name).size(20),
        text(profile.about).wrapping(Wrapping::Word),
    ]
    .spacing(6);

    let main = match workflow.phase() {
        Phase::Idle => upload_panel(profile, notice),
        _ => staged_panel(workflow, profile),
    };

    row![
        column![intro, main].spacing(16).width(Length::FillPortion(3)),
        container(patient_lookup(lookup, "Link a patient")).width(Length::FillPortion(2)),
    ]
    .spacing(16)
    .into()
}

fn upload_panel<'a>(profile: &'static ImageToolProfile, notice: Option<&'a str>) -> Element<'a, Message> {
    let mut panel = column![
        text(format!("Upload a {} image", profile.modality)).size(18),
        text(format!(
            "PNG, JPG or DICOM, up to {}",
            format_file_size(MAX_FILE_BYTES)
        ))
        .size(13),
        button("Choose File").on_press(Message::PickFile),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    if let Some(notice) = notice {
        panel = panel.push(
            text(notice)
                .color(Color::from_rgb(0.94, 0.27, 0.27))
                .wrapping(Wrapping::Word),
        );
    }

    container(panel)
        .padding(32)
        .width(Length::Fill)
        .align_x(Alignment::Center)
        .style(card_style)
        .into()
}

fn staged_panel<'a>(
    workflow: &'a AnalysisWorkflow,
    profile: &'static ImageToolProfile,
) -> Element<'a, Message> {
    let mut panel = column![].spacing(16);

    if let Some(preview) = workflow.preview() {
        panel = panel.push(preview_panel(preview));
    }
    if let Some(file) = workflow.staged_file() {
        panel = panel.push(
            text(format!(
                "{} ({})",
                truncate(&file.name, MAX_NAME_CHARS),
                format_file_size(file.size_bytes)
            ))
            .size(13),
        );
    }

    panel = match workflow.phase() {
        Phase::Idle => panel,
        Phase::Staged => panel.push(
            row![
                button("Cancel")
                    .style(button::secondary)
                    .on_press(Message::Cancel),
                button("Analyze").on_press(Message::Submit),
            ]
            .spacing(12),
        ),
        Phase::Analyzing => panel.push(
            row![
                text(profile.analyzing_label),
                button("Cancel")
                    .style(button::secondary)
                    .on_press(Message::Cancel),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        ),
        Phase::Failed => panel.push(failed_panel(workflow.failure().unwrap_or_default())),
        Phase::Result => match workflow.result() {
            Some(result) => panel.push(result_panel(result, profile)),
            None => panel,
        },
    };

    container(panel)
        .padding(16)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

fn failed_panel(reason: &str) -> Element<'_, Message> {
    column![
        container(text(reason).wrapping(Wrapping::Word))
            .padding(12)
            .width(Length::Fill)
            .style(band_style(true)),
        row![
            button("Retry").on_press(Message::Submit),
            button("Start Over")
                .style(button::secondary)
                .on_press(Message::Reset),
        ]
        .spacing(12),
    ]
    .spacing(12)
    .into()
}

fn result_panel<'a>(
    result: &'a AnalysisResult,
    profile: &'static ImageToolProfile,
) -> Element<'a, Message> {
    let positive = profile.framing.is_positive(&result.prediction);
    let headline = if positive {
        profile.positive_headline
    } else {
        profile.negative_headline
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
    .style(band_style(positive));

    let confidence = column![
        row![
            text("Confidence"),
            text(format_percent(result.probability)),
        ]
        .spacing(12),
        progress_bar(0.0..=100.0, result.bar_percent())
            .height(Length::Fixed(10.0))
            .style(if positive {
                progress_bar::danger
            } else {
                progress_bar::success
            }),
    ]
    .spacing(6);

    let mut panel = column![band, confidence].spacing(16);

    if !result.class_probabilities.is_empty() {
        panel = panel.push(class_breakdown(result));
    }
    if let Some(severity) = &result.overall_severity {
        let label = text(format!("Overall severity: {severity}"));
        panel = panel.push(match severity_color(severity) {
            Some(color) => label.color(color),
            None => label,
        });
    }
    if !result.findings.is_empty() {
        panel = panel.push(findings(result));
    }
    if !result.heatmap_ref.is_empty() {
        panel = panel.push(text(format!("Heatmap: {}", result.heatmap_ref)).size(13));
    }

    panel
        .push(
            button("New Analysis")
                .style(button::secondary)
                .on_press(Message::Reset),
        )
        .into()
}

fn class_breakdown(result: &AnalysisResult) -> Column<'_, Message> {
    result.class_probabilities.iter().fold(
        column![text("Class probabilities").size(16)].spacing(6),
        |column, (class, probability)| {
            column.push(
                row![
                    text(region_label(class)).width(Length::FillPortion(1)),
                    progress_bar(0.0..=1.0, *probability)
                        .height(Length::Fixed(8.0))
                        .width(Length::FillPortion(3)),
                    text(format_percent(*probability)).width(Length::Fixed(64.0)),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            )
        },
    )
}

fn findings(result: &AnalysisResult) -> Column<'_, Message> {
    result.findings.iter().fold(
        column![text("Findings").size(16)].spacing(8),
        |column, (region, finding)| column.push(finding_row(region, finding)),
    )
}

fn finding_row<'a>(region: &str, finding: &'a Finding) -> Element<'a, Message> {
    let severity = text(finding.severity.to_string()).size(13);
    let severity = match severity_color(&finding.severity) {
        Some(color) => severity.color(color),
        None => severity,
    };

    let mut entry = column![row![
        text(region_label(region)).width(Length::FillPortion(2)),
        text(finding.status.as_str()).width(Length::FillPortion(1)),
        severity,
    ]
    .spacing(12)]
    .spacing(2);

    if !finding.description.is_empty() {
        entry = entry.push(
            text(finding.description.as_str())
                .size(13)
                .wrapping(Wrapping::Word),
        );
    }
    entry.into()
}
