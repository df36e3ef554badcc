use crate::message::Message;
use crate::model::PreviewState;
use iced::widget::text::Wrapping;
use iced::widget::{container, text, Image};
use iced::{Alignment, Element, Length};

const PREVIEW_HEIGHT: f32 = 320.0;

pub fn preview_panel(preview: &PreviewState) -> Element<'static, Message> {
    let content: Element<'static, Message> = match preview {
        PreviewState::Ready(handle) => Image::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        PreviewState::Loading => text("Loading preview…").into(),
        PreviewState::Unavailable(reason) => text(format!("No preview available: {reason}"))
            .wrapping(Wrapping::Word)
            .into(),
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fixed(PREVIEW_HEIGHT))
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .style(container::bordered_box)
        .into()
}
