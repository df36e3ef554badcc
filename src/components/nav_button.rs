use crate::message::Message;
use crate::model::ViewSelector;
use iced::widget::text::Wrapping;
use iced::widget::{button, container, text, Button};
use iced::{Alignment, Background, Color, Length, Shadow, Theme};

pub fn nav_button(view: ViewSelector, current: ViewSelector) -> Button<'static, Message> {
    let is_active = view == current;
    let content = container(text(view.nav_label()).size(14).wrapping(Wrapping::None))
        .width(Length::Fill)
        .height(Length::Fixed(36.0))
        .align_x(Alignment::Start)
        .align_y(Alignment::Center)
        .padding([6, 14]);

    button(content)
        .padding(0)
        .width(Length::Fill)
        .on_press(Message::Navigate(view))
        .style(move |theme, status| nav_button_style(theme, status, is_active))
}

/// Small borderless button used for header and panel actions.
pub fn ghost_button(label: &'static str, message: Message) -> Button<'static, Message> {
    button(text(label).size(14))
        .padding([6, 12])
        .on_press(message)
        .style(|theme, status| nav_button_style(theme, status, false))
}

fn nav_button_style(
    theme: &Theme,
    status: iced::widget::button::Status,
    is_active: bool,
) -> iced::widget::button::Style {
    let palette = theme.extended_palette();

    let mut background_color = if is_active {
        palette.primary.strong.color
    } else {
        Color::TRANSPARENT
    };

    match status {
        iced::widget::button::Status::Hovered => {
            background_color = if is_active {
                palette.primary.base.color
            } else {
                palette.background.strong.color.scale_alpha(0.6)
            };
        }
        iced::widget::button::Status::Pressed => {
            background_color = if is_active {
                palette.primary.base.color.scale_alpha(0.9)
            } else {
                palette.background.strong.color.scale_alpha(0.9)
            };
        }
        iced::widget::button::Status::Disabled => {
            background_color = background_color.scale_alpha(0.5);
        }
        iced::widget::button::Status::Active => {}
    }

    let text_color = if is_active {
        palette.primary.strong.text
    } else {
        palette.background.base.text
    };

    iced::widget::button::Style {
        background: Some(Background::Color(background_color)),
        text_color,
        border: iced::border::Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: iced::border::Radius::new(8.0),
        },
        shadow: Shadow::default(),
    }
}
