use crate::components::ghost_button;
use crate::components::palette::avatar_style;
use crate::message::Message;
use crate::model::{Identity, ViewRouter};
use iced::widget::{column, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length};

pub fn header<'a>(router: &ViewRouter, identity: &'a Identity, is_mobile: bool) -> Element<'a, Message> {
    let heading = column![
        text(router.current_title()).size(24),
        text(router.current_description()).size(14),
    ]
    .spacing(4);

    let avatar = container(text(identity.initials.as_str()).size(14))
        .width(Length::Fixed(36.0))
        .height(Length::Fixed(36.0))
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .style(avatar_style);

    let mut user = row![avatar].spacing(10).align_y(Alignment::Center);
    if !is_mobile {
        user = user.push(text(identity.name.as_str()).size(14));
    }

    container(
        row![
            ghost_button("Menu", Message::ToggleSidebar),
            heading,
            horizontal_space(),
            user,
        ]
        .spacing(16)
        .align_y(Alignment::Center),
    )
    .padding([12, 24])
    .width(Length::Fill)
    .into()
}
