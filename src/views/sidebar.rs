use crate::components::palette::{backdrop_style, sidebar_style};
use crate::components::{ghost_button, nav_button};
use crate::message::Message;
use crate::model::layout::SIDEBAR_WIDTH;
use crate::model::ViewSelector;
use iced::widget::{column, container, horizontal_space, row, text, Space};
use iced::{Alignment, Element, Length};

pub fn sidebar(current: ViewSelector, is_mobile: bool) -> Element<'static, Message> {
    let mut brand = row![text("HealthAI").size(22), horizontal_space()].align_y(Alignment::Center);
    if is_mobile {
        brand = brand.push(ghost_button("Close", Message::ToggleSidebar));
    }

    let mut nav = column![].spacing(4);
    for view in ViewSelector::ALL {
        if view == ViewSelector::Diabetes {
            nav = nav.push(section_label("Diagnostic Tools"));
        }
        nav = nav.push(nav_button(view, current));
    }

    container(column![brand, nav].spacing(24))
        .padding(16)
        .width(Length::Fixed(SIDEBAR_WIDTH))
        .height(Length::Fill)
        .style(sidebar_style)
        .into()
}

fn section_label(label: &'static str) -> Element<'static, Message> {
    container(text(label).size(12))
        .padding([12, 14])
        .into()
}

/// Dims the content area while the panel overlays it on narrow screens.
pub fn backdrop() -> Element<'static, Message> {
    container(Space::new(Length::Fill, Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(backdrop_style)
        .into()
}
