//! Responsive sidebar state.
//!
//! Below [`MOBILE_BREAKPOINT`] logical pixels the sidebar becomes an overlay
//! with a backdrop that dismisses it on pointer-down.

use iced::{mouse, window, Event, Point};

use super::view::ViewSelector;

pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Width of the navigation panel, anchored to the left edge.
pub const SIDEBAR_WIDTH: f32 = 256.0;

/// Platform events the layout reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutEvent {
    Resized { width: f32, height: f32 },
    PointerMoved(Point),
    PointerDown,
}

impl LayoutEvent {
    /// Window resizes are observed for the whole lifetime of the shell.
    pub fn from_resize(event: &Event) -> Option<Self> {
        match event {
            Event::Window(window::Event::Resized(size)) => Some(LayoutEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            _ => None,
        }
    }

    /// Pointer events, only subscribed to while the panel is dismissible.
    pub fn from_pointer(event: &Event) -> Option<Self> {
        match event {
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                Some(LayoutEvent::PointerMoved(*position))
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                Some(LayoutEvent::PointerDown)
            }
            _ => None,
        }
    }
}

pub fn is_mobile_width(width: f32) -> bool {
    width < MOBILE_BREAKPOINT
}

#[derive(Debug, Clone)]
pub struct LayoutController {
    sidebar_open: bool,
    is_mobile: bool,
    viewport: (f32, f32),
    pointer: Option<Point>,
}

impl LayoutController {
    pub fn new(width: f32, height: f32) -> Self {
        let is_mobile = is_mobile_width(width);
        Self {
            sidebar_open: !is_mobile,
            is_mobile,
            viewport: (width, height),
            pointer: None,
        }
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    /// The overlay backdrop is shown and outside presses close the panel.
    pub fn is_dismissible(&self) -> bool {
        self.is_mobile && self.sidebar_open
    }

    pub fn toggle(&mut self) {
        self.sidebar_open = !self.sidebar_open;
        self.forget_pointer();
    }

    /// Cursor positions are only tracked while the panel is dismissible, so a
    /// position from an earlier dismissible period must not be reused.
    fn forget_pointer(&mut self) {
        if !self.is_dismissible() {
            self.pointer = None;
        }
    }

    pub fn on_viewport_resize(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);

        let is_mobile = is_mobile_width(width);
        if is_mobile == self.is_mobile {
            self.forget_pointer();
            return;
        }

        if is_mobile {
            if self.sidebar_open {
                self.sidebar_open = false;
            }
        } else {
            self.sidebar_open = true;
        }
        self.is_mobile = is_mobile;
        self.forget_pointer();
        log::debug!(
            "Layout switched to {} at width {width}",
            if is_mobile { "mobile" } else { "desktop" }
        );
    }

    pub fn on_navigate(&mut self, _view: ViewSelector) {
        if self.is_mobile {
            self.sidebar_open = false;
        }
        self.forget_pointer();
    }

    pub fn on_outside_interaction(&mut self, target: Point) {
        if !self.is_dismissible() {
            return;
        }

        let (width, height) = self.viewport;
        let in_panel = target.x < SIDEBAR_WIDTH;
        let in_backdrop =
            target.x >= 0.0 && target.y >= 0.0 && target.x <= width && target.y <= height;

        if !in_panel && in_backdrop {
            self.sidebar_open = false;
            self.forget_pointer();
        }
    }

    pub fn handle(&mut self, event: LayoutEvent) {
        match event {
            LayoutEvent::Resized { width, height } => self.on_viewport_resize(width, height),
            LayoutEvent::PointerMoved(position) => self.pointer = Some(position),
            LayoutEvent::PointerDown => {
                if let Some(position) = self.pointer {
                    self.on_outside_interaction(position);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Size;

    #[test]
    fn test_initial_state_follows_breakpoint() {
        let desktop = LayoutController::new(1024.0, 768.0);
        assert!(!desktop.is_mobile());
        assert!(desktop.sidebar_open());

        let mobile = LayoutController::new(400.0, 800.0);
        assert!(mobile.is_mobile());
        assert!(!mobile.sidebar_open());

        let edge = LayoutController::new(767.9, 600.0);
        assert!(edge.is_mobile());
        let edge = LayoutController::new(768.0, 600.0);
        assert!(!edge.is_mobile());
    }

    #[test]
    fn test_is_mobile_matches_width_for_all_widths() {
        let mut layout = LayoutController::new(1200.0, 800.0);
        for width in (0..2000).step_by(7) {
            let width = width as f32;
            layout.on_viewport_resize(width, 800.0);
            assert_eq!(layout.is_mobile(), width < 768.0);
        }
    }

    #[test]
    fn test_toggle_flips_unconditionally() {
        let mut layout = LayoutController::new(1024.0, 768.0);
        layout.toggle();
        assert!(!layout.sidebar_open());
        layout.toggle();
        assert!(layout.sidebar_open());
    }

    #[test]
    fn test_mobile_to_desktop_forces_open() {
        let mut layout = LayoutController::new(500.0, 800.0);
        assert!(!layout.sidebar_open());

        layout.on_viewport_resize(1000.0, 800.0);
        assert!(!layout.is_mobile());
        assert!(layout.sidebar_open());
    }

    #[test]
    fn test_desktop_to_mobile_closes_open_panel() {
        let mut layout = LayoutController::new(1000.0, 800.0);
        layout.on_viewport_resize(600.0, 800.0);
        assert!(layout.is_mobile());
        assert!(!layout.sidebar_open());
    }

    #[test]
    fn test_desktop_round_trip_is_not_stuck_closed() {
        let mut layout = LayoutController::new(1000.0, 800.0);
        layout.toggle();
        layout.on_viewport_resize(600.0, 800.0);
        layout.on_viewport_resize(1000.0, 800.0);
        assert!(layout.sidebar_open());
    }

    #[test]
    fn test_same_side_resize_keeps_choice() {
        let mut layout = LayoutController::new(600.0, 800.0);
        layout.toggle();
        layout.on_viewport_resize(700.0, 800.0);
        assert!(layout.sidebar_open());

        layout.toggle();
        layout.on_viewport_resize(500.0, 800.0);
        assert!(!layout.sidebar_open());

        let mut desktop = LayoutController::new(1000.0, 800.0);
        desktop.toggle();
        desktop.on_viewport_resize(1400.0, 800.0);
        assert!(!desktop.sidebar_open());
    }

    #[test]
    fn test_navigate_closes_on_mobile_only() {
        let mut mobile = LayoutController::new(500.0, 800.0);
        mobile.toggle();
        mobile.on_navigate(ViewSelector::Covid);
        assert!(!mobile.sidebar_open());

        let mut desktop = LayoutController::new(1000.0, 800.0);
        desktop.on_navigate(ViewSelector::Covid);
        assert!(desktop.sidebar_open());
    }

    #[test]
    fn test_outside_interaction_dismisses_on_mobile() {
        let mut layout = LayoutController::new(500.0, 800.0);
        layout.toggle();

        layout.on_outside_interaction(Point::new(100.0, 200.0));
        assert!(layout.sidebar_open(), "press inside the panel keeps it open");

        layout.on_outside_interaction(Point::new(400.0, 200.0));
        assert!(!layout.sidebar_open());
    }

    #[test]
    fn test_outside_interaction_ignored_on_desktop() {
        let mut layout = LayoutController::new(1000.0, 800.0);
        layout.on_outside_interaction(Point::new(900.0, 200.0));
        assert!(layout.sidebar_open());
    }

    #[test]
    fn test_outside_interaction_outside_viewport_ignored() {
        let mut layout = LayoutController::new(500.0, 800.0);
        layout.toggle();
        layout.on_outside_interaction(Point::new(900.0, 200.0));
        assert!(layout.sidebar_open());
    }

    #[test]
    fn test_synthetic_event_stream() {
        let mut layout = LayoutController::new(1024.0, 768.0);

        let resize = Event::Window(window::Event::Resized(Size::new(600.0, 900.0)));
        let event = LayoutEvent::from_resize(&resize).unwrap();
        layout.handle(event);
        assert!(layout.is_mobile());
        assert!(!layout.sidebar_open());

        layout.toggle();
        let moved = Event::Mouse(mouse::Event::CursorMoved {
            position: Point::new(500.0, 300.0),
        });
        let pressed = Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        layout.handle(LayoutEvent::from_pointer(&moved).unwrap());
        layout.handle(LayoutEvent::from_pointer(&pressed).unwrap());
        assert!(!layout.sidebar_open());
    }

    #[test]
    fn test_event_filters() {
        let right = Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right));
        assert_eq!(LayoutEvent::from_pointer(&right), None);

        let resize = Event::Window(window::Event::Resized(Size::new(10.0, 10.0)));
        assert_eq!(LayoutEvent::from_pointer(&resize), None);

        let pressed = Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        assert_eq!(LayoutEvent::from_resize(&pressed), None);
    }

    #[test]
    fn test_reopened_panel_ignores_position_from_before() {
        let mut layout = LayoutController::new(500.0, 800.0);
        layout.toggle();
        layout.handle(LayoutEvent::PointerMoved(Point::new(450.0, 300.0)));
        layout.handle(LayoutEvent::PointerDown);
        assert!(!layout.sidebar_open());

        layout.toggle();
        layout.handle(LayoutEvent::PointerDown);
        assert!(layout.sidebar_open(), "no cursor movement since reopening");
    }

    #[test]
    fn test_navigation_clears_tracked_pointer() {
        let mut layout = LayoutController::new(500.0, 800.0);
        layout.toggle();
        layout.handle(LayoutEvent::PointerMoved(Point::new(450.0, 300.0)));
        layout.on_navigate(ViewSelector::Covid);

        layout.toggle();
        layout.handle(LayoutEvent::PointerDown);
        assert!(layout.sidebar_open());
    }

    #[test]
    fn test_pointer_down_without_position_is_ignored() {
        let mut layout = LayoutController::new(500.0, 800.0);
        layout.toggle();
        layout.handle(LayoutEvent::PointerDown);
        assert!(layout.sidebar_open());
    }
}
