//! Colour lookups for result bands and severity tiers, plus shared surface
//! styles.

use crate::model::{RiskLevel, Severity};
use iced::widget::container;
use iced::{Background, Color, Theme};

pub const MILD: Color = Color::from_rgb(0.96, 0.62, 0.04);
pub const MODERATE: Color = Color::from_rgb(0.98, 0.45, 0.09);
pub const SEVERE: Color = Color::from_rgb(0.96, 0.25, 0.37);

pub const POSITIVE_BAND: Color = Color::from_rgb(0.94, 0.27, 0.27);
pub const NEGATIVE_BAND: Color = Color::from_rgb(0.13, 0.77, 0.37);

/// `None` for unrecognized tiers, which render in the theme's text colour.
pub fn severity_color(severity: &Severity) -> Option<Color> {
    match severity {
        Severity::Mild => Some(MILD),
        Severity::Moderate => Some(MODERATE),
        Severity::Severe => Some(SEVERE),
        Severity::Unrecognized(_) => None,
    }
}

pub fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Medium => MILD,
        RiskLevel::High => SEVERE,
    }
}

/// A positive finding is the alert band.
pub fn band_color(positive: bool) -> Color {
    if positive {
        POSITIVE_BAND
    } else {
        NEGATIVE_BAND
    }
}

pub fn band_style(positive: bool) -> impl Fn(&Theme) -> container::Style {
    let accent = band_color(positive);
    move |_theme| container::Style {
        background: Some(Background::Color(accent.scale_alpha(0.15))),
        border: iced::border::Border {
            color: accent,
            width: 1.0,
            radius: iced::border::Radius::new(10.0),
        },
        text_color: Some(accent),
        ..Default::default()
    }
}

pub fn card_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(Background::Color(palette.background.weak.color)),
        border: iced::border::Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: iced::border::Radius::new(12.0),
        },
        ..Default::default()
    }
}

pub fn sidebar_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(Background::Color(palette.background.base.color)),
        border: iced::border::Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: iced::border::Radius::new(0.0),
        },
        ..Default::default()
    }
}

pub fn backdrop_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::BLACK.scale_alpha(0.5))),
        ..Default::default()
    }
}

pub fn avatar_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(Background::Color(palette.primary.strong.color)),
        text_color: Some(palette.primary.strong.text),
        border: iced::border::Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: iced::border::Radius::new(999.0),
        },
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ramp_is_total() {
        assert_eq!(severity_color(&Severity::Mild), Some(MILD));
        assert_eq!(severity_color(&Severity::Moderate), Some(MODERATE));
        assert_eq!(severity_color(&Severity::Severe), Some(SEVERE));
        assert_eq!(
            severity_color(&Severity::Unrecognized("critical".to_string())),
            None
        );
    }

    #[test]
    fn test_band_colors() {
        assert_eq!(band_color(true), POSITIVE_BAND);
        assert_eq!(band_color(false), NEGATIVE_BAND);
        assert_ne!(POSITIVE_BAND, NEGATIVE_BAND);
    }
}
