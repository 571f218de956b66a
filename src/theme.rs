use ratatui::style::{Color, Style};

/// Theme configuration for the editor
#[derive(Clone, Debug)]
pub struct Theme {
    /// Background color for the editor
    pub background: Color,

    /// Color of list bullets
    pub bullet_color: Color,

    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the current file name in the status bar
    pub filename_color: Color,

    /// Color for the breadcrumb trail in the status bar
    pub breadcrumb_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            bullet_color: Color::Cyan,
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            filename_color: Color::LightYellow,
            breadcrumb_color: Color::Gray,
        }
    }
}

impl Theme {
    /// Get the style for the editing area
    pub fn editor_style(&self) -> Style {
        Style::default().bg(self.background)
    }

    /// Get the style for list bullets
    pub fn bullet_style(&self) -> Style {
        Style::default().fg(self.bullet_color)
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    /// Get the style for the filename in the status bar
    pub fn filename_style(&self) -> Style {
        self.status_bar_style().fg(self.filename_color)
    }

    /// Get the style for the breadcrumb trail in the status bar
    pub fn breadcrumb_style(&self) -> Style {
        self.status_bar_style().fg(self.breadcrumb_color)
    }
}
