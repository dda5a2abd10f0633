use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub border_focus: Color,
    pub border_inactive: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub success: Color,
    pub error: Color,
}

pub const DARK: Theme = Theme {
    bg: Color::Reset,
    border_focus: Color::Magenta,
    border_inactive: Color::DarkGray,
    text: Color::White,
    muted: Color::DarkGray,
    accent: Color::LightMagenta,
    selected_fg: Color::Black,
    selected_bg: Color::Magenta,
    success: Color::Green,
    error: Color::Red,
};

pub const LIGHT: Theme = Theme {
    bg: Color::White,
    border_focus: Color::Magenta,
    border_inactive: Color::Gray,
    text: Color::Black,
    muted: Color::Gray,
    accent: Color::Magenta,
    selected_fg: Color::White,
    selected_bg: Color::Magenta,
    success: Color::Green,
    error: Color::Red,
};

pub fn for_mode(dark: bool) -> &'static Theme {
    if dark {
        &DARK
    } else {
        &LIGHT
    }
}
