use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub root_bg: Color,
    pub section_bg: [Color; 2],
    pub accent: Color,
    pub text: Color,
    pub text_secondary: Color,

    // Specific components
    pub brand: Style,
    pub nav_item: Style,
    pub nav_active: Style,
    pub heading: Style,
    pub greeting: Style,
    pub card_title: Style,
    pub tag: Style,
    pub link: Style,
    pub copied: Style,
    pub error: Style,
    pub input: Style,
    pub input_focused: Style,
    pub footer: Style,
    pub popup_title: Style,
    pub popup_error_border: Style,
    pub popup_info_border: Style,
    pub popup_text: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            root_bg: Color::Black,
            section_bg: [Color::Rgb(3, 7, 18), Color::Rgb(17, 24, 39)],
            accent: Color::Rgb(129, 140, 248),
            text: Color::Rgb(243, 244, 246),
            text_secondary: Color::Rgb(156, 163, 175),

            brand: Style::default().fg(Color::Rgb(129, 140, 248)).add_modifier(Modifier::BOLD),
            nav_item: Style::default().fg(Color::Rgb(243, 244, 246)),
            nav_active: Style::default()
                .fg(Color::Rgb(129, 140, 248))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            heading: Style::default().fg(Color::Rgb(129, 140, 248)).add_modifier(Modifier::BOLD),
            greeting: Style::default().fg(Color::Rgb(167, 139, 250)).add_modifier(Modifier::BOLD),
            card_title: Style::default().fg(Color::Rgb(165, 180, 252)).add_modifier(Modifier::BOLD),
            tag: Style::default().fg(Color::Rgb(224, 231, 255)).bg(Color::Rgb(67, 56, 202)),
            link: Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
            copied: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red),
            input: Style::default().fg(Color::Rgb(243, 244, 246)).bg(Color::Rgb(55, 65, 81)),
            input_focused: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(55, 65, 81))
                .add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            popup_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            popup_error_border: Style::default().fg(Color::Red).bg(Color::Black),
            popup_info_border: Style::default().fg(Color::Magenta).bg(Color::Black),
            popup_text: Style::default().fg(Color::White),
        }
    }
}
