use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    controller::page::{Element, Page},
    ui::util::playing_icon,
    util::colors,
};

pub struct PlayerWidget<'a> {
    page: &'a Page,
}

impl<'a> PlayerWidget<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    fn button(&self) -> Span<'a> {
        let label = format!(" {} ", self.page.text(Element::PlayPauseButton));
        if self.page.is_active(Element::PlayPauseButton) {
            label.fg(colors::BACKGROUND).bg(colors::PRIMARY)
        } else {
            label.fg(colors::PRIMARY).bg(colors::NEUTRAL)
        }
    }
}

impl Widget for PlayerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::new().fg(colors::NEUTRAL))
            .title(" Now playing ");

        let mut controls = Line::default();
        controls.push_span(self.button());
        controls.push_span("  ");
        if self.page.is_visible(Element::NextButton) {
            controls.push_span("next ⏭".fg(colors::ACCENT));
            controls.push_span("  ");
        }
        if self.page.is_visible(Element::PlayingIndicatorStandalone) {
            controls.push_span(playing_icon().fg(colors::PRIMARY));
        }

        let info = if self.page.is_visible(Element::TrackInfo) {
            let mut line = Line::default();
            if self.page.is_visible(Element::PlayingIndicator) {
                line.push_span(format!("{} ", playing_icon()).fg(colors::PRIMARY));
            }
            line.push_span(
                Span::raw(self.page.text(Element::TrackTitle).to_string())
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            );
            let artist = self.page.text(Element::TrackArtist);
            if !artist.is_empty() {
                line.push_span(format!(" · {artist}").fg(colors::ACCENT));
            }
            line
        } else {
            Line::from("Listen, then describe what you see.".fg(colors::NEUTRAL).italic())
        };

        let mut lines = vec![info, controls];
        if self.page.is_visible(Element::AutoplayHint) {
            lines.push(Line::from(
                "Playback is waiting: press any key or click to start."
                    .fg(colors::SECONDARY)
                    .italic(),
            ));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
