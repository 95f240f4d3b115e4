use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    controller::page::{Element, Page},
    ui::components::spinner::Spinner,
    util::colors,
};

pub struct PromptWidget<'a> {
    page: &'a Page,
    generating: bool,
}

impl<'a> PromptWidget<'a> {
    pub fn new(page: &'a Page, generating: bool) -> Self {
        Self { page, generating }
    }
}

impl Widget for PromptWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::new().fg(colors::NEUTRAL))
            .title(" What does it look like? ");
        let inner = outer.inner(area);
        outer.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let disabled = self.page.is_disabled(Element::GenerateButton);
        let input_style = if disabled {
            Style::new().fg(colors::NEUTRAL)
        } else {
            Style::new().fg(colors::PRIMARY)
        };
        let button = if disabled {
            " Generate ".fg(colors::NEUTRAL)
        } else {
            " Generate ⏎ ".fg(colors::BACKGROUND).bg(colors::PRIMARY)
        };
        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(input_style)
            .title_bottom(Line::from(button).right_aligned());
        Paragraph::new(format!("{}▏", self.page.text(Element::PromptInput)))
            .block(input_block)
            .render(chunks[0], buf);

        let status = self.page.text(Element::GenerateStatus);
        if self.generating {
            Spinner::default()
                .with_label(status)
                .with_style(Style::new().fg(colors::ACCENT))
                .render(chunks[1], buf);
        } else {
            Paragraph::new(status.fg(colors::ACCENT)).render(chunks[1], buf);
        }

        if self.page.is_visible(Element::ResultWrapper) {
            let mut lines = Vec::new();
            if self.page.is_visible(Element::ResultImage) {
                if let Some(src) = self.page.source(Element::ResultImage) {
                    lines.push(Line::from(format!("🖼  {src}").fg(colors::PRIMARY)));
                }
            }
            lines.push(Line::from(
                self.page
                    .text(Element::ResultCaption)
                    .to_string()
                    .fg(colors::ACCENT)
                    .italic(),
            ));
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::TOP).title(" Result "))
                .render(chunks[2], buf);
        }
    }
}
