use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::{
    controller::page::Element,
    ui::{
        app::App,
        components::{
            gallery::GalleryWidget, player::PlayerWidget, prompt::PromptWidget, spinner::Spinner,
        },
    },
    util::colors,
};

const HELP: &str = "⏎ generate · ctrl+p play/pause · ctrl+n next track · ctrl+l more · esc quit";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        buf.set_style(area, Style::new().bg(colors::BACKGROUND));
        let page = self.controller.page();

        let banner_height = u16::from(page.is_visible(Element::ErrorSection));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner_height),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        if banner_height > 0 {
            Paragraph::new(format!(" {} ", page.text(Element::ErrorSection)))
                .style(Style::new().fg(colors::BACKGROUND).bg(colors::ERROR))
                .render(chunks[0], buf);
        }

        Paragraph::new(Line::from(HELP.fg(colors::NEUTRAL)).centered()).render(chunks[2], buf);

        let body = chunks[1];
        let show_player = page.is_visible(Element::PlayerSection);
        let show_prompt = page.is_visible(Element::PromptSection);
        if !show_player && !show_prompt {
            if !page.is_visible(Element::ErrorSection) {
                Spinner::default()
                    .with_label("Finding a track...")
                    .with_style(Style::new().fg(colors::PRIMARY))
                    .centered()
                    .render(body, buf);
            }
            return;
        }

        let show_gallery = page.is_visible(Element::GallerySection);
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(if show_player { 5 } else { 0 }),
                Constraint::Min(if show_prompt { 9 } else { 0 }),
                Constraint::Percentage(if show_gallery { 40 } else { 0 }),
            ])
            .split(body);

        if show_player {
            PlayerWidget::new(page).render(sections[0], buf);
        }
        if show_prompt {
            PromptWidget::new(page, self.controller.is_generating()).render(sections[1], buf);
        }
        if show_gallery {
            GalleryWidget::new(page).render(sections[2], buf);
        }
    }
}
