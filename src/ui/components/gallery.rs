use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Widget},
};

use crate::{
    controller::page::{Element, Page},
    ui::util::truncate_to_width,
    util::colors,
};

pub struct GalleryWidget<'a> {
    page: &'a Page,
}

impl<'a> GalleryWidget<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }
}

impl Widget for GalleryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::new().fg(colors::NEUTRAL))
            .title(format!(" Gallery ({}) ", self.page.gallery().len()));
        if self.page.is_visible(Element::LoadMoreButton) {
            block = block.title_bottom(Line::from(" ctrl+l more ".fg(colors::ACCENT)).right_aligned());
        }

        let width = block.inner(area).width as usize;
        let caption_width = width / 2;

        let items: Vec<ListItem> = self
            .page
            .gallery()
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let caption = if card.caption.is_empty() {
                    card.alt.as_str()
                } else {
                    card.caption.as_str()
                };
                let number = format!("{:>3} ", i + 1);
                let rest = width.saturating_sub(number.len() + caption_width + 1);
                ListItem::new(Line::from(vec![
                    Span::raw(number).fg(colors::NEUTRAL),
                    Span::raw(format!(
                        "{:<caption_width$} ",
                        truncate_to_width(caption, caption_width)
                    ))
                    .fg(colors::PRIMARY),
                    Span::raw(truncate_to_width(&card.image_url, rest)).fg(colors::SECONDARY),
                ]))
            })
            .collect();

        List::new(items).block(block).render(area, buf);
    }
}
