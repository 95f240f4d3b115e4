use std::collections::HashMap;

use tracing::trace;

use crate::http::model::GalleryItem;

const ALT_TEXT_LIMIT: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    PlayerSection,
    PromptSection,
    GallerySection,
    ErrorSection,
    PlayPauseButton,
    NextButton,
    TrackInfo,
    TrackTitle,
    TrackArtist,
    PlayingIndicator,
    PlayingIndicatorStandalone,
    AutoplayHint,
    PromptInput,
    GenerateButton,
    GenerateStatus,
    ResultWrapper,
    ResultImage,
    ResultCaption,
    GalleryGrid,
    LoadMoreButton,
}

impl Element {
    pub const ALL: [Element; 20] = [
        Element::PlayerSection,
        Element::PromptSection,
        Element::GallerySection,
        Element::ErrorSection,
        Element::PlayPauseButton,
        Element::NextButton,
        Element::TrackInfo,
        Element::TrackTitle,
        Element::TrackArtist,
        Element::PlayingIndicator,
        Element::PlayingIndicatorStandalone,
        Element::AutoplayHint,
        Element::PromptInput,
        Element::GenerateButton,
        Element::GenerateStatus,
        Element::ResultWrapper,
        Element::ResultImage,
        Element::ResultCaption,
        Element::GalleryGrid,
        Element::LoadMoreButton,
    ];

    fn hidden_on_load(self) -> bool {
        matches!(
            self,
            Element::PlayerSection
                | Element::PromptSection
                | Element::GallerySection
                | Element::ErrorSection
                | Element::TrackInfo
                | Element::PlayingIndicator
                | Element::PlayingIndicatorStandalone
                | Element::AutoplayHint
                | Element::ResultWrapper
                | Element::ResultImage
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub visible: bool,
    pub text: String,
    pub disabled: bool,
    pub active: bool,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    pub image_url: String,
    pub alt: String,
    pub caption: String,
}

impl From<GalleryItem> for GalleryCard {
    fn from(item: GalleryItem) -> Self {
        let caption = item.prompt_text.unwrap_or_default();
        let alt: String = caption.chars().take(ALT_TEXT_LIMIT).collect();
        Self {
            image_url: item.image_url,
            alt: if alt.is_empty() {
                "Generated image".to_string()
            } else {
                alt
            },
            caption,
        }
    }
}

/// The element tree the controller writes to and the host renders from.
/// Operations on elements the page was built without do nothing.
#[derive(Debug, Clone)]
pub struct Page {
    nodes: HashMap<Element, Node>,
    gallery: Vec<GalleryCard>,
}

impl Default for Page {
    fn default() -> Self {
        Self::with_elements(&Element::ALL)
    }
}

impl Page {
    pub fn with_elements(elements: &[Element]) -> Self {
        let nodes = elements
            .iter()
            .map(|&element| {
                let node = Node {
                    visible: !element.hidden_on_load(),
                    ..Node::default()
                };
                (element, node)
            })
            .collect();

        Self {
            nodes,
            gallery: Vec::new(),
        }
    }

    pub fn has(&self, element: Element) -> bool {
        self.nodes.contains_key(&element)
    }

    fn update(&mut self, element: Element, f: impl FnOnce(&mut Node)) {
        match self.nodes.get_mut(&element) {
            Some(node) => f(node),
            None => trace!(?element, "page_element_missing"),
        }
    }

    pub fn show(&mut self, element: Element) {
        self.update(element, |node| node.visible = true);
    }

    pub fn hide(&mut self, element: Element) {
        self.update(element, |node| node.visible = false);
    }

    pub fn is_visible(&self, element: Element) -> bool {
        self.nodes.get(&element).is_some_and(|node| node.visible)
    }

    pub fn set_text(&mut self, element: Element, text: impl Into<String>) {
        let text = text.into();
        self.update(element, |node| node.text = text);
    }

    pub fn text(&self, element: Element) -> &str {
        self.nodes
            .get(&element)
            .map(|node| node.text.as_str())
            .unwrap_or("")
    }

    pub fn edit_text(&mut self, element: Element, f: impl FnOnce(&mut String)) {
        self.update(element, |node| f(&mut node.text));
    }

    pub fn set_disabled(&mut self, element: Element, disabled: bool) {
        self.update(element, |node| node.disabled = disabled);
    }

    pub fn is_disabled(&self, element: Element) -> bool {
        self.nodes.get(&element).is_some_and(|node| node.disabled)
    }

    pub fn set_active(&mut self, element: Element, active: bool) {
        self.update(element, |node| node.active = active);
    }

    pub fn is_active(&self, element: Element) -> bool {
        self.nodes.get(&element).is_some_and(|node| node.active)
    }

    pub fn set_source(&mut self, element: Element, source: Option<String>) {
        self.update(element, |node| node.source = source);
    }

    pub fn source(&self, element: Element) -> Option<&str> {
        self.nodes
            .get(&element)
            .and_then(|node| node.source.as_deref())
    }

    pub fn gallery(&self) -> &[GalleryCard] {
        &self.gallery
    }

    pub fn clear_gallery(&mut self) {
        if self.has(Element::GalleryGrid) {
            self.gallery.clear();
        }
    }

    pub fn append_gallery(&mut self, items: impl IntoIterator<Item = GalleryItem>) {
        if !self.has(Element::GalleryGrid) {
            trace!(element = ?Element::GalleryGrid, "page_element_missing");
            return;
        }
        self.gallery.extend(items.into_iter().map(GalleryCard::from));
    }

    /// Shows the error banner with `message`, or hides and empties it when
    /// `message` is `None`.
    pub fn set_error(&mut self, message: Option<&str>) {
        match message {
            Some(msg) if !msg.is_empty() => {
                self.set_text(Element::ErrorSection, msg);
                self.show(Element::ErrorSection);
            }
            _ => {
                self.hide(Element::ErrorSection);
                self.set_text(Element::ErrorSection, "");
            }
        }
    }
}
