// DOM-backed carousel tracks.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, HtmlImageElement, MouseEvent, window};

use super::loader::dispatch_card_click;
use crate::carousel::TrackSet;
use crate::error::PortalError;
use crate::render::{CARD_CLASS, CardModel, TrackSurface};
use crate::visibility::AnimationState;

/// One `.carousel-track` container. Card closures live here and are dropped on
/// the next render, together with the subtree they were attached to.
pub struct DomTrack {
    id: String,
    element: Option<Element>,
    placeholder_image: String,
    cards: Vec<CardModel>,
    state: AnimationState,
    click_handlers: Vec<Closure<dyn FnMut(MouseEvent)>>,
    image_handlers: Vec<Closure<dyn FnMut(Event)>>,
}

impl DomTrack {
    pub fn new(id: &str, placeholder_image: &str) -> Self {
        Self {
            id: id.to_string(),
            element: None,
            placeholder_image: placeholder_image.to_string(),
            cards: Vec::new(),
            state: AnimationState::Running,
            click_handlers: Vec::new(),
            image_handlers: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Look the container up again; false while it is not in the page.
    pub fn bind(&mut self, doc: &Document) -> bool {
        if self.element.as_ref().is_none_or(|el| !el.is_connected()) {
            self.element = doc.get_element_by_id(&self.id);
        }
        self.element.is_some()
    }

    /// Empty the container and drop the card closures with it.
    pub fn clear(&mut self) {
        if let Some(el) = self.element.as_ref() {
            el.set_inner_html("");
        }
        self.click_handlers.clear();
        self.image_handlers.clear();
        self.cards.clear();
    }

    fn build_card(
        &self,
        doc: &Document,
        card: &CardModel,
    ) -> Result<(Element, Closure<dyn FnMut(MouseEvent)>, Closure<dyn FnMut(Event)>), JsValue> {
        let div = doc.create_element("div")?;
        div.set_class_name(CARD_CLASS);
        div.set_attribute("data-game-url", &card.url)?;
        div.set_attribute("data-game-name", &card.name)?;
        div.set_attribute("title", &card.name)?;

        let img: HtmlImageElement = doc.create_element("img")?.dyn_into()?;
        img.set_src(&card.image);
        img.set_alt(&card.name);
        img.set_attribute("draggable", "false")?;
        img.set_attribute("loading", "lazy")?;
        let on_error = {
            let img = img.clone();
            let placeholder = self.placeholder_image.clone();
            Closure::wrap(Box::new(move |_evt: Event| {
                // only swap once; a broken placeholder would loop forever
                if !img.src().ends_with(&placeholder) {
                    img.set_src(&placeholder);
                }
            }) as Box<dyn FnMut(_)>)
        };
        img.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())?;
        div.append_child(&img)?;

        let title = doc.create_element("h3")?;
        title.set_text_content(Some(&card.name));
        div.append_child(&title)?;

        let on_click = {
            let card_el = div.clone();
            Closure::wrap(Box::new(move |evt: MouseEvent| {
                evt.prevent_default();
                let url = card_el.get_attribute("data-game-url").unwrap_or_default();
                let name = card_el.get_attribute("data-game-name").unwrap_or_default();
                log::info!("clicked game: {name}");
                dispatch_card_click(&url, &name);
            }) as Box<dyn FnMut(_)>)
        };
        div.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        Ok((div, on_click, on_error))
    }
}

impl TrackSurface for DomTrack {
    fn replace_cards(&mut self, cards: &[CardModel]) {
        let Some(track) = self.element.clone() else {
            log::warn!("{}", PortalError::RenderTargetMissing(self.id.clone()));
            return;
        };
        let Some(doc) = window().and_then(|w| w.document()) else { return };
        track.set_inner_html("");
        self.click_handlers.clear();
        self.image_handlers.clear();
        self.cards.clear();
        for card in cards {
            match self.build_card(&doc, card) {
                Ok((el, on_click, on_error)) => {
                    if track.append_child(&el).is_err() {
                        continue;
                    }
                    self.click_handlers.push(on_click);
                    self.image_handlers.push(on_error);
                    self.cards.push(card.clone());
                }
                Err(err) => log::warn!("card '{}' not rendered: {:?}", card.name, err),
            }
        }
    }

    fn cards(&self) -> &[CardModel] {
        &self.cards
    }

    fn set_animation_state(&mut self, state: AnimationState) {
        self.state = state;
        if let Some(el) = self.element.as_ref().and_then(|e| e.dyn_ref::<HtmlElement>()) {
            set_play_state(el, state);
        }
    }

    fn animation_state(&self) -> AnimationState {
        self.state
    }
}

pub fn set_play_state(el: &HtmlElement, state: AnimationState) {
    let _ = el.style().set_property("animation-play-state", state.css_value());
}

/// Every track of one carousel layout.
pub struct DomTrackSet {
    tracks: Vec<DomTrack>,
}

impl DomTrackSet {
    pub fn new(ids: &[&str], placeholder_image: &str) -> Self {
        Self { tracks: ids.iter().map(|id| DomTrack::new(id, placeholder_image)).collect() }
    }
}

impl DomTrackSet {
    /// Retire this set in favour of one bound to `keep`. Containers the new set
    /// does not own are emptied so no card outlives its click handler.
    pub fn retire(mut self, keep: &[&str]) {
        for track in &mut self.tracks {
            if !keep.contains(&track.id()) {
                track.clear();
            }
        }
    }

    pub fn ids(&self) -> Vec<&str> {
        self.tracks.iter().map(DomTrack::id).collect()
    }
}

impl TrackSet for DomTrackSet {
    type Track = DomTrack;

    fn attach(&mut self) -> Result<(), String> {
        let doc = window().and_then(|w| w.document()).ok_or_else(|| "document".to_string())?;
        for track in &mut self.tracks {
            if !track.bind(&doc) {
                return Err(track.id().to_string());
            }
        }
        Ok(())
    }

    fn tracks_mut(&mut self) -> &mut [DomTrack] {
        &mut self.tracks
    }
}
