//! Paged book reader with animated page flips and a fading panel.
use bevy::prelude::*;

use crate::{
    core::{
        config::BookSettings,
        errors::InteractionFault,
        modal::{ModalCoordinator, ModalFlag, ModalKind, ModalTicket},
        transition::TransitionSlot,
    },
    interaction::components::{BookContent, InteractableId},
};

/// Page image at rest: full scale, fully opaque.
const PAGE_AT_REST: Vec2 = Vec2::ONE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookPhase {
    Closed,
    Open,
    /// Panel fading out; input capture is still held.
    Closing,
}

impl BookPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Closed => "book closed",
            Self::Open => "book open",
            Self::Closing => "book closing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlipPhase {
    /// Shrinking and fading out the old page.
    Out,
    /// Growing and fading in the new page.
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookMilestone {
    PageShown(usize),
    Closed,
}

/// Book reader state machine.
#[derive(Resource, Debug)]
pub struct BookReader {
    phase: BookPhase,
    book: Option<BookContent>,
    source: Option<InteractableId>,
    page_index: usize,
    displayed_page: usize,
    flip: Option<FlipPhase>,
    /// `x` is the page scale, `y` the page opacity.
    page_look: TransitionSlot<Vec2>,
    panel_alpha: TransitionSlot<f32>,
    ticket: Option<ModalTicket>,
    panel_fade_seconds: f32,
    flip_phase_seconds: f32,
    flip_min_scale: f32,
}

impl BookReader {
    pub fn new(settings: &BookSettings) -> Self {
        Self {
            phase: BookPhase::Closed,
            book: None,
            source: None,
            page_index: 0,
            displayed_page: 0,
            flip: None,
            page_look: TransitionSlot::new(PAGE_AT_REST),
            panel_alpha: TransitionSlot::new(0.0),
            ticket: None,
            panel_fade_seconds: settings.panel_fade_seconds.max(0.0),
            flip_phase_seconds: settings.flip_phase_seconds.max(0.0),
            flip_min_scale: settings.flip_min_scale.clamp(0.0, 1.0),
        }
    }

    pub fn phase(&self) -> BookPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == BookPhase::Open
    }

    /// Cursor and time scale stay captured until the close fade completes.
    pub fn captures_input(&self) -> bool {
        self.phase != BookPhase::Closed
    }

    pub fn title(&self) -> &str {
        self.book.as_ref().map(|book| book.title.as_str()).unwrap_or("")
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.book.as_ref().map(BookContent::page_count).unwrap_or(0)
    }

    /// Image reference currently on screen. Lags `page_index` until a flip's midpoint.
    pub fn displayed_page(&self) -> Option<&str> {
        self.book
            .as_ref()
            .and_then(|book| book.pages.get(self.displayed_page))
            .map(String::as_str)
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn is_flipping(&self) -> bool {
        self.flip.is_some()
    }

    pub fn panel_alpha(&self) -> f32 {
        self.panel_alpha.value()
    }

    pub fn page_scale(&self) -> f32 {
        self.page_look.value().x
    }

    pub fn page_alpha(&self) -> f32 {
        self.page_look.value().y
    }

    /// Opens `book` on its first page and fades the panel in.
    pub fn open(
        &mut self,
        source: InteractableId,
        book: BookContent,
        modal: &mut ModalCoordinator,
    ) -> Result<(), InteractionFault> {
        if self.phase != BookPhase::Closed {
            return Err(InteractionFault::conflict("open book", self.phase.label()));
        }
        if book.pages.is_empty() {
            return Err(InteractionFault::invalid_index(0, 0));
        }

        let ticket = modal.acquire(ModalKind::BookReader)?;
        if let Err(fault) = modal.set_flag(&ticket, ModalFlag::BookOpen, true) {
            warn!(target: "book", "Failed to raise book flag: {}", fault);
        }
        self.ticket = Some(ticket);

        info!(
            target: "book",
            "Opened \"{}\" ({} page(s)) from {}", book.title, book.page_count(), source
        );
        self.book = Some(book);
        self.source = Some(source);
        self.page_index = 0;
        self.displayed_page = 0;
        self.flip = None;
        self.page_look.set(PAGE_AT_REST);
        self.phase = BookPhase::Open;
        self.panel_alpha.start(1.0, self.panel_fade_seconds);
        Ok(())
    }

    /// Flips forward. Ignored on the last page or mid-flip.
    pub fn next(&mut self) -> bool {
        if !self.can_flip() || !self.has_next() {
            return false;
        }
        self.page_index += 1;
        self.begin_flip();
        true
    }

    /// Flips back. Ignored on the first page or mid-flip.
    pub fn previous(&mut self) -> bool {
        if !self.can_flip() || !self.has_previous() {
            return false;
        }
        self.page_index -= 1;
        self.begin_flip();
        true
    }

    /// Fades the panel out. Input capture is released once the fade completes.
    pub fn close(&mut self) {
        if self.phase != BookPhase::Open {
            debug!(target: "book", "Close ignored while {}", self.phase.label());
            return;
        }
        self.phase = BookPhase::Closing;
        self.panel_alpha.start(0.0, self.panel_fade_seconds);
    }

    /// Advances the panel fade and any page flip on real time.
    pub fn tick(
        &mut self,
        delta_seconds: f32,
        modal: &mut ModalCoordinator,
    ) -> Option<BookMilestone> {
        let delta = delta_seconds.max(0.0);
        self.panel_alpha.tick(delta);
        let milestone = self.step_flip(delta);

        if self.phase == BookPhase::Closing && !self.panel_alpha.is_animating() {
            return Some(self.finish_close(modal));
        }
        milestone
    }

    fn can_flip(&self) -> bool {
        self.phase == BookPhase::Open && self.flip.is_none()
    }

    fn begin_flip(&mut self) {
        self.flip = Some(FlipPhase::Out);
        self.page_look.start(
            Vec2::new(self.flip_min_scale, 0.0),
            self.flip_phase_seconds,
        );
    }

    fn step_flip(&mut self, delta: f32) -> Option<BookMilestone> {
        let phase = self.flip?;
        self.page_look.tick(delta);
        if self.page_look.is_animating() {
            return None;
        }

        match phase {
            FlipPhase::Out => {
                self.displayed_page = self.page_index;
                self.flip = Some(FlipPhase::In);
                self.page_look.start(PAGE_AT_REST, self.flip_phase_seconds);
                Some(BookMilestone::PageShown(self.page_index))
            }
            FlipPhase::In => {
                self.flip = None;
                None
            }
        }
    }

    fn finish_close(&mut self, modal: &mut ModalCoordinator) -> BookMilestone {
        if let Some(ticket) = self.ticket.take() {
            if let Err(fault) = modal.set_flag(&ticket, ModalFlag::BookOpen, false) {
                warn!(target: "book", "Failed to clear book flag: {}", fault);
            }
            modal.release(ticket);
        }

        if let Some(source) = self.source {
            info!(target: "book", "Closed \"{}\" opened from {}", self.title(), source);
        }
        self.phase = BookPhase::Closed;
        self.book = None;
        self.source = None;
        self.flip = None;
        self.page_look.set(PAGE_AT_REST);
        self.page_index = 0;
        self.displayed_page = 0;
        BookMilestone::Closed
    }
}

impl Default for BookReader {
    fn default() -> Self {
        Self::new(&crate::core::config::InteractionSettings::default().book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn atlas() -> BookContent {
        BookContent::new(
            "Atlas of the Vale",
            vec![
                "pages/vale_0.png".to_string(),
                "pages/vale_1.png".to_string(),
                "pages/vale_2.png".to_string(),
            ],
        )
    }

    fn opened() -> (BookReader, ModalCoordinator) {
        let mut reader = BookReader::default();
        let mut modal = ModalCoordinator::default();
        reader
            .open(InteractableId::new(4), atlas(), &mut modal)
            .expect("book should open");
        (reader, modal)
    }

    fn run(reader: &mut BookReader, modal: &mut ModalCoordinator, seconds: f32) {
        let mut elapsed = 0.0;
        while elapsed < seconds {
            reader.tick(DT, modal);
            elapsed += DT;
        }
    }

    #[test]
    fn open_raises_book_flag_and_fades_in() {
        let (mut reader, mut modal) = opened();
        assert!(modal.book_open());
        assert_eq!(modal.holder(), Some(ModalKind::BookReader));
        assert_eq!(reader.title(), "Atlas of the Vale");
        assert_eq!(reader.displayed_page(), Some("pages/vale_0.png"));
        assert!(!reader.has_previous());
        assert!(reader.has_next());

        run(&mut reader, &mut modal, 0.1);
        assert_eq!(reader.panel_alpha(), 1.0);
    }

    #[test]
    fn boundaries_are_no_ops() {
        let (mut reader, mut modal) = opened();
        assert!(!reader.previous());
        assert_eq!(reader.page_index(), 0);

        assert!(reader.next());
        run(&mut reader, &mut modal, 0.2);
        assert!(reader.next());
        run(&mut reader, &mut modal, 0.2);
        assert_eq!(reader.page_index(), 2);
        assert!(!reader.next());
        assert_eq!(reader.page_index(), 2);
    }

    #[test]
    fn flip_swaps_image_at_midpoint_and_blocks_paging() {
        let (mut reader, mut modal) = opened();
        run(&mut reader, &mut modal, 0.1);

        assert!(reader.next());
        assert_eq!(reader.page_index(), 1);
        assert_eq!(reader.displayed_page(), Some("pages/vale_0.png"));
        assert!(!reader.next());
        assert!(!reader.previous());

        reader.tick(0.04, &mut modal);
        assert!(reader.page_scale() < 1.0 && reader.page_scale() > 0.95);
        assert!(reader.page_alpha() < 1.0);

        assert_eq!(
            reader.tick(0.05, &mut modal),
            Some(BookMilestone::PageShown(1))
        );
        assert_eq!(reader.displayed_page(), Some("pages/vale_1.png"));
        assert!(reader.is_flipping());

        reader.tick(0.1, &mut modal);
        assert!(!reader.is_flipping());
        assert_eq!(reader.page_scale(), 1.0);
        assert_eq!(reader.page_alpha(), 1.0);
        assert!(reader.previous());
    }

    #[test]
    fn close_releases_capture_only_after_fade() {
        let (mut reader, mut modal) = opened();
        run(&mut reader, &mut modal, 0.1);

        reader.close();
        assert_eq!(reader.phase(), BookPhase::Closing);
        assert!(reader.captures_input());
        assert!(!reader.next());

        reader.tick(0.04, &mut modal);
        assert!(modal.book_open());
        assert!(reader.captures_input());

        assert_eq!(reader.tick(0.05, &mut modal), Some(BookMilestone::Closed));
        assert!(!modal.book_open());
        assert!(!reader.captures_input());
        assert_eq!(modal.holder(), None);
        assert_eq!(reader.displayed_page(), None);
    }

    #[test]
    fn zero_page_book_stays_closed() {
        let mut reader = BookReader::default();
        let mut modal = ModalCoordinator::default();
        let blank = BookContent::new("Blank", Vec::new());

        assert_eq!(
            reader.open(InteractableId::new(1), blank, &mut modal),
            Err(InteractionFault::invalid_index(0, 0))
        );
        assert_eq!(reader.phase(), BookPhase::Closed);
        assert!(!modal.book_open());
    }

    #[test]
    fn second_open_is_refused() {
        let (mut reader, mut modal) = opened();
        assert!(reader
            .open(InteractableId::new(5), atlas(), &mut modal)
            .is_err());
        assert_eq!(reader.source, Some(InteractableId::new(4)));
        assert_eq!(reader.title(), "Atlas of the Vale");
    }
}
