//! In-memory presenter for tests and the headless runner

use std::collections::BTreeMap;

use super::{EntityDescriptor, EntityKind, Presenter, StatusFlags};
use crate::sim::{Rect, Vector2, VisualHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visual {
    pub kind: EntityKind,
    pub rect: Rect,
}

/// Keeps every visual in a map instead of drawing it
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    visuals: BTreeMap<u64, Visual>,
    next_id: u64,
    scroll: i32,
    popups: Vec<String>,
    status: StatusFlags,
    realized_total: u64,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&Visual> {
        self.visuals.get(&handle.0)
    }

    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    /// Live visuals matching `pred`
    pub fn count_where(&self, pred: impl Fn(&EntityKind) -> bool) -> usize {
        self.visuals.values().filter(|v| pred(&v.kind)).count()
    }

    pub fn scroll(&self) -> i32 {
        self.scroll
    }

    pub fn popups(&self) -> &[String] {
        &self.popups
    }

    pub fn status(&self) -> StatusFlags {
        self.status
    }

    /// Visuals created over the presenter's lifetime
    pub fn realized_total(&self) -> u64 {
        self.realized_total
    }
}

impl Presenter for HeadlessPresenter {
    fn realize(&mut self, entity: &EntityDescriptor) -> VisualHandle {
        self.next_id += 1;
        self.realized_total += 1;
        self.visuals.insert(
            self.next_id,
            Visual {
                kind: entity.kind,
                rect: entity.rect,
            },
        );
        VisualHandle(self.next_id)
    }

    fn bounds_of(&self, handle: VisualHandle) -> Option<Rect> {
        self.visuals.get(&handle.0).map(|v| v.rect)
    }

    fn place(&mut self, handle: VisualHandle, position: Vector2) {
        match self.visuals.get_mut(&handle.0) {
            Some(visual) => visual.rect.set_position(position),
            None => log::warn!("place() on unknown visual {}", handle.0),
        }
    }

    fn remove(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle.0).is_none() {
            log::warn!("remove() on unknown visual {}", handle.0);
        }
    }

    fn scroll_to(&mut self, offset: i32) {
        self.scroll = offset;
    }

    fn show_popup(&mut self, message: &str) {
        log::info!("Popup: {message}");
        self.popups.push(message.to_string());
    }

    fn show_status(&mut self, status: StatusFlags) {
        self.status = status;
    }
}
