//! Per-frame event queue.
//!
//! Producers (DOM listeners, plugins, application code) push events through
//! an [`EventSender`]. The program drains the queue once per frame after the
//! blit: handlers run for each event in enqueue order, then every
//! [`EventKind::Done`] handler runs once with the frame's timing. Events
//! fired while the queue is being drained are delivered next frame.
//!
//! Handlers registered through a [`HandlerRegistry`] are adopted at the start
//! of the next flush, so a handler may register further handlers while it
//! runs; those see events from the following frame on.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::scene::{DrawableId, Scene};

use super::draw_info::DrawInfo;

// ============================================================================
// Event types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    PointerDown,
    PointerMove,
    PointerUp,
    Done,
}

/// The drawable under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickTarget {
    /// The leaf shape that wrote the id.
    pub shape: DrawableId,
    /// The root composite owning it, or the shape itself when top-level.
    pub composite: DrawableId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Raw id read from the pick attachment; `0` is empty space.
    pub id: i32,
    /// `None` when `id` is `0`.
    pub target: Option<PickTarget>,
    pub movement_x: f64,
    pub movement_y: f64,
}

/// Timing of the frame that just finished.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInfo {
    /// Animation-frame timestamp in milliseconds.
    pub time: f64,
    /// Milliseconds since the previous accepted frame.
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// All geometry and textures are loaded; the frame loop is starting.
    Ready,
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    Done(FrameInfo),
}

impl Event {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready => EventKind::Ready,
            Self::PointerDown(_) => EventKind::PointerDown,
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::PointerUp(_) => EventKind::PointerUp,
            Self::Done(_) => EventKind::Done,
        }
    }

    #[must_use]
    pub fn pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::PointerDown(p) | Self::PointerMove(p) | Self::PointerUp(p) => Some(p),
            _ => None,
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Mutable state handlers may touch while events are delivered.
pub struct EventContext<'a> {
    pub scene: &'a mut Scene,
    pub draw_info: &'a mut DrawInfo,
}

pub type EventHandler = Box<dyn FnMut(&Event, &mut EventContext<'_>)>;

/// Cloneable handle for enqueueing events.
#[derive(Clone, Default)]
pub struct EventSender {
    queue: Rc<RefCell<Vec<Event>>>,
}

impl EventSender {
    pub fn fire(&self, event: Event) {
        self.queue.borrow_mut().push(event);
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

/// Cloneable handle for registering handlers, usable while a flush is running.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    incoming: Rc<RefCell<Vec<(EventKind, EventHandler)>>>,
}

impl HandlerRegistry {
    /// Queues `handler`; it joins the bus at the start of the next flush.
    pub fn on(&self, kind: EventKind, handler: EventHandler) {
        self.incoming.borrow_mut().push((kind, handler));
    }

    /// Registrations not yet adopted by the bus.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.incoming.borrow().len()
    }

    fn take(&self) -> Vec<(EventKind, EventHandler)> {
        std::mem::take(&mut *self.incoming.borrow_mut())
    }
}

#[derive(Default)]
pub struct EventBus {
    handlers: FxHashMap<EventKind, Vec<EventHandler>>,
    queue: EventSender,
    registry: HandlerRegistry,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sender(&self) -> EventSender {
        self.queue.clone()
    }

    #[must_use]
    pub fn registry(&self) -> HandlerRegistry {
        self.registry.clone()
    }

    pub fn on(&mut self, kind: EventKind, handler: EventHandler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Handlers adopted so far; queued registrations are not counted.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Delivers every queued event, then the frame's `Done` event.
    pub fn flush(&mut self, ctx: &mut EventContext<'_>, frame: FrameInfo) {
        for (kind, handler) in self.registry.take() {
            self.on(kind, handler);
        }
        for event in self.queue.take() {
            self.dispatch(&event, ctx);
        }
        self.dispatch(&Event::Done(frame), ctx);
    }

    /// Runs the handlers registered for `event`'s kind immediately.
    pub fn dispatch(&mut self, event: &Event, ctx: &mut EventContext<'_>) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers {
                handler(event, ctx);
            }
        }
    }
}
