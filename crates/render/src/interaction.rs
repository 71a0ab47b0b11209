//! Pointer regions and visibility-gated drawing.
//!
//! The interaction layer is the vector counterpart of the raster surface:
//! click regions are kept as polygons in frame coordinates and hit-tested on
//! dispatch, and deferred subtrees wait here until their bounds come into
//! view. Everything registered belongs to one frame generation and is dropped
//! when the next frame begins.

use crate::drawable::Drawable;
use common::geometry::{Point, Rect};
use common::polygon::Polygon;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// Pointer event kinds a region can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    DoubleClick,
    PointerDown,
    PointerUp,
    PointerMove,
}

/// Pointer event in frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: EventKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(kind: EventKind, position: Point) -> Self {
        Self { kind, position }
    }

    pub fn click(x: f64, y: f64) -> Self {
        Self::new(EventKind::Click, Point::new(x, y))
    }
}

pub type EventCallback = Arc<dyn Fn(&PointerEvent) + Send + Sync>;

/// Callback bound to one event kind.
#[derive(Clone)]
pub struct EventHandler {
    pub on: EventKind,
    pub trigger: EventCallback,
}

impl EventHandler {
    pub fn new<F>(on: EventKind, trigger: F) -> Self
    where
        F: Fn(&PointerEvent) + Send + Sync + 'static,
    {
        Self {
            on,
            trigger: Arc::new(trigger),
        }
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler").field("on", &self.on).finish_non_exhaustive()
    }
}

struct Listener {
    id: u64,
    handler: EventHandler,
}

struct Region {
    polygon: Polygon,
    listeners: Vec<Listener>,
}

struct Deferred {
    bounds: Rect,
    draw: DeferredDraw,
}

/// Subtree released for drawing once its bounds became visible.
#[derive(Clone, Debug)]
pub struct DeferredDraw {
    /// Translation in effect where the subtree was declared.
    pub offset: Point,
    pub elements: Vec<Drawable>,
}

#[derive(Default)]
struct Registry {
    generation: u64,
    next_id: u64,
    regions: Vec<Region>,
    watching: Vec<Deferred>,
    ready: Vec<DeferredDraw>,
}

impl Registry {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared registry of click regions and deferred subtrees.
#[derive(Clone)]
pub struct InteractionLayer {
    registry: Arc<Mutex<Registry>>,
    margin: f64,
}

impl InteractionLayer {
    /// `margin` widens every watched bound when testing against the viewport.
    pub fn new(margin: f64) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            margin,
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Drop everything from the previous frame and start a new generation.
    pub fn begin_frame(&self) -> u64 {
        let mut registry = self.registry.lock();
        registry.generation += 1;
        registry.regions.clear();
        registry.watching.clear();
        registry.ready.clear();
        registry.generation
    }

    pub fn generation(&self) -> u64 {
        self.registry.lock().generation
    }

    /// Register a polygon moved by `offset`, one listener per handler.
    pub fn register_region(&self, points: &[Point], offset: Point, handlers: &[EventHandler]) -> Vec<ListenerHandle> {
        let polygon = Polygon::new(points.iter().map(|p| p.translate(offset.x, offset.y)).collect());
        let mut registry = self.registry.lock();
        let generation = registry.generation;
        let mut listeners = Vec::with_capacity(handlers.len());
        let mut handles = Vec::with_capacity(handlers.len());
        for handler in handlers {
            let id = registry.next_id();
            listeners.push(Listener {
                id,
                handler: handler.clone(),
            });
            handles.push(ListenerHandle {
                registry: Arc::downgrade(&self.registry),
                id,
                generation,
            });
        }
        registry.regions.push(Region { polygon, listeners });
        handles
    }

    /// Deliver `event` to the topmost region under the pointer.
    ///
    /// Returns whether any handler ran. Handlers run after the registry lock
    /// is released, so they may register or dispose listeners.
    pub fn dispatch(&self, event: &PointerEvent) -> bool {
        let triggers: Vec<EventCallback> = {
            let registry = self.registry.lock();
            let Some(region) = registry
                .regions
                .iter()
                .rev()
                .find(|region| region.polygon.contains(event.position))
            else {
                tracing::trace!(x = event.position.x, y = event.position.y, "no region under pointer");
                return false;
            };
            region
                .listeners
                .iter()
                .filter(|listener| listener.handler.on == event.kind)
                .map(|listener| Arc::clone(&listener.handler.trigger))
                .collect()
        };
        if triggers.is_empty() {
            tracing::warn!(kind = ?event.kind, "region has no listener for event");
            return false;
        }
        for trigger in &triggers {
            trigger(event);
        }
        true
    }

    /// Live listeners across all regions.
    pub fn listener_count(&self) -> usize {
        self.registry.lock().regions.iter().map(|r| r.listeners.len()).sum()
    }

    pub fn region_count(&self) -> usize {
        self.registry.lock().regions.len()
    }

    /// Hold `elements` back until `bounds`, already in frame coordinates,
    /// intersect the viewport.
    pub fn watch(&self, bounds: Rect, offset: Point, elements: Vec<Drawable>) {
        self.registry.lock().watching.push(Deferred {
            bounds,
            draw: DeferredDraw { offset, elements },
        });
    }

    /// Release every watched subtree visible in `viewport`. Released entries
    /// are no longer observed. Returns how many were released.
    pub fn update_viewport(&self, viewport: Rect) -> usize {
        let mut registry = self.registry.lock();
        let margin = self.margin;
        let (visible, hidden): (Vec<_>, Vec<_>) = registry
            .watching
            .drain(..)
            .partition(|entry| entry.bounds.inflate(margin, margin).intersects(&viewport));
        registry.watching = hidden;
        let released = visible.len();
        registry.ready.extend(visible.into_iter().map(|entry| entry.draw));
        released
    }

    /// Subtrees still waiting for visibility.
    pub fn watching_count(&self) -> usize {
        self.registry.lock().watching.len()
    }

    /// Take the released subtrees. Each is handed out exactly once.
    pub fn take_ready(&self) -> Vec<DeferredDraw> {
        std::mem::take(&mut self.registry.lock().ready)
    }
}

impl Default for InteractionLayer {
    fn default() -> Self {
        Self::new(200.0)
    }
}

impl fmt::Debug for InteractionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("InteractionLayer")
            .field("generation", &registry.generation)
            .field("regions", &registry.regions.len())
            .field("watching", &registry.watching.len())
            .field("margin", &self.margin)
            .finish()
    }
}

/// Disposer for one registered listener.
#[derive(Debug)]
pub struct ListenerHandle {
    registry: Weak<Mutex<Registry>>,
    id: u64,
    generation: u64,
}

impl ListenerHandle {
    /// Remove the listener. Safe to call more than once, or after the frame
    /// that registered it is gone.
    pub fn dispose(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.lock();
        if registry.generation != self.generation {
            return;
        }
        for region in &mut registry.regions {
            region.listeners.retain(|listener| listener.id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let registry = registry.lock();
        registry.generation == self.generation
            && registry
                .regions
                .iter()
                .any(|region| region.listeners.iter().any(|listener| listener.id == self.id))
    }
}
