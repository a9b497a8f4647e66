use slotmap::{SecondaryMap, SlotMap, new_key_type};

use crate::resources::{GeometryCounts, GeometryKey, GeometryKind};

use super::composite::{Composite, CompositeProps};
use super::shape::{Interaction, Shape};
use crate::math::Mat4;

new_key_type! {
    /// Handle of a [`Drawable`] inside a [`Scene`].
    pub struct DrawableId;
}

// ============================================================================
// Drawable
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Shape(Shape),
    Composite(Composite),
}

impl Drawable {
    #[must_use]
    pub fn id(&self) -> i32 {
        match self {
            Self::Shape(s) => s.id,
            Self::Composite(c) => c.id,
        }
    }

    #[must_use]
    pub fn state(&self) -> &Interaction {
        match self {
            Self::Shape(s) => &s.state,
            Self::Composite(c) => &c.state,
        }
    }

    pub fn state_mut(&mut self) -> &mut Interaction {
        match self {
            Self::Shape(s) => &mut s.state,
            Self::Composite(c) => &mut c.state,
        }
    }

    #[must_use]
    pub fn counts(&self) -> GeometryCounts {
        match self {
            Self::Shape(s) => s.counts,
            Self::Composite(c) => c.counts,
        }
    }

    #[must_use]
    pub fn world(&self) -> &Mat4 {
        match self {
            Self::Shape(s) => &s.world,
            Self::Composite(c) => &c.world,
        }
    }

    #[must_use]
    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Self::Shape(s) => Some(s),
            Self::Composite(_) => None,
        }
    }

    #[must_use]
    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Self::Composite(c) => Some(c),
            Self::Shape(_) => None,
        }
    }
}

// ============================================================================
// Draw list & geometry plan
// ============================================================================

/// One step of drawing a root drawable from its shared buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    /// Bind texture atlas `n` to `u_sampler` on unit 0.
    BindAtlas(usize),
    /// Draw a leaf starting at `offset` indices into the shared index buffer.
    Draw { shape: DrawableId, offset: usize },
}

/// The uploads needed to draw one drawable, mirroring its tree.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryPlan {
    Leaf {
        id: DrawableId,
        kind: GeometryKind,
    },
    Group {
        id: DrawableId,
        key: GeometryKey,
        children: Vec<GeometryPlan>,
    },
}

impl GeometryPlan {
    #[must_use]
    pub fn id(&self) -> DrawableId {
        match self {
            Self::Leaf { id, .. } | Self::Group { id, .. } => *id,
        }
    }

    #[must_use]
    pub fn key(&self) -> GeometryKey {
        match self {
            Self::Leaf { kind, .. } => GeometryKey::Shape(*kind),
            Self::Group { key, .. } => key.clone(),
        }
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Arena of shapes and composites plus the ordered list of roots the
/// program draws.
#[derive(Debug, Default)]
pub struct Scene {
    drawables: SlotMap<DrawableId, Drawable>,
    parents: SecondaryMap<DrawableId, DrawableId>,
    roots: Vec<DrawableId>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    /// Inserts a detached shape.
    pub fn create_shape(&mut self, shape: Shape) -> DrawableId {
        self.drawables.insert(Drawable::Shape(shape))
    }

    /// Inserts a shape and registers it as a root.
    pub fn add_shape(&mut self, shape: Shape) -> DrawableId {
        let id = self.create_shape(shape);
        self.add_root(id);
        id
    }

    /// Groups `children` into a new composite.
    ///
    /// Every leaf below `children` whose id is `-1` takes the composite's id,
    /// and every leaf's world translation is offset by `props.pos`. This
    /// happens once here; moving the composite later does not move its leaves.
    /// Children that are unknown or already grouped are skipped.
    pub fn create_composite(&mut self, props: CompositeProps, children: Vec<DrawableId>) -> DrawableId {
        let id = props.id.unwrap_or(-1);
        let [x, y, z] = props.pos;

        let mut accepted = Vec::with_capacity(children.len());
        for child in children {
            if !self.drawables.contains_key(child) {
                log::warn!("Composite child {child:?} does not exist; skipped");
                continue;
            }
            if self.parents.contains_key(child) || accepted.contains(&child) {
                log::warn!("Composite child {child:?} already belongs to a composite; skipped");
                continue;
            }
            if let Some(pos) = self.roots.iter().position(|r| *r == child) {
                self.roots.remove(pos);
            }
            accepted.push(child);
        }

        for &child in &accepted {
            for leaf in self.leaves(child) {
                if let Some(Drawable::Shape(shape)) = self.drawables.get_mut(leaf) {
                    if shape.id == -1 {
                        shape.id = id;
                    }
                    shape.world.offset_translation(x, y, z);
                }
            }
        }

        let composite = Composite {
            id,
            world: Mat4::from_translation(x, y, z),
            state: Interaction::new(props.display.unwrap_or_default()),
            atlas: props.atlas,
            counts: GeometryCounts::default(),
            children: accepted.clone(),
        };
        let composite_id = self.drawables.insert(Drawable::Composite(composite));
        for child in accepted {
            self.parents.insert(child, composite_id);
        }
        composite_id
    }

    /// Creates a composite and registers it as a root.
    pub fn add_composite(&mut self, props: CompositeProps, children: Vec<DrawableId>) -> DrawableId {
        let id = self.create_composite(props, children);
        self.add_root(id);
        id
    }

    /// Registers a top-level drawable. Children of composites are rejected.
    pub fn add_root(&mut self, id: DrawableId) {
        if !self.drawables.contains_key(id) || self.roots.contains(&id) {
            return;
        }
        if self.parents.contains_key(id) {
            log::warn!("{id:?} belongs to a composite and cannot be a root");
            return;
        }
        self.roots.push(id);
    }

    // ------------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[DrawableId] {
        &self.roots
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.drawables.get_mut(id)
    }

    #[must_use]
    pub fn shape(&self, id: DrawableId) -> Option<&Shape> {
        self.drawables.get(id).and_then(Drawable::as_shape)
    }

    pub fn shape_mut(&mut self, id: DrawableId) -> Option<&mut Shape> {
        match self.drawables.get_mut(id) {
            Some(Drawable::Shape(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn composite(&self, id: DrawableId) -> Option<&Composite> {
        self.drawables.get(id).and_then(Drawable::as_composite)
    }

    pub fn composite_mut(&mut self, id: DrawableId) -> Option<&mut Composite> {
        match self.drawables.get_mut(id) {
            Some(Drawable::Composite(c)) => Some(c),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, id: DrawableId) -> Option<DrawableId> {
        self.parents.get(id).copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DrawableId, &Drawable)> {
        self.drawables.iter()
    }

    /// All leaf shapes below `id` in draw order (`id` itself for a shape).
    #[must_use]
    pub fn leaves(&self, id: DrawableId) -> Vec<DrawableId> {
        let mut out = Vec::new();
        self.collect_leaves(id, &mut out);
        out
    }

    fn collect_leaves(&self, id: DrawableId, out: &mut Vec<DrawableId>) {
        match self.drawables.get(id) {
            Some(Drawable::Shape(_)) => out.push(id),
            Some(Drawable::Composite(c)) => {
                for &child in &c.children {
                    self.collect_leaves(child, out);
                }
            }
            None => {}
        }
    }

    // ------------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------------

    /// Children first, then the drawable itself.
    fn propagate(&mut self, id: DrawableId, op: fn(&mut Interaction)) {
        let children = match self.drawables.get(id) {
            Some(Drawable::Composite(c)) => c.children.clone(),
            Some(Drawable::Shape(_)) => Vec::new(),
            None => return,
        };
        for child in children {
            self.propagate(child, op);
        }
        if let Some(d) = self.drawables.get_mut(id) {
            op(d.state_mut());
        }
    }

    pub fn show(&mut self, id: DrawableId) {
        self.propagate(id, Interaction::show);
    }

    pub fn hide(&mut self, id: DrawableId) {
        self.propagate(id, Interaction::hide);
    }

    pub fn focus(&mut self, id: DrawableId) {
        self.propagate(id, Interaction::focus);
    }

    pub fn blur(&mut self, id: DrawableId) {
        self.propagate(id, Interaction::blur);
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn geometry_key(&self, id: DrawableId) -> Option<GeometryKey> {
        self.geometry_plan(id).map(|plan| plan.key())
    }

    /// Upload tree for `id`; `None` if the id is unknown.
    #[must_use]
    pub fn geometry_plan(&self, id: DrawableId) -> Option<GeometryPlan> {
        match self.drawables.get(id)? {
            Drawable::Shape(s) => Some(GeometryPlan::Leaf { id, kind: s.kind }),
            Drawable::Composite(c) => {
                let children: Vec<GeometryPlan> = c
                    .children
                    .iter()
                    .filter_map(|&child| self.geometry_plan(child))
                    .collect();
                let key = GeometryKey::Composite(children.iter().map(GeometryPlan::key).collect());
                Some(GeometryPlan::Group { id, key, children })
            }
        }
    }

    /// Records uploaded element counts on a drawable.
    pub fn set_counts(&mut self, id: DrawableId, counts: GeometryCounts) {
        match self.drawables.get_mut(id) {
            Some(Drawable::Shape(s)) => s.counts = counts,
            Some(Drawable::Composite(c)) => c.counts = counts,
            None => {}
        }
    }

    // ------------------------------------------------------------------------
    // Draw list
    // ------------------------------------------------------------------------

    /// Appends the draw steps for `root` to `out`.
    ///
    /// Hidden composites are skipped with all their children. Each child's
    /// range starts where the previous sibling's ended.
    pub fn collect_draws(&self, root: DrawableId, out: &mut Vec<DrawCommand>) {
        self.collect_draws_at(root, 0, out);
    }

    fn collect_draws_at(&self, id: DrawableId, offset: usize, out: &mut Vec<DrawCommand>) {
        match self.drawables.get(id) {
            Some(Drawable::Shape(s)) => {
                if s.is_visible() {
                    out.push(DrawCommand::Draw { shape: id, offset });
                }
            }
            Some(Drawable::Composite(c)) => {
                if !c.is_visible() {
                    return;
                }
                if let Some(atlas) = c.atlas {
                    out.push(DrawCommand::BindAtlas(atlas));
                }
                let mut offset = offset;
                for &child in &c.children {
                    self.collect_draws_at(child, offset, out);
                    if let Some(d) = self.drawables.get(child) {
                        offset += d.counts().advance();
                    }
                }
            }
            None => {}
        }
    }
}
