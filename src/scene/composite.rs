use crate::math::Mat4;
use crate::resources::GeometryCounts;

use super::scene::DrawableId;
use super::shape::{Display, Interaction};

/// Construction options of a [`Composite`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeProps {
    /// Id handed to every leaf whose own id is unset. Default `-1`.
    pub id: Option<i32>,
    /// Offset baked into every leaf's world translation.
    pub pos: [f32; 3],
    pub display: Option<Display>,
    /// Texture atlas bound to `u_sampler` before the children draw.
    pub atlas: Option<usize>,
}

impl CompositeProps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.pos = [x, y, z];
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: Display) -> Self {
        self.display = Some(display);
        self
    }

    #[must_use]
    pub fn with_atlas(mut self, atlas: usize) -> Self {
        self.atlas = Some(atlas);
        self
    }
}

/// A group of drawables sharing one concatenated GPU buffer.
///
/// The world matrix is informational: the composite's position was baked
/// into its leaves when it was created.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub id: i32,
    pub world: Mat4,
    pub state: Interaction,
    pub atlas: Option<usize>,
    pub counts: GeometryCounts,
    pub(crate) children: Vec<DrawableId>,
}

impl Composite {
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[DrawableId] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.visible
    }
}
