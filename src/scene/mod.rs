//! Scene Module
//!
//! Drawables of the resume map:
//! - [`Shape`]: one geometry kind with its own transform, colors and pick id
//! - [`Composite`]: a group of drawables sharing one concatenated buffer
//! - [`Scene`]: arena of both, plus the ordered roots the program draws
//!
//! Composites do not form a live transform hierarchy. Creating one bakes
//! its position into the leaves' world matrices and hands its id to leaves
//! that have none; after that every world matrix is a plain owned field.
//!
//! ```rust,ignore
//! use folio::scene::{Scene, Shape, ShapeProps, CompositeProps};
//!
//! let mut scene = Scene::new();
//! scene.add_shape(Shape::grid(1.3, 1.5, 7.0, &ShapeProps::new()));
//! let node = scene.node(CompositeProps::new().with_id(3).with_position(0.2, 0.0, -0.4));
//! scene.add_root(node);
//! ```

pub mod composite;
pub mod presets;
pub mod primitives;
pub mod scene;
pub mod shape;

pub use composite::{Composite, CompositeProps};
pub use scene::{DrawCommand, Drawable, DrawableId, GeometryPlan, Scene};
pub use shape::{Display, Interaction, Shape, ShapeProps, ShapeType, Topology};
