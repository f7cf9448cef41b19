//! # `Tessera` Scene
//!
//! The node tree of a tile UI: event bubbling, positioned elements, focus
//! and compositing onto tile surfaces.
//!
//! ## Model
//!
//! A [`Scene`] owns every node in an arena and hands out copyable
//! [`NodeId`]s. Nodes gain abilities from the state attached to them:
//!
//! - **Plain nodes** take part in the tree and in event bubbling.
//! - **Elements** have a position relative to their parent, a size, a
//!   padding and a grid of content tiles. Their look and the placement of
//!   their children can be customized with an [`ElementBehavior`].
//! - **Focus managers** keep the focusable elements of their subtree in
//!   order, with at most one of them focused.
//! - **Surfaces** own a [`TileBuffer`](tessera_buffer::TileBuffer) and are
//!   focus managers. [`Scene::render`] draws the elements below a surface
//!   into its buffer and flushes it.
//!
//! ## Events
//!
//! [`Scene::emit`] calls the listeners of a node, then of its parent and so
//! on up to the root. Listeners get `&mut Scene`, so they can change the tree
//! while handling an event.
//!
//! ## Quick Start
//!
//! ```
//! use tessera_buffer::{BufferOptions, RecordingBackend};
//! use tessera_core::Tile;
//! use tessera_scene::{ElementOptions, EventKind, Scene};
//!
//! let mut scene = Scene::new();
//! let options = BufferOptions::default().with_size(20, 5);
//! let surface = scene.create_surface(&options, Box::new(RecordingBackend::new())).unwrap();
//!
//! let label = scene
//!     .create_element(ElementOptions::new().at(2, 1).size(5, 1).parent(surface))
//!     .unwrap();
//! for (col, ch) in "hello".chars().enumerate() {
//!     scene.set_content_tile(label, col as i32, 0, Tile::new().with_char(ch));
//! }
//!
//! scene.on(label, EventKind::Click, |scene, event| {
//!     scene.hide(event.target());
//! });
//!
//! scene.render(surface).unwrap();
//! assert_eq!(scene.buffer(surface).unwrap().get_tile(2, 1).unwrap().ch, Some('h'));
//! ```

#![warn(missing_docs)]

pub mod element;
pub mod error;
pub mod event;
pub mod focus;
pub mod input;
pub mod node;
pub mod scene;
pub mod surface;

pub use element::{ChildSlot, ElementBehavior, ElementOptions, ElementView, Placement};
pub use error::{SceneError, SceneResult};
pub use event::{Event, EventKind, EventKinds, EventPayload, Listener, ListenerId};
pub use node::NodeId;
pub use scene::Scene;
