//! End-to-end behavior of scenes drawn on recording surfaces.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use tessera_buffer::{BufferOptions, PaintLogHandle, RecordingBackend};
use tessera_core::{Tile, Viewport};
use tessera_scene::{ElementOptions, EventKind, EventPayload, NodeId, Scene, SceneError};

fn surface(scene: &mut Scene, options: BufferOptions) -> (NodeId, PaintLogHandle) {
    let backend = RecordingBackend::new();
    let log = backend.log();
    let id = scene.create_surface(&options, Box::new(backend)).unwrap();
    log.borrow_mut().clear();
    (id, log)
}

fn element(scene: &mut Scene, options: ElementOptions) -> NodeId {
    scene.create_element(options).unwrap()
}

fn fill(scene: &mut Scene, id: NodeId, ch: char) {
    if let Some(content) = scene.content_mut(id) {
        content.fill(Tile::new().with_char(ch));
    }
}

#[test]
fn test_absolute_box_of_root_elements() {
    let mut scene = Scene::new();
    let id = element(&mut scene, ElementOptions::new().at(4, 7).size(3, 2));
    assert_eq!(scene.bounds(id), Some(Viewport::new(4, 7, 6, 8)));

    let empty = element(&mut scene, ElementOptions::new());
    assert_eq!(scene.bounds(empty), Some(Viewport::new(0, 0, -1, -1)));
}

#[test]
fn test_children_follow_their_parent() {
    let mut scene = Scene::new();
    let parent = element(&mut scene, ElementOptions::new().at(5, 10).size(30, 30));
    let child = element(&mut scene, ElementOptions::new().at(2, 3).size(5, 6));
    scene.append(parent, child).unwrap();
    assert_eq!(scene.bounds(child), Some(Viewport::new(7, 13, 11, 18)));

    scene.move_by(parent, 1, 1);
    assert_eq!(scene.bounds(child), Some(Viewport::new(8, 14, 12, 19)));
    assert_eq!((scene.x(child), scene.y(child)), (Some(2), Some(3)));

    scene.remove(parent, child);
    scene.move_by(parent, 10, 10);
    assert_eq!(scene.bounds(child), Some(Viewport::new(8, 14, 12, 19)));
}

#[test]
fn test_bubbling_and_cancellation() {
    let mut scene = Scene::new();
    let root = scene.create_node();
    let a = scene.create_node();
    let b = scene.create_node();
    let leaf = scene.create_node();
    scene.append(root, a).unwrap();
    scene.append(a, b).unwrap();
    scene.append(b, leaf).unwrap();

    let calls = Rc::new(RefCell::new(Vec::new()));
    let listen = |scene: &mut Scene, node: NodeId, name: &'static str, action: fn(&mut tessera_scene::Event)| {
        let calls = Rc::clone(&calls);
        scene.on(node, EventKind::Click, move |_, event| {
            calls.borrow_mut().push(name);
            action(event);
        });
    };
    listen(&mut scene, leaf, "leaf", |_| {});
    listen(&mut scene, b, "b1", |_| {});
    listen(&mut scene, b, "b2", |_| {});
    listen(&mut scene, a, "a", |_| {});
    listen(&mut scene, root, "root", |_| {});

    scene.emit(leaf, EventKind::Click, EventPayload::None);
    assert_eq!(*calls.borrow(), vec!["leaf", "b1", "b2", "a", "root"]);

    calls.borrow_mut().clear();
    scene.clear_listeners(b, None);
    listen(&mut scene, b, "b1", |event| event.stop_propagation());
    listen(&mut scene, b, "b2", |_| {});
    scene.emit(leaf, EventKind::Click, EventPayload::None);
    assert_eq!(*calls.borrow(), vec!["leaf", "b1", "b2"]);

    calls.borrow_mut().clear();
    scene.clear_listeners(b, None);
    listen(&mut scene, b, "b1", |event| event.stop_immediate_propagation());
    listen(&mut scene, b, "b2", |_| {});
    scene.emit(leaf, EventKind::Click, EventPayload::None);
    assert_eq!(*calls.borrow(), vec!["leaf", "b1"]);
}

#[test]
fn test_viewport_stack_on_surface_buffer() {
    let mut scene = Scene::new();
    let (id, _) = surface(&mut scene, BufferOptions::default().with_size(20, 20));
    let buffer = scene.buffer_mut(id).unwrap();

    buffer.push_viewport(Viewport::new(1, 1, 8, 8));
    buffer.push_viewport(Viewport::new(4, 4, 12, 12));
    assert_eq!(buffer.viewport(), Viewport::new(4, 4, 8, 8));
    assert!(!buffer.set_tile(2, 2, &Tile::new().with_char('x')));
    assert!(!buffer.set_tile(10, 10, &Tile::new().with_char('x')));
    assert!(buffer.set_tile(4, 8, &Tile::new().with_char('x')));

    assert_eq!(buffer.pop_viewport(), Some(Viewport::new(4, 4, 8, 8)));
    assert_eq!(buffer.viewport(), Viewport::new(1, 1, 8, 8));
}

#[test]
fn test_dirty_cells_are_deduplicated() {
    let mut scene = Scene::new();
    let (id, log) = surface(&mut scene, BufferOptions::default().with_size(4, 4));
    let buffer = scene.buffer_mut(id).unwrap();

    let tile = Tile::new().with_char('q');
    assert!(buffer.set_tile(1, 1, &tile));
    assert!(!buffer.set_tile(1, 1, &tile));
    assert_eq!(buffer.dirty_len(), 1);

    scene.render(id).unwrap();
    assert_eq!(log.borrow().positions(), vec![(1, 1)]);
}

#[test]
fn test_focus_traversal_wraps_in_document_order() {
    let mut scene = Scene::new();
    let (id, _) = surface(&mut scene, BufferOptions::default());
    let panel = element(&mut scene, ElementOptions::new().size(10, 10).parent(id));
    let first = element(&mut scene, ElementOptions::new().size(1, 1).focusable().parent(panel));
    let last = element(&mut scene, ElementOptions::new().size(1, 1).focusable().parent(id));
    let second = element(&mut scene, ElementOptions::new().size(1, 1).focusable());
    scene.insert(panel, second, 1).unwrap();
    let order = [first, second, last];
    assert_eq!(scene.focusable_elements(id), &order);

    let mut visited = Vec::new();
    for _ in 0..=order.len() {
        scene.focus_next(id);
        visited.extend(scene.focused_element(id));
    }
    assert_eq!(visited, vec![first, second, last, first]);
    assert_eq!(order.iter().filter(|&&e| scene.is_focused(e)).count(), 1);
}

#[test]
fn test_resize_refills_with_clear_style() {
    let mut scene = Scene::new();
    let (id, _) = surface(&mut scene, BufferOptions::default().with_size(5, 5));
    let buffer = scene.buffer_mut(id).unwrap();
    buffer.set_tile(0, 0, &Tile::new().with_char('k'));
    buffer.set_tile(3, 3, &Tile::new().with_char('x'));

    scene.resize_surface(id, 2, 2).unwrap();
    scene.resize_surface(id, 5, 5).unwrap();

    let buffer = scene.buffer(id).unwrap();
    assert_eq!(buffer.get_tile(0, 0).and_then(|tile| tile.ch), Some('k'));
    assert_eq!(buffer.get_tile(3, 3), Some(buffer.clear_style()));
}

#[test]
fn test_resize_round_trip_on_empty_buffer() {
    let mut scene = Scene::new();
    let (id, _) = surface(&mut scene, BufferOptions::default().with_size(6, 4));
    scene.resize_surface(id, 9, 2).unwrap();
    scene.resize_surface(id, 6, 4).unwrap();

    let buffer = scene.buffer(id).unwrap();
    assert_eq!((buffer.width(), buffer.height()), (6, 4));
    for (col, row) in buffer.bounds().positions() {
        assert_eq!(buffer.get_tile(col, row), Some(buffer.clear_style()));
    }
}

#[test]
fn test_nested_children_never_paint_outside_ancestors() {
    let mut scene = Scene::new();
    let (id, _) = surface(&mut scene, BufferOptions::default().with_size(12, 12));
    let outer = element(&mut scene, ElementOptions::new().at(2, 2).size(4, 4).parent(id));
    let middle = element(&mut scene, ElementOptions::new().at(-1, 1).size(8, 2).parent(outer));
    let inner = element(&mut scene, ElementOptions::new().at(2, -3).size(3, 9).parent(middle));
    fill(&mut scene, middle, 'm');
    fill(&mut scene, inner, 'i');

    scene.render(id).unwrap();
    let buffer = scene.buffer(id).unwrap();
    let outer_box = scene.bounds(outer).unwrap();
    for (col, row) in buffer.bounds().positions() {
        if buffer.get_tile(col, row).and_then(|tile| tile.ch).is_some() {
            assert!(outer_box.contains(col, row), "painted outside at ({col}, {row})");
        }
    }
    // middle covers rows 3..=4 from col 2; inner starts at col 3.
    assert_eq!(buffer.get_tile(2, 3).and_then(|tile| tile.ch), Some('m'));
    assert_eq!(buffer.get_tile(3, 3).and_then(|tile| tile.ch), Some('i'));
    assert_eq!(buffer.get_tile(3, 5).and_then(|tile| tile.ch), None);
}

#[test]
fn test_hidden_element_is_cleared_on_next_render() {
    let mut scene = Scene::new();
    let (id, log) = surface(&mut scene, BufferOptions::default().with_size(4, 2));
    let card = element(&mut scene, ElementOptions::new().size(2, 2).parent(id));
    fill(&mut scene, card, '#');
    scene.render(id).unwrap();

    scene.hide(card);
    log.borrow_mut().clear();
    scene.render(id).unwrap();

    let clear_style = scene.buffer(id).unwrap().clear_style().clone();
    let log = log.borrow();
    assert_eq!(log.positions(), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    assert!(log.cells.iter().all(|cell| cell.tile == clear_style));
}

#[test]
fn test_element_glyph_changes_decay() {
    let mut scene = Scene::new();
    let options = BufferOptions::default()
        .with_size(3, 1)
        .with_decay(Duration::from_millis(80));
    let (id, log) = surface(&mut scene, options);
    let label = element(&mut scene, ElementOptions::new().size(1, 1).parent(id));
    fill(&mut scene, label, 'a');
    scene.render(id).unwrap();
    assert_eq!(scene.buffer(id).unwrap().pending_frame(), None);

    fill(&mut scene, label, 'b');
    scene.render(id).unwrap();
    let handle = scene.buffer(id).unwrap().pending_frame().unwrap();

    // Another render replaces the frame.
    scene.render(id).unwrap();
    let fresh = scene.buffer(id).unwrap().pending_frame().unwrap();
    log.borrow_mut().clear();
    let buffer = scene.buffer_mut(id).unwrap();
    assert_eq!(buffer.decay_frame(handle, Instant::now()).unwrap(), None);
    assert!(log.borrow().cells.is_empty());

    let later = Instant::now() + Duration::from_secs(1);
    assert_eq!(buffer.decay_frame(fresh, later).unwrap(), None);
    assert_eq!(log.borrow().positions(), vec![(0, 0)]);
    assert_eq!(buffer.pending_frame(), None);
}

#[test_log::test]
fn test_tree_misuse_is_reported() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.create_node();
    scene.append(parent, child).unwrap();

    assert!(matches!(
        scene.append(child, parent),
        Err(SceneError::CircularReference { .. })
    ));
    assert!(matches!(
        scene.append(child, child),
        Err(SceneError::CircularReference { .. })
    ));
    assert_eq!(scene.children(parent), &[child]);

    scene.destroy(child).unwrap();
    assert!(matches!(scene.append(parent, child), Err(SceneError::NodeNotFound(_))));
    assert!(scene.children(parent).is_empty());
}

#[test_log::test]
fn test_listeners_can_rebuild_the_tree() {
    let mut scene = Scene::new();
    let (id, _) = surface(&mut scene, BufferOptions::default().with_size(6, 1));
    let button = element(&mut scene, ElementOptions::new().size(2, 1).focusable().parent(id));
    fill(&mut scene, button, 'o');

    scene.on(button, EventKind::Click, |scene, event| {
        let target = event.target();
        if let Some(surface) = scene.element_surface(target) {
            scene.remove(surface, target);
            if let Ok(popup) = scene.create_element(ElementOptions::new().at(3, 0).size(3, 1).parent(surface)) {
                if let Some(content) = scene.content_mut(popup) {
                    content.fill(Tile::new().with_char('!'));
                }
            }
        }
    });

    scene.render(id).unwrap();
    scene.emit(button, EventKind::Click, EventPayload::None);
    scene.render(id).unwrap();

    let buffer = scene.buffer(id).unwrap();
    let text: String = (0..6)
        .map(|col| buffer.get_tile(col, 0).and_then(|tile| tile.ch).unwrap_or('.'))
        .collect();
    assert_eq!(text, "...!!!");
    assert_eq!(scene.parent(button), None);
}
