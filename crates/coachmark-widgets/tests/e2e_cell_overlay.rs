//! Sessions rendered into a cell buffer, frame by frame.

use std::rc::Rc;

use coachmark_core::{Position, Rect, Shape, Sides, Target};
use coachmark_harness::{FixedContainer, ScriptedAnchors};
use coachmark_runtime::{EngineConfig, Phase, PresentationEngine};
use coachmark_widgets::{CellBuffer, CellFlags, CellSurface};
use web_time::Duration;

const SCREEN: Rect = Rect::new(0.0, 0.0, 40.0, 14.0);
const MENU: Rect = Rect::new(4.0, 1.0, 6.0, 1.0);
const SEARCH: Rect = Rect::new(24.0, 10.0, 10.0, 1.0);
const PANEL: Rect = Rect::new(14.0, 4.0, 10.0, 6.0);

type Engine = PresentationEngine<ScriptedAnchors, CellSurface>;

struct Screen {
    engine: Engine,
    _container: Rc<FixedContainer>,
}

impl Screen {
    fn new(config: EngineConfig) -> Self {
        let container = Rc::new(FixedContainer::new(SCREEN));
        let anchors = ScriptedAnchors::new()
            .visible("menu", MENU)
            .visible("search", SEARCH)
            .visible("panel", PANEL);
        let engine =
            PresentationEngine::new(anchors, CellSurface::new(), config).with_container(&container);
        Self {
            engine,
            _container: container,
        }
    }

    fn frame(&self) -> CellBuffer {
        let mut buf = CellBuffer::new(40, 14);
        self.engine.renderer().render(&mut buf);
        buf
    }
}

fn cell_target(anchor: &str, message: &str) -> Target {
    Target::new(anchor, message)
        .arrow_size(2.0, 2.0)
        .arrow_head_size(1.0)
        .margins(Sides::all(0.0))
        .text_margins(Sides::all(0.0))
        .label_width(16.0)
}

fn contains_text(buf: &CellBuffer, needle: &str) -> bool {
    buf.rows().iter().any(|row| row.contains(needle))
}

fn is_dim(buf: &CellBuffer, x: i32, y: i32) -> bool {
    buf.get(x, y)
        .is_some_and(|c| c.flags.contains(CellFlags::DIM))
}

#[test]
fn targets_render_in_sequence() {
    let mut screen = Screen::new(EngineConfig::default());
    screen.engine.add_targets([
        cell_target("menu", "Open the menu").duration(Duration::from_millis(500)),
        cell_target("search", "Find anything")
            .position(Position::Top)
            .break_point(true),
    ]);
    screen.engine.fire_targets();

    let first = screen.frame();
    assert!(contains_text(&first, "Open the menu"));
    assert!(!contains_text(&first, "Find anything"));
    assert!(!is_dim(&first, 4, 1), "menu cutout stays clear");
    assert!(is_dim(&first, 24, 10), "search is still dimmed");

    screen.engine.tick(Duration::from_millis(500));
    let second = screen.frame();
    assert!(!contains_text(&second, "Open the menu"));
    assert!(contains_text(&second, "Find anything"));
    assert!(is_dim(&second, 4, 1), "retired cutout is dimmed again");
    assert!(!is_dim(&second, 24, 10));

    assert!(screen.engine.proceed());
    assert_eq!(screen.engine.phase(), Phase::Completed);
    let done = screen.frame();
    assert_eq!(done.count(CellFlags::DIM), 0);
    assert_eq!(done.count(CellFlags::LABEL), 0);
}

#[test]
fn top_label_sits_above_the_anchor() {
    let mut screen = Screen::new(EngineConfig::default());
    screen.engine.add_target(
        cell_target("search", "Find anything")
            .position(Position::Top)
            .break_point(true),
    );
    screen.engine.fire_targets();

    let buf = screen.frame();
    // Pointer occupies rows 8..10, label row 7.
    assert!(buf.row_text(7).contains("Find anything"));
    let pointer_rows: Vec<i32> = (0..14)
        .filter(|&y| {
            (0..40).any(|x| {
                buf.get(x, y)
                    .is_some_and(|c| c.flags.contains(CellFlags::POINTER))
            })
        })
        .collect();
    assert_eq!(pointer_rows, [8, 9]);
}

#[test]
fn fade_hides_overlay_until_threshold() {
    let mut screen = Screen::new(EngineConfig::default().fade_in(Duration::from_millis(200)));
    screen
        .engine
        .add_target(cell_target("menu", "Open the menu").break_point(true));
    screen.engine.fire_targets();
    assert_eq!(screen.frame().count(CellFlags::DIM), 0);

    screen.engine.tick(Duration::from_millis(50));
    assert_eq!(screen.frame().count(CellFlags::DIM), 0, "opacity 0.25");

    screen.engine.tick(Duration::from_millis(60));
    let buf = screen.frame();
    assert!(buf.count(CellFlags::DIM) > 0, "opacity past 0.5");
    assert!(contains_text(&buf, "Open the menu"));
}

#[test]
fn persistent_labels_accumulate() {
    let mut screen = Screen::new(EngineConfig::default());
    screen.engine.add_targets([
        cell_target("menu", "Open the menu").persistent(true),
        cell_target("search", "Find anything")
            .position(Position::Top)
            .break_point(true),
    ]);
    screen.engine.fire_targets();
    screen.engine.tick(Duration::ZERO);

    let buf = screen.frame();
    assert!(contains_text(&buf, "Open the menu"));
    assert!(contains_text(&buf, "Find anything"));
    assert!(!is_dim(&buf, 4, 1));
    assert!(!is_dim(&buf, 24, 10));
    assert_eq!(screen.engine.renderer().cutouts().count(), 2);
}

#[test]
fn ellipse_cutout_dims_corners() {
    let frame_for = |shape: Shape| {
        let mut screen = Screen::new(EngineConfig::default());
        screen.engine.add_target(
            cell_target("panel", "Details")
                .shape(shape)
                .position(Position::Top)
                .break_point(true),
        );
        screen.engine.fire_targets();
        screen.frame()
    };

    let ellipse = frame_for(Shape::Ellipse);
    assert!(!is_dim(&ellipse, 18, 6), "centre is clear");
    assert!(is_dim(&ellipse, 14, 4), "corner is dimmed");

    let rect = frame_for(Shape::Rect);
    assert!(!is_dim(&rect, 14, 4));

    let none = frame_for(Shape::None);
    assert!(is_dim(&none, 18, 6), "no hole at all");
}

#[test]
fn hidden_pointer_still_guides_label() {
    let mut visible = Screen::new(EngineConfig::default());
    visible
        .engine
        .add_target(cell_target("menu", "Open the menu").break_point(true));
    visible.engine.fire_targets();

    let mut guide = Screen::new(EngineConfig::default());
    guide.engine.add_target(
        cell_target("menu", "Open the menu")
            .with_arrow(false)
            .break_point(true),
    );
    guide.engine.fire_targets();

    let with_pointer = visible.frame();
    let without_pointer = guide.frame();
    assert!(with_pointer.count(CellFlags::POINTER) > 0);
    assert_eq!(without_pointer.count(CellFlags::POINTER), 0);
    let label_row = |buf: &CellBuffer| (0..14).find(|&y| buf.row_text(y).contains("Open the menu"));
    assert_eq!(label_row(&with_pointer), label_row(&without_pointer));
}

#[test]
fn oversized_pointer_renders_within_the_buffer() {
    let mut screen = Screen::new(EngineConfig::default());
    screen.engine.add_target(
        Target::new("panel", "Huge")
            .arrow_size(5e6, 5e6)
            .break_point(true),
    );
    screen.engine.fire_targets();
    assert_eq!(screen.engine.phase(), Phase::AwaitingDismissal);

    let buf = screen.frame();
    assert!(buf.count(CellFlags::POINTER) <= 40 * 14);
    assert!(!is_dim(&buf, 18, 6), "cutout still clear");
}
