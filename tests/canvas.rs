use pixclip::color::{self, BLACK, BLUE, GREEN, RED};
use pixclip::{
    BounceState, CanvasOptions, ClippedCanvas, MemorySurface, OverlapTest, Rect, Rgb565,
};

fn canvas(width: u32, height: u32) -> ClippedCanvas<MemorySurface> {
    let surface = MemorySurface::new(width, height).unwrap();
    ClippedCanvas::new(width, height, surface).unwrap()
}

fn cells_with(canvas: &ClippedCanvas<MemorySurface>, color: Rgb565) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..canvas.height() as i32 {
        for x in 0..canvas.width() as i32 {
            if canvas.get_pixel(x, y) == Some(color) {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn fill_rectangle_is_trimmed_to_clip_region() {
    let mut canvas = canvas(130, 130);
    canvas.fill_screen(BLUE);
    let clip = Rect::from_coords(20, 20, 110, 110);
    canvas.set_clip_region(clip);
    canvas.fill_rectangle(0, 0, 130, 130, RED);

    for y in 0..130 {
        for x in 0..130 {
            let expected = if clip.contains(x, y) { RED } else { BLUE };
            assert_eq!(canvas.get_pixel(x, y), Some(expected), "cell ({x}, {y})");
        }
    }
}

#[test]
fn fill_screen_ignores_clip_region() {
    let mut canvas = canvas(32, 24);
    canvas.set_clip_region(Rect::from_coords(4, 4, 8, 8));
    canvas.fill_screen(GREEN);
    assert_eq!(cells_with(&canvas, GREEN).len(), 32 * 24);
    assert_eq!(canvas.clip_region(), Rect::from_coords(4, 4, 8, 8));
}

#[test]
fn horizontal_run_scenario() {
    let mut canvas = canvas(64, 64);
    canvas.set_clip_region(Rect::from_coords(10, 10, 50, 50));
    canvas.draw_horizontal_run(0, 30, 100, RED);
    canvas.draw_horizontal_run(0, 5, 100, GREEN);

    let expected: Vec<_> = (10..=50).map(|x| (x, 30)).collect();
    assert_eq!(cells_with(&canvas, RED), expected);
    assert!(cells_with(&canvas, GREEN).is_empty());
}

#[test]
fn writes_never_leave_the_active_clip() {
    let mut canvas = canvas(48, 48);
    let regions = [
        Rect::from_coords(0, 0, 47, 47),
        Rect::from_coords(5, 10, 20, 12),
        Rect::from_coords(30, 0, 30, 47),
        Rect::from_coords(40, 40, 10, 10),
        Rect::from_coords(-10, 20, 70, 25),
    ];

    for (step, region) in regions.iter().enumerate() {
        canvas.fill_screen(BLACK);
        canvas.set_clip_region(*region);
        let active = canvas.clip_region();
        let offset = step as i32 * 3;

        canvas.set_pixel(offset, offset, RED);
        canvas.set_pixel(31, 11, RED);
        canvas.draw_horizontal_run(-5, 11 + offset, 80, RED);
        canvas.draw_vertical_run(30 - offset, -5, 80, RED);
        canvas.fill_rectangle(offset - 4, offset - 4, 25, 60, RED);
        canvas.fill_circle(24, 24, 15, RED);
        canvas.draw_line(0, 47, 47, 0, RED);
        canvas.draw_rectangle(2, 2, 44, 44, RED);

        for (x, y) in cells_with(&canvas, RED) {
            assert!(
                active.contains(x, y),
                "({x}, {y}) written outside {active:?} at step {step}"
            );
        }
    }
}

#[test]
fn crossing_fill_depends_on_overlap_policy() {
    let a = Rect::from_coords(0, 0, 10, 100);
    let b = Rect::from_coords(-5, 40, 50, 60);
    assert!(!a.overlaps(b));
    assert!(a.intersects(b));

    let legacy_options = CanvasOptions::default().with_overlap_test(OverlapTest::CornerSample);
    let surface = MemorySurface::new(64, 128).unwrap();
    let mut legacy = ClippedCanvas::with_options(64, 128, surface, legacy_options).unwrap();
    legacy.set_clip_region(a);
    legacy.fill_rectangle(-5, 40, 56, 21, RED);
    assert!(cells_with(&legacy, RED).is_empty());

    let mut exact = canvas(64, 128);
    exact.set_clip_region(a);
    exact.fill_rectangle(-5, 40, 56, 21, RED);
    assert_eq!(cells_with(&exact, RED).len(), 11 * 21);
}

#[test]
fn flush_mirrors_buffer_on_surface() {
    let mut surface = MemorySurface::new(16, 16).unwrap();
    {
        let mut canvas = ClippedCanvas::new(16, 16, &mut surface).unwrap();
        canvas.set_clip_region(Rect::from_coords(4, 4, 7, 7));
        canvas.fill_rectangle(0, 0, 16, 16, RED);
        canvas.flush().unwrap();
        canvas.flush().unwrap();
    }

    assert_eq!(surface.transfers(), 2);
    assert!(!surface.in_session());
    let red = color::to_raw(RED);
    for y in 0..16 {
        for x in 0..16 {
            let expected = if (4..=7).contains(&x) && (4..=7).contains(&y) {
                red
            } else {
                0
            };
            assert_eq!(surface.pixel(x, y), Some(expected));
        }
    }
}

#[test]
fn bounce_frames_render_and_flush() {
    let surface = MemorySurface::new(130, 130).unwrap();
    let mut canvas = ClippedCanvas::new(130, 130, surface).unwrap();
    let mut state = BounceState::new(130, 130, 10, 2024);

    for _ in 0..120 {
        let clip = state.step();
        state.render(&mut canvas);
        canvas.flush().unwrap();
        for (x, y) in cells_with(&canvas, state.ball_color) {
            assert!(clip.contains(x, y));
        }
    }
    assert_eq!(canvas.surface().transfers(), 120);
}
