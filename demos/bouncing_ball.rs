use pixclip::color::{self, BLACK, BLUE, CYAN, GREEN, MAGENTA, RED, YELLOW};
use pixclip::{BounceState, ClippedCanvas, MemorySurface};

const WIDTH: u32 = 130;
const HEIGHT: u32 = 130;
const BALL_SIZE: u32 = 10;
const FRAMES: usize = 600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let surface = MemorySurface::new(WIDTH, HEIGHT)?;
    let mut canvas = ClippedCanvas::new(WIDTH, HEIGHT, surface)?;

    color_test(&mut canvas)?;

    let mut state = BounceState::new(WIDTH, HEIGHT, BALL_SIZE, 0x5eed);
    for frame in 0..FRAMES {
        let clip = state.step();
        state.render(&mut canvas);
        canvas.flush()?;
        if frame % 60 == 0 {
            log::info!(
                "frame {frame}: clip {:?}-{:?}, ball {:?}",
                clip.top_left,
                clip.bottom_right,
                state.ball().top_left
            );
        }
    }

    // mark the final clip outline so it shows up in the thumbnail
    canvas.reset_clip_region();
    let clip = state.clip();
    canvas.draw_rectangle(
        clip.top_left.x,
        clip.top_left.y,
        clip.width() as i32 + 1,
        clip.height() as i32 + 1,
        YELLOW,
    );
    canvas.flush()?;

    print_thumbnail(canvas.surface());
    log::info!("{} transfers", canvas.surface().transfers());
    Ok(())
}

fn color_test(canvas: &mut ClippedCanvas<MemorySurface>) -> Result<(), pixclip::SurfaceError> {
    for color in [RED, GREEN, BLUE, CYAN, MAGENTA, YELLOW] {
        canvas.fill_screen(color);
        canvas.flush()?;
    }
    canvas.fill_screen(BLACK);
    Ok(())
}

fn print_thumbnail(surface: &MemorySurface) {
    let (width, height) = surface.size();
    for y in (0..height).step_by(4) {
        let row: String = (0..width)
            .step_by(2)
            .map(|x| surface.pixel(x, y).map_or(' ', glyph))
            .collect();
        println!("{row}");
    }
}

fn glyph(raw: u16) -> char {
    match color::from_raw(raw) {
        c if c == BLACK => '.',
        c if c == RED => 'o',
        c if c == YELLOW => '#',
        _ => '?',
    }
}
