use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;

use crate::color::{BLACK, RED};
use crate::{ClippedCanvas, OutputSurface, Rect};

/// One side of the animated clip region.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    fn index(self) -> usize {
        match self {
            Edge::Top => 0,
            Edge::Right => 1,
            Edge::Bottom => 2,
            Edge::Left => 3,
        }
    }
}

/// Frame state for the bouncing-ball demo.
///
/// A ball travels inside a clip region whose four edges are inset from the
/// canvas border. Whenever the ball touches an edge, that edge starts
/// creeping inward up to a random depth, then retreats to the border and
/// rests there until the ball hits it again.
#[derive(Debug, Clone)]
pub struct BounceState {
    width: i32,
    height: i32,
    ball: Rect,
    ball_size: i32,
    ball_velocity: Point,
    insets: [i32; 4],
    inset_velocity: [i32; 4],
    inset_max: [i32; 4],
    clip_limit: i32,
    vel_max: i32,
    clip: Rect,
    rng: u32,
    pub background: Rgb565,
    pub ball_color: Rgb565,
}

impl BounceState {
    pub fn new(width: u32, height: u32, ball_size: u32, seed: u32) -> Self {
        let width = width.min(i32::MAX as u32) as i32;
        let height = height.min(i32::MAX as u32) as i32;
        let ball_size = ball_size.min(i32::MAX as u32) as i32;
        let half = ball_size / 2;
        let vel_max = 3;

        let mut state = Self {
            width,
            height,
            ball: Rect::from_coords(
                width / 2 - half,
                height / 2 - half,
                width / 2 + half,
                height / 2 + half,
            ),
            ball_size,
            ball_velocity: Point::zero(),
            insets: [0; 4],
            inset_velocity: [0; 4],
            inset_max: [0; 4],
            clip_limit: (width.min(height) / 2 - half).max(0),
            vel_max,
            clip: Rect::from_coords(0, 0, width, height),
            rng: if seed == 0 { 0x9e37_79b9 } else { seed },
            background: BLACK,
            ball_color: RED,
        };
        state.ball_velocity = Point::new(state.random_velocity(), state.random_velocity());
        state
    }

    pub fn ball(&self) -> Rect {
        self.ball
    }

    pub fn ball_velocity(&self) -> Point {
        self.ball_velocity
    }

    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Deepest an edge is ever inset from the canvas border.
    pub fn clip_limit(&self) -> i32 {
        self.clip_limit
    }

    pub fn vel_max(&self) -> i32 {
        self.vel_max
    }

    pub fn inset(&self, edge: Edge) -> i32 {
        self.insets[edge.index()]
    }

    pub fn inset_velocity(&self, edge: Edge) -> i32 {
        self.inset_velocity[edge.index()]
    }

    /// Advances one frame and returns the clip region for it.
    pub fn step(&mut self) -> Rect {
        for i in 0..4 {
            self.insets[i] = (self.insets[i] + self.inset_velocity[i]).min(self.clip_limit);
            if self.inset_max[i] <= self.insets[i] {
                self.inset_velocity[i] = if self.inset_velocity[i] != 0 {
                    -self.inset_velocity[i].abs()
                } else {
                    self.random(-self.vel_max, 0)
                };
            }
            if self.insets[i] <= 0 {
                self.insets[i] = 0;
                self.inset_velocity[i] = 0;
                self.inset_max[i] = 0;
            }
        }

        self.clip = Rect::from_coords(
            self.insets[Edge::Left.index()],
            self.insets[Edge::Top.index()],
            self.width - self.insets[Edge::Right.index()],
            self.height - self.insets[Edge::Bottom.index()],
        );

        self.ball.move_by(self.ball_velocity.x, self.ball_velocity.y);

        if self.ball.top_left.x <= self.clip.top_left.x {
            self.ball_velocity.x = self.kick(Edge::Left) + 1;
        } else if self.clip.bottom_right.x <= self.ball.bottom_right.x {
            self.ball_velocity.x = -self.kick(Edge::Right) - 1;
        }
        if self.ball.top_left.y <= self.clip.top_left.y {
            self.ball_velocity.y = self.kick(Edge::Top) + 1;
        } else if self.clip.bottom_right.y <= self.ball.bottom_right.y {
            self.ball_velocity.y = -self.kick(Edge::Bottom) - 1;
        }

        self.clip
    }

    /// Paints the background over the whole canvas, installs the frame's
    /// clip region and draws the ball inside it. Flushing is up to the caller.
    pub fn render<S: OutputSurface>(&self, canvas: &mut ClippedCanvas<S>) {
        canvas.fill_screen(self.background);
        canvas.set_clip_region(self.clip);
        let radius = self.ball_size / 2;
        canvas.fill_circle(
            self.ball.top_left.x + radius,
            self.ball.bottom_right.y - radius,
            radius,
            self.ball_color,
        );
    }

    // Pushes `edge` inward and returns its speed.
    fn kick(&mut self, edge: Edge) -> i32 {
        log::debug!("ball hit {:?} edge", edge);
        let i = edge.index();
        if self.inset_velocity[i] <= 0 {
            self.inset_velocity[i] = self.random(1, self.vel_max + 1);
        }
        if self.inset_max[i] == 0 {
            self.inset_max[i] = self.random(1, self.clip_limit + 1);
        }
        self.inset_velocity[i]
    }

    fn random_velocity(&mut self) -> i32 {
        if self.random(0, 2) < 1 {
            self.random(1, self.vel_max + 1)
        } else {
            self.random(-self.vel_max, 0)
        }
    }

    /// Uniform-ish value in `lo..hi`; `lo` when the range is empty.
    fn random(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        // xorshift32
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        let span = (i64::from(hi) - i64::from(lo)) as u64;
        (i64::from(lo) + (u64::from(x) % span) as i64) as i32
    }
}
