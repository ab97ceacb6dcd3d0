//! Sprite rendering benchmark.
//!
//! Two pools of bouncing sprites, circles drawn in copy mode and squares in
//! NXOR mode, are moved and redrawn over a cleared screen every frame. Each
//! shape is rasterized once into a [`Bitmap`] and only re-rasterized when
//! its size knob changes.

use alloc::boxed::Box;
use alloc::vec;
use core::fmt::Write;

use embedded_graphics::prelude::{OriginDimensions, Point, Size};
use embedded_graphics::primitives::{PointsIter, Rectangle};
use rand_core::RngCore;

use crate::bitmap::Bitmap;
use crate::counter::{BoundedCounter, ParameterSet};
use crate::dirty::DirtyRegion;
use crate::modes::{adjust_knobs, Benchmark, Frame};
use crate::status::{StatusText, TEXT_ORIGIN};
use crate::{DrawMode, Graphics, LcdColor, LCD_COLUMNS, LCD_ROWS};

/// Pool capacity per shape.
pub const MAX_SPRITES: usize = 10_000;

/// Largest glyph edge in pixels.
pub const MAX_SPRITE_SIZE: i32 = 512;

/// Glyph edge at startup and after reset.
pub const DEFAULT_SPRITE_SIZE: i32 = 8;

/// Fastest speed in pixels per frame. Speeds are drawn from `1..=MAX_VELOCITY`.
pub const MAX_VELOCITY: u32 = 8;

/// Knob index of the circle count.
pub const CIRCLE_COUNT: usize = 0;
/// Knob index of the circle size.
pub const CIRCLE_SIZE: usize = 1;
/// Knob index of the square count.
pub const SQUARE_COUNT: usize = 2;
/// Knob index of the square size.
pub const SQUARE_SIZE: usize = 3;

/// White box behind the first status lines.
pub const STATUS_AREA: Rectangle = Rectangle::new(Point::new(0, 0), Size::new(256, 64));

const CRANK_MULTIPLIER: i32 = 1;

const COUNT_KNOB: BoundedCounter = BoundedCounter::new(0, 0, MAX_SPRITES as i32);
const SIZE_KNOB: BoundedCounter = BoundedCounter::new(DEFAULT_SPRITE_SIZE, 1, MAX_SPRITE_SIZE);

/// Map a random word onto `0..bound`.
fn scaled(rng: &mut dyn RngCore, bound: u32) -> i32 {
    ((u64::from(rng.next_u32()) * u64::from(bound)) >> 32) as i32
}

fn random_speed(rng: &mut dyn RngCore) -> i32 {
    scaled(rng, MAX_VELOCITY) + 1
}

fn random_velocity(rng: &mut dyn RngCore) -> i32 {
    if rng.next_u32() > u32::MAX / 2 {
        random_speed(rng)
    } else {
        -random_speed(rng)
    }
}

/// Position and velocity of one sprite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sprite {
    /// Centre column.
    pub x: i32,
    /// Centre row.
    pub y: i32,
    /// Columns per frame, never zero once initialised.
    pub vx: i32,
    /// Rows per frame, never zero once initialised.
    pub vy: i32,
}

impl Sprite {
    /// Random on-screen position heading in a random direction.
    #[must_use]
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self {
            x: scaled(rng, LCD_COLUMNS as u32),
            y: scaled(rng, LCD_ROWS as u32),
            vx: random_velocity(rng),
            vy: random_velocity(rng),
        }
    }

    /// Move one frame. Leaving the screen picks a new speed pointing back in.
    pub fn step(&mut self, rng: &mut dyn RngCore) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x < 0 {
            self.vx = random_speed(rng);
        } else if self.x >= LCD_COLUMNS {
            self.vx = -random_speed(rng);
        }
        if self.y < 0 {
            self.vy = random_speed(rng);
        } else if self.y >= LCD_ROWS {
            self.vy = -random_speed(rng);
        }
    }
}

/// Fixed-capacity sprite storage.
///
/// Entries past the active count are left alone; they are given a random
/// position and velocity when the count grows over them.
#[derive(Clone)]
pub struct SpritePool {
    sprites: Box<[Sprite]>,
    initialized: usize,
}

impl Default for SpritePool {
    fn default() -> Self {
        Self::new()
    }
}

impl SpritePool {
    /// Allocate room for [`MAX_SPRITES`] sprites.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sprites: vec![Sprite::default(); MAX_SPRITES].into_boxed_slice(),
            initialized: 0,
        }
    }

    /// Number of sprites that currently hold a live position.
    #[must_use]
    pub fn initialized(&self) -> usize {
        self.initialized
    }

    /// Live sprites.
    #[must_use]
    pub fn active(&self) -> &[Sprite] {
        &self.sprites[..self.initialized]
    }

    /// Make `count` sprites live and move each of them one frame.
    pub fn animate(&mut self, count: usize, rng: &mut dyn RngCore) {
        let count = count.min(self.sprites.len());
        if count > self.initialized {
            trace!("sprite pool grew {} -> {}", self.initialized, count);
            for sprite in &mut self.sprites[self.initialized..count] {
                *sprite = Sprite::random(rng);
            }
        }
        self.initialized = count;

        for sprite in &mut self.sprites[..count] {
            sprite.step(rng);
        }
    }
}

impl core::fmt::Debug for SpritePool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpritePool")
            .field("capacity", &self.sprites.len())
            .field("initialized", &self.initialized)
            .finish()
    }
}

/// Sprite outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shape {
    /// Dithered disc, denser towards the edge.
    Circle,
    /// Solid black square.
    Square,
}

impl Shape {
    /// Rasterize a `size` x `size` glyph on a transparent background.
    #[must_use]
    pub fn render(self, size: u32, rng: &mut dyn RngCore) -> Bitmap {
        let mut bitmap = Bitmap::new(Size::new(size, size), LcdColor::Clear);
        match self {
            Self::Square => bitmap.fill_rect(bitmap.bounds(), LcdColor::Black),
            Self::Circle => {
                let r = (size / 2) as i32;
                let limit = (r * r) as u64;
                for p in bitmap.bounds().points() {
                    let (dx, dy) = (p.x - r, p.y - r);
                    let r2 = (dx * dx + dy * dy) as u64;
                    if r2 <= limit {
                        // White with probability 1 - r2 / limit; the rim is always black.
                        let white = u64::from(rng.next_u32()) * limit > r2 << 32;
                        let color = if white { LcdColor::White } else { LcdColor::Black };
                        bitmap.set_pixel(p, color);
                    }
                }
            }
        }
        bitmap
    }
}

/// Rasterized glyph for one shape, rebuilt only when the size changes.
#[derive(Clone, Debug)]
pub struct GlyphCache {
    shape: Shape,
    size: u32,
    bitmap: Bitmap,
    regenerations: u32,
}

impl GlyphCache {
    /// Empty cache; the first lookup rasterizes.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            size: 0,
            bitmap: Bitmap::new(Size::zero(), LcdColor::Clear),
            regenerations: 0,
        }
    }

    /// Glyph of edge `size`, rasterizing it on a size change.
    pub fn bitmap(&mut self, size: u32, rng: &mut dyn RngCore) -> &Bitmap {
        if self.size != size || self.bitmap.size().width != size {
            debug!("rasterizing {} glyph at {} px", self.shape, size);
            self.bitmap = self.shape.render(size, rng);
            self.size = size;
            self.regenerations += 1;
        }
        &self.bitmap
    }

    /// How many times the glyph has been rasterized.
    #[must_use]
    pub fn regenerations(&self) -> u32 {
        self.regenerations
    }
}

/// One shape's pool and glyph.
#[derive(Clone, Debug)]
struct Layer {
    pool: SpritePool,
    glyph: GlyphCache,
    mode: DrawMode,
}

impl Layer {
    fn new(shape: Shape, mode: DrawMode) -> Self {
        Self {
            pool: SpritePool::new(),
            glyph: GlyphCache::new(shape),
            mode,
        }
    }

    fn draw(&mut self, gfx: &mut dyn Graphics, rng: &mut dyn RngCore, count: usize, size: u32) {
        if count == 0 {
            return;
        }
        let bitmap = self.glyph.bitmap(size, rng);
        self.pool.animate(count, rng);

        gfx.set_draw_mode(self.mode);
        let center = (size / 2) as i32;
        for sprite in self.pool.active() {
            gfx.draw_bitmap(bitmap, Point::new(sprite.x - center, sprite.y - center));
        }
    }
}

/// Sprite benchmark state.
#[derive(Clone, Debug)]
pub struct Sprites {
    params: ParameterSet<4>,
    circles: Layer,
    squares: Layer,
}

impl Default for Sprites {
    fn default() -> Self {
        Self::new()
    }
}

impl Sprites {
    /// Allocate both pools; no sprites are active until a count is raised.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: ParameterSet::new(
                ["circle-count", "circle-size", "square-count", "square-size"],
                [COUNT_KNOB, SIZE_KNOB, COUNT_KNOB, SIZE_KNOB],
            ),
            circles: Layer::new(Shape::Circle, DrawMode::Copy),
            squares: Layer::new(Shape::Square, DrawMode::Nxor),
        }
    }

    /// Sprite counts and sizes.
    #[must_use]
    pub fn params(&self) -> &ParameterSet<4> {
        &self.params
    }

    /// Sprite counts and sizes, for hosts that persist or preset them.
    pub fn params_mut(&mut self) -> &mut ParameterSet<4> {
        &mut self.params
    }

    /// Circle pool.
    #[must_use]
    pub fn circles(&self) -> &SpritePool {
        &self.circles.pool
    }

    /// Square pool.
    #[must_use]
    pub fn squares(&self) -> &SpritePool {
        &self.squares.pool
    }

    /// Circle glyph cache.
    #[must_use]
    pub fn circle_glyph(&self) -> &GlyphCache {
        &self.circles.glyph
    }

    /// Square glyph cache.
    #[must_use]
    pub fn square_glyph(&self) -> &GlyphCache {
        &self.squares.glyph
    }

    /// Status text, drawn in NXOR mode over the sprites.
    #[must_use]
    pub fn status_text(&self, fps: f32) -> StatusText {
        let p = &self.params;
        let mut text = StatusText::new();
        let _ = write!(
            text,
            "FPS = {fps:.1}\n\
             circle: count = {}, size = {}\n\
             square: count = {}, size = {}\n\n\
             left + crank: adjust circle count\n\
             up + crank: adjust circle size\n\
             right + crank: adjust square count\n\
             down + crank: adjust square size\n\
             A/B + crank: adjust everything at once",
            p.get(CIRCLE_COUNT),
            p.get(CIRCLE_SIZE),
            p.get(SQUARE_COUNT),
            p.get(SQUARE_SIZE),
        );
        text
    }

    fn draw_status(&self, gfx: &mut dyn Graphics) {
        let text = self.status_text(gfx.fps());
        gfx.fill_rect(STATUS_AREA, LcdColor::White);
        gfx.set_draw_mode(DrawMode::Nxor);
        gfx.draw_text(&text, TEXT_ORIGIN);
        gfx.set_draw_mode(DrawMode::Copy);
    }
}

impl Benchmark for Sprites {
    /// Sprites move every frame, so the whole screen is always redrawn.
    fn run_frame(&mut self, frame: &mut Frame<'_>) -> DirtyRegion {
        frame.gfx.fill_screen(LcdColor::White);

        let p = &self.params;
        let (circle_count, circle_size) = (p.counter(CIRCLE_COUNT).count(), p.get(CIRCLE_SIZE) as u32);
        let (square_count, square_size) = (p.counter(SQUARE_COUNT).count(), p.get(SQUARE_SIZE) as u32);
        self.circles.draw(frame.gfx, frame.rng, circle_count, circle_size);
        self.squares.draw(frame.gfx, frame.rng, square_count, square_size);

        self.draw_status(frame.gfx);
        adjust_knobs(frame.gfx, frame.buttons, frame.crank, CRANK_MULTIPLIER, &mut self.params);

        DirtyRegion::Full
    }

    fn reset(&mut self) {
        self.params.reset();
    }
}
