//! Axis-aligned collision primitives
//!
//! Broad phase works on bounding boxes; the ball/paddle contact additionally
//! uses per-pixel opacity masks because the sprite art has transparent
//! corners. Side-of-impact classification uses pixel-unit edge thresholds.

use glam::Vec2;

/// Axis-aligned rectangle, `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Per-pixel opacity mask for a sprite footprint.
///
/// Bit set = opaque pixel. Row-major, one bit per pixel packed into u64 words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteMask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl SpriteMask {
    fn empty(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Fully opaque rectangle.
    pub fn filled(width: u32, height: u32) -> Self {
        let mut mask = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y);
            }
        }
        mask
    }

    /// Ellipse inscribed in the footprint (round ball art).
    pub fn disc(width: u32, height: u32) -> Self {
        let mut mask = Self::empty(width, height);
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        for y in 0..height {
            for x in 0..width {
                let dx = (x as f32 + 0.5 - rx) / rx;
                let dy = (y as f32 + 0.5 - ry) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    mask.set(x, y);
                }
            }
        }
        mask
    }

    /// Rectangle with transparent corners of the given radius (paddle art).
    pub fn rounded_rect(width: u32, height: u32, corner_radius: f32) -> Self {
        let mut mask = Self::empty(width, height);
        let r = corner_radius.min(width as f32 / 2.0).min(height as f32 / 2.0);
        for y in 0..height {
            for x in 0..width {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let cx = px.clamp(r, width as f32 - r);
                let cy = py.clamp(r, height as f32 - r);
                let dx = px - cx;
                let dy = py - cy;
                if dx * dx + dy * dy <= r * r {
                    mask.set(x, y);
                }
            }
        }
        mask
    }

    /// Build from an 8-bit alpha buffer, row-major, `width * height` bytes.
    /// Any nonzero alpha counts as opaque.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Self {
        debug_assert_eq!(alpha.len(), (width * height) as usize);
        let mut mask = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                if alpha[(y * width + x) as usize] != 0 {
                    mask.set(x, y);
                }
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn set(&mut self, x: u32, y: u32) {
        let index = y as usize * self.words_per_row + x as usize / 64;
        self.bits[index] |= 1u64 << (x % 64);
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y as usize * self.words_per_row + x as usize / 64;
        self.bits[index] & (1u64 << (x % 64)) != 0
    }

    /// True if any opaque pixel of `other`, placed at `offset` relative to
    /// this mask's top-left corner, lands on an opaque pixel of this mask.
    pub fn overlaps(&self, other: &SpriteMask, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;
        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (dx + other.width as i32).min(self.width as i32);
        let y_end = (dy + other.height as i32).min(self.height as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x as u32, y as u32) && other.get((x - dx) as u32, (y - dy) as u32) {
                    return true;
                }
            }
        }
        false
    }
}

/// Which sides of a target a moving body entered from this frame.
///
/// Checks are independent; a corner hit may set a vertical and a horizontal
/// flag at once, and both deflections apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Impact {
    pub from_above: bool,
    pub from_below: bool,
    pub from_left: bool,
    pub from_right: bool,
}

impl Impact {
    pub fn any(&self) -> bool {
        self.from_above || self.from_below || self.from_left || self.from_right
    }
}

/// Classify which side of `target` the `moving` rect is entering from.
///
/// Vertical entry requires the moving body's edge within `vertical_threshold`
/// pixels of the matching target edge, its center on the approach side, and
/// velocity toward the target. Horizontal entry uses `horizontal_threshold`
/// (wider for the paddle, where corner hits are ambiguous) and only the
/// velocity direction.
pub fn classify_impact(
    moving: &Rect,
    target: &Rect,
    velocity: Vec2,
    vertical_threshold: f32,
    horizontal_threshold: f32,
) -> Impact {
    Impact {
        from_above: (moving.bottom() - target.top()).abs() < vertical_threshold
            && moving.center().y <= target.center().y
            && velocity.y > 0.0,
        from_below: (moving.top() - target.bottom()).abs() < vertical_threshold
            && moving.center().y >= target.center().y
            && velocity.y < 0.0,
        from_left: (moving.right() - target.left()).abs() < horizontal_threshold
            && velocity.x > 0.0,
        from_right: (moving.left() - target.right()).abs() < horizontal_threshold
            && velocity.x < 0.0,
    }
}
