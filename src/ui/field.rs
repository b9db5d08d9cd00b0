//! Braille rendering of the draw list.
//!
//! Each terminal cell holds a 2×4 grid of braille dots. Logical field
//! coordinates are scaled per axis onto that dot grid, so the 1280×720 field
//! fills whatever area the terminal gives us.

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use ratatui::prelude::*;

use crate::sim::{AsteroidTier, Drawable, Sprite};

const BACKGROUND: Color = Color::Rgb(5, 5, 15);

/// Heading (clockwise from up) to the painter's angle (from +x, y down).
pub fn screen_angle(heading: f32) -> f32 {
    heading - FRAC_PI_2
}

fn tier_verts(tier: AsteroidTier) -> usize {
    match tier {
        AsteroidTier::Large => 11,
        AsteroidTier::Medium => 9,
        AsteroidTier::Small => 7,
    }
}

fn tier_color(tier: AsteroidTier, variant: u8) -> Color {
    let v = variant % 3;
    match tier {
        AsteroidTier::Large => match v {
            0 => Color::Rgb(170, 150, 120),
            1 => Color::Rgb(150, 140, 110),
            _ => Color::Rgb(160, 145, 115),
        },
        AsteroidTier::Medium => match v {
            0 => Color::Rgb(190, 170, 140),
            1 => Color::Rgb(180, 165, 135),
            _ => Color::Rgb(185, 168, 138),
        },
        AsteroidTier::Small => match v {
            0 => Color::Rgb(210, 190, 160),
            1 => Color::Rgb(200, 185, 155),
            _ => Color::Rgb(205, 188, 158),
        },
    }
}

fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

/// Bresenham cells from one dot to another, inclusive.
fn line_cells(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut cx, mut cy) = (x0, y0);
    loop {
        cells.push((cx, cy));
        if cx == x1 && cy == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cx += sx;
        }
        if e2 <= dx {
            err += dx;
            cy += sy;
        }
    }
    cells
}

/// Irregular outline for an asteroid. The variant picks the shape, the
/// heading spins it.
fn asteroid_outline(d: &Drawable, tier: AsteroidTier, variant: u8) -> Vec<Vec2> {
    let n = tier_verts(tier);
    let r = d.half_extents.x;
    let spin = screen_angle(d.heading);
    let mut s = 0x9E37_u32.wrapping_mul(variant as u32 + 1) ^ tier.rank() as u32;
    (0..n)
        .map(|i| {
            let angle = (i as f32 / n as f32) * TAU + spin;
            s = s.wrapping_mul(1103515245).wrapping_add(12345);
            let variation = 0.7 + ((s >> 16) % 300) as f32 / 1000.0;
            d.position + Vec2::new(angle.cos(), angle.sin()) * r * variation
        })
        .collect()
}

/// Ship outline: nose, left wing, notch, right wing.
fn ship_outline(d: &Drawable) -> [Vec2; 4] {
    let a = screen_angle(d.heading);
    let nose_len = d.half_extents.y;
    let wing_len = nose_len * 0.75;
    let notch_len = nose_len * 0.4;
    let wing_angle = 2.5;
    let at = |angle: f32, len: f32| d.position + Vec2::new(angle.cos(), angle.sin()) * len;
    [
        at(a, nose_len),
        at(a + PI - wing_angle / 2.0, wing_len),
        at(a + PI, notch_len),
        at(a + PI + wing_angle / 2.0, wing_len),
    ]
}

type DotMap = HashMap<(usize, usize), u8>;

pub struct FieldPainter {
    cols: usize,
    rows: usize,
    dot_scale: Vec2,
    tick: u64,
    grid: Vec<Vec<(char, Style)>>,
}

impl FieldPainter {
    pub fn new(cols: usize, rows: usize, field: Vec2, tick: u64) -> Self {
        let mut grid = vec![vec![(' ', Style::default().bg(BACKGROUND)); cols]; rows];

        // Sparse background stars
        for (yi, row) in grid.iter_mut().enumerate() {
            for (xi, cell) in row.iter_mut().enumerate() {
                let hash = ((xi * 7 + yi * 13 + 37) * 31) % 250;
                if hash < 2 {
                    let b = 35 + (hash as u8) * 15;
                    *cell = ('.', Style::default().fg(Color::Rgb(b, b, b + 8)).bg(BACKGROUND));
                }
            }
        }

        Self {
            cols,
            rows,
            dot_scale: Vec2::new((cols * 2) as f32 / field.x, (rows * 4) as f32 / field.y),
            tick,
            grid,
        }
    }

    fn to_dots(&self, p: Vec2) -> (i32, i32) {
        let d = p * self.dot_scale;
        (d.x as i32, d.y as i32)
    }

    fn set_dot(&self, map: &mut DotMap, bx: i32, by: i32) {
        let (bw, bh) = ((self.cols * 2) as i32, (self.rows * 4) as i32);
        if bx < 0 || by < 0 || bx >= bw || by >= bh {
            return;
        }
        let (bx, by) = (bx as usize, by as usize);
        *map.entry((bx / 2, by / 4)).or_insert(0) |= braille_bit(bx % 2, by % 4);
    }

    fn stroke(&self, map: &mut DotMap, points: &[Vec2], closed: bool) {
        let segments = if closed { points.len() } else { points.len().saturating_sub(1) };
        for i in 0..segments {
            let (x0, y0) = self.to_dots(points[i]);
            let (x1, y1) = self.to_dots(points[(i + 1) % points.len()]);
            for (px, py) in line_cells(x0, y0, x1, y1) {
                self.set_dot(map, px, py);
            }
        }
    }

    /// Merge a layer of dots into the grid in one colour.
    fn write_layer(&mut self, map: &DotMap, color: Color, bold: bool) {
        for (&(cx, cy), &bits) in map {
            if cx >= self.cols || cy >= self.rows || bits == 0 {
                continue;
            }
            let mut style = Style::default().fg(color).bg(BACKGROUND);
            if bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            let existing = self.grid[cy][cx].0 as u32;
            let merged = if (0x2800..0x2900).contains(&existing) {
                (existing - 0x2800) as u8 | bits
            } else {
                bits
            };
            let ch = char::from_u32(0x2800 + merged as u32).unwrap_or(' ');
            self.grid[cy][cx] = (ch, style);
        }
    }

    pub fn draw(&mut self, d: &Drawable) {
        let mut map = DotMap::new();
        match d.sprite {
            Sprite::Asteroid { tier, variant } => {
                self.stroke(&mut map, &asteroid_outline(d, tier, variant), true);
                self.write_layer(&map, tier_color(tier, variant), false);
            }
            Sprite::Laser => {
                let a = screen_angle(d.heading);
                let reach = Vec2::new(a.cos(), a.sin()) * d.half_extents.y;
                self.stroke(&mut map, &[d.position - reach, d.position + reach], false);
                self.write_layer(&map, Color::Rgb(255, 255, 80), true);
            }
            Sprite::Ship { flames } => {
                self.stroke(&mut map, &ship_outline(d), true);
                let color = if flames {
                    Color::Rgb(100, 230, 255)
                } else {
                    Color::Rgb(80, 255, 140)
                };
                self.write_layer(&map, color, true);
                if flames {
                    self.draw_flame(d, &map);
                }
            }
        }
    }

    fn draw_flame(&mut self, d: &Drawable, hull: &DotMap) {
        let mut fmap = DotMap::new();
        let fa = screen_angle(d.heading) + PI;
        let unit = d.half_extents.y / 3.0;
        for i in 0..10 {
            let dist = unit * (2.0 + i as f32 * 0.5);
            let spread = (i as f32 * 0.18) * if i % 2 == 0 { 1.0 } else { -1.0 };
            let p = d.position + Vec2::new((fa + spread).cos(), (fa + spread).sin()) * dist;
            let (fx, fy) = self.to_dots(p);
            self.set_dot(&mut fmap, fx, fy);
        }
        let flicker = if self.tick % 3 == 0 {
            Color::Rgb(255, 200, 60)
        } else {
            Color::Rgb(255, 130, 30)
        };
        // Don't overwrite ship cells
        for key in hull.keys() {
            fmap.remove(key);
        }
        self.write_layer(&fmap, flicker, false);
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.grid
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}
