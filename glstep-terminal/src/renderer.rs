/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use glstep_core::geometry::face_normal;
use glstep_core::projection::{clip_to_screen, ScreenPoint};
use glstep_core::{DrawTarget, Matrix, NormalMatrix, Shape, Vertex};
use std::io::Write;

use crate::scene::Uniforms;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light direction in eye space (towards the viewer)
const LIGHT_DIR: [f32; 3] = [0.0, 0.0, 1.0];

/// ASCII renderer that executes draw calls into a character buffer
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    modelview: Matrix,
    normal_matrix: NormalMatrix,
    mvp: Matrix,
    cull_back_faces: bool,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            modelview: Matrix::identity(),
            normal_matrix: Matrix::identity().upper_3x3(),
            mvp: Matrix::identity(),
            cull_back_faces: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_cull_back_faces(&mut self, cull: bool) {
        self.cull_back_faces = cull;
    }

    /// Reallocate the buffers for a new size; contents are cleared
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self {
            cull_back_faces: self.cull_back_faces,
            ..Self::new(width, height)
        };
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Upload the matrices used by the following draws
    pub fn set_uniforms(&mut self, uniforms: &Uniforms) {
        self.modelview = uniforms.modelview;
        self.normal_matrix = uniforms.normal_matrix;
        self.mvp = uniforms.projection * uniforms.modelview;
    }

    pub fn render_shape(&mut self, shape: &Shape, uniforms: &Uniforms) {
        self.set_uniforms(uniforms);
        shape.draw(self);
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.char_buffer[y * self.width + x])
    }

    /// Number of cells something was drawn into
    pub fn covered(&self) -> usize {
        self.char_buffer.iter().filter(|c| **c != ' ').count()
    }

    fn project(&self, vertex: &Vertex) -> Option<ScreenPoint> {
        clip_to_screen(
            self.mvp.transform_point(vertex.position),
            self.width as u32,
            self.height as u32,
        )
    }

    fn shade(&self, a: &Vertex, b: &Vertex, c: &Vertex) -> char {
        let n = transform_normal(&self.normal_matrix, a.normal());
        let n = if n == [0.0; 3] {
            // no normal attribute: fall back to the eye-space face normal
            let [pa, pb, pc] = [a, b, c].map(|v| {
                let p = self.modelview.transform_point(v.position);
                [p[0], p[1], p[2]]
            });
            face_normal(pa, pb, pc)
        } else {
            n
        };

        let brightness = (n[0] * LIGHT_DIR[0] + n[1] * LIGHT_DIR[1] + n[2] * LIGHT_DIR[2]).max(0.0);

        // Keep lit faces visible even when nearly edge-on
        let char_index = 1 + (brightness * (LUMINOSITY_RAMP.len() - 2) as f32) as usize;
        LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
        }
    }

    fn rasterize_line(&mut self, a: ScreenPoint, b: ScreenPoint) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let character = line_char(dx, dy);

        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (a.x + dx * t).floor() as i32;
            let y = (a.y + dy * t).floor() as i32;
            let depth = a.depth + (b.depth - a.depth) * t;
            self.plot(x, y, depth, character);
        }
    }

    fn rasterize_triangle(&mut self, coords: [ScreenPoint; 3], character: char) {
        let [v0, v1, v2] = coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                        self.plot(x, y, depth, character);
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    '|' | '/' | '\\' | '_' => Color::Yellow,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawTarget for AsciiRenderer {
    fn draw_line(&mut self, a: &Vertex, b: &Vertex) {
        // Lines with an endpoint outside the view volume are dropped
        if let (Some(pa), Some(pb)) = (self.project(a), self.project(b)) {
            self.rasterize_line(pa, pb);
        }
    }

    fn draw_triangle(&mut self, a: &Vertex, b: &Vertex, c: &Vertex) {
        let (Some(pa), Some(pb), Some(pc)) = (self.project(a), self.project(b), self.project(c))
        else {
            return; // Triangle is clipped
        };

        // Screen y points down, so counter-clockwise faces have negative area
        let area = (pb.x - pa.x) * (pc.y - pa.y) - (pc.x - pa.x) * (pb.y - pa.y);
        if self.cull_back_faces && area >= 0.0 {
            return;
        }

        let character = self.shade(a, b, c);
        self.rasterize_triangle([pa, pb, pc], character);
    }
}

fn transform_normal(m: &NormalMatrix, n: [f32; 3]) -> [f32; 3] {
    let t = [
        m[0] * n[0] + m[3] * n[1] + m[6] * n[2],
        m[1] * n[0] + m[4] * n[1] + m[7] * n[2],
        m[2] * n[0] + m[5] * n[1] + m[8] * n[2],
    ];
    let len = (t[0] * t[0] + t[1] * t[1] + t[2] * t[2]).sqrt();
    if len == 0.0 {
        return [0.0; 3];
    }
    [t[0] / len, t[1] / len, t[2] / len]
}

/// Glyph for a line segment with screen delta `(dx, dy)`
fn line_char(dx: f32, dy: f32) -> char {
    // rows are taller than columns are wide
    let (ax, ay) = (dx.abs(), dy.abs() * crate::window::CELL_ASPECT);
    if ay < ax * 0.5 {
        '-'
    } else if ax < ay * 0.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
