/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use ico3d_core::{Mesh, Triangle};
use nalgebra::{Matrix4, Vector2};
use std::io::Write;

use crate::view::{Camera, ScreenPoint};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Checker cells per unit of texture coordinate
const CHECKER_CELLS: f32 = 8.0;

/// How a rasterized pixel picks its character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadeMode {
    /// Brightness from the face normal against a light at the camera
    #[default]
    Lambert,
    /// UV checkerboard, dimmed by Lambert brightness
    Checker,
}

impl ShadeMode {
    pub fn toggled(self) -> Self {
        match self {
            ShadeMode::Lambert => ShadeMode::Checker,
            ShadeMode::Checker => ShadeMode::Lambert,
        }
    }
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate the buffers for a new size. Returns `false` if the size is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if (width, height) == (self.width(), self.height()) {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at a cell, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    /// Number of cells covered by geometry
    pub fn covered_cells(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        mode: ShadeMode,
    ) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera, mode);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        mode: ShadeMode,
    ) {
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let brightness = normal.dot(&camera.view_direction());
        if brightness <= 0.0 {
            return; // Back face
        }

        let mut screen = [ScreenPoint {
            x: 0.0,
            y: 0.0,
            depth: 0.0,
        }; 3];
        for (slot, vertex) in screen.iter_mut().zip(&triangle.vertices) {
            match camera.project(&vertex.position, model_matrix) {
                Some(p) => *slot = p,
                None => return, // Triangle is clipped
            }
        }

        let uvs = triangle.vertices.map(|v| v.tex_coord);
        self.rasterize_triangle(&screen, &uvs, brightness, mode);
    }

    fn rasterize_triangle(
        &mut self,
        coords: &[ScreenPoint; 3],
        uvs: &[Vector2<f32>; 3],
        brightness: f32,
        mode: ShadeMode,
    ) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to screen bounds
        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                // Seam duplicates are drawn after the triangles they overlap and must win.
                if depth <= self.depth_buffer[idx] {
                    let uv = uvs[0] * w0 + uvs[1] * w1 + uvs[2] * w2;
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = shade(mode, brightness, uv);
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
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

fn shade(mode: ShadeMode, brightness: f32, uv: Vector2<f32>) -> char {
    let top = (LUMINOSITY_RAMP.len() - 1) as f32;
    let level = match mode {
        ShadeMode::Lambert => brightness * top,
        ShadeMode::Checker => {
            let cell = (uv.x * CHECKER_CELLS).floor() as i32 + (uv.y * CHECKER_CELLS).floor() as i32;
            if cell.rem_euclid(2) == 0 {
                brightness * top
            } else {
                brightness * top * 0.35
            }
        }
    };
    // Lit geometry never renders as blank.
    let index = (level as usize).clamp(1, LUMINOSITY_RAMP.len() - 1);
    LUMINOSITY_RAMP[index]
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
