//! Terminal-based ASCII viewer for generated icospheres
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use ico3d_core::{IcoResult, IcoSphereGeometry, IcoSphereParams, Mesh};
use log::{debug, warn};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;
pub mod view;

pub use renderer::{AsciiRenderer, ShadeMode};
pub use view::{Camera, Orbit};

/// Rotation applied per key press (radians)
const ROTATE_STEP: f32 = 0.1;

/// Viewer state that reacts to keys, independent of the terminal
pub struct Viewer {
    params: IcoSphereParams,
    geometry: IcoSphereGeometry,
    mesh: Mesh,
    pub orbit: Orbit,
    pub shade: ShadeMode,
    pub spin: bool,
}

impl Viewer {
    pub fn new(params: IcoSphereParams) -> IcoResult<Self> {
        let geometry = IcoSphereGeometry::generate(&params)?;
        let mesh = Mesh::from(&geometry);
        Ok(Self {
            params,
            geometry,
            mesh,
            orbit: Orbit::default(),
            shade: ShadeMode::default(),
            spin: true,
        })
    }

    pub fn geometry(&self) -> &IcoSphereGeometry {
        &self.geometry
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn iterations(&self) -> u32 {
        self.params.iterations
    }

    /// Regenerate the sphere at a new iteration count.
    ///
    /// On failure the current sphere is kept and the error returned.
    pub fn set_iterations(&mut self, iterations: u32) -> IcoResult<()> {
        let params = self.params.with_iterations(iterations);
        let geometry = IcoSphereGeometry::generate(&params)?;
        debug!("Viewer regenerated: {}", geometry);
        self.mesh = Mesh::from(&geometry);
        self.geometry = geometry;
        self.params = params;
        Ok(())
    }

    /// Apply a key press. Returns `false` when the viewer should quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('w') | KeyCode::Up => self.orbit.rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.orbit.rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.orbit.rotate(0.0, 0.0, -ROTATE_STEP),
            KeyCode::Char('d') | KeyCode::Right => self.orbit.rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('t') => self.shade = self.shade.toggled(),
            KeyCode::Char(' ') => self.spin = !self.spin,
            KeyCode::Char('+') | KeyCode::Char('=') => {
                if let Err(e) = self.set_iterations(self.iterations() + 1) {
                    warn!("Keeping {} iterations: {}", self.iterations(), e);
                }
            }
            KeyCode::Char('-') => {
                if let Some(fewer) = self.iterations().checked_sub(1) {
                    if let Err(e) = self.set_iterations(fewer) {
                        warn!("Keeping {} iterations: {}", self.iterations(), e);
                    }
                }
            }
            _ => {}
        }
        true
    }

    /// Advance the idle animation by one frame
    pub fn update(&mut self) {
        if self.spin {
            self.orbit.rotate(0.0, 0.0, 0.015);
        }
    }
}

/// Main application struct for terminal icosphere viewing
pub struct TerminalApp {
    viewer: Viewer,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(viewer: Viewer) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // Top row is the status line.
        let height = height.saturating_sub(1);

        Ok(Self {
            viewer,
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.viewer.update();
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => {
                self.running = self.viewer.handle_key(code);
            }
            Event::Resize(width, height) => {
                let height = height.saturating_sub(1);
                if self.renderer.resize(width as usize, height as usize) {
                    self.camera.resize(width as u32, height as u32);
                    debug!("Resized viewport to {}x{}", width, height);
                }
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let model = self.viewer.orbit.model_matrix();

        self.renderer.clear();
        self.renderer
            .render_mesh(self.viewer.mesh(), &model, &self.camera, self.viewer.shade);

        let mut stdout = stdout();
        let geometry = self.viewer.geometry();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "ico3d | {} it | {} verts | {} tris ({} seam) | {:?} | FPS {:.1} | WASD rotate +/- detail T shade Q quit",
                geometry.iterations(),
                geometry.vertex_count(),
                geometry.triangle_count(),
                geometry.seam_triangle_count(),
                self.viewer.shade,
                self.fps
            )),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            ResetColor,
            cursor::MoveTo(0, 1)
        )?;

        self.renderer.draw(&mut stdout)?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(iterations: u32) -> Viewer {
        Viewer::new(IcoSphereParams::new().with_iterations(iterations)).unwrap()
    }

    #[test]
    fn test_quit_keys() {
        let mut viewer = viewer(0);
        assert!(viewer.handle_key(KeyCode::Char('w')));
        assert!(!viewer.handle_key(KeyCode::Char('q')));
        assert!(!viewer.handle_key(KeyCode::Esc));
    }

    #[test]
    fn test_detail_keys() {
        let mut viewer = viewer(1);
        viewer.handle_key(KeyCode::Char('+'));
        assert_eq!(viewer.iterations(), 2);
        assert_eq!(viewer.geometry().subdivided_triangle_count(), 320);
        assert_eq!(viewer.mesh().triangles.len(), viewer.geometry().triangle_count());

        viewer.handle_key(KeyCode::Char('-'));
        viewer.handle_key(KeyCode::Char('-'));
        viewer.handle_key(KeyCode::Char('-'));
        assert_eq!(viewer.iterations(), 0);
        assert_eq!(viewer.mesh().triangles.len(), 20);
    }

    #[test]
    fn test_detail_capped() {
        let params = IcoSphereParams::new().with_iterations(1).with_max_iterations(1);
        let mut viewer = Viewer::new(params).unwrap();
        viewer.handle_key(KeyCode::Char('+'));
        assert_eq!(viewer.iterations(), 1);
        assert!(viewer.set_iterations(2).is_err());
    }

    #[test]
    fn test_toggles() {
        let mut viewer = viewer(0);
        viewer.handle_key(KeyCode::Char('t'));
        assert_eq!(viewer.shade, ShadeMode::Checker);
        viewer.handle_key(KeyCode::Char(' '));
        assert!(!viewer.spin);

        let before = viewer.orbit;
        viewer.update();
        assert_eq!(viewer.orbit, before);
    }
}
