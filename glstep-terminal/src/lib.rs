/// Terminal front end for the glstep demos
use anyhow::{Context, Result};
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use glstep_core::{ProgramInterface, ProgramSource};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod logging;
pub mod renderer;
pub mod scene;
pub mod window;

pub use config::{AppConfig, Demo};
pub use renderer::AsciiRenderer;
pub use scene::{Scene, Uniforms};
pub use window::{Action, ViewState, Window};

/// Uniforms every demo program is expected to declare
pub const REQUIRED_UNIFORMS: &[&str] = &["modelview", "projection", "normalMatrix"];

/// Load a program's sources and check them against the draw loop's uniforms
pub fn check_program(config: &AppConfig) -> Result<Option<ProgramInterface>> {
    let Some((vert, frag)) = config.shader_paths() else {
        return Ok(None);
    };

    let program = ProgramSource::load(&vert, &frag).context("loading shader program")?;
    let interface = program
        .interface()
        .with_context(|| format!("checking {} and {}", vert.display(), frag.display()))?;

    for attribute in &interface.attributes {
        log::info!("attribute {} ({}) at {:?}", attribute.name, attribute.ty, attribute.location);
    }
    for name in interface.missing_uniforms(REQUIRED_UNIFORMS) {
        log::warn!("program does not declare uniform `{}`", name);
    }

    Ok(Some(interface))
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    target_fps: u32,
    paused: bool,
    angle: f32,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            scene: Scene::new(config.demo),
            renderer: AsciiRenderer::new(0, 0),
            target_fps: config.target_fps.max(1),
            paused: false,
            angle: 0.0,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        log::info!("running {:?} demo at {} fps", self.scene.demo(), self.target_fps);
        // Terminal state is restored when the window drops, even on error
        let mut window = Window::open().context("opening terminal window")?;
        self.main_loop(&mut window)
    }

    fn main_loop(&mut self, window: &mut Window) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.target_fps as u64);
        let mut previous = Instant::now();

        while !window.should_close() {
            let frame_start = Instant::now();

            // Handle input
            for action in window.poll_events()? {
                if action == Action::TogglePause {
                    self.paused = !self.paused;
                }
            }

            // Update
            let dt = frame_start.duration_since(previous).as_secs_f32();
            previous = frame_start;
            self.update(dt);

            // Render
            self.render(window.view())?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Advance the rotation by `dt` seconds (one radian per second)
    pub fn update(&mut self, dt: f32) {
        if !self.paused {
            self.angle = (self.angle + dt) % std::f32::consts::TAU;
        }
    }

    /// Rasterize the current frame into the renderer's buffers
    pub fn render_frame(&mut self, view: &ViewState) -> &AsciiRenderer {
        // top row is the status line
        let rows = view.rows.saturating_sub(1);
        let mut view = view.clone();
        view.rows = rows;

        self.renderer.resize(view.cols as usize, rows as usize);
        self.renderer.clear();
        for uniforms in self.scene.draws(&view, self.angle) {
            self.renderer.render_shape(self.scene.shape(), &uniforms);
        }
        &self.renderer
    }

    fn render(&mut self, view: &ViewState) -> Result<()> {
        self.render_frame(view);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "glstep {:?} | FPS: {:.1} | fovy {:.2} | WASD/Arrows=Move +/-=Zoom Space=Pause Q=Quit",
                self.scene.demo(),
                self.fps,
                view.fovy()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_render_frame_reserves_status_line() {
        let mut app = TerminalApp::new(&AppConfig::default());
        let renderer = app.render_frame(&ViewState::new(60, 25));
        assert_eq!(renderer.width(), 60);
        assert_eq!(renderer.height(), 24);
        assert!(renderer.covered() > 0);
    }

    #[test]
    fn test_pause_stops_rotation() {
        let mut app = TerminalApp::new(&AppConfig::default());
        app.update(0.5);
        assert!((app.angle - 0.5).abs() < 1e-6);
        app.paused = true;
        app.update(0.5);
        assert!((app.angle - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_check_program_without_shaders() {
        assert!(check_program(&AppConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_check_program_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            shader_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let err = check_program(&config).unwrap_err();
        assert!(format!("{err:#}").contains("point.vert"));
    }

    #[test]
    fn test_bundled_shaders() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../shaders");
        assert!(fs::metadata(dir.join("point.vert")).is_ok());
        let config = AppConfig {
            shader_dir: Some(dir),
            ..AppConfig::default()
        };
        let interface = check_program(&config).unwrap().unwrap();
        assert!(interface.missing_uniforms(REQUIRED_UNIFORMS).is_empty());
    }
}
