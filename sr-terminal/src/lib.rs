//! Terminal front end for the software rendering pipeline

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::{Matrix4, Point3, Vector3};
use sr_core::{ColorShader, Mesh, RotationState, StdUniform, Transform};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::TerminalRenderer;

/// Distance from the eye to the origin
const EYE_DISTANCE: f32 = 4.0;

/// Main application struct for terminal 3D rendering.
///
/// The mesh must use the [`ColorShader`] vertex layout.
pub struct TerminalApp {
    mesh: Mesh,
    rotation: RotationState,
    renderer: TerminalRenderer,
    uniform: StdUniform,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        log::info!("terminal size {}x{}", cols, rows);

        Ok(Self {
            mesh,
            rotation: RotationState::new(0.3, 0.3, 0.0),
            renderer: TerminalRenderer::new(cols as usize, rows as usize),
            uniform: StdUniform::new(Matrix4::identity()),
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

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update();
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

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('w') | KeyCode::Up => {
                    self.rotation.rotate(0.1, 0.0, 0.0);
                }
                KeyCode::Char('s') | KeyCode::Down => {
                    self.rotation.rotate(-0.1, 0.0, 0.0);
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    self.rotation.rotate(0.0, -0.1, 0.0);
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    self.rotation.rotate(0.0, 0.1, 0.0);
                }
                KeyCode::Char('e') => {
                    self.rotation.rotate(0.0, 0.0, 0.1);
                }
                KeyCode::Char('r') => {
                    self.rotation.rotate(0.0, 0.0, -0.1);
                }
                _ => {}
            },
            Event::Resize(cols, rows) => {
                log::debug!("resized to {}x{}", cols, rows);
                self.renderer = TerminalRenderer::new(cols as usize, rows as usize);
            }
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self) {
        // Continuous slow rotation for demo effect
        self.rotation.rotate(0.01, 0.015, 0.0);
        self.uniform.set_mvp(frame_mvp(&self.rotation, &self.renderer));
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        if let Err(err) = self.renderer.render_mesh(
            &self.mesh,
            &self.uniform,
            &ColorShader,
            &ColorShader,
            ColorShader::NUM_ATTR_OUT,
        ) {
            log::error!("draw failed: {}", err);
            self.running = false;
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "SR Terminal Renderer | FPS: {:.1} | Controls: WASD/Arrows=Rotate E/R=Roll Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Model-view-projection matrix for the current rotation, looking at the
/// origin down the negative z axis
fn frame_mvp(rotation: &RotationState, renderer: &TerminalRenderer) -> Matrix4<f32> {
    let model = Transform::rotation_matrix(rotation);
    let view = Transform::look_at(
        &Point3::new(0.0, 0.0, EYE_DISTANCE),
        &Point3::origin(),
        &Vector3::y(),
    );
    Transform::mvp_matrix(&model, &view, &renderer.camera().projection_matrix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_mvp_keeps_origin_centred() {
        let renderer = TerminalRenderer::new(40, 20);
        let mvp = frame_mvp(&RotationState::new(0.4, 1.2, 0.0), &renderer);

        let clip = mvp * nalgebra::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-5);
        assert!(clip.y.abs() < 1e-5);
        assert!((clip.w - EYE_DISTANCE).abs() < 1e-5);
    }
}
