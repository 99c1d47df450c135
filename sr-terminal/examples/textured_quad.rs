//! Example: Render one frame of a tilted, checkerboard-textured quad
//!
//! Usage: cargo run --example textured_quad -- [cols] [rows]

use nalgebra::{Point3, Vector3};
use sr_core::{argb, Mesh, RotationState, StdUniform, Texture, TextureShader, Transform};
use sr_terminal::TerminalRenderer;
use std::env;
use std::io::{self, stdout, Write};

fn main() -> io::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1).map(|arg| arg.parse::<usize>());
    let cols = args.next().and_then(Result::ok).unwrap_or(64);
    let rows = args.next().and_then(Result::ok).unwrap_or(24);

    let mut renderer = TerminalRenderer::new(cols, rows);
    let quad = Mesh::quad(2.0);
    let texture = Texture::checkerboard(8, 1, argb(255, 240, 240, 240), argb(255, 200, 40, 40))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let model = Transform::rotation_matrix(&RotationState::new(-0.9, 0.0, 0.3));
    let view = Transform::look_at(
        &Point3::new(0.0, 0.0, 2.5),
        &Point3::origin(),
        &Vector3::y(),
    );
    let mvp = Transform::mvp_matrix(&model, &view, &renderer.camera().projection_matrix());
    let uniform = StdUniform::new(mvp).with_texture(texture);

    let written = renderer
        .render_mesh(
            &quad,
            &uniform,
            &TextureShader,
            &TextureShader,
            TextureShader::NUM_ATTR_OUT,
        )
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    log::info!("{} pixels written", written);

    let mut stdout = stdout();
    renderer.draw(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}
