//! SR Terminal Demo - Rotating Cube
//!
//! Renders a color cube through the software pipeline in the terminal.
//! Controls:
//!   - WASD / Arrow Keys: Rotate the cube
//!   - E/R: Roll rotation
//!   - Q/ESC: Quit
//!
//! Set `RUST_LOG=debug` for pipeline logging (written to stderr).

use sr_core::Mesh;
use sr_terminal::TerminalApp;
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();

    println!("SR Terminal Renderer - Loading...");

    let cube = Mesh::cube(2.0);
    log::info!(
        "cube mesh: {} vertices, {} indices",
        cube.num_vertices(),
        cube.indices.len()
    );

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(cube)?;
    app.run()?;

    println!("Thank you for using SR Terminal Renderer!");
    Ok(())
}
