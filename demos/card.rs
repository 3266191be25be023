//! Minimal preview card: pass a glTF/GLB path on the command line.

use anyhow::Result;
use vitrine::{CameraProfile, CardConfig};

fn main() -> Result<()> {
    env_logger::init();

    let model_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/model.glb".to_string());

    let config = CardConfig::new(model_path)
        .with_title("My Model")
        .with_description("Drop any glTF file here to preview it")
        .with_camera(CameraProfile::ThreeQuarter);

    vitrine::preview(config).run();

    Ok(())
}
