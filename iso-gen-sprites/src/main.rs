use std::error::Error;
use std::path::PathBuf;

use iso_gen_sprites::generator::build_sprite_atlas;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

fn main() -> Result<(), Box<dyn Error>> {
    let root = workspace_root();

    let atlas = build_sprite_atlas();
    let outputs = [
        root.join("assets").join("terrain.png"),
        root.join("web").join("assets").join("terrain.png"),
    ];

    for path in outputs {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        atlas.save(&path)?;
        println!("wrote {}", path.display());
    }

    Ok(())
}
