/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Imports a BSP file, logs what's in it, and optionally writes out its textures and a JSON dump.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use getopts::Options;
use log::{info, warn};

use quarry_levels::palette::Palette;
use quarry_scene::{collection_names, import_bsp, ImportConfigBuilder, ImportedScene, TargetAxes};

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{}", full_error_display(err));
        std::process::exit(1);
    }
}

pub fn full_error_display(err: anyhow::Error) -> String {
    let cont = err
        .chain()
        .skip(1)
        .map(|cause| format!("    caused by: {}", cause))
        .collect::<Vec<String>>()
        .join("\n");

    format!("Error: {}\n{}", err, cont)
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optopt("p", "palette", "palette.lmp to decode textures with", "FILE");
    opts.optopt("s", "scale", "scale applied to every position (default 0.05)", "N");
    opts.optopt("b", "brightness", "added to texture colours, from -1 to 1", "N");
    opts.optopt("t", "textures", "write every texture to DIR as a PNG", "DIR");
    opts.optopt("j", "json", "write the scene to FILE as JSON", "FILE");
    opts.optflag("", "worldspawn-only", "only import model 0");
    opts.optflag("", "keep-hidden", "keep triggers, clip brushes, sky and liquids");
    opts.optflag("", "no-materials", "don't decode textures");
    opts.optflag("", "lights", "import lights");
    opts.optflag("", "cameras", "import cameras");
    opts.optflag("", "entities", "import monsters, weapons and items as markers");
    opts.optflag("", "all-entities", "import every entity with an origin as a marker");
    opts.optflag("", "y-up", "convert to Y-up axes");
    opts.optflag("", "reverse-winding", "make faces counter-clockwise");
    opts.optflag("v", "verbose", "log more");
    opts.optflag("h", "help", "print this help");
    opts
}

fn parse_float(value: Option<String>, what: &str) -> Result<Option<f32>> {
    value
        .map(|x| x.parse::<f32>())
        .transpose()
        .with_context(|| format!("Invalid {}", what))
}

fn try_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let opts = options();
    let matches = opts
        .parse(&args[1..])
        .context("Error parsing arguments")?;

    if matches.opt_present("h") || matches.free.len() != 1 {
        let brief = format!("Usage: {} [options] FILE.bsp", args[0]);
        print!("{}", opts.usage(&brief));
        return Ok(());
    }

    // Initialise logger
    let level = if matches.opt_present("v") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_max_level(level)
            .set_thread_mode(simplelog::ThreadLogMode::Names)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .context("Error initialising logger")?;

    let path = PathBuf::from(&matches.free[0]);
    let data = fs::read(&path).with_context(|| format!("Error reading {}", path.display()))?;

    let palette = match matches.opt_str("p") {
        Some(palette_path) => {
            let bytes = fs::read(&palette_path)
                .with_context(|| format!("Error reading {}", palette_path))?;
            Palette::from_bytes(&bytes).context("Error parsing palette")?
        }
        None => {
            warn!("No palette given, textures will be grayscale");
            Palette::grayscale()
        }
    };

    let mut builder = ImportConfigBuilder::default();
    if let Some(scale) = parse_float(matches.opt_str("s"), "scale")? {
        builder.scale(scale);
    }
    if let Some(brightness) = parse_float(matches.opt_str("b"), "brightness")? {
        builder.brightness_adjust(brightness);
    }
    builder
        .worldspawn_only(matches.opt_present("worldspawn-only"))
        .remove_hidden(!matches.opt_present("keep-hidden"))
        .create_materials(!matches.opt_present("no-materials"))
        .create_lights(matches.opt_present("lights"))
        .create_cameras(matches.opt_present("cameras"))
        .create_entities(matches.opt_present("entities"))
        .import_all(matches.opt_present("all-entities"))
        .reverse_winding(matches.opt_present("reverse-winding"));
    if matches.opt_present("y-up") {
        builder.target_axes(TargetAxes::YUp);
    }
    let config = builder.build().context("Error building import config")?;

    let scene = import_bsp(&data, &palette, &config)
        .with_context(|| format!("Error importing {}", path.display()))?;

    summarise(&path, &scene);

    if let Some(dir) = matches.opt_str("t") {
        write_textures(Path::new(&dir), &scene)?;
    }

    if let Some(json_path) = matches.opt_str("j") {
        let file = File::create(&json_path)
            .with_context(|| format!("Error creating {}", json_path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &scene)
            .context("Error writing JSON")?;
        info!("Wrote scene to {}", json_path);
    }

    Ok(())
}

fn summarise(path: &Path, scene: &ImportedScene) {
    let stem = path
        .file_stem()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_else(|| "level".to_string());
    let (level, entities, lights) = collection_names(&stem);

    for mesh in scene.meshes.iter() {
        info!(
            "{}/{}: {} faces, {} vertices, {} materials",
            level,
            mesh.name,
            mesh.faces.len(),
            mesh.positions.len(),
            mesh.material_groups().len()
        );
    }
    for (entity, light) in scene.lights() {
        info!(
            "{}/{}: intensity {} at {:?}",
            lights,
            entity.classname,
            light.intensity,
            entity.transform.position.as_slice()
        );
    }
    for (entity, camera) in scene.cameras() {
        info!(
            "{}/{}: primary {} at {:?}",
            entities,
            entity.classname,
            camera.is_primary,
            entity.transform.position.as_slice()
        );
    }
    info!("{}: {} markers", entities, scene.markers().count());

    if scene.has_warnings() {
        warn!("Imported with {} warnings", scene.warnings.len());
    }
}

/// Texture names can have `*`, `+` and `{` in them, which don't make for nice file names.
fn file_name(name: &str) -> String {
    name.chars()
        .map(|x| {
            if x.is_ascii_alphanumeric() || x == '_' || x == '-' {
                x
            } else {
                '_'
            }
        })
        .collect()
}

fn write_textures(dir: &Path, scene: &ImportedScene) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Error creating {}", dir.display()))?;

    for texture in scene.textures.iter() {
        let name = format!("{}_{}", texture.miptex_idx, file_name(&texture.name));

        let path = dir.join(format!("{}.png", name));
        texture
            .image
            .save(&path)
            .with_context(|| format!("Error writing {}", path.display()))?;

        if let Some(mask) = &texture.emission_mask {
            let path = dir.join(format!("{}_emission.png", name));
            mask.save(&path)
                .with_context(|| format!("Error writing {}", path.display()))?;
        }
    }

    if scene.textures.is_empty() {
        warn!("No textures to write");
    }

    info!(
        "Wrote {} textures to {}",
        scene.textures.len(),
        dir.display()
    );
    Ok(())
}
