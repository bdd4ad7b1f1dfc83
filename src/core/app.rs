use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

use super::cli::{Cli, Command, RenderArgs, SchematicSource};
use super::{export, script};
use crate::config::ViewerConfig;
use crate::render::{self, Scene};
use crate::schematic::{builtin, file};
use crate::session::{Viewer, ViewerOptions};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ViewerConfig::load(cli.config.as_deref());
    match cli.command {
        Command::Render(args) => render_command(&config, &args),
        Command::Inspect { reference, source } => inspect(&reference, &source),
        Command::List { source } => list(&source),
        Command::Validate { source } => validate(&source),
        Command::Dump { output } => dump(output.as_deref()),
        Command::Config { write_defaults } => config_command(&config, cli.config, write_defaults),
    }
}

/// Apply viewport overrides from the command line
fn viewer_options(config: &ViewerConfig, args: &RenderArgs) -> anyhow::Result<ViewerOptions> {
    let mut options = ViewerOptions::from(config);
    for (value, name) in [(args.width, "width"), (args.height, "height")] {
        if let Some(v) = value
            && !(v.is_finite() && v > 0.0)
        {
            bail!("Invalid viewport {name}: {v}");
        }
    }
    if let Some(width) = args.width {
        options.viewport.width = width;
    }
    if let Some(height) = args.height {
        options.viewport.height = height;
    }
    Ok(options)
}

fn render_command(config: &ViewerConfig, args: &RenderArgs) -> anyhow::Result<()> {
    let schematic = args.source.load()?;
    let mut viewer = Viewer::new(schematic, viewer_options(config, args)?);
    if let Some(path) = &args.script {
        let summary = script::replay(&mut viewer, script::load(path)?);
        println!("{summary}");
    }

    let scene = Scene::from_viewer(&viewer, config.show_hint && !args.no_hint);
    let mut written = Vec::new();
    if let Some(path) = &args.svg {
        let svg = render::svg::render_svg(&scene)?;
        export::save_text(&svg, path)?;
        written.push(path.clone());
    }
    let png_path = match (&args.png, &args.svg) {
        (Some(path), _) => Some(path.clone()),
        (None, None) => Some(
            export::default_image_path(config.output_dir.as_deref())
                .context("No pictures directory available; pass --png or --svg")?,
        ),
        (None, Some(_)) => None,
    };
    if let Some(path) = png_path {
        let img = render::image::render_image(&scene, config.png_scale)?;
        export::save_png(&img, &path)?;
        written.push(path);
    }

    for path in &written {
        println!("Saved {}", path.display());
    }
    if let Some(info) = viewer.current_info() {
        println!();
        print!("{}", render::panel::render_panel(info, render::panel::WRAP_WIDTH));
    }
    Ok(())
}

fn inspect(reference: &str, source: &SchematicSource) -> anyhow::Result<()> {
    let schematic = source.load()?;
    let Some(info) = schematic.registry().get(reference) else {
        bail!("No component {reference:?} in schematic {:?}", schematic.name());
    };
    print!("{}", render::panel::render_panel(info, render::panel::WRAP_WIDTH));
    Ok(())
}

fn list(source: &SchematicSource) -> anyhow::Result<()> {
    let schematic = source.load()?;
    if schematic.registry().is_empty() {
        println!("{}: no components", schematic.name());
        return Ok(());
    }
    for info in schematic.registry().iter() {
        println!("{:<4} {:<16} {}", info.reference, info.value, info.title);
    }
    Ok(())
}

fn validate(source: &SchematicSource) -> anyhow::Result<()> {
    let schematic = source.load()?;
    println!(
        "{}: {} shapes, {} wires, {} net labels, {} pins, {} components",
        schematic.name(),
        schematic.shapes().len(),
        schematic.wires().len(),
        schematic.net_labels().len(),
        schematic.pins().len(),
        schematic.registry().len()
    );
    let findings = schematic.findings();
    for finding in &findings {
        println!("warning: {finding}");
    }
    if findings.is_empty() {
        println!("OK");
    }
    Ok(())
}

fn dump(output: Option<&Path>) -> anyhow::Result<()> {
    let json = file::to_json(&builtin::foc_driver()?)?;
    match output {
        Some(path) => {
            export::save_text(&json, path)?;
            println!("Saved {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn config_command(
    config: &ViewerConfig,
    path: Option<PathBuf>,
    write_defaults: bool,
) -> anyhow::Result<()> {
    if !write_defaults {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }
    let path = path
        .or_else(ViewerConfig::default_path)
        .context("No config directory available; pass --config")?;
    ViewerConfig::default().save(&path)?;
    println!("Saved {}", path.display());
    Ok(())
}
