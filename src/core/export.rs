//! Writing rendered scenes to disk

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;

/// Default PNG path: `output_dir` or the Pictures folder, timestamped name
pub fn default_image_path(output_dir: Option<&Path>) -> Option<PathBuf> {
    let mut path = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))?,
    };
    let name = chrono::Local::now()
        .format("Schematic_%Y-%m-%d_%H-%M-%S.png")
        .to_string();
    path.push(name);
    Some(path)
}

pub fn save_png(img: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    write_atomic(path, |file| Ok(write_png(file, img)?))
}

pub fn save_text(text: &str, path: &Path) -> anyhow::Result<()> {
    write_atomic(path, |file| Ok(file.write_all(text.as_bytes())?))
}

/// Write through a temp file in the target directory, then rename over `path`
fn write_atomic(
    path: &Path,
    write: impl FnOnce(&mut std::fs::File) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let mut file = tempfile::Builder::new().prefix(".schemview-").tempfile_in(dir)?;
    write(file.as_file_mut())?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_in_output_dir() {
        let path = default_image_path(Some(Path::new("/tmp/exports"))).unwrap();
        assert_eq!(path.parent(), Some(Path::new("/tmp/exports")));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("Schematic_"));
        assert!(name.ends_with(".png"));
        // Schematic_YYYY-mm-dd_HH-MM-SS.png
        assert_eq!(name.len(), "Schematic_".len() + 19 + ".png".len());
    }

    #[test]
    fn test_png_decodes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("scene.png");
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([8, 12, 16, 255]));
        save_png(&img, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_save_text_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.svg");
        save_text("<svg/>", &path).unwrap();
        save_text("<svg></svg>", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg></svg>");
    }
}
