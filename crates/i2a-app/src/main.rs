use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use i2a_ascii::reader::AsciiReader;
use i2a_core::config::{AppConfig, load_config};
use i2a_core::traits::Resample;
use i2a_export::font::{TrueTypeFont, find_system_font};
use i2a_export::rasterizer::RasterRenderer;
use i2a_render::html::HtmlPrinter;
use i2a_render::terminal::{TerminalPrinter, enable_ansi_support};
use i2a_source::image::load_image;

pub mod cli;
pub mod output;
pub mod sizing;

use cli::{Cli, Output};
use sizing::SizeRequest;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Config fichier + overrides CLI
    let config = resolve_config(&cli)?;

    // 4. Charger l'image source
    let source = load_image(&cli.input)?;
    let mut reader = AsciiReader::new(source, config.reader.clone())?;

    // 5. Rendu
    match cli.output() {
        Output::Image(path) => render_image(&cli, &config, &mut reader, &path),
        output => {
            if output == Output::Terminal && config.terminal.colors && !enable_ansi_support() {
                log::warn!("Couleurs demandées sans support ANSI, la sortie risque d'être illisible");
            }
            let terminal = if output == Output::Terminal {
                crossterm::terminal::size().ok()
            } else {
                None
            };
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_text(
                &output,
                cli.size_request(),
                &config,
                &mut reader,
                terminal,
                &mut out,
            )
        }
    }
}

/// Config file (if any) with the command-line flags applied over it.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) if path.exists() => load_config(path)?,
        Some(path) => {
            log::warn!(
                "Config introuvable : {}. Utilisation des défauts.",
                path.display()
            );
            AppConfig::default()
        }
        None => AppConfig::default(),
    };
    cli.apply(&mut config);
    config.validate().context("Options invalides")?;
    Ok(config)
}

/// Terminal or HTML output into `out`.
fn write_text<R: Resample, W: Write>(
    output: &Output,
    request: SizeRequest,
    config: &AppConfig,
    reader: &mut AsciiReader<R>,
    terminal: Option<(u16, u16)>,
    out: &mut W,
) -> Result<()> {
    let (sw, sh) = (reader.image_width(), reader.image_height());
    let hs = config.reader.height_scale;
    let resolved = request.resolve(sw, sh, hs);
    if *output == Output::Html {
        let (cols, rows) = resolved.unwrap_or_else(|| sizing::html_default(sw, sh, hs));
        log::debug!("Sortie HTML {cols}x{rows}");
        HtmlPrinter::new(config.html.clone()).print(reader, cols, rows, out)
    } else {
        let (cols, rows) =
            resolved.unwrap_or_else(|| sizing::terminal_default(sw, sh, hs, terminal));
        log::debug!("Sortie terminal {cols}x{rows}");
        TerminalPrinter::new(config.terminal.clone()).print(reader, cols, rows, out)
    }
}

/// `--image-out`: draw the grid with a TrueType font and save it.
fn render_image<R: Resample>(
    cli: &Cli,
    config: &AppConfig,
    reader: &mut AsciiReader<R>,
    path: &Path,
) -> Result<()> {
    // Échouer avant le rendu si le format est inconnu.
    output::image_format(path, cli.image_out_format.as_deref())?;

    let font_path = match &cli.image_font {
        Some(p) => p.clone(),
        None => find_system_font()
            .context("Aucune police monospace trouvée, utilisez --image-font")?,
    };
    let font = TrueTypeFont::load(&font_path, config.raster.font_size)?;

    let (sw, sh) = (reader.image_width(), reader.image_height());
    let (width, height) = cli.size_request().resolve(sw, sh, 1.0).unwrap_or((sw, sh));
    let frame = RasterRenderer::new(config.raster.clone()).render(reader, &font, width, height)?;
    output::save_image(&frame, path, cli.image_out_format.as_deref())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use i2a_core::frame::FrameBuffer;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("img2a").chain(args.iter().copied())).unwrap()
    }

    fn reader(config: &AppConfig) -> AsciiReader {
        let src = FrameBuffer::from_fn(200, 100, |x, _| {
            if x < 100 { (0, 0, 0) } else { (255, 255, 255) }
        });
        AsciiReader::new(src, config.reader.clone()).unwrap()
    }

    fn run(args: &[&str], terminal: Option<(u16, u16)>) -> String {
        let cli = cli(args);
        let config = resolve_config(&cli).unwrap();
        let mut out = Vec::new();
        write_text(
            &cli.output(),
            cli.size_request(),
            &config,
            &mut reader(&config),
            terminal,
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn config_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reader]\npalette = \"ab\"\ninvert = true\n[terminal]\ncolors = true").unwrap();
        let path = file.path().to_str().unwrap().to_owned();
        let config = resolve_config(&cli(&["a.png", "--config", &path, "--flip-x"])).unwrap();
        assert_eq!(config.reader.palette.to_string(), "ab");
        assert!(config.reader.invert);
        assert!(config.reader.flip_x);
        assert!(config.terminal.colors);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = resolve_config(&cli(&["a.png", "--config", "/nonexistent/img2a.toml"])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn invalid_flag_values_fail_validation() {
        assert!(resolve_config(&cli(&["a.png", "--red-weight", "NaN"])).is_err());
    }

    #[test]
    fn exact_terminal_size() {
        let text = run(
            &["a.png", "--size", "4x2", "--palette", " #", "--resample-filter", "replicate"],
            None,
        );
        assert_eq!(text, "  ##\n  ##\n");
    }

    #[test]
    fn terminal_autofit() {
        // 200×100 at 0.5 is 200×50; a 40×11 terminal leaves 10 rows.
        let text = run(&["a.png", "--palette", " #"], Some((40, 11)));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.chars().count() == 40));
    }

    #[test]
    fn terminal_fallback_without_size() {
        let text = run(&["a.png"], None);
        assert_eq!(text.lines().count(), 20);
        assert!(text.lines().all(|l| l.chars().count() == 80));
    }

    #[test]
    fn html_default_box() {
        let html = run(&["a.png", "--html-raw", "--palette", " #"], None);
        // 200×100 into 128×128, then ·0.5: 128×32.
        assert_eq!(html.matches("<br>").count(), 32);
        assert!(!html.contains("<pre"));
    }

    #[test]
    fn html_document_with_width() {
        let html = run(
            &["a.png", "--html", "--width", "10", "--html-title", "chat"],
            None,
        );
        assert!(html.starts_with("<!DOCTYPE html><html><head><title>chat</title>"));
        assert_eq!(html.matches("<br>").count(), 3);
    }

    #[test]
    fn image_output_end_to_end() {
        // Needs a system monospace font.
        if find_system_font().is_none() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let out = dir.path().join("out.bmp");
        image::RgbImage::from_pixel(64, 32, image::Rgb([200, 50, 50]))
            .save(&input)
            .unwrap();
        let cli = cli(&[
            input.to_str().unwrap(),
            "--image-out",
            out.to_str().unwrap(),
            "--colors",
        ]);
        let config = resolve_config(&cli).unwrap();
        let source = load_image(&cli.input).unwrap();
        let mut reader = AsciiReader::new(source, config.reader.clone()).unwrap();
        render_image(&cli, &config, &mut reader, &out).unwrap();
        let back = image::open(&out).unwrap();
        assert_eq!((back.width(), back.height()), (64, 32));
    }

    #[test]
    fn unknown_image_format_fails_before_rendering() {
        let cli = cli(&["a.png", "--image-out", "o.png", "--image-out-format", "xyz"]);
        let config = resolve_config(&cli).unwrap();
        let err = render_image(&cli, &config, &mut reader(&config), Path::new("o.png")).unwrap_err();
        assert!(err.to_string().contains("xyz"));
    }
}
