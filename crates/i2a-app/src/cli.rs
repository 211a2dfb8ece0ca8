use std::path::PathBuf;

use clap::Parser;
use clap::builder::PossibleValuesParser;
use i2a_core::color::Rgb;
use i2a_core::config::{AppConfig, ColorDepth, ResampleFilter};
use i2a_core::css_colors::parse_color;
use i2a_core::palette::{PRESET_NAMES, Palette};

use crate::sizing::SizeRequest;

/// img2a : convertit une image en art ASCII (terminal, HTML ou image).
#[derive(Parser, Debug)]
#[command(name = "img2a", version, about, long_about = None)]
pub struct Cli {
    /// Image d'entrée (PNG, JPEG, BMP, GIF).
    pub input: PathBuf,

    /// Fichier de configuration TOML. Les options de la ligne de commande
    /// ont priorité.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    // --- Taille -----------------------------------------------------------
    /// Taille de sortie, `WxH` ou `N` (N×N). Ajustée au terminal si absente.
    #[arg(long, value_parser = parse_size, conflicts_with_all = ["width", "height"])]
    pub size: Option<(u32, u32)>,

    /// Largeur de sortie ; la hauteur suit le ratio de l'image.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), conflicts_with = "height")]
    pub width: Option<u32>,

    /// Hauteur de sortie ; la largeur suit le ratio de l'image.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Avec --size : conserver le ratio de l'image dans la boîte donnée.
    #[arg(long, default_value_t = false)]
    pub preserve_aspect: bool,

    /// Facteur vertical (défaut 0.5, les caractères étant deux fois plus
    /// hauts que larges). Sans effet sur --image-out.
    #[arg(long, value_parser = parse_height_scale)]
    pub height_scale: Option<f32>,

    // --- Lecture ----------------------------------------------------------
    /// Palette de caractères, du plus sombre au plus clair (≥ 2 caractères).
    #[arg(long, value_parser = parse_palette, conflicts_with = "palette_preset")]
    pub palette: Option<Palette>,

    /// Palette prédéfinie.
    #[arg(long, value_parser = PossibleValuesParser::new(PRESET_NAMES.iter().copied()))]
    pub palette_preset: Option<String>,

    /// Inverser la palette.
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Traiter l'image en niveaux de gris (affecte la sortie colorée).
    #[arg(long, default_value_t = false)]
    pub grayscale: bool,

    /// Poids du rouge dans la luminance (défaut 0.2989).
    #[arg(long)]
    pub red_weight: Option<f32>,

    /// Poids du vert dans la luminance (défaut 0.5866).
    #[arg(long)]
    pub green_weight: Option<f32>,

    /// Poids du bleu dans la luminance (défaut 0.1145).
    #[arg(long)]
    pub blue_weight: Option<f32>,

    /// Miroir horizontal.
    #[arg(long, default_value_t = false)]
    pub flip_x: bool,

    /// Miroir vertical.
    #[arg(long, default_value_t = false)]
    pub flip_y: bool,

    /// Filtre de rééchantillonnage : default, fast, smooth, replicate,
    /// area_averaging.
    #[arg(long, value_parser = parse_filter)]
    pub resample_filter: Option<ResampleFilter>,

    // --- Couleur ----------------------------------------------------------
    /// Coloriser la sortie.
    #[arg(long, default_value_t = false)]
    pub colors: bool,

    /// Avec --colors : peindre le fond de chaque caractère.
    #[arg(long, default_value_t = false)]
    pub fill: bool,

    /// Terminal : couleurs 24 bits au lieu des 8 couleurs ANSI.
    #[arg(long, default_value_t = false)]
    pub true_color: bool,

    // --- HTML -------------------------------------------------------------
    /// Produire un document HTML5.
    #[arg(long, default_value_t = false)]
    pub html: bool,

    /// HTML sans en-tête ni document (implique --html).
    #[arg(long, default_value_t = false)]
    pub html_raw: bool,

    /// Titre du document HTML.
    #[arg(long)]
    pub html_title: Option<String>,

    /// CSS font-weight (défaut « bold »).
    #[arg(long)]
    pub html_font_weight: Option<String>,

    /// CSS font-style (défaut « normal »).
    #[arg(long)]
    pub html_font_style: Option<String>,

    /// CSS font-size (défaut « 8pt »).
    #[arg(long)]
    pub html_font_size: Option<String>,

    /// Couleur CSS du fond de page (défaut « black »).
    #[arg(long)]
    pub html_background: Option<String>,

    /// Couleur CSS du texte (défaut « white »).
    #[arg(long)]
    pub html_foreground: Option<String>,

    // --- Image ------------------------------------------------------------
    /// Écrire une image au lieu de texte. La taille par défaut est celle de
    /// l'image d'entrée, en pixels.
    #[arg(long)]
    pub image_out: Option<PathBuf>,

    /// Format de l'image (png, jpeg, bmp, gif). Déduit de l'extension sinon.
    #[arg(long)]
    pub image_out_format: Option<String>,

    /// Police TTF/OTF. Une police monospace du système est cherchée sinon.
    #[arg(long)]
    pub image_font: Option<PathBuf>,

    /// Taille de police en pixels (≥ 1, défaut 12).
    #[arg(long, value_parser = parse_font_size)]
    pub image_font_size: Option<f32>,

    /// Couleur de fond : nom CSS, `#rrggbb` ou `r,g,b`.
    #[arg(long, value_parser = parse_rgb)]
    pub image_background: Option<Rgb>,

    /// Couleur du texte : nom CSS, `#rrggbb` ou `r,g,b`.
    #[arg(long, value_parser = parse_rgb)]
    pub image_foreground: Option<Rgb>,
}

/// Output backend picked by the flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Terminal,
    Html,
    Image(PathBuf),
}

impl Cli {
    /// `--image-out` wins over `--html`, terminal otherwise.
    #[must_use]
    pub fn output(&self) -> Output {
        if let Some(path) = &self.image_out {
            Output::Image(path.clone())
        } else if self.html || self.html_raw {
            Output::Html
        } else {
            Output::Terminal
        }
    }

    /// Size flags as a request, resolved later against the source.
    #[must_use]
    pub fn size_request(&self) -> SizeRequest {
        match (self.size, self.width, self.height) {
            (Some((w, h)), _, _) if self.preserve_aspect => SizeRequest::Fit(w, h),
            (Some((w, h)), _, _) => SizeRequest::Exact(w, h),
            (None, Some(w), _) => SizeRequest::Width(w),
            (None, None, Some(h)) => SizeRequest::Height(h),
            (None, None, None) => SizeRequest::Auto,
        }
    }

    /// Override `config` with every flag given on the command line.
    ///
    /// Boolean switches only turn features on; `--colors` and `--fill`
    /// apply to the selected backend.
    pub fn apply(&self, config: &mut AppConfig) {
        let reader = &mut config.reader;
        if let Some(name) = &self.palette_preset {
            // Names are restricted by the parser.
            if let Ok(p) = Palette::preset(name) {
                reader.palette = p;
            }
        }
        if let Some(p) = &self.palette {
            reader.palette = p.clone();
        }
        reader.invert |= self.invert;
        reader.grayscale |= self.grayscale;
        reader.flip_x |= self.flip_x;
        reader.flip_y |= self.flip_y;
        if let Some(v) = self.red_weight {
            reader.weights.red = v;
        }
        if let Some(v) = self.green_weight {
            reader.weights.green = v;
        }
        if let Some(v) = self.blue_weight {
            reader.weights.blue = v;
        }
        if let Some(f) = self.resample_filter {
            reader.resample_filter = f;
        }
        if let Some(hs) = self.height_scale {
            reader.height_scale = hs;
        }

        match self.output() {
            Output::Terminal => {
                config.terminal.colors |= self.colors;
                config.terminal.fill |= self.fill;
            }
            Output::Html => {
                config.html.colors |= self.colors;
                config.html.fill |= self.fill;
            }
            Output::Image(_) => {
                config.raster.colors |= self.colors;
                config.raster.fill |= self.fill;
            }
        }
        if self.true_color {
            config.terminal.color_depth = ColorDepth::TrueColor;
        }

        let html = &mut config.html;
        html.raw |= self.html_raw;
        if self.html_title.is_some() {
            html.title.clone_from(&self.html_title);
        }
        if let Some(v) = &self.html_font_weight {
            html.font_weight.clone_from(v);
        }
        if let Some(v) = &self.html_font_style {
            html.font_style.clone_from(v);
        }
        if let Some(v) = &self.html_font_size {
            html.font_size.clone_from(v);
        }
        if let Some(v) = &self.html_background {
            html.background.clone_from(v);
        }
        if let Some(v) = &self.html_foreground {
            html.foreground.clone_from(v);
        }

        let raster = &mut config.raster;
        if let Some(v) = self.image_font_size {
            raster.font_size = v;
        }
        if let Some(c) = self.image_background {
            raster.background = c;
        }
        if let Some(c) = self.image_foreground {
            raster.foreground = c;
        }
    }
}

/// Parse `WxH` or a single `N` meaning `N×N`.
///
/// # Errors
/// Returns a message for clap when the value is malformed or zero.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let lower = s.to_ascii_lowercase();
    let parts: Vec<&str> = lower.split('x').collect();
    let num = |p: &str| {
        p.trim()
            .parse::<u32>()
            .map_err(|_| format!("taille illisible « {s} », les dimensions doivent être des entiers"))
    };
    let (w, h) = match parts.as_slice() {
        [n] => {
            let n = num(n)?;
            (n, n)
        }
        [w, h] => (num(w)?, num(h)?),
        _ => return Err("la taille doit avoir une ou deux composantes".into()),
    };
    if w == 0 || h == 0 {
        return Err(format!("taille nulle : {s}"));
    }
    Ok((w, h))
}

fn parse_height_scale(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|_| format!("nombre invalide : {s}"))?;
    if !v.is_finite() || v <= 0.0 {
        return Err(format!("le facteur doit être > 0, reçu {s}"));
    }
    Ok(v)
}

fn parse_font_size(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|_| format!("nombre invalide : {s}"))?;
    if !v.is_finite() || v < 1.0 {
        return Err(format!("la taille de police doit être >= 1, reçu {s}"));
    }
    Ok(v)
}

fn parse_palette(s: &str) -> Result<Palette, String> {
    Palette::new(s).map_err(|e| e.to_string())
}

fn parse_filter(s: &str) -> Result<ResampleFilter, String> {
    s.parse().map_err(|e: i2a_core::CoreError| e.to_string())
}

fn parse_rgb(s: &str) -> Result<Rgb, String> {
    parse_color(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("img2a").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn size_formats() {
        assert_eq!(parse_size("80x40"), Ok((80, 40)));
        assert_eq!(parse_size("120X60"), Ok((120, 60)));
        assert_eq!(parse_size("64"), Ok((64, 64)));
        assert!(parse_size("1x2x3").is_err());
        assert!(parse_size("axb").is_err());
        assert!(parse_size("0x10").is_err());
    }

    #[test]
    fn size_flags_are_mutually_exclusive() {
        assert!(parse(&["a.png", "--size", "10x10", "--width", "5"]).is_err());
        assert!(parse(&["a.png", "--width", "5", "--height", "5"]).is_err());
        assert!(parse(&["a.png", "--width", "0"]).is_err());
    }

    #[test]
    fn size_requests() {
        let cli = parse(&["a.png", "--size", "10x20", "--preserve-aspect"]).unwrap();
        assert_eq!(cli.size_request(), SizeRequest::Fit(10, 20));
        let cli = parse(&["a.png", "--size", "10x20"]).unwrap();
        assert_eq!(cli.size_request(), SizeRequest::Exact(10, 20));
        let cli = parse(&["a.png", "--height", "7"]).unwrap();
        assert_eq!(cli.size_request(), SizeRequest::Height(7));
        let cli = parse(&["a.png"]).unwrap();
        assert_eq!(cli.size_request(), SizeRequest::Auto);
    }

    #[test]
    fn output_selection() {
        assert_eq!(parse(&["a.png"]).unwrap().output(), Output::Terminal);
        assert_eq!(parse(&["a.png", "--html-raw"]).unwrap().output(), Output::Html);
        assert_eq!(
            parse(&["a.png", "--html", "--image-out", "o.png"])
                .unwrap()
                .output(),
            Output::Image(PathBuf::from("o.png"))
        );
    }

    #[test]
    fn invalid_values_are_rejected_by_the_parser() {
        assert!(parse(&["a.png", "--palette", "x"]).is_err());
        assert!(parse(&["a.png", "--palette-preset", "nope"]).is_err());
        assert!(parse(&["a.png", "--resample-filter", "bicubic"]).is_err());
        assert!(parse(&["a.png", "--image-font-size", "0"]).is_err());
        assert!(parse(&["a.png", "--image-background", "#zzz"]).is_err());
        assert!(parse(&["a.png", "--height-scale", "-1"]).is_err());
        assert!(parse(&["a.png", "--palette", "ab", "--palette-preset", "blocks"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "a.png",
            "--palette",
            " .#",
            "--flip-y",
            "--green-weight",
            "0.7",
            "--resample-filter",
            "area-averaging",
            "--height-scale",
            "0.4",
            "--colors",
            "--fill",
            "--true-color",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        config.html.colors = false;
        cli.apply(&mut config);
        assert_eq!(config.reader.palette.to_string(), " .#");
        assert!(config.reader.flip_y);
        assert!(!config.reader.flip_x);
        assert!((config.reader.weights.green - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.reader.resample_filter, ResampleFilter::AreaAveraging);
        assert!((config.reader.height_scale - 0.4).abs() < f32::EPSILON);
        assert!(config.terminal.colors && config.terminal.fill);
        assert_eq!(config.terminal.color_depth, ColorDepth::TrueColor);
        // Other backends untouched.
        assert!(!config.html.colors);
        assert!(!config.raster.fill);
    }

    #[test]
    fn config_values_survive_absent_flags() {
        let cli = parse(&["a.png", "--html"]).unwrap();
        let mut config = AppConfig::default();
        config.reader.invert = true;
        config.html.colors = true;
        config.html.title = Some("chat".into());
        cli.apply(&mut config);
        assert!(config.reader.invert);
        assert!(config.html.colors);
        assert_eq!(config.html.title.as_deref(), Some("chat"));
    }

    #[test]
    fn image_flags() {
        let cli = parse(&[
            "a.png",
            "--image-out",
            "o.jpg",
            "--image-background",
            "navy",
            "--image-foreground",
            "255,128,0",
            "--image-font-size",
            "18",
            "--colors",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.raster.background, (0, 0, 128));
        assert_eq!(config.raster.foreground, (255, 128, 0));
        assert!((config.raster.font_size - 18.0).abs() < f32::EPSILON);
        assert!(config.raster.colors);
        assert!(!config.terminal.colors);
    }
}
