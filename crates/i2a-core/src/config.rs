use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::{LumaWeights, Rgb};
use crate::css_colors::parse_color;
use crate::error::CoreError;
use crate::palette::Palette;

/// Resampling filter used to build the working bitmap.
///
/// # Example
/// ```
/// use i2a_core::config::ResampleFilter;
/// let f: ResampleFilter = "area_averaging".parse().unwrap();
/// assert_eq!(f, ResampleFilter::AreaAveraging);
/// assert!("bicubic".parse::<ResampleFilter>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Whatever the resize backend picks by default.
    Default,
    /// Cheap bilinear filter.
    Fast,
    /// High quality (Lanczos3).
    #[default]
    Smooth,
    /// Nearest neighbour, pixels are replicated.
    Replicate,
    /// Box filter, averages the covered area.
    AreaAveraging,
}

impl ResampleFilter {
    /// Every filter, in CLI listing order.
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::Replicate,
        Self::Smooth,
        Self::Fast,
        Self::AreaAveraging,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Fast => "fast",
            Self::Smooth => "smooth",
            Self::Replicate => "replicate",
            Self::AreaAveraging => "area_averaging",
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResampleFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| CoreError::UnsupportedFilter { name: s.to_string() })
    }
}

/// Sampling configuration shared by every renderer.
///
/// # Example
/// ```
/// use i2a_core::config::ReaderConfig;
/// let config = ReaderConfig::default();
/// assert!((config.height_scale - 0.5).abs() < f32::EPSILON);
/// assert!(config.validate().is_ok());
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ReaderConfig {
    /// Glyphs du plus sombre au plus clair.
    pub palette: Palette,
    /// Inverser l'index de palette (pour fond clair).
    pub invert: bool,
    /// Remplacer la couleur de chaque cellule par sa luminance.
    pub grayscale: bool,
    /// Poids des canaux pour la luminance.
    pub weights: LumaWeights,
    /// Miroir horizontal.
    pub flip_x: bool,
    /// Miroir vertical.
    pub flip_y: bool,
    /// Filtre de rééchantillonnage.
    pub resample_filter: ResampleFilter,
    /// Glyph height correction applied by the size solver.
    pub height_scale: f32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            invert: false,
            grayscale: false,
            weights: LumaWeights::default(),
            flip_x: false,
            flip_y: false,
            resample_filter: ResampleFilter::Smooth,
            height_scale: 0.5,
        }
    }
}

impl ReaderConfig {
    /// Check the numeric fields. The palette is valid by construction.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` for a non-positive or non-finite height
    /// scale, or non-finite channel weights.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.height_scale.is_finite() || self.height_scale <= 0.0 {
            return Err(CoreError::InvalidConfiguration(format!(
                "height_scale doit être > 0, reçu {}",
                self.height_scale
            )));
        }
        let w = &self.weights;
        if ![w.red, w.green, w.blue].iter().all(|v| v.is_finite()) {
            return Err(CoreError::InvalidConfiguration(
                "les poids de luminance doivent être finis".into(),
            ));
        }
        Ok(())
    }
}

/// Escape sequence family used by the terminal printer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorDepth {
    /// Eight named colors plus bold, picked by the quantizer.
    #[default]
    Ansi8,
    /// 24-bit RGB escapes.
    TrueColor,
}

/// Terminal printer settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TerminalOptions {
    /// Coloriser les glyphes.
    pub colors: bool,
    /// Peindre le fond de chaque cellule.
    pub fill: bool,
    /// Escape sequence family.
    pub color_depth: ColorDepth,
}

/// HTML printer settings. CSS strings are emitted verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HtmlOptions {
    /// Wrap glyphs in colored spans.
    pub colors: bool,
    /// Fill each span's background with the cell color.
    pub fill: bool,
    /// Emit only the character content, no document wrapper.
    pub raw: bool,
    /// Document title, omitted when `None`.
    pub title: Option<String>,
    /// CSS `font-size`.
    pub font_size: String,
    /// CSS `font-weight`.
    pub font_weight: String,
    /// CSS `font-style`.
    pub font_style: String,
    /// CSS page background.
    pub background: String,
    /// CSS default glyph color.
    pub foreground: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            colors: false,
            fill: false,
            raw: false,
            title: None,
            font_size: "8pt".into(),
            font_weight: "bold".into(),
            font_style: "normal".into(),
            background: "black".into(),
            foreground: "white".into(),
        }
    }
}

/// Raster renderer settings.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RasterOptions {
    /// Draw glyphs in their cell color.
    pub colors: bool,
    /// Paint each cell box with its color and dim the glyph.
    pub fill: bool,
    /// Image background.
    pub background: Rgb,
    /// Glyph color when `colors` is off.
    pub foreground: Rgb,
    /// Font size in pixels.
    pub font_size: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            colors: false,
            fill: false,
            background: (0, 0, 0),
            foreground: (255, 255, 255),
            font_size: 12.0,
        }
    }
}

impl RasterOptions {
    /// # Errors
    /// Returns `InvalidConfiguration` if the font size is below 1.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.font_size.is_finite() || self.font_size < 1.0 {
            return Err(CoreError::InvalidConfiguration(format!(
                "la taille de police doit être >= 1, reçu {}",
                self.font_size
            )));
        }
        Ok(())
    }
}

/// Complete configuration as loaded from a TOML file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
    /// Sampling.
    pub reader: ReaderConfig,
    /// Terminal output.
    pub terminal: TerminalOptions,
    /// HTML output.
    pub html: HtmlOptions,
    /// Image output.
    pub raster: RasterOptions,
}

impl AppConfig {
    /// # Errors
    /// Returns the first invalid section.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.reader.validate()?;
        self.raster.validate()
    }
}

/// Structure TOML intermédiaire, toutes les sections optionnelles.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    reader: Option<ReaderSection>,
    terminal: Option<TerminalSection>,
    html: Option<HtmlSection>,
    image: Option<ImageSection>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ReaderSection {
    palette: Option<String>,
    palette_preset: Option<String>,
    invert: Option<bool>,
    grayscale: Option<bool>,
    red_weight: Option<f32>,
    green_weight: Option<f32>,
    blue_weight: Option<f32>,
    flip_x: Option<bool>,
    flip_y: Option<bool>,
    resample_filter: Option<String>,
    height_scale: Option<f32>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TerminalSection {
    colors: Option<bool>,
    fill: Option<bool>,
    color_depth: Option<ColorDepth>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct HtmlSection {
    colors: Option<bool>,
    fill: Option<bool>,
    raw: Option<bool>,
    title: Option<String>,
    font_size: Option<String>,
    font_weight: Option<String>,
    font_style: Option<String>,
    background: Option<String>,
    foreground: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ImageSection {
    colors: Option<bool>,
    fill: Option<bool>,
    background: Option<String>,
    foreground: Option<String>,
    font_size: Option<f32>,
}

macro_rules! merge {
    ($target:expr, $value:expr) => {
        if let Some(v) = $value {
            $target = v;
        }
    };
}

/// Parse a TOML document and merge it over the defaults.
///
/// # Errors
/// Returns an error if the TOML is malformed or a value is invalid.
///
/// # Example
/// ```
/// use i2a_core::config::parse_config;
/// let config = parse_config("[reader]\npalette = \" .#\"\nflip_x = true\n").unwrap();
/// assert!(config.reader.flip_x);
/// assert_eq!(config.reader.palette.len(), 3);
/// ```
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = AppConfig::default();

    if let Some(r) = file.reader {
        if let Some(name) = r.palette_preset {
            config.reader.palette = Palette::preset(&name)?;
        }
        if let Some(glyphs) = r.palette {
            config.reader.palette = Palette::new(&glyphs)?;
        }
        merge!(config.reader.invert, r.invert);
        merge!(config.reader.grayscale, r.grayscale);
        merge!(config.reader.weights.red, r.red_weight);
        merge!(config.reader.weights.green, r.green_weight);
        merge!(config.reader.weights.blue, r.blue_weight);
        merge!(config.reader.flip_x, r.flip_x);
        merge!(config.reader.flip_y, r.flip_y);
        if let Some(name) = r.resample_filter {
            config.reader.resample_filter = name.parse()?;
        }
        merge!(config.reader.height_scale, r.height_scale);
    }

    if let Some(t) = file.terminal {
        merge!(config.terminal.colors, t.colors);
        merge!(config.terminal.fill, t.fill);
        merge!(config.terminal.color_depth, t.color_depth);
    }

    if let Some(h) = file.html {
        merge!(config.html.colors, h.colors);
        merge!(config.html.fill, h.fill);
        merge!(config.html.raw, h.raw);
        if h.title.is_some() {
            config.html.title = h.title;
        }
        merge!(config.html.font_size, h.font_size);
        merge!(config.html.font_weight, h.font_weight);
        merge!(config.html.font_style, h.font_style);
        merge!(config.html.background, h.background);
        merge!(config.html.foreground, h.foreground);
    }

    if let Some(i) = file.image {
        merge!(config.raster.colors, i.colors);
        merge!(config.raster.fill, i.fill);
        if let Some(c) = i.background {
            config.raster.background = parse_color(&c)?;
        }
        if let Some(c) = i.foreground {
            config.raster.foreground = parse_color(&c)?;
        }
        merge!(config.raster.font_size, i.font_size);
    }

    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))?;
    log::debug!("Configuration chargée depuis {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn filter_names_round_trip() {
        for f in ResampleFilter::ALL {
            assert_eq!(f.name().parse::<ResampleFilter>().unwrap(), f);
        }
        assert_eq!(
            "Area-Averaging".parse::<ResampleFilter>().unwrap(),
            ResampleFilter::AreaAveraging
        );
    }

    #[test]
    fn unknown_filter_is_reported_by_name() {
        assert_eq!(
            "bicubic".parse::<ResampleFilter>(),
            Err(CoreError::UnsupportedFilter {
                name: "bicubic".into()
            })
        );
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_sections_override_defaults() {
        let config = parse_config(
            r##"
[reader]
palette_preset = "blocks"
red_weight = 0.5
resample_filter = "replicate"

[terminal]
colors = true
color_depth = "true_color"

[html]
title = "chat"
background = "#123456"

[image]
background = "navy"
font_size = 20.0
"##,
        )
        .unwrap();
        assert_eq!(config.reader.palette, Palette::preset("blocks").unwrap());
        assert!((config.reader.weights.red - 0.5).abs() < f32::EPSILON);
        assert!((config.reader.weights.green - 0.5866).abs() < f32::EPSILON);
        assert_eq!(config.reader.resample_filter, ResampleFilter::Replicate);
        assert!(config.terminal.colors);
        assert_eq!(config.terminal.color_depth, ColorDepth::TrueColor);
        assert_eq!(config.html.title.as_deref(), Some("chat"));
        assert_eq!(config.html.background, "#123456");
        assert_eq!(config.html.foreground, "white");
        assert_eq!(config.raster.background, (0, 0, 0x80));
        assert!((config.raster.font_size - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn explicit_palette_wins_over_preset() {
        let config = parse_config("[reader]\npalette_preset = \"blocks\"\npalette = \"ab\"\n").unwrap();
        assert_eq!(config.reader.palette.to_string(), "ab");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse_config("[reader]\npalette = \"x\"\n").is_err());
        assert!(parse_config("[reader]\nheight_scale = 0.0\n").is_err());
        assert!(parse_config("[reader]\nresample_filter = \"bicubic\"\n").is_err());
        assert!(parse_config("[image]\nfont_size = 0.5\n").is_err());
        assert!(parse_config("[image]\nforeground = \"#12\"\n").is_err());
        assert!(parse_config("[reader]\nunknown = 1\n").is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reader]\ngrayscale = true").unwrap();
        let config = load_config(file.path()).unwrap();
        assert!(config.reader.grayscale);
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/img2a.toml")).unwrap_err();
        assert!(err.to_string().contains("Impossible de lire"));
    }
}
