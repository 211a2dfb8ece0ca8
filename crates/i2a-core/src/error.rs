use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    InvalidConfiguration(String),

    /// Resample filter name that does not map to a known filter.
    #[error("Filtre de rééchantillonnage non supporté : {name}")]
    UnsupportedFilter {
        /// The filter name as given by the caller.
        name: String,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Unsupported output file format.
    #[error("Format non supporté : {format}")]
    UnsupportedFormat {
        /// The format string that is unsupported.
        format: String,
    },
}

impl CoreError {
    /// Reject zero-sized grids and rasters.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` if either axis is zero.
    ///
    /// # Example
    /// ```
    /// use i2a_core::CoreError;
    /// assert!(CoreError::check_dimensions(80, 40).is_ok());
    /// assert!(CoreError::check_dimensions(0, 40).is_err());
    /// ```
    pub fn check_dimensions(width: u32, height: u32) -> Result<(), Self> {
        if width == 0 || height == 0 {
            return Err(Self::InvalidDimensions { width, height });
        }
        Ok(())
    }
}
