/// Parameters shared by all generators.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct GeneratorConfig {
    /// Resolve shapes whose contours overlap each other or themselves.
    ///
    /// When set, each contour is evaluated on its own and the results are combined
    /// according to the contour windings, and the sign of every pixel is checked
    /// against a non-zero fill of the shape.
    ///
    /// Default value: `true`.
    pub overlap_support: bool,

    /// Distances to two edges that differ by no more than this amount are
    /// considered equal, and the edge that faces the point most squarely wins.
    ///
    /// Default value: `GeneratorConfig::DEFAULT_TIE_TOLERANCE` (exact comparison).
    pub tie_tolerance: f64,
}

impl GeneratorConfig {
    pub const DEFAULT_TIE_TOLERANCE: f64 = 0.0;

    pub const DEFAULT: Self = GeneratorConfig {
        overlap_support: true,
        tie_tolerance: Self::DEFAULT_TIE_TOLERANCE,
    };

    #[inline]
    pub const fn with_overlap_support(mut self, overlap_support: bool) -> Self {
        self.overlap_support = overlap_support;
        self
    }

    #[inline]
    pub const fn with_tie_tolerance(mut self, tie_tolerance: f64) -> Self {
        self.tie_tolerance = tie_tolerance;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Which texels the error correction may modify.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum ErrorCorrectionMode {
    /// No error correction.
    Disabled,
    /// Correct all artifacts, even at the edges and corners of the shape.
    Indiscriminate,
    /// Correct artifacts, but keep the texels that carry the corners and edges of the
    /// shape unless their channels would invert the fill.
    EdgePriority,
    /// Only correct the fill inversions at the edges of the shape.
    EdgeOnly,
}

/// When to check artifact candidates against the exact distance of the shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum DistanceCheckMode {
    /// Only look at the bitmap. Fastest.
    DoNotCheck,
    /// Check the candidates at the edges of the shape, where the bitmap alone can't
    /// tell an artifact from a legitimate feature.
    CheckAtEdge,
    /// Check all candidates.
    AlwaysCheck,
}

/// Parameters of the multi-channel error correction.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct ErrorCorrectionConfig {
    /// Default value: `ErrorCorrectionConfig::DEFAULT_MODE`.
    pub mode: ErrorCorrectionMode,

    /// Default value: `ErrorCorrectionConfig::DEFAULT_DISTANCE_CHECK_MODE`.
    pub distance_check_mode: DistanceCheckMode,

    /// How much the interpolated median may deviate from what its neighbours allow,
    /// relative to the change over one pixel, before it is considered an artifact.
    ///
    /// Default value: `ErrorCorrectionConfig::DEFAULT_MIN_DEVIATION_RATIO`.
    pub min_deviation_ratio: f64,

    /// How much a correction must reduce the error against the exact distance to be
    /// applied, when the distance is checked.
    ///
    /// Default value: `ErrorCorrectionConfig::DEFAULT_MIN_IMPROVE_RATIO`.
    pub min_improve_ratio: f64,
}

impl ErrorCorrectionConfig {
    pub const DEFAULT_MODE: ErrorCorrectionMode = ErrorCorrectionMode::EdgePriority;
    pub const DEFAULT_DISTANCE_CHECK_MODE: DistanceCheckMode = DistanceCheckMode::CheckAtEdge;
    pub const DEFAULT_MIN_DEVIATION_RATIO: f64 = 1.11111111111111111;
    pub const DEFAULT_MIN_IMPROVE_RATIO: f64 = 1.11111111111111111;

    pub const DEFAULT: Self = ErrorCorrectionConfig {
        mode: Self::DEFAULT_MODE,
        distance_check_mode: Self::DEFAULT_DISTANCE_CHECK_MODE,
        min_deviation_ratio: Self::DEFAULT_MIN_DEVIATION_RATIO,
        min_improve_ratio: Self::DEFAULT_MIN_IMPROVE_RATIO,
    };

    #[inline]
    pub const fn disabled() -> Self {
        Self::DEFAULT.with_mode(ErrorCorrectionMode::Disabled)
    }

    #[inline]
    pub const fn with_mode(mut self, mode: ErrorCorrectionMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub const fn with_distance_check_mode(mut self, mode: DistanceCheckMode) -> Self {
        self.distance_check_mode = mode;
        self
    }

    #[inline]
    pub const fn with_min_deviation_ratio(mut self, ratio: f64) -> Self {
        self.min_deviation_ratio = ratio;
        self
    }

    #[inline]
    pub const fn with_min_improve_ratio(mut self, ratio: f64) -> Self {
        self.min_improve_ratio = ratio;
        self
    }
}

impl Default for ErrorCorrectionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters of the multi-channel generators.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct MsdfGeneratorConfig {
    pub generator: GeneratorConfig,
    pub error_correction: ErrorCorrectionConfig,
}

impl MsdfGeneratorConfig {
    pub const DEFAULT: Self = MsdfGeneratorConfig {
        generator: GeneratorConfig::DEFAULT,
        error_correction: ErrorCorrectionConfig::DEFAULT,
    };

    #[inline]
    pub const fn new(generator: GeneratorConfig, error_correction: ErrorCorrectionConfig) -> Self {
        MsdfGeneratorConfig {
            generator,
            error_correction,
        }
    }

    #[inline]
    pub const fn with_overlap_support(mut self, overlap_support: bool) -> Self {
        self.generator.overlap_support = overlap_support;
        self
    }

    #[inline]
    pub const fn with_error_correction(mut self, error_correction: ErrorCorrectionConfig) -> Self {
        self.error_correction = error_correction;
        self
    }
}

#[test]
fn config_defaults() {
    let config = MsdfGeneratorConfig::default();
    assert!(config.generator.overlap_support);
    assert_eq!(config.generator.tie_tolerance, 0.0);
    assert_eq!(config.error_correction.mode, ErrorCorrectionMode::EdgePriority);
    assert_eq!(
        config.error_correction.distance_check_mode,
        DistanceCheckMode::CheckAtEdge
    );
    assert!((config.error_correction.min_deviation_ratio - 10.0 / 9.0).abs() < 1e-15);
    assert_eq!(config, MsdfGeneratorConfig::DEFAULT);

    let config = MsdfGeneratorConfig::DEFAULT
        .with_overlap_support(false)
        .with_error_correction(ErrorCorrectionConfig::disabled());
    assert!(!config.generator.overlap_support);
    assert_eq!(config.error_correction.mode, ErrorCorrectionMode::Disabled);
}
