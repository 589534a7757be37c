use serde::{Deserialize, Serialize};

/// Default cap on the number of input bytes looked at (8 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 8 * 1024 * 1024;

/// Default number of neighbours shown on each side during disambiguation.
pub const DEFAULT_NEIGHBORHOOD_RADIUS: usize = 3;

/// Tunables for one extraction run.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```
/// use texeq_extract::ExtractOptions;
///
/// let options: ExtractOptions = serde_json::from_str(r#"{ "neighborhood_radius": 1 }"#).unwrap();
/// assert_eq!(options.neighborhood_radius, 1);
/// assert!(options.respect_document_end);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Input beyond this many bytes is ignored.
    pub max_input_bytes: usize,
    /// Records shown before and after a match when asking for confirmation.
    pub neighborhood_radius: usize,
    /// Drop everything after `\end{document}`.
    pub respect_document_end: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            neighborhood_radius: DEFAULT_NEIGHBORHOOD_RADIUS,
            respect_document_end: true,
        }
    }
}
