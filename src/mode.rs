// Transform direction and the artifact naming convention tied to it.

use std::fmt;

/// Suffix appended to Forward artifacts and stripped from Reverse inputs.
pub const ARTIFACT_SUFFIX: &str = ".huff";

/// Which direction the remote service should transform the file in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Compress.
    #[default]
    Forward,
    /// Decompress.
    Reverse,
}

impl Mode {
    /// Path of the endpoint serving this direction, relative to the base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Mode::Forward => "/transform/forward",
            Mode::Reverse => "/transform/reverse",
        }
    }

    /// The other direction.
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Forward => Mode::Reverse,
            Mode::Reverse => Mode::Forward,
        }
    }

    /// Name for the downloadable result of transforming `original`.
    ///
    /// Forward appends [`ARTIFACT_SUFFIX`]. Reverse strips it when the name
    /// ends with it and otherwise returns the name unchanged.
    pub fn artifact_name(self, original: &str) -> String {
        match self {
            Mode::Forward => format!("{original}{ARTIFACT_SUFFIX}"),
            Mode::Reverse => match original.strip_suffix(ARTIFACT_SUFFIX) {
                Some(stem) if !stem.is_empty() => stem.to_string(),
                _ => original.to_string(),
            },
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Forward => f.write_str("compress"),
            Mode::Reverse => f.write_str("decompress"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_mode() {
        assert_eq!(Mode::Forward.endpoint(), "/transform/forward");
        assert_eq!(Mode::Reverse.endpoint(), "/transform/reverse");
    }

    #[test]
    fn forward_appends_suffix() {
        assert_eq!(Mode::Forward.artifact_name("report.pdf"), "report.pdf.huff");
    }

    #[test]
    fn reverse_strips_trailing_suffix_only() {
        assert_eq!(Mode::Reverse.artifact_name("report.pdf.huff"), "report.pdf");
        assert_eq!(Mode::Reverse.artifact_name("a.huff.txt"), "a.huff.txt");
        assert_eq!(Mode::Reverse.artifact_name("plain.bin"), "plain.bin");
    }

    #[test]
    fn reverse_keeps_bare_suffix_name() {
        // stripping would leave an empty file name
        assert_eq!(Mode::Reverse.artifact_name(".huff"), ".huff");
    }

    #[test]
    fn toggled_flips_direction() {
        assert_eq!(Mode::Forward.toggled(), Mode::Reverse);
        assert_eq!(Mode::Reverse.toggled(), Mode::Forward);
    }
}
