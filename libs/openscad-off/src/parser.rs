//! # OFF Reader
//!
//! Single-pass reader for the Object File Format written by `openscad -o
//! file.off`.
//!
//! ```text
//! OFF                      <- optional keyword (OFF or COFF)
//! 8 6 0                    <- vertex, face, edge counts (edges ignored)
//! x y z [r g b [a]]        <- one line per vertex
//! n i0 .. in-1 [r g b [a]] <- one line per face
//! ```
//!
//! Blank lines and `#` comments are skipped. Colors are either fractional
//! (`0..=1`) or bytes (`0..=255`); the scale is decided once per color set:
//! if any component exceeds `1.0` the whole set is read as bytes.

use std::str::SplitWhitespace;

use config::constants::COLOR_BYTE_MAX;
use glam::DVec3;
use openscad_mesh::{Color, Face, Mesh, MeshColors};

use crate::error::{OffError, OffErrorKind, OffResult};

// =============================================================================
// PUBLIC API
// =============================================================================

/// Parses OFF text into a [`Mesh`].
///
/// Faces keep their arity and winding. Colors found on every vertex line
/// become [`MeshColors::PerVertex`], colors found on every face line become
/// [`MeshColors::PerFace`].
///
/// # Errors
///
/// Every failure is an [`OffError`] carrying the 1-based line number.
///
/// # Example
///
/// ```rust
/// use openscad_off::parse_off;
///
/// let mesh = parse_off("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2 255 0 0\n")?;
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// assert_eq!(mesh.face_color(0).map(|c| c.r), Some(1.0));
/// # Ok::<(), openscad_off::OffError>(())
/// ```
pub fn parse_off(text: &str) -> OffResult<Mesh> {
    let mut lines = DataLines::new(text);
    let (vertex_count, face_count) = read_header(&mut lines)?;

    let mut vertices = Vec::with_capacity(capacity_hint(vertex_count, text));
    let mut vertex_colors = ColorSet::new("vertex", vertex_count);
    for n in 0..vertex_count {
        let line = lines.expect(|| format!("vertex {} of {}", n + 1, vertex_count))?;
        let mut tokens = line.tokens();
        let position = read_position(&line, &mut tokens)?;
        vertices.push(position);
        vertex_colors.push(read_color(&line, tokens)?, line.number);
    }

    let mut faces: Vec<Face> = Vec::with_capacity(capacity_hint(face_count, text));
    let mut face_colors = ColorSet::new("face", face_count);
    for n in 0..face_count {
        let line = lines.expect(|| format!("face {} of {}", n + 1, face_count))?;
        let mut tokens = line.tokens();
        faces.push(read_face(&line, &mut tokens, vertex_count)?);
        face_colors.push(read_color(&line, tokens)?, line.number);
    }

    let last_line = lines.last_line();
    let colors = match (vertex_colors.finish()?, face_colors.finish()?) {
        (None, None) => MeshColors::None,
        (Some(colors), None) => MeshColors::PerVertex(colors),
        (None, Some(colors)) => MeshColors::PerFace(colors),
        (Some(_), Some(_)) => {
            return Err(OffError::at(
                last_line,
                OffErrorKind::ColorCoverage {
                    details: "colors given on both vertices and faces".to_string(),
                },
            ));
        }
    };

    Mesh::new(vertices, faces, colors).map_err(|err| OffError::at(last_line, err.into()))
}

/// Shortest possible element line ("0 0 0" plus a newline).
const MIN_ELEMENT_LINE_LEN: usize = 6;

/// Declared counts are untrusted: never reserve more elements than `text`
/// could hold.
fn capacity_hint(declared: usize, text: &str) -> usize {
    declared.min(text.len() / MIN_ELEMENT_LINE_LEN)
}

// =============================================================================
// LINES
// =============================================================================

/// A non-blank, comment-stripped input line.
struct DataLine<'a> {
    number: usize,
    content: &'a str,
}

impl<'a> DataLine<'a> {
    fn tokens(&self) -> SplitWhitespace<'a> {
        self.content.split_whitespace()
    }

    fn error(&self, kind: OffErrorKind) -> OffError {
        OffError::new(self.number, kind, self.content)
    }
}

/// Iterator over data lines, tracking the last line number seen.
struct DataLines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> DataLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    fn last_line(&self) -> usize {
        self.last
    }

    /// Next data line, or an end-of-input error describing what was expected.
    fn expect(&mut self, expected: impl FnOnce() -> String) -> OffResult<DataLine<'a>> {
        let last = self.last;
        self.next().ok_or_else(|| {
            OffError::at(
                last,
                OffErrorKind::UnexpectedEof {
                    expected: expected(),
                },
            )
        })
    }
}

impl<'a> Iterator for DataLines<'a> {
    type Item = DataLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, raw) in self.inner.by_ref() {
            self.last = idx + 1;
            let content = match raw.find('#') {
                Some(pos) => &raw[..pos],
                None => raw,
            }
            .trim();
            if !content.is_empty() {
                return Some(DataLine {
                    number: idx + 1,
                    content,
                });
            }
        }
        None
    }
}

// =============================================================================
// HEADER
// =============================================================================

fn read_header(lines: &mut DataLines<'_>) -> OffResult<(usize, usize)> {
    let first = lines.expect(|| "OFF header".to_string())?;
    let mut tokens = first.tokens().peekable();

    let starts_with_count = tokens
        .peek()
        .is_some_and(|t| t.starts_with(|c: char| c.is_ascii_digit()));

    if starts_with_count {
        return read_counts(&first, tokens);
    }

    match tokens.next() {
        Some("OFF") | Some("COFF") => {}
        other => {
            return Err(first.error(OffErrorKind::MissingHeader {
                found: other.unwrap_or_default().to_string(),
            }));
        }
    }

    if tokens.peek().is_some() {
        read_counts(&first, tokens)
    } else {
        let counts = lines.expect(|| "element counts".to_string())?;
        read_counts(&counts, counts.tokens())
    }
}

fn read_counts<'a>(
    line: &DataLine<'_>,
    tokens: impl Iterator<Item = &'a str>,
) -> OffResult<(usize, usize)> {
    let values: Vec<&str> = tokens.collect();
    if values.len() < 2 || values.len() > 3 {
        return Err(line.error(OffErrorKind::InvalidCount {
            details: format!("expected 'vertices faces [edges]', found {} values", values.len()),
        }));
    }

    let mut counts = [0usize; 3];
    for (slot, text) in counts.iter_mut().zip(&values) {
        *slot = text.parse().map_err(|_| {
            line.error(OffErrorKind::InvalidCount {
                details: format!("'{text}' is not a non-negative integer"),
            })
        })?;
    }

    Ok((counts[0], counts[1]))
}

// =============================================================================
// ELEMENTS
// =============================================================================

fn parse_number<T: std::str::FromStr>(line: &DataLine<'_>, text: &str) -> OffResult<T> {
    text.parse().map_err(|_| {
        line.error(OffErrorKind::InvalidNumber {
            text: text.to_string(),
        })
    })
}

fn read_position(line: &DataLine<'_>, tokens: &mut SplitWhitespace<'_>) -> OffResult<DVec3> {
    let mut xyz = [0.0f64; 3];
    for (found, slot) in xyz.iter_mut().enumerate() {
        let text = tokens
            .next()
            .ok_or_else(|| line.error(OffErrorKind::TooFewTokens { expected: 3, found }))?;
        *slot = parse_number(line, text)?;
    }
    Ok(DVec3::from_array(xyz))
}

fn read_face(
    line: &DataLine<'_>,
    tokens: &mut SplitWhitespace<'_>,
    vertex_count: usize,
) -> OffResult<Face> {
    let arity_text = tokens
        .next()
        .ok_or_else(|| line.error(OffErrorKind::TooFewTokens { expected: 1, found: 0 }))?;
    let arity: usize = parse_number(line, arity_text)?;
    if arity < 3 {
        return Err(line.error(OffErrorKind::DegenerateFace { arity }));
    }

    // each index takes at least one digit and one separator
    let mut face = Vec::with_capacity(arity.min(line.content.len() / 2));
    for found in 0..arity {
        let text = tokens.next().ok_or_else(|| {
            line.error(OffErrorKind::TooFewTokens {
                expected: arity.saturating_add(1),
                found: found + 1,
            })
        })?;
        let index: u64 = parse_number(line, text)?;
        if index >= vertex_count as u64 {
            return Err(line.error(OffErrorKind::IndexOutOfRange {
                index,
                vertex_count,
            }));
        }
        face.push(index as u32);
    }
    Ok(face)
}

/// Reads the optional trailing color of a vertex or face line.
fn read_color(line: &DataLine<'_>, tokens: SplitWhitespace<'_>) -> OffResult<Option<RawColor>> {
    let rest: Vec<&str> = tokens.collect();
    if rest.is_empty() {
        return Ok(None);
    }
    if rest.len() != 3 && rest.len() != 4 {
        return Err(line.error(OffErrorKind::UnexpectedTokens { count: rest.len() }));
    }

    let mut components = [0.0f32; 4];
    for (slot, text) in components.iter_mut().zip(&rest) {
        let value: f32 = parse_number(line, text)?;
        if !value.is_finite() || value < 0.0 {
            return Err(line.error(OffErrorKind::InvalidColor { value }));
        }
        *slot = value;
    }

    Ok(Some(RawColor {
        components,
        has_alpha: rest.len() == 4,
    }))
}

// =============================================================================
// COLORS
// =============================================================================

/// Color components as written, before scale detection.
#[derive(Debug, Clone, Copy)]
struct RawColor {
    components: [f32; 4],
    has_alpha: bool,
}

impl RawColor {
    fn max_component(&self) -> f32 {
        let used = if self.has_alpha { 4 } else { 3 };
        self.components[..used].iter().copied().fold(0.0, f32::max)
    }

    fn normalize(self, scale: f32) -> Color {
        let [r, g, b, a] = self.components.map(|c| (c / scale).clamp(0.0, 1.0));
        Color::rgba(r, g, b, if self.has_alpha { a } else { 1.0 })
    }
}

/// Colors collected for one element kind, with coverage tracking.
struct ColorSet {
    element: &'static str,
    expected: usize,
    colors: Vec<RawColor>,
    first_colored: Option<usize>,
    first_uncolored: Option<usize>,
}

impl ColorSet {
    fn new(element: &'static str, expected: usize) -> Self {
        Self {
            element,
            expected,
            colors: Vec::new(),
            first_colored: None,
            first_uncolored: None,
        }
    }

    fn push(&mut self, color: Option<RawColor>, line: usize) {
        match color {
            Some(color) => {
                self.first_colored.get_or_insert(line);
                self.colors.push(color);
            }
            None => {
                self.first_uncolored.get_or_insert(line);
            }
        }
    }

    /// Checks coverage and normalizes the set to `[0, 1]`.
    fn finish(self) -> OffResult<Option<Vec<Color>>> {
        if self.colors.is_empty() {
            return Ok(None);
        }
        if self.colors.len() != self.expected {
            let line = self
                .first_uncolored
                .or(self.first_colored)
                .unwrap_or_default();
            return Err(OffError::at(
                line,
                OffErrorKind::ColorCoverage {
                    details: format!(
                        "{} of {} {} lines carry a color",
                        self.colors.len(),
                        self.expected,
                        self.element
                    ),
                },
            ));
        }

        let is_bytes = self.colors.iter().any(|c| c.max_component() > 1.0);
        let scale = if is_bytes { COLOR_BYTE_MAX } else { 1.0 };
        Ok(Some(
            self.colors.into_iter().map(|c| c.normalize(scale)).collect(),
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TRIANGLE: &str = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";

    fn kind_of(text: &str) -> (usize, OffErrorKind) {
        let err = parse_off(text).unwrap_err();
        (err.line, err.kind)
    }

    #[test]
    fn test_parse_triangle() {
        let mesh = parse_off(TRIANGLE).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces(), &[vec![0, 1, 2]]);
        assert_eq!(*mesh.colors(), MeshColors::None);
    }

    #[test]
    fn test_counts_on_keyword_line() {
        let mesh = parse_off("OFF 3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n").unwrap();
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_keyword_is_optional() {
        let mesh = parse_off("3 1\n0 0 0\n1 0 0\n0 1 0\n3 2 1 0\n").unwrap();
        assert_eq!(mesh.faces()[0], vec![2, 1, 0]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let text = "# generated\nOFF\n\n3 1 0 # counts\n0 0 0\n  \n1 0 0\n# mid\n0 1 0\n3 0 1 2\n";
        let mesh = parse_off(text).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_polygons_are_not_triangulated() {
        let text = "OFF\n5 1 0\n0 0 0\n1 0 0\n2 1 0\n1 2 0\n0 1 0\n5 0 1 2 3 4\n";
        let mesh = parse_off(text).unwrap();
        assert_eq!(mesh.faces()[0].len(), 5);
    }

    #[test]
    fn test_byte_face_colors_are_normalized() {
        let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2 255 128 0 255\n";
        let color = parse_off(text).unwrap().face_color(0).unwrap();
        assert_relative_eq!(color.r, 1.0);
        assert_relative_eq!(color.g, 128.0 / 255.0);
        assert_relative_eq!(color.b, 0.0);
        assert_relative_eq!(color.a, 1.0);
    }

    #[test]
    fn test_fractional_face_colors_are_kept() {
        let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2 0.5 0.25 1\n";
        let color = parse_off(text).unwrap().face_color(0).unwrap();
        assert_relative_eq!(color.r, 0.5);
        assert_relative_eq!(color.g, 0.25);
        assert_relative_eq!(color.b, 1.0);
        assert_relative_eq!(color.a, 1.0);
    }

    #[test]
    fn test_scale_is_decided_per_color_set() {
        // the second face pushes the set to byte scale, so "1 1 1" is near black
        let text = "OFF\n3 2 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2 1 1 1\n3 2 1 0 200 200 200\n";
        let mesh = parse_off(text).unwrap();
        assert_relative_eq!(mesh.face_color(0).unwrap().r, 1.0 / 255.0);
        assert_relative_eq!(mesh.face_color(1).unwrap().r, 200.0 / 255.0);
    }

    #[test]
    fn test_vertex_colors() {
        let text = "COFF\n3 1 0\n0 0 0 1 0 0\n1 0 0 0 1 0\n0 1 0 0 0 1 0.5\n3 0 1 2\n";
        let mesh = parse_off(text).unwrap();
        match mesh.colors() {
            MeshColors::PerVertex(colors) => {
                assert_eq!(colors.len(), 3);
                assert_relative_eq!(colors[2].a, 0.5);
            }
            other => panic!("expected vertex colors, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_face_colors_are_rejected() {
        let text = "OFF\n3 2 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2 255 0 0\n3 2 1 0\n";
        let (line, kind) = kind_of(text);
        assert_eq!(line, 7);
        assert!(matches!(kind, OffErrorKind::ColorCoverage { .. }));
    }

    #[test]
    fn test_vertex_and_face_colors_together_are_rejected() {
        let text = "OFF\n3 1 0\n0 0 0 1 0 0\n1 0 0 1 0 0\n0 1 0 1 0 0\n3 0 1 2 0 1 0\n";
        let (_, kind) = kind_of(text);
        assert!(matches!(kind, OffErrorKind::ColorCoverage { .. }));
    }

    #[test]
    fn test_short_vertex_count_is_reported() {
        let text = "OFF\n4 1 0\n0 0 0\n1 0 0\n0 1 0\n";
        let (line, kind) = kind_of(text);
        assert_eq!(line, 5);
        assert!(matches!(kind, OffErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn test_short_face_count_is_reported() {
        let text = "OFF\n3 2 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
        let (_, kind) = kind_of(text);
        assert_eq!(
            kind,
            OffErrorKind::UnexpectedEof {
                expected: "face 2 of 2".to_string()
            }
        );
    }

    #[test]
    fn test_huge_vertex_count_is_eof_not_allocation() {
        for count in ["18446744073709551615", "1000000000000"] {
            let text = format!("OFF\n{count} 1 0\n0 0 0\n");
            let (line, kind) = kind_of(&text);
            assert_eq!(line, 3);
            assert!(matches!(kind, OffErrorKind::UnexpectedEof { .. }));
        }
    }

    #[test]
    fn test_huge_face_count_is_eof() {
        let (_, kind) = kind_of("OFF\n3 1000000000000 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n");
        assert_eq!(
            kind,
            OffErrorKind::UnexpectedEof {
                expected: "face 2 of 1000000000000".to_string()
            }
        );
    }

    #[test]
    fn test_huge_face_arity_is_too_few_tokens() {
        let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n18446744073709551615 0 1 2\n";
        let (line, kind) = kind_of(text);
        assert_eq!(line, 6);
        assert_eq!(
            kind,
            OffErrorKind::TooFewTokens {
                expected: usize::MAX,
                found: 4
            }
        );
    }

    #[test]
    fn test_bad_number_carries_line() {
        let text = "OFF\n3 1 0\n0 0 0\n1 x 0\n0 1 0\n3 0 1 2\n";
        let err = parse_off(text).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(
            err.kind,
            OffErrorKind::InvalidNumber {
                text: "x".to_string()
            }
        );
        assert_eq!(err.text, "1 x 0");
    }

    #[test]
    fn test_short_vertex_line() {
        let (line, kind) = kind_of("OFF\n3 1 0\n0 0\n1 0 0\n0 1 0\n3 0 1 2\n");
        assert_eq!(line, 3);
        assert_eq!(kind, OffErrorKind::TooFewTokens { expected: 3, found: 2 });
    }

    #[test]
    fn test_short_face_line() {
        let (line, kind) = kind_of("OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2\n");
        assert_eq!(line, 7);
        assert_eq!(kind, OffErrorKind::TooFewTokens { expected: 5, found: 4 });
    }

    #[test]
    fn test_out_of_range_index() {
        let (line, kind) = kind_of("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 3\n");
        assert_eq!(line, 6);
        assert_eq!(
            kind,
            OffErrorKind::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_degenerate_face() {
        let (_, kind) = kind_of("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n2 0 1\n");
        assert_eq!(kind, OffErrorKind::DegenerateFace { arity: 2 });
    }

    #[test]
    fn test_unexpected_trailing_values() {
        let (_, kind) = kind_of("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2 9 9\n");
        assert_eq!(kind, OffErrorKind::UnexpectedTokens { count: 2 });
    }

    #[test]
    fn test_negative_color_component() {
        let (_, kind) = kind_of("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2 -1 0 0\n");
        assert_eq!(kind, OffErrorKind::InvalidColor { value: -1.0 });
    }

    #[test]
    fn test_missing_header() {
        let (line, kind) = kind_of("solid cube\n");
        assert_eq!(line, 1);
        assert_eq!(
            kind,
            OffErrorKind::MissingHeader {
                found: "solid".to_string()
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let (line, kind) = kind_of("");
        assert_eq!(line, 0);
        assert!(matches!(kind, OffErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn test_invalid_counts() {
        let (_, kind) = kind_of("OFF\n3\n");
        assert!(matches!(kind, OffErrorKind::InvalidCount { .. }));
        let (_, kind) = kind_of("OFF\n3 -1 0\n");
        assert!(matches!(kind, OffErrorKind::InvalidCount { .. }));
    }

    #[test]
    fn test_empty_mesh_is_structurally_valid() {
        let mesh = parse_off("OFF\n0 0 0\n").unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_non_finite_coordinates_pass_through() {
        let mesh = parse_off("OFF\n3 1 0\nNaN 0 0\ninf 0 0\n0 1 0\n3 0 1 2\n").unwrap();
        assert!(mesh.vertices()[0].x.is_nan());
        assert!(mesh.vertices()[1].x.is_infinite());
    }
}
