//! Content-stream interpretation: text-showing operators to positioned spans.

use lopdf::content::Operation;
use lopdf::Object;

/// A run of text shown by one text operator.
///
/// Positions are in PDF user space (bottom-left origin) until the page
/// layer flips them.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Decoded text
    pub text: String,
    /// X position of the text origin
    pub x: f64,
    /// Y position of the baseline
    pub y: f64,
    /// Estimated advance width
    pub width: f64,
    /// Effective font size in points
    pub font_size: f64,
    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new span, estimating its width from the font size.
    pub fn new(text: String, x: f64, y: f64, font_size: f64, font_name: String) -> Self {
        let width = text.chars().count() as f64 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
        }
    }
}

/// Font lookups needed while walking a content stream.
pub trait GlyphDecoder {
    /// Base font name for a font resource key.
    fn base_font(&self, resource: &[u8]) -> String;

    /// Decode string bytes shown with a font resource.
    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String;
}

/// Affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    fn from_operands(ops: &[Object]) -> Option<Self> {
        if ops.len() < 6 {
            return None;
        }
        Some(Self {
            a: get_number(&ops[0])?,
            b: get_number(&ops[1])?,
            c: get_number(&ops[2])?,
            d: get_number(&ops[3])?,
            e: get_number(&ops[4])?,
            f: get_number(&ops[5])?,
        })
    }

    /// `self` applied first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn origin(&self) -> (f64, f64) {
        (self.e, self.f)
    }

    /// Length of the transformed unit Y vector.
    fn vertical_scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state tracked between operators.
struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    line_matrix: Matrix,
    text_matrix: Matrix,
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f64,
    leading: f64,
    in_text_object: bool,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            line_matrix: Matrix::IDENTITY,
            text_matrix: Matrix::IDENTITY,
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: 0.0,
            in_text_object: false,
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size
        };
        self.move_line(0.0, -leading);
    }

    fn span(&self, text: String) -> Option<TextSpan> {
        if text.trim().is_empty() {
            return None;
        }
        let rendering = self.text_matrix.then(&self.ctm);
        let (x, y) = rendering.origin();
        let size = self.font_size * rendering.vertical_scale();
        Some(TextSpan::new(text, x, y, size, self.font_name.clone()))
    }
}

/// Threshold (in 1/1000 text space units) above which a TJ adjustment is a word gap.
const TJ_SPACE_THRESHOLD: f64 = 200.0;

/// Walk decoded content-stream operations and collect text spans in stream order.
pub fn collect_spans(operations: &[Operation], decoder: &dyn GlyphDecoder) -> Vec<TextSpan> {
    let mut state = TextState::new();
    let mut spans = Vec::new();

    for op in operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => state.saved.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.saved.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.ctm = m.then(&state.ctm);
                }
            }
            "BT" => {
                state.in_text_object = true;
                state.line_matrix = Matrix::IDENTITY;
                state.text_matrix = Matrix::IDENTITY;
            }
            "ET" => state.in_text_object = false,
            "Tf" => {
                if operands.len() >= 2 {
                    if let Object::Name(resource) = &operands[0] {
                        state.font_name = decoder.base_font(resource);
                        state.font_resource = resource.clone();
                    }
                    state.font_size = get_number(&operands[1]).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(get_number) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = get_number(&operands[0]).unwrap_or(0.0);
                    let ty = get_number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.line_matrix = m;
                    state.text_matrix = m;
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if state.in_text_object {
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        let text = decoder.decode(&state.font_resource, bytes);
                        spans.extend(state.span(text));
                    }
                }
            }
            "TJ" => {
                if state.in_text_object {
                    if let Some(Object::Array(items)) = operands.first() {
                        let text = decode_tj_array(items, &state.font_resource, decoder);
                        spans.extend(state.span(text));
                    }
                }
            }
            "'" | "\"" => {
                state.next_line();
                if state.in_text_object {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = operands.get(text_idx) {
                        let text = decoder.decode(&state.font_resource, bytes);
                        spans.extend(state.span(text));
                    }
                }
            }
            _ => {}
        }
    }

    spans
}

/// Decode a TJ array, turning large negative adjustments into spaces.
fn decode_tj_array(items: &[Object], resource: &[u8], decoder: &dyn GlyphDecoder) -> String {
    let mut combined = String::new();

    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decoder.decode(resource, bytes)),
            Object::Integer(_) | Object::Real(_) => {
                let adjustment = -get_number(item).unwrap_or(0.0);
                let needs_space = adjustment > TJ_SPACE_THRESHOLD
                    && !combined.ends_with(' ')
                    && !combined.ends_with('\u{00A0}')
                    && combined
                        .chars()
                        .last()
                        .is_some_and(|c| !is_spaceless_script_char(c));
                if needs_space {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }

    combined
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Check if a character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana and Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Fallback decoding when a font has no usable encoding.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    struct PlainDecoder;

    impl GlyphDecoder for PlainDecoder {
        fn base_font(&self, resource: &[u8]) -> String {
            match resource {
                b"F1" => "Helvetica".to_string(),
                b"F2" => "Helvetica-Bold".to_string(),
                _ => String::from_utf8_lossy(resource).into_owned(),
            }
        }

        fn decode(&self, _resource: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn name(n: &str) -> Object {
        Object::Name(n.as_bytes().to_vec())
    }

    fn string(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    }

    #[test]
    fn test_tj_positions_and_fonts() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![name("F2"), Object::Integer(24)]),
            op("Td", vec![Object::Integer(72), Object::Integer(720)]),
            op("Tj", vec![string("Annual Report")]),
            op("Tf", vec![name("F1"), Object::Integer(12)]),
            op("Td", vec![Object::Integer(0), Object::Integer(-40)]),
            op("Tj", vec![string("Body text")]),
            op("ET", vec![]),
        ];
        let spans = collect_spans(&ops, &PlainDecoder);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Annual Report");
        assert_eq!(spans[0].font_name, "Helvetica-Bold");
        assert_eq!((spans[0].x, spans[0].y), (72.0, 720.0));
        assert_eq!(spans[0].font_size, 24.0);
        assert_eq!((spans[1].x, spans[1].y), (72.0, 680.0));
        assert_eq!(spans[1].font_size, 12.0);
    }

    #[test]
    fn test_text_outside_bt_ignored() {
        let ops = vec![
            op("Tf", vec![name("F1"), Object::Integer(12)]),
            op("Tj", vec![string("stray")]),
        ];
        assert!(collect_spans(&ops, &PlainDecoder).is_empty());
    }

    #[test]
    fn test_tm_scale_and_ctm() {
        let ops = vec![
            op("q", vec![]),
            op(
                "cm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    Object::Integer(10),
                    Object::Integer(20),
                ],
            ),
            op("BT", vec![]),
            op("Tf", vec![name("F1"), Object::Integer(1)]),
            op(
                "Tm",
                vec![
                    Object::Integer(18),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(18),
                    Object::Integer(100),
                    Object::Integer(500),
                ],
            ),
            op("Tj", vec![string("Scaled")]),
            op("ET", vec![]),
            op("Q", vec![]),
            op("BT", vec![]),
            op("Td", vec![Object::Integer(5), Object::Integer(5)]),
            op("Tj", vec![string("Restored")]),
            op("ET", vec![]),
        ];
        let spans = collect_spans(&ops, &PlainDecoder);

        assert_eq!(spans[0].font_size, 18.0);
        assert_eq!((spans[0].x, spans[0].y), (110.0, 520.0));
        assert_eq!((spans[1].x, spans[1].y), (5.0, 5.0));
    }

    #[test]
    fn test_next_line_uses_leading() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![name("F1"), Object::Integer(10)]),
            op("TL", vec![Object::Integer(14)]),
            op("Td", vec![Object::Integer(50), Object::Integer(700)]),
            op("Tj", vec![string("one")]),
            op("T*", vec![]),
            op("Tj", vec![string("two")]),
            op("'", vec![string("three")]),
            op("ET", vec![]),
        ];
        let spans = collect_spans(&ops, &PlainDecoder);
        let ys: Vec<f64> = spans.iter().map(|s| s.y).collect();
        assert_eq!(ys, vec![700.0, 686.0, 672.0]);
    }

    #[test]
    fn test_tj_array_word_gaps() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![name("F1"), Object::Integer(12)]),
            op(
                "TJ",
                vec![Object::Array(vec![
                    string("Hel"),
                    Object::Integer(-20),
                    string("lo"),
                    Object::Integer(-250),
                    string("World"),
                    Object::Real(-300.0),
                ])],
            ),
            op("ET", vec![]),
        ];
        let spans = collect_spans(&ops, &PlainDecoder);
        assert_eq!(spans[0].text, "Hello World ");
    }

    #[test]
    fn test_blank_text_dropped() {
        let ops = vec![
            op("BT", vec![]),
            op("Tj", vec![string("   ")]),
            op("ET", vec![]),
        ];
        assert!(collect_spans(&ops, &PlainDecoder).is_empty());
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_spaceless_scripts() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('か'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
