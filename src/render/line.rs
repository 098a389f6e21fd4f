use crate::{
    foundation::error::{BindumpError, BindumpResult},
    foundation::frame::Frame,
    foundation::window::{ReadWindow, Stride},
    render::hex::byte_to_hex,
};

/// Capacity of a rendered line; the widest layout at the largest stride needs 75.
pub const MAX_LINE_LEN: usize = 96;

/// First byte value shown as itself in the character column.
pub const FIRST_GLYPH: u8 = 0x20;

/// Last byte value shown as itself in the character column.
pub const LAST_GLYPH: u8 = 0xA4;

const SEPARATOR: u8 = b'|';

/// Line layout policy, picked from the column count of the target.
///
/// | class    | columns              | stride | layout                           |
/// |----------|----------------------|--------|----------------------------------|
/// | `Wide`   | 85+                  | 16     | `AAAAAA| hh hh .. | cccc|`       |
/// | `File`   | 80..85, or any file  | 16     | `AAAAAA | hh hh .. | cccc`       |
/// | `Medium` | 64..80               | 16     | `AAAAAA|hhhh hhhh .. |cccc`      |
/// | `Narrow` | below 64             | 8      | `AAAAAA|hhhh..|cccc`             |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthClass {
    /// Spaced hex bytes, framed character column.
    Wide,
    /// Hex bytes grouped in pairs.
    Medium,
    /// Non-interactive output (text files).
    File,
    /// Packed hex, no spacing.
    Narrow,
}

impl WidthClass {
    /// Pick the class for a display that is `columns` characters wide.
    pub fn from_columns(columns: u16) -> Self {
        match columns {
            85.. => Self::Wide,
            80..=84 => Self::File,
            64..=79 => Self::Medium,
            _ => Self::Narrow,
        }
    }

    /// Frame size used with this class.
    pub fn stride(self) -> Stride {
        match self {
            Self::Wide | Self::Medium | Self::File => Stride::SIXTEEN,
            Self::Narrow => Stride::EIGHT,
        }
    }

    /// Exact length of a line rendered in this class at `stride`.
    pub fn line_len(self, stride: Stride) -> usize {
        let s = stride.get();
        let prefix = 6;
        match self {
            Self::Wide => prefix + 1 + 3 * s + 3 + s + 1,
            Self::Medium => prefix + 1 + 5 * s.div_ceil(2) + 1 + s,
            Self::File => prefix + 3 + 3 * s + 2 + s,
            Self::Narrow => prefix + 1 + 2 * s + 1 + s,
        }
    }
}

/// Fixed-capacity text line, overwritten once per frame.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderLine {
    data: [u8; MAX_LINE_LEN],
    len: usize,
}

impl RenderLine {
    /// Empty line.
    pub fn new() -> Self {
        Self {
            data: [0; MAX_LINE_LEN],
            len: 0,
        }
    }

    /// Line holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> BindumpResult<Self> {
        let mut line = Self::new();
        line.put_all(bytes)?;
        Ok(line)
    }

    /// Rendered bytes. Glyphs above `0x7F` are raw byte values, not UTF-8.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Length of the rendered text.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` before anything was rendered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Line as a string, with each byte taken as a Latin-1 code point.
    pub fn to_latin1_string(&self) -> String {
        self.as_bytes().iter().map(|&b| char::from(b)).collect()
    }

    fn put(&mut self, byte: u8) -> BindumpResult<()> {
        let slot = self.data.get_mut(self.len).ok_or_else(|| {
            BindumpError::range_exceeded(format!("rendered line exceeds {MAX_LINE_LEN} bytes"))
        })?;
        *slot = byte;
        self.len += 1;
        Ok(())
    }

    fn put_all(&mut self, bytes: &[u8]) -> BindumpResult<()> {
        bytes.iter().try_for_each(|&b| self.put(b))
    }
}

impl Default for RenderLine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RenderLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RenderLine")
            .field(&self.to_latin1_string())
            .finish()
    }
}

/// Character-column glyph for `byte`.
pub fn glyph(byte: u8) -> u8 {
    if (FIRST_GLYPH..=LAST_GLYPH).contains(&byte) {
        byte
    } else {
        b'.'
    }
}

/// Format `frame` into `line` using the layout of `class`.
///
/// Positions outside the window's requested range render as blanks in both columns,
/// so a zero byte and a byte that was never requested look different.
pub fn render_line(
    class: WidthClass,
    window: &ReadWindow,
    frame: &Frame,
    line: &mut RenderLine,
) -> BindumpResult<()> {
    line.len = 0;

    let addr = frame.addr;
    line.put_all(&byte_to_hex((addr >> 16) as u8))?;
    line.put_all(&byte_to_hex((addr >> 8) as u8))?;
    line.put_all(&byte_to_hex(addr as u8))?;

    let cells = Cells { window, frame };
    match class {
        WidthClass::Wide => render_wide(line, &cells),
        WidthClass::Medium => render_medium(line, &cells),
        WidthClass::File => render_file(line, &cells),
        WidthClass::Narrow => render_narrow(line, &cells),
    }
}

struct Cells<'a> {
    window: &'a ReadWindow,
    frame: &'a Frame,
}

impl Cells<'_> {
    fn len(&self) -> usize {
        self.frame.bytes().len()
    }

    fn byte(&self, i: usize) -> Option<u8> {
        let byte = *self.frame.bytes().get(i)?;
        self.window
            .contains_offset(self.frame.addr, i)
            .then_some(byte)
    }

    fn hex(&self, i: usize) -> [u8; 2] {
        self.byte(i).map_or(*b"  ", byte_to_hex)
    }

    fn glyph(&self, i: usize) -> u8 {
        self.byte(i).map_or(b' ', glyph)
    }

    fn put_glyphs(&self, line: &mut RenderLine) -> BindumpResult<()> {
        (0..self.len()).try_for_each(|i| line.put(self.glyph(i)))
    }
}

fn render_wide(line: &mut RenderLine, cells: &Cells<'_>) -> BindumpResult<()> {
    line.put(SEPARATOR)?;
    for i in 0..cells.len() {
        line.put(b' ')?;
        line.put_all(&cells.hex(i))?;
    }
    line.put_all(&[b' ', SEPARATOR, b' '])?;
    cells.put_glyphs(line)?;
    line.put(SEPARATOR)
}

fn render_medium(line: &mut RenderLine, cells: &Cells<'_>) -> BindumpResult<()> {
    line.put(SEPARATOR)?;
    for i in (0..cells.len()).step_by(2) {
        line.put_all(&cells.hex(i))?;
        line.put_all(&cells.hex(i + 1))?;
        line.put(b' ')?;
    }
    line.put(SEPARATOR)?;
    cells.put_glyphs(line)
}

fn render_file(line: &mut RenderLine, cells: &Cells<'_>) -> BindumpResult<()> {
    line.put_all(&[b' ', SEPARATOR, b' '])?;
    for i in 0..cells.len() {
        line.put_all(&cells.hex(i))?;
        line.put(b' ')?;
    }
    line.put_all(&[SEPARATOR, b' '])?;
    cells.put_glyphs(line)
}

fn render_narrow(line: &mut RenderLine, cells: &Cells<'_>) -> BindumpResult<()> {
    line.put(SEPARATOR)?;
    for i in 0..cells.len() {
        line.put_all(&cells.hex(i))?;
    }
    line.put(SEPARATOR)?;
    cells.put_glyphs(line)
}

#[cfg(test)]
#[path = "../../tests/unit/render/line.rs"]
mod tests;
