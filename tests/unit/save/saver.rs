use super::*;
use crate::foundation::window::Stride;
use crate::render::line::{WidthClass, render_line};

/// Accepts at most `capacity` bytes, then reports zero-length writes.
struct Limited {
    capacity: usize,
    written: Vec<u8>,
}

impl Limited {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            written: Vec::new(),
        }
    }
}

impl Write for Limited {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let room = self.capacity - self.written.len();
        let n = buf.len().min(room);
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn narrow_line(window: &ReadWindow, frame: &Frame) -> RenderLine {
    let mut line = RenderLine::new();
    render_line(WidthClass::Narrow, window, frame, &mut line).unwrap();
    line
}

#[test]
fn text_payload_writes_line_and_newline() {
    let window = ReadWindow::new(Stride::EIGHT, 0, 8).unwrap();
    let frame = Frame::with_bytes(Stride::EIGHT, 0, b"ABCDEFGH");
    let line = narrow_line(&window, &frame);

    let mut out = Vec::new();
    save(Payload::Text { addr: 0, line: &line }, &window, &mut out).unwrap();
    assert_eq!(out, b"000000|4142434445464748|ABCDEFGH\n");
}

#[test]
fn short_text_write_fails_without_newline() {
    let window = ReadWindow::new(Stride::SIXTEEN, 0, 16).unwrap();
    let frame = Frame::with_bytes(Stride::SIXTEEN, 0, b"0123456789ABCDEF");
    let mut line = RenderLine::new();
    render_line(WidthClass::Narrow, &window, &frame, &mut line).unwrap();
    assert_eq!(line.len(), 56);

    let mut dest = Limited::new(line.len() - 1);
    let err = save(Payload::Text { addr: 0, line: &line }, &window, &mut dest).unwrap_err();
    assert!(matches!(err, BindumpError::WriteFailure { addr: 0, .. }));
    assert_eq!(dest.written.len(), line.len() - 1);
    assert!(!dest.written.contains(&b'\n'));
}

#[test]
fn forty_byte_line_into_thirty_nine_byte_destination() {
    let window = ReadWindow::new(Stride::EIGHT, 0, 8).unwrap();
    let line = RenderLine::from_bytes(&[b'x'; 40]).unwrap();

    let mut dest = Limited::new(39);
    let err = save(
        Payload::Text {
            addr: 0x21000,
            line: &line,
        },
        &window,
        &mut dest,
    )
    .unwrap_err();
    assert!(matches!(err, BindumpError::WriteFailure { addr: 0x21000, .. }));
    assert_eq!(dest.written, vec![b'x'; 39]);
}

#[test]
fn raw_payload_writes_only_in_window_bytes() {
    let window = ReadWindow::new(Stride::EIGHT, 5, 3).unwrap();
    let frame = Frame::with_bytes(Stride::EIGHT, 0, &[0, 0, 0, 0, 0, 0xA, 0xB, 0xC]);

    let mut out = Vec::new();
    save(Payload::Raw(&frame), &window, &mut out).unwrap();
    assert_eq!(out, vec![0xA, 0xB, 0xC]);
}

#[test]
fn raw_payload_clips_both_edges() {
    let window = ReadWindow::new(Stride::SIXTEEN, 0x13, 9).unwrap();
    let bytes: Vec<u8> = (0..16).collect();
    let frame = Frame::with_bytes(Stride::SIXTEEN, 0x10, &bytes);

    let mut out = Vec::new();
    save(Payload::Raw(&frame), &window, &mut out).unwrap();
    assert_eq!(out, (3..12).collect::<Vec<u8>>());
}

#[test]
fn raw_payload_outside_window_writes_nothing() {
    let window = ReadWindow::new(Stride::EIGHT, 0x20, 8).unwrap();
    let frame = Frame::with_bytes(Stride::EIGHT, 0x30, &[1; 8]);
    let mut dest = Limited::new(0);
    save(Payload::Raw(&frame), &window, &mut dest).unwrap();
    assert!(dest.written.is_empty());
}

#[test]
fn short_raw_write_fails() {
    let window = ReadWindow::new(Stride::EIGHT, 0x40, 8).unwrap();
    let frame = Frame::with_bytes(Stride::EIGHT, 0x40, &[7; 8]);
    let mut dest = Limited::new(5);
    let err = save(Payload::Raw(&frame), &window, &mut dest).unwrap_err();
    assert!(matches!(err, BindumpError::WriteFailure { addr: 0x40, .. }));
}
