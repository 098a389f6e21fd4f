use std::io::Cursor;

use super::*;
use crate::foundation::window::Stride;
use crate::source::memory::FlatMemory;

fn file_with(offset: usize, bytes: &[u8]) -> Cursor<Vec<u8>> {
    let mut data = vec![0xEE; offset + bytes.len() + 32];
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
    Cursor::new(data)
}

#[test]
fn file_frame_inside_window_is_copied() {
    let payload: Vec<u8> = (0u8..16).collect();
    let mut file = file_with(0x21000, &payload);
    let window = ReadWindow::new(Stride::SIXTEEN, 0x21000, 0x10).unwrap();
    let mut frame = Frame::new(Stride::SIXTEEN);
    frame.addr = 0x21000;

    let filled = read_frame(&mut Source::File(&mut file), &window, &mut frame).unwrap();
    assert_eq!(filled, 16);
    assert_eq!(frame.bytes(), payload.as_slice());
}

#[test]
fn bytes_outside_window_are_zero() {
    // Every byte of the file is 0xEE, so any zero in the frame must be padding.
    let mut file = Cursor::new(vec![0xEEu8; 64]);
    let window = ReadWindow::new(Stride::EIGHT, 5, 3).unwrap();
    let mut frame = Frame::new(Stride::EIGHT);
    frame.addr = window.begin();

    let filled = read_frame(&mut Source::File(&mut file), &window, &mut frame).unwrap();
    assert_eq!(filled, 3);
    for (i, &b) in frame.bytes().iter().enumerate() {
        assert_eq!(b == 0, !window.contains(i as u32), "byte {i}");
    }
    assert_eq!(frame.bytes(), &[0, 0, 0, 0, 0, 0xEE, 0xEE, 0xEE]);
}

#[test]
fn leading_bytes_before_unaligned_lower_are_zero() {
    let mut file = Cursor::new(vec![0x41u8; 64]);
    let window = ReadWindow::new(Stride::SIXTEEN, 3, 40).unwrap();
    let mut frame = Frame::new(Stride::SIXTEEN);
    frame.addr = window.begin();

    read_frame(&mut Source::File(&mut file), &window, &mut frame).unwrap();
    assert_eq!(&frame.bytes()[..3], &[0, 0, 0]);
    assert!(frame.bytes()[3..].iter().all(|&b| b == 0x41));
}

#[test]
fn stale_bytes_from_previous_frame_are_cleared() {
    let mut file = Cursor::new(vec![0x55u8; 32]);
    let window = ReadWindow::new(Stride::SIXTEEN, 0, 20).unwrap();
    let mut frame = Frame::with_bytes(Stride::SIXTEEN, 16, &[0xFF; 16]);

    let filled = read_frame(&mut Source::File(&mut file), &window, &mut frame).unwrap();
    assert_eq!(filled, 4);
    assert_eq!(&frame.bytes()[..4], &[0x55; 4]);
    assert_eq!(&frame.bytes()[4..], &[0; 12]);
}

#[test]
fn short_file_is_read_failure() {
    let mut file = Cursor::new(vec![1u8; 10]);
    let window = ReadWindow::new(Stride::SIXTEEN, 0, 16).unwrap();
    let mut frame = Frame::new(Stride::SIXTEEN);

    let err = read_frame(&mut Source::File(&mut file), &window, &mut frame).unwrap_err();
    match err {
        BindumpError::ReadFailure { addr, source } => {
            assert_eq!(addr, 0);
            assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
        }
        other => panic!("expected ReadFailure, got {other:?}"),
    }
}

struct FailingSeek;

impl std::io::Read for FailingSeek {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(0)
    }
}

impl std::io::Seek for FailingSeek {
    fn seek(&mut self, _pos: SeekFrom) -> std::io::Result<u64> {
        Err(std::io::Error::other("seek refused"))
    }
}

#[test]
fn seek_error_is_read_failure() {
    let mut file = FailingSeek;
    let window = ReadWindow::new(Stride::EIGHT, 0x10, 8).unwrap();
    let mut frame = Frame::new(Stride::EIGHT);
    frame.addr = 0x10;

    let err = read_frame(&mut Source::File(&mut file), &window, &mut frame).unwrap_err();
    assert!(matches!(err, BindumpError::ReadFailure { addr: 0x10, .. }));
}

#[test]
fn logical_memory_reads_in_window_bytes() {
    let mem = FlatMemory::new(0, (0u8..64).collect()).unwrap();
    let window = ReadWindow::new(Stride::EIGHT, 5, 3).unwrap();
    let mut frame = Frame::new(Stride::EIGHT);

    let filled = read_frame(&mut Source::Logical(&mem), &window, &mut frame).unwrap();
    assert_eq!(filled, 3);
    assert_eq!(frame.bytes(), &[0, 0, 0, 0, 0, 5, 6, 7]);
}

#[test]
fn logical_memory_outside_mapping_is_range_exceeded() {
    let mem = FlatMemory::new(0x100, vec![0; 16]).unwrap();
    let window = ReadWindow::new(Stride::SIXTEEN, 0x108, 16).unwrap();
    let mut frame = Frame::new(Stride::SIXTEEN);
    frame.addr = 0x110;

    let err = read_frame(&mut Source::Logical(&mem), &window, &mut frame).unwrap_err();
    assert!(matches!(err, BindumpError::RangeExceeded(_)));
}

#[test]
fn padding_outside_mapping_is_not_read() {
    // The mapping covers only the requested bytes; the padded edges must not touch memory.
    let mem = FlatMemory::new(5, vec![9, 9, 9]).unwrap();
    let window = ReadWindow::new(Stride::EIGHT, 5, 3).unwrap();
    let mut frame = Frame::new(Stride::EIGHT);

    read_frame(&mut Source::Logical(&mem), &window, &mut frame).unwrap();
    assert_eq!(frame.bytes(), &[0, 0, 0, 0, 0, 9, 9, 9]);
}

#[test]
fn physical_memory_is_unsupported() {
    let window = ReadWindow::new(Stride::EIGHT, 0, 8).unwrap();
    let mut frame = Frame::new(Stride::EIGHT);
    let err = read_frame(&mut Source::Physical, &window, &mut frame).unwrap_err();
    assert!(matches!(err, BindumpError::Unsupported(_)));
    assert_eq!(Source::Physical.kind(), SourceKind::Physical);
}

#[test]
fn mismatched_stride_is_invalid() {
    let window = ReadWindow::new(Stride::EIGHT, 0, 8).unwrap();
    let mut frame = Frame::new(Stride::SIXTEEN);
    let err = read_frame(&mut Source::Physical, &window, &mut frame).unwrap_err();
    assert!(matches!(err, BindumpError::InvalidArgument(_)));
}
