//! Writer/Reader roundtrip matrix and byte source/sink adapter checks.

use std::io::Cursor;

use msgpack_bind_buffers::{
    print_octets, BufferError, ByteSink, ByteSource, IoSink, IoSource, Reader, Writer,
};

// ---------------------------------------------------------------------------
// Writer/Reader roundtrip matrix
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_unsigned_widths() {
    let mut w = Writer::new();
    w.u8(0xff);
    w.u16(u16::MAX);
    w.u32(0x0102_0304);
    w.u64(u64::MAX - 1);
    let data = w.flush();
    assert_eq!(data.len(), 1 + 2 + 4 + 8);

    let mut r = Reader::new(&data);
    assert_eq!(r.u8(), Ok(0xff));
    assert_eq!(r.u16(), Ok(u16::MAX));
    assert_eq!(r.u32(), Ok(0x0102_0304));
    assert_eq!(r.u64(), Ok(u64::MAX - 1));
    assert_eq!(r.size(), 0);
    assert_eq!(r.u8(), Err(BufferError::EndOfBuffer));
}

#[test]
fn headed_writes_roundtrip() {
    let mut w = Writer::new();
    w.u8u16(0xcd, 0x1234);
    w.u8u64(0xcb, 1.5f64.to_bits());
    let data = w.flush();
    assert_eq!(&data[..3], &[0xcd, 0x12, 0x34]);
    assert_eq!(data[3], 0xcb);

    let mut r = Reader::new(&data[4..]);
    assert_eq!(f64::from_bits(r.u64().unwrap()), 1.5);
}

#[test]
fn flush_returns_only_new_bytes() {
    let mut w = Writer::with_alloc_size(4);
    w.buf(b"abcdef");
    assert_eq!(w.flush(), b"abcdef".to_vec());
    w.u8(b'!');
    assert_eq!(w.flush(), b"!".to_vec());
    w.u8(1);
    w.reset();
    assert!(w.flush().is_empty());
}

#[test]
fn short_reads_do_not_move_the_cursor() {
    let data = [0x01, 0x02, 0x03];
    let mut r = Reader::new(&data);
    assert_eq!(r.u32(), Err(BufferError::EndOfBuffer));
    assert_eq!(r.buf(4), Err(BufferError::EndOfBuffer));
    assert_eq!(r.peek(), Ok(0x01));
    assert_eq!(r.buf(3), Ok(&data[..]));
}

// ---------------------------------------------------------------------------
// Sources and sinks
// ---------------------------------------------------------------------------

fn drain<S: ByteSource>(mut src: S) -> (Vec<u8>, [u8; 2], Result<u8, BufferError>) {
    let head = src.read_vec(3).unwrap();
    let tail = src.read_array::<2>().unwrap();
    let end = src.read_u8();
    (head, tail, end)
}

#[test]
fn every_source_reads_the_same() {
    let data = [1u8, 2, 3, 4, 5];
    let expected = (vec![1, 2, 3], [4, 5], Err(BufferError::EndOfBuffer));
    assert_eq!(drain(Reader::new(&data)), expected);
    assert_eq!(drain(IoSource::new(Cursor::new(data))), expected);
    let mut reader = Reader::new(&data);
    assert_eq!(drain(&mut reader), expected);
}

#[test]
fn oversized_read_vec_fails_without_reading() {
    let data = [1u8, 2];
    let mut r = Reader::new(&data);
    assert_eq!(r.read_vec(3), Err(BufferError::EndOfBuffer));
    assert_eq!(r.size(), 2);

    let mut io = IoSource::new(Cursor::new(data));
    assert_eq!(io.read_vec(3), Err(BufferError::EndOfBuffer));
}

fn fill<S: ByteSink>(mut sink: S) -> S {
    sink.write_u8(0xc4).unwrap();
    sink.write_bytes(&[0x02, 0xaa, 0xbb]).unwrap();
    sink.write_u8u8(0xcc, 0x01).unwrap();
    sink.write_u8u16(0xcd, 0x0203).unwrap();
    sink.write_u8u32(0xce, 0x0405_0607).unwrap();
    sink.write_u8u64(0xcf, 0x0809).unwrap();
    sink
}

#[test]
fn every_sink_writes_the_same() {
    let expected: Vec<u8> = vec![
        0xc4, 0x02, 0xaa, 0xbb, 0xcc, 0x01, 0xcd, 0x02, 0x03, 0xce, 0x04, 0x05, 0x06, 0x07, 0xcf,
        0, 0, 0, 0, 0, 0, 0x08, 0x09,
    ];
    assert_eq!(fill(Vec::<u8>::new()), expected);
    assert_eq!(fill(Writer::new()).flush(), expected);
    assert_eq!(fill(IoSink::new(Vec::<u8>::new())).into_inner(), expected);
    let mut writer = Writer::new();
    fill(&mut writer);
    assert_eq!(writer.flush(), expected);
}

#[test]
fn octet_dump_of_written_bytes() {
    let mut w = Writer::new();
    w.u8u32(0xce, 0xdead_beef);
    assert_eq!(print_octets(&w.flush(), 3), "ce de ad ... (2 more)");
}
