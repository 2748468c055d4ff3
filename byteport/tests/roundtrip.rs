//! Roundtrip tests for byteport
//!
//! These tests cover the data-preservation properties of the ports:
//! - Chunk sequences concatenate back to the input for any buffer capacity
//! - Line sequences rejoin with the terminator back to the input
//! - Cumulative exact-length reads equal one full-length read

use byteport::{BinaryPort, TextPort};
use byteport_platform::MemDevice;

/// Deterministic pseudo-random payload, long enough to span many refills.
fn payload(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_4f6c_dd1du64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state as u8
        })
        .collect()
}

#[test]
fn chunks_reproduce_the_input_for_any_capacity() {
    let input = payload(4096 + 13);
    for capacity in [1usize, 2, 3, 7, 16, 255, 512, 4096, 16384] {
        let mut port = BinaryPort::new(MemDevice::from_data(input.clone()), capacity);

        let mut out = Vec::new();
        let mut chunks = port.chunks();
        while !chunks.is_empty().unwrap() {
            let chunk = chunks.front().unwrap();
            assert!(!chunk.is_empty());
            assert!(chunk.len() <= capacity);
            out.extend_from_slice(chunk);
            chunks.advance();
        }
        assert_eq!(out, input, "capacity {}", capacity);
    }
}

#[test]
fn lines_rejoin_to_the_input_for_any_capacity() {
    let cases: [(&[u8], &[u8]); 5] = [
        (b"one\ntwo\nthree\n", b"\n"),
        (b"one\ntwo\nthree", b"\n"),
        (b"\n\nmiddle\n\n", b"\n"),
        (b"a<>bb<>ccc<>", b"<>"),
        (b"no terminator at all", b"--"),
    ];

    for (input, terminator) in cases {
        for capacity in [1usize, 2, 3, 5, 8, 64, 1024] {
            let mut port =
                TextPort::with_terminator(MemDevice::from_data(input.to_vec()), capacity, terminator);

            let mut lines: Vec<Vec<u8>> = Vec::new();
            let mut seq = port.lines();
            while !seq.is_empty().unwrap() {
                let line = seq.front().unwrap();
                // No yielded line contains the terminator.
                assert!(
                    !line
                        .windows(terminator.len())
                        .any(|candidate| candidate == terminator),
                    "terminator leaked into a line"
                );
                lines.push(line.to_vec());
                seq.advance();
            }

            let rejoined = lines.join(terminator);
            // Rejoining reproduces the input up to a possible missing
            // trailing terminator.
            let expected = input.strip_suffix(terminator).unwrap_or(input);
            assert_eq!(
                rejoined, expected,
                "terminator {:?}, capacity {}",
                terminator, capacity
            );
        }
    }
}

#[test]
fn cumulative_read_exact_equals_one_full_read() {
    let input = payload(1000);

    // One full-length read.
    let mut port = BinaryPort::new(MemDevice::from_data(input.clone()), 64);
    let mut full = vec![0u8; input.len()];
    port.read_exact(&mut full).unwrap();
    assert_eq!(full, input);

    // Cumulative reads of uneven sizes.
    let mut port = BinaryPort::new(MemDevice::from_data(input.clone()), 64);
    let mut cumulative = Vec::new();
    let mut remaining = input.len();
    for step in [1usize, 7, 64, 100, 333].into_iter().cycle() {
        if remaining == 0 {
            break;
        }
        let take = step.min(remaining);
        let mut store = vec![0u8; take];
        port.read_exact(&mut store).unwrap();
        cumulative.extend_from_slice(&store);
        remaining -= take;
    }
    assert_eq!(cumulative, input);
}

#[test]
fn typed_reads_walk_a_binary_record() -> anyhow::Result<()> {
    // A little-endian record: u32 magic, u16 version, u16 flags, f64 value.
    let mut record = Vec::new();
    record.extend_from_slice(&0xCAFE_BABEu32.to_le_bytes());
    record.extend_from_slice(&3u16.to_le_bytes());
    record.extend_from_slice(&0x0180u16.to_le_bytes());
    record.extend_from_slice(&2.718281828f64.to_le_bytes());

    let mut port = BinaryPort::new(MemDevice::from_data(record), 8);
    assert_eq!(port.read_le::<u32>()?, 0xCAFE_BABE);
    assert_eq!(port.read_le::<u16>()?, 3);
    assert_eq!(port.read_le::<u16>()?, 0x0180);
    assert!((port.read_le::<f64>()? - 2.718281828).abs() < 1e-12);
    Ok(())
}
