//! Test fixtures: small fake media blobs.

/// Bytes that start like an MP4 (`ftyp` box). `tag` makes the content, and so
/// the storage id, unique.
pub fn fake_mp4(tag: &str) -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x18];
    data.extend_from_slice(b"ftypmp42");
    data.extend_from_slice(tag.as_bytes());
    data
}

/// JPEG SOI/EOI framing around `tag`.
pub fn fake_jpeg(tag: &str) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend_from_slice(tag.as_bytes());
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// A JPEG-looking blob of exactly `size` bytes.
pub fn jpeg_of_size(size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    if size >= 2 {
        data[0] = 0xFF;
        data[1] = 0xD8;
    }
    data
}
