//! Little-endian integer helpers for page encoding.

#[inline]
pub fn push_u32(out: &mut Vec<u8>, x: u32) {
    out.extend_from_slice(&x.to_le_bytes());
}

#[inline]
pub fn push_u64(out: &mut Vec<u8>, x: u64) {
    out.extend_from_slice(&x.to_le_bytes());
}

/// Reads a u32 at `pos`, returning it with the position just past it.
/// `None` when fewer than four bytes remain.
#[inline]
pub fn read_u32_at(b: &[u8], pos: usize) -> Option<(u32, usize)> {
    let end = pos.checked_add(4)?;
    let raw: [u8; 4] = b.get(pos..end)?.try_into().ok()?;
    Some((u32::from_le_bytes(raw), end))
}

#[inline]
pub fn read_u64_at(b: &[u8], pos: usize) -> Option<(u64, usize)> {
    let end = pos.checked_add(8)?;
    let raw: [u8; 8] = b.get(pos..end)?.try_into().ok()?;
    Some((u64::from_le_bytes(raw), end))
}
