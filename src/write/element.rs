//! Element framing: the two-phase size protocol and the mandatory
//! sub-elements of every array.
//!
//! Every array in the container is an element - a 4-byte type code, a 4-byte
//! size field, and a payload padded to an 8-byte boundary. The size is the
//! exact byte length of the payload, which for streamed arrays is only known
//! after the payload has been written. [`MatStream::begin_element`] therefore
//! reserves the size field and returns an [`OpenElement`] handle capturing its
//! offset; [`MatStream::end_element`] measures what was emitted since and
//! backfills the field. Everything between the two calls is purely
//! append-only.
//!
//! The remaining functions emit the three sub-elements every array carries in
//! order: array-flags (class and nonzero count), dimensions, and name. Names
//! of four bytes or fewer use the compact in-tag form; longer names use the
//! regular form. Both are format requirements, selected purely by length.

use crate::format::{ArrayFlags, MatClass, MatType, TAG_LEN};
use crate::write::stream::MatStream;
use crate::Result;

/// Handle for an element whose size field is reserved but not yet filled.
///
/// Returned by [`MatStream::begin_element`] and consumed by
/// [`MatStream::end_element`]. Holding the offsets in a handle keeps the
/// begin/end pairing explicit in the callers and confines the backward seek
/// to one place.
pub(crate) struct OpenElement {
    /// Offset of the reserved 4-byte size field.
    size_pos: u64,
    /// Offset of the first payload byte, right after the size field.
    payload_start: u64,
}

impl MatStream {
    /// Writes an element tag with a reserved size field.
    ///
    /// Emits the type code and a zero placeholder where the payload size
    /// belongs, recording both the placeholder's offset and the payload start
    /// in the returned handle.
    pub(crate) fn begin_element(&mut self, ty: MatType) -> Result<OpenElement> {
        self.write_u32(ty.code())?;
        let size_pos = self.pos();
        self.write_u32(0)?;

        Ok(OpenElement {
            size_pos,
            payload_start: self.pos(),
        })
    }

    /// Closes an element: backfills its size field with the measured payload.
    ///
    /// The payload length is the distance written since [`begin_element`]
    /// returned, including any internal padding. After patching, the stream
    /// is positioned at the element's end, ready for the next append. Returns
    /// the total element size including its 8-byte tag, which callers add to
    /// their running byte counters.
    ///
    /// [`begin_element`]: MatStream::begin_element
    pub(crate) fn end_element(&mut self, element: OpenElement) -> Result<u32> {
        let payload = (self.pos() - element.payload_start) as u32;
        self.patch_u32(element.size_pos, payload)?;
        Ok(payload + TAG_LEN)
    }

    /// Writes the fixed 16-byte array-flags sub-element.
    ///
    /// Tagged `miUINT32` with size 8: the flags/class word followed by the
    /// nonzero-element count (meaningful for sparse arrays, zero otherwise).
    pub(crate) fn write_array_flags(
        &mut self,
        flags: ArrayFlags,
        class: MatClass,
        nnz: u32,
    ) -> Result<u32> {
        self.write_u32(MatType::Uint32.code())?;
        self.write_u32(8)?;
        self.write_u32(flags.pack(class))?;
        self.write_u32(nnz)?;

        Ok(16)
    }

    /// Writes the fixed 16-byte dimensions sub-element.
    ///
    /// Tagged `miINT32` with size 8, holding the two dimension values of the
    /// (always two-dimensional) arrays this crate emits.
    pub(crate) fn write_array_dim(&mut self, rows: u32, cols: u32) -> Result<u32> {
        self.write_u32(MatType::Int32.code())?;
        self.write_u32(8)?;
        self.write_u32(rows)?;
        self.write_u32(cols)?;

        Ok(16)
    }

    /// Writes the array-name sub-element, compact or regular form.
    ///
    /// Names of four bytes or fewer fit the compact form: a single 4-byte
    /// header holding the type code and length as 16-bit halves, the name
    /// bytes, then padding; total `4 + len + pad`. Longer names take the
    /// regular form with a full 8-byte header; total `8 + len + pad`. The
    /// form is dictated by the container format and chosen purely by the
    /// 4-byte threshold.
    pub(crate) fn write_array_name(&mut self, name: &str) -> Result<u32> {
        let len = name.len() as u32;

        if len <= 4 {
            self.write_u16(MatType::Int8.code() as u16)?;
            self.write_u16(len as u16)?;
            self.write_bytes(name.as_bytes())?;
            let pad = self.pad()? as u32;
            Ok(4 + len + pad)
        } else {
            self.write_u32(MatType::Int8.code())?;
            self.write_u32(len)?;
            self.write_bytes(name.as_bytes())?;
            let pad = self.pad()? as u32;
            Ok(8 + len + pad)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn u16_at(bytes: &[u8], off: usize) -> u16 {
        u16::from_le_bytes(bytes[off..off + 2].try_into().unwrap())
    }

    fn u32_at(bytes: &[u8], off: usize) -> u32 {
        u32::from_le_bytes(bytes[off..off + 4].try_into().unwrap())
    }

    fn read_back(stream: MatStream, path: &Path) -> Vec<u8> {
        drop(stream);
        std::fs::read(path).unwrap()
    }

    #[test]
    fn compact_name_form_at_four_bytes_or_less() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("name.bin");
        let mut stream = MatStream::create(&path).unwrap();

        // "src" needs one pad byte, "fvec" none.
        assert_eq!(stream.write_array_name("src").unwrap(), 8);
        assert_eq!(stream.write_array_name("fvec").unwrap(), 8);
        stream.flush().unwrap();

        let bytes = read_back(stream, &path);
        assert_eq!(u16_at(&bytes, 0), MatType::Int8.code() as u16);
        assert_eq!(u16_at(&bytes, 2), 3);
        assert_eq!(&bytes[4..7], b"src");
        assert_eq!(bytes[7], 0);
        assert_eq!(u16_at(&bytes, 8), MatType::Int8.code() as u16);
        assert_eq!(u16_at(&bytes, 10), 4);
        assert_eq!(&bytes[12..16], b"fvec");
    }

    #[test]
    fn regular_name_form_above_four_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("name.bin");
        let mut stream = MatStream::create(&path).unwrap();

        // 12 name bytes, already a multiple of 8 after the header: pad 4.
        assert_eq!(stream.write_array_name("coefficients").unwrap(), 8 + 12 + 4);
        stream.flush().unwrap();

        let bytes = read_back(stream, &path);
        assert_eq!(u32_at(&bytes, 0), MatType::Int8.code());
        assert_eq!(u32_at(&bytes, 4), 12);
        assert_eq!(&bytes[8..20], b"coefficients");
        assert_eq!(&bytes[20..24], &[0, 0, 0, 0]);
    }

    #[test]
    fn flags_and_dims_are_fixed_sixteen_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subelems.bin");
        let mut stream = MatStream::create(&path).unwrap();

        let n = stream
            .write_array_flags(ArrayFlags::empty(), MatClass::Sparse, 7)
            .unwrap();
        assert_eq!(n, 16);
        let n = stream.write_array_dim(16, 1).unwrap();
        assert_eq!(n, 16);
        stream.flush().unwrap();

        let bytes = read_back(stream, &path);
        assert_eq!(u32_at(&bytes, 0), MatType::Uint32.code());
        assert_eq!(u32_at(&bytes, 4), 8);
        assert_eq!(u32_at(&bytes, 8), MatClass::Sparse.code());
        assert_eq!(u32_at(&bytes, 12), 7);
        assert_eq!(u32_at(&bytes, 16), MatType::Int32.code());
        assert_eq!(u32_at(&bytes, 20), 8);
        assert_eq!(u32_at(&bytes, 24), 16);
        assert_eq!(u32_at(&bytes, 28), 1);
    }

    #[test]
    fn end_element_backfills_the_measured_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("element.bin");
        let mut stream = MatStream::create(&path).unwrap();

        let element = stream.begin_element(MatType::Matrix).unwrap();
        stream.write_bytes(b"0123456789ab").unwrap();
        stream.pad().unwrap();
        let total = stream.end_element(element).unwrap();

        // 12 payload bytes padded to 16 (the tag is 8-aligned already),
        // plus the 8-byte tag.
        assert_eq!(total, 16 + 8);
        assert_eq!(stream.pos(), 24);
        stream.flush().unwrap();

        let bytes = read_back(stream, &path);
        assert_eq!(u32_at(&bytes, 0), MatType::Matrix.code());
        assert_eq!(u32_at(&bytes, 4), 16);
    }
}
