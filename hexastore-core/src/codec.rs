//! Self-describing binary encoding of a triple.
//!
//! The payload stored under every index key is the full triple, so any
//! single record restores full fidelity on retrieval regardless of which
//! permutation it was read from.
//!
//! ## Wire layout (little-endian)
//!
//! Five fields, each preceded by a `u32` length:
//!
//! ```text
//! s_len:   u32      subject byte length
//! s:       [u8]     subject UTF-8
//! p_len:   u32      predicate byte length
//! p:       [u8]     predicate UTF-8
//! f_len:   u32      always 1
//! is_id:   u8       0 or 1
//! t_len:   u32      always 2
//! tag:     u16      datatype wire code
//! o_len:   u32      object byte length
//! o:       [u8]     object raw UTF-8
//! ```
//!
//! Decoding rejects length overruns, unknown tag codes, id flags other
//! than 0/1, invalid UTF-8, and trailing bytes, all as `CorruptTriple`.

use crate::error::{Error, Result};
use crate::triple::Triple;
use crate::value::{Datatype, TypedValue};

/// Width of every field-length prefix, in bytes
pub const LEN_WIDTH: usize = 4;

/// Serialize a triple to its payload bytes
pub fn encode_triple(triple: &Triple) -> Vec<u8> {
    let s = triple.subject.as_bytes();
    let p = triple.predicate.as_bytes();
    let o = triple.object.raw.as_bytes();

    let mut buf = Vec::with_capacity(5 * LEN_WIDTH + s.len() + p.len() + 3 + o.len());
    put_field(&mut buf, s);
    put_field(&mut buf, p);
    put_field(&mut buf, &[triple.object.is_id as u8]);
    put_field(&mut buf, &triple.object.tag.wire_code().to_le_bytes());
    put_field(&mut buf, o);
    buf
}

/// Deserialize a triple from payload bytes
pub fn decode_triple(buf: &[u8]) -> Result<Triple> {
    let mut pos = 0usize;

    let subject = read_str(buf, &mut pos, "subject")?;
    let predicate = read_str(buf, &mut pos, "predicate")?;

    let flag = read_field(buf, &mut pos, "id flag")?;
    let is_id = match flag {
        [0] => false,
        [1] => true,
        _ => {
            return Err(Error::corrupt(format!(
                "id flag must be one byte of 0 or 1, got {:?}",
                flag
            )))
        }
    };

    let tag_bytes = read_field(buf, &mut pos, "datatype tag")?;
    let tag: [u8; 2] = tag_bytes
        .try_into()
        .map_err(|_| Error::corrupt(format!("datatype tag must be 2 bytes, got {}", tag_bytes.len())))?;
    let tag = Datatype::from_wire_code(u16::from_le_bytes(tag))?;

    let raw = read_str(buf, &mut pos, "object")?;

    if pos != buf.len() {
        return Err(Error::corrupt(format!(
            "{} trailing bytes after object field",
            buf.len() - pos
        )));
    }

    Ok(Triple {
        subject,
        predicate,
        object: TypedValue::typed(raw, tag, is_id),
    })
}

/// Append one length-prefixed field
fn put_field(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
}

/// Read one length-prefixed field, advancing `pos`
fn read_field<'a>(buf: &'a [u8], pos: &mut usize, what: &str) -> Result<&'a [u8]> {
    let len_end = pos
        .checked_add(LEN_WIDTH)
        .filter(|end| *end <= buf.len())
        .ok_or_else(|| Error::corrupt(format!("{} length prefix overruns buffer", what)))?;
    let len = u32::from_le_bytes(buf[*pos..len_end].try_into().unwrap()) as usize;

    let end = len_end
        .checked_add(len)
        .filter(|end| *end <= buf.len())
        .ok_or_else(|| Error::corrupt(format!("{} field of {} bytes overruns buffer", what, len)))?;

    let field = &buf[len_end..end];
    *pos = end;
    Ok(field)
}

/// Read one length-prefixed UTF-8 field
fn read_str(buf: &[u8], pos: &mut usize, what: &str) -> Result<String> {
    let bytes = read_field(buf, pos, what)?;
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| Error::corrupt(format!("{} field is not valid UTF-8", what)))
}
