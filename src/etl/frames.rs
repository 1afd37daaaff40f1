use std::marker::PhantomData;

use prost::Message;

use crate::errors::{Error, Result};

/// Iterates the varint length-prefixed messages packed back to back in `buf`.
///
/// Yields an error and then stops at the first varint or body that runs past
/// the end of the buffer, or whose bytes do not decode as `M`.
pub struct Frames<'a, M> {
    buf: &'a [u8],
    position: usize,
    failed: bool,
    _message: PhantomData<M>,
}

impl<'a, M: Message + Default> Frames<'a, M> {
    pub fn new(buf: &'a [u8]) -> Self {
        Frames {
            buf,
            position: 0,
            failed: false,
            _message: PhantomData,
        }
    }

    fn next_frame(&mut self) -> Result<M> {
        let mut rest = &self.buf[self.position..];
        let before = rest.len();
        let length = prost::encoding::decode_varint(&mut rest)
            .map_err(|err| {
                Error::frame_decode(format!("length prefix at offset {}: {}", self.position, err))
            })?;
        self.position += before - rest.len();

        let length = usize::try_from(length)
            .ok()
            .filter(|length| *length <= rest.len())
            .ok_or_else(|| Error::frame_decode(format!(
                "message of {} bytes at offset {} runs past the end of a {} byte buffer",
                length, self.position, self.buf.len()
            )))?;

        let body = &rest[..length];
        let message = M::decode(body)
            .map_err(|err| {
                Error::frame_decode(format!("message at offset {}: {}", self.position, err))
            })?;
        self.position += length;
        Ok(message)
    }
}

impl<M: Message + Default> Iterator for Frames<'_, M> {
    type Item = Result<M>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.buf.len() {
            return None;
        }
        let frame = self.next_frame();
        if frame.is_err() {
            self.failed = true;
        }
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sharedstreets::{SharedStreetsGeometry, SharedStreetsIntersection};
    use crate::errors::ErrorKind;

    fn geometry(id: &str) -> SharedStreetsGeometry {
        SharedStreetsGeometry {
            id: id.to_string(),
            lonlats: vec![-122.0, 37.0, -122.001, 37.001],
            ..Default::default()
        }
    }

    fn layer(ids: &[&str]) -> Vec<u8> {
        ids.iter()
            .flat_map(|id| geometry(id).encode_length_delimited_to_vec())
            .collect()
    }

    #[test]
    fn yields_every_record_in_order() {
        let buf = layer(&["a", "b", "c"]);
        let ids: Vec<String> = Frames::<SharedStreetsGeometry>::new(&buf)
            .map(|frame| frame.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        assert_eq!(Frames::<SharedStreetsGeometry>::new(&[]).count(), 0);
    }

    #[test]
    fn zero_length_frame_is_a_default_record() {
        let buf = [0u8, 0u8];
        let frames: Vec<_> = Frames::<SharedStreetsIntersection>::new(&buf)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], SharedStreetsIntersection::default());
    }

    #[test]
    fn truncated_body_is_an_error() {
        let mut buf = layer(&["a", "b"]);
        buf.pop();
        let frames: Vec<_> = Frames::<SharedStreetsGeometry>::new(&buf).collect();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].is_ok());
        assert_eq!(frames[1].as_ref().unwrap_err().kind, ErrorKind::FrameDecode);
    }

    #[test]
    fn every_truncation_point_fails() {
        let full = layer(&["abcdefghijklmnop", "qrstuvwxyz"]);
        let first_len = geometry("abcdefghijklmnop").encode_length_delimited_to_vec().len();
        for cut in 1..full.len() {
            if cut == first_len {
                continue;
            }
            let result: Result<Vec<SharedStreetsGeometry>> = Frames::new(&full[..cut]).collect();
            assert!(result.is_err(), "cut at {} decoded silently", cut);
        }
    }

    #[test]
    fn truncated_varint_is_an_error() {
        let buf = [0x80u8];
        let result: Result<Vec<SharedStreetsGeometry>> = Frames::new(&buf).collect();
        assert_eq!(result.unwrap_err().kind, ErrorKind::FrameDecode);
    }

    #[test]
    fn undecodable_body_is_an_error_and_stops() {
        // Length 2, then a field key with wire type 7 (invalid).
        let mut buf = vec![2u8, 0x0f, 0x00];
        buf.extend(layer(&["after"]));
        let frames: Vec<_> = Frames::<SharedStreetsGeometry>::new(&buf).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_ref().unwrap_err().kind, ErrorKind::FrameDecode);
    }

    #[test]
    fn restarts_on_a_new_buffer() {
        let first = layer(&["a"]);
        let second = layer(&["b", "c"]);
        assert_eq!(Frames::<SharedStreetsGeometry>::new(&first).count(), 1);
        assert_eq!(Frames::<SharedStreetsGeometry>::new(&second).count(), 2);
    }
}
