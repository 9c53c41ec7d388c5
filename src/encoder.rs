// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::{
    fmt,
    marker::PhantomData,
    str::{
        self,
        FromStr,
    },
};

use serde::{
    de::DeserializeOwned,
    Serialize,
};

use crate::error::DataError;

/// Converts values of type `T` to bytes and back.
///
/// Implementations must round-trip: decoding the output of `encode` yields a
/// value equal to the one that was encoded. Neither method may hold on to the
/// buffer it was given once it returns.
pub trait Encoder<T> {
    /// Encodes `value` into `buf`, replacing whatever `buf` held before.
    /// Passing the same buffer to repeated calls avoids reallocating it.
    fn encode_into(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), DataError>;

    /// Decodes a value from `bytes`.
    fn decode(&self, bytes: &[u8]) -> Result<T, DataError>;

    fn encode(&self, value: &T) -> Result<Vec<u8>, DataError> {
        let mut buf = Vec::new();
        self.encode_into(value, &mut buf)?;
        Ok(buf)
    }
}

/// A key encoder and a value encoder, owned together by one `Map`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EncoderPair<KE, VE> {
    pub key: KE,
    pub value: VE,
}

impl<KE, VE> EncoderPair<KE, VE> {
    pub fn new(key: KE, value: VE) -> EncoderPair<KE, VE> {
        EncoderPair {
            key,
            value,
        }
    }
}

// The codecs below are stateless markers over `T`. Their trait impls are
// written out by hand so they don't pick up a `T: Clone` (etc.) bound.
macro_rules! marker_encoder {
    ($name:ident) => {
        impl<T> $name<T> {
            pub fn new() -> $name<T> {
                $name(PhantomData)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> $name<T> {
                $name::new()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> $name<T> {
                $name::new()
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

/// The default codec: any serde type, in bincode's compact binary form.
pub struct BincodeEncoder<T>(PhantomData<fn() -> T>);

marker_encoder!(BincodeEncoder);

impl<T> Encoder<T> for BincodeEncoder<T>
where
    T: Serialize + DeserializeOwned,
{
    fn encode_into(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), DataError> {
        buf.clear();
        bincode::serialize_into(&mut *buf, value).map_err(DataError::EncodingError)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, DataError> {
        bincode::deserialize(bytes).map_err(DataError::DecodingError)
    }
}

/// Stores text verbatim. Keys encoded this way sort by their raw bytes in
/// ordered drivers, and can be shared with programs that don't speak bincode.
pub struct StrEncoder<T>(PhantomData<fn() -> T>);

marker_encoder!(StrEncoder);

impl<T> Encoder<T> for StrEncoder<T>
where
    T: AsRef<str> + From<String>,
{
    fn encode_into(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), DataError> {
        buf.clear();
        buf.extend_from_slice(value.as_ref().as_bytes());
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, DataError> {
        let s = str::from_utf8(bytes)?;
        Ok(T::from(s.to_owned()))
    }
}

/// Stores byte strings verbatim.
pub struct BytesEncoder<T>(PhantomData<fn() -> T>);

marker_encoder!(BytesEncoder);

impl<T> Encoder<T> for BytesEncoder<T>
where
    T: AsRef<[u8]> + From<Vec<u8>>,
{
    fn encode_into(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), DataError> {
        buf.clear();
        buf.extend_from_slice(value.as_ref());
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, DataError> {
        Ok(T::from(bytes.to_vec()))
    }
}

/// Stores a value as its `Display` text and parses it back with `FromStr`.
/// The two must agree for the value to round-trip.
pub struct DisplayEncoder<T>(PhantomData<fn() -> T>);

marker_encoder!(DisplayEncoder);

impl<T> Encoder<T> for DisplayEncoder<T>
where
    T: fmt::Display + FromStr,
    T::Err: fmt::Display,
{
    fn encode_into(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), DataError> {
        use std::fmt::Write;

        let mut text = String::new();
        write!(text, "{}", value).map_err(DataError::FormatError)?;
        buf.clear();
        buf.extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, DataError> {
        let s = str::from_utf8(bytes)?;
        s.parse().map_err(|e: T::Err| DataError::ParseError {
            value: s.to_owned(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use serde_derive::{
        Deserialize,
        Serialize,
    };

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Nested {
        name: String,
        tags: Vec<String>,
        inner: Option<Box<Nested>>,
    }

    #[test]
    fn test_bincode_round_trip() {
        let enc = BincodeEncoder::<Nested>::new();
        let v = Nested {
            name: "outer".into(),
            tags: vec!["a".into(), "b".into()],
            inner: Some(Box::new(Nested {
                name: "inner".into(),
                tags: vec![],
                inner: None,
            })),
        };
        let bytes = enc.encode(&v).expect("encoded");
        assert_eq!(enc.decode(&bytes).expect("decoded"), v);
    }

    #[test]
    fn test_bincode_decode_garbage() {
        let enc = BincodeEncoder::<String>::new();
        match enc.decode(&[0xff, 0xff]) {
            Err(DataError::DecodingError(_)) => {},
            other => panic!("expected a decoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_buffer_is_replaced() {
        let enc = StrEncoder::<String>::new();
        let mut buf = b"left over from before".to_vec();
        enc.encode_into(&"key".to_string(), &mut buf).expect("encoded");
        assert_eq!(buf, b"key");

        let enc = BincodeEncoder::<u32>::new();
        enc.encode_into(&7, &mut buf).expect("encoded");
        assert_eq!(enc.decode(&buf).expect("decoded"), 7);
    }

    #[test]
    fn test_str_encoder_is_identity() {
        let enc = StrEncoder::<String>::new();
        assert_eq!(enc.encode(&"héllo".to_string()).expect("encoded"), "héllo".as_bytes());
        assert_eq!(enc.decode("héllo".as_bytes()).expect("decoded"), "héllo");
        match enc.decode(&[0xc3, 0x28]) {
            Err(DataError::InvalidUtf8(_)) => {},
            other => panic!("expected invalid utf-8, got {:?}", other),
        }
    }

    #[test]
    fn test_bytes_encoder_is_identity() {
        let enc = BytesEncoder::<Vec<u8>>::new();
        let raw = vec![0u8, 1, 2, 255];
        assert_eq!(enc.encode(&raw).expect("encoded"), raw);
        assert_eq!(enc.decode(&raw).expect("decoded"), raw);
    }

    /// A `Display` impl that always fails.
    #[derive(Debug)]
    struct Unprintable;

    impl fmt::Display for Unprintable {
        fn fmt(&self, _: &mut fmt::Formatter) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    impl FromStr for Unprintable {
        type Err = fmt::Error;

        fn from_str(_: &str) -> Result<Unprintable, fmt::Error> {
            Ok(Unprintable)
        }
    }

    #[test]
    fn test_display_encoder_format_failure() {
        let enc = DisplayEncoder::<Unprintable>::new();
        let mut buf = b"untouched".to_vec();
        match enc.encode_into(&Unprintable, &mut buf) {
            Err(DataError::FormatError(_)) => {},
            other => panic!("expected a format error, got {:?}", other),
        }
        assert_eq!(buf, b"untouched");
    }

    #[test]
    fn test_display_encoder() {
        let enc = DisplayEncoder::<Ipv4Addr>::new();
        let addr = Ipv4Addr::new(10, 0, 0, 1);
        assert_eq!(enc.encode(&addr).expect("encoded"), b"10.0.0.1");
        assert_eq!(enc.decode(b"10.0.0.1").expect("decoded"), addr);

        match enc.decode(b"10.0.0") {
            Err(DataError::ParseError {
                value,
                ..
            }) => assert_eq!(value, "10.0.0"),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
