//! # Token metadata
//!
//! Builds the on-chain token URI:
//!
//! ```text
//! data:application/json;base64,<base64(json)>
//! ```
//!
//! where `json` is
//!
//! ```json
//! {"name":"UNCHAIN Passport: <name>",
//!  "description":"Immutable and permanent proof of your UNCHAIN project completion.",
//!  "image":"https://ipfs.io/ipfs/<passport_hash>",
//!  "attributes":[{"trait_type":"UNCHAIN Project","value":"<name>"}]}
//! ```
//!
//! The contract is `no_std` without an allocator, so the document is
//! assembled in fixed stack buffers. [`is_valid_field`] bounds the inputs
//! at `init` so the buffers can never overflow and the JSON never needs
//! escaping.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use passport_core::Error;
use soroban_sdk::{panic_with_error, Env, String};

pub const MAX_FIELD_LEN: u32 = 64;

const URI_PREFIX: &[u8] = b"data:application/json;base64,";
const JSON_NAME: &[u8] = b"{\"name\":\"UNCHAIN Passport: ";
const JSON_DESCRIPTION: &[u8] = b"\",\"description\":\"Immutable and permanent proof of your UNCHAIN project completion.\",\"image\":\"https://ipfs.io/ipfs/";
const JSON_ATTRIBUTES: &[u8] = b"\",\"attributes\":[{\"trait_type\":\"UNCHAIN Project\",\"value\":\"";
const JSON_END: &[u8] = b"\"}]}";

const JSON_CAPACITY: usize = 512;
const URI_CAPACITY: usize = 768;

/// Fixed-capacity byte buffer.
struct Buffer<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> Buffer<N> {
    fn new() -> Self {
        Buffer {
            bytes: [0u8; N],
            len: 0,
        }
    }

    fn push(&mut self, data: &[u8]) {
        let end = self.len + data.len();
        self.bytes[self.len..end].copy_from_slice(data);
        self.len = end;
    }

    fn push_string(&mut self, value: &String) {
        let end = self.len + value.len() as usize;
        value.copy_into_slice(&mut self.bytes[self.len..end]);
        self.len = end;
    }

    fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// 1..=64 printable ASCII characters, excluding `"` and `\`.
pub fn is_valid_field(value: &String) -> bool {
    let len = value.len();
    if len == 0 || len > MAX_FIELD_LEN {
        return false;
    }
    let mut buf = [0u8; MAX_FIELD_LEN as usize];
    let bytes = &mut buf[..len as usize];
    value.copy_into_slice(bytes);
    bytes
        .iter()
        .all(|&b| (0x20..=0x7e).contains(&b) && b != b'"' && b != b'\\')
}

pub fn token_uri(env: &Env, name: &String, passport_hash: &String) -> String {
    let mut json = Buffer::<JSON_CAPACITY>::new();
    json.push(JSON_NAME);
    json.push_string(name);
    json.push(JSON_DESCRIPTION);
    json.push_string(passport_hash);
    json.push(JSON_ATTRIBUTES);
    json.push_string(name);
    json.push(JSON_END);

    let mut uri = Buffer::<URI_CAPACITY>::new();
    uri.push(URI_PREFIX);
    let written = STANDARD
        .encode_slice(json.as_slice(), &mut uri.bytes[uri.len..])
        .unwrap_or_else(|_| panic_with_error!(env, Error::InvalidMetadata));
    uri.len += written;

    String::from_bytes(env, uri.as_slice())
}
