//! # Canonical Encoding
//!
//! Deterministic byte form of a [`Message`], used as input to every digest and
//! to the signature.
//!
//! ## Layout
//!
//! ```text
//! "vanet.msg.v1"
//! 0x01 | len:u32be | sender_id (utf-8)
//! 0x02 | len:u32be | speed      (f64 bits, big-endian)
//! 0x03 | len:u32be | position.x (f64 bits, big-endian)
//! 0x04 | len:u32be | position.y (f64 bits, big-endian)
//! ```
//!
//! Every field is tagged and length-prefixed, so two structurally different
//! messages never share an encoding. Numbers are encoded by bit pattern rather
//! than by decimal rendering, which keeps the output identical across processes
//! and platforms.

use super::entities::Message;

const DOMAIN_TAG: &[u8] = b"vanet.msg.v1";

const TAG_SENDER_ID: u8 = 0x01;
const TAG_SPEED: u8 = 0x02;
const TAG_POSITION_X: u8 = 0x03;
const TAG_POSITION_Y: u8 = 0x04;

/// Canonical bytes of a message.
pub fn canonicalize(message: &Message) -> Vec<u8> {
    let sender = message.sender_id().as_bytes();
    let position = message.position();

    // tag + length prefix per field
    let mut out = Vec::with_capacity(DOMAIN_TAG.len() + 4 * 5 + sender.len() + 3 * 8);
    out.extend_from_slice(DOMAIN_TAG);
    put_field(&mut out, TAG_SENDER_ID, sender);
    put_field(&mut out, TAG_SPEED, &message.speed().to_bits().to_be_bytes());
    put_field(&mut out, TAG_POSITION_X, &position.x.to_bits().to_be_bytes());
    put_field(&mut out, TAG_POSITION_Y, &position.y.to_bits().to_be_bytes());
    out
}

fn put_field(out: &mut Vec<u8>, tag: u8, bytes: &[u8]) {
    // Sender ids are capped at MAX_SENDER_ID_LEN, numbers are 8 bytes.
    let len = bytes.len() as u32;
    out.push(tag);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(bytes);
}
