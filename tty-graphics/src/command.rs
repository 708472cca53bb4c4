// ABOUTME: Graphics command model and wire framing for the kitty graphics protocol
// ABOUTME: Serializes key=value control data and splits base64 payloads into 4096-byte frames

//! A frame on the wire looks like
//!
//! ```text
//! ESC _G a=t,t=t,f=100,i=1,q=2,m=1;<base64 chunk> ESC \
//! ```
//!
//! Only the first frame of a chunked command carries the full control data.
//! Continuation frames repeat just the quiet level and the `m` flag.

use crate::constants::protocol;
use crate::error::{GraphicsError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::num::NonZeroU32;

/// Terminal-side image identifier. Zero means "unassigned" in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(NonZeroU32);

impl ImageId {
    pub fn new(id: u32) -> Result<Self> {
        NonZeroU32::new(id)
            .map(Self)
            .ok_or(GraphicsError::InvalidImageId(u64::from(id)))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How image bytes reach the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    /// Payload is the path of a temporary PNG the terminal reads and deletes
    #[default]
    File,
    /// Payload is the PNG data itself
    Direct,
}

impl Medium {
    fn code(self) -> char {
        match self {
            Medium::File => 't',
            Medium::Direct => 'd',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Transmit,
    Place,
    Delete,
}

impl Action {
    fn code(self) -> char {
        match self {
            Action::Transmit => 't',
            Action::Place => 'p',
            Action::Delete => 'd',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Every visible placement; transmitted image data is kept
    AllPlacements,
    /// Placements of a single image
    Image(ImageId),
}

/// Control keys other than the action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    DeleteTarget,
    Medium,
    Format,
    ImageId,
    Quiet,
}

impl Key {
    pub fn code(self) -> char {
        match self {
            Key::DeleteTarget => 'd',
            Key::Medium => 't',
            Key::Format => 'f',
            Key::ImageId => 'i',
            Key::Quiet => 'q',
        }
    }
}

/// Wire order of control keys, after `a=`
pub const KEY_ORDER: [Key; 5] = [
    Key::DeleteTarget,
    Key::Medium,
    Key::Format,
    Key::ImageId,
    Key::Quiet,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Code(char),
    Number(u32),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Code(c) => write!(f, "{}", c),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One logical protocol operation before framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsCommand {
    action: Action,
    params: BTreeMap<Key, Value>,
    payload: Option<Vec<u8>>,
}

impl GraphicsCommand {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            params: BTreeMap::new(),
            payload: None,
        }
    }

    /// Upload a PNG (inline or by path) under `id` without displaying it
    pub fn transmit(id: ImageId, medium: Medium, payload: Vec<u8>) -> Self {
        Self::new(Action::Transmit)
            .with(Key::Medium, Value::Code(medium.code()))
            .with(Key::Format, Value::Number(protocol::FORMAT_PNG))
            .with(Key::ImageId, Value::Number(id.get()))
            .with_payload(payload)
    }

    /// Display a previously transmitted image at the cursor
    pub fn place(id: ImageId) -> Self {
        Self::new(Action::Place).with(Key::ImageId, Value::Number(id.get()))
    }

    pub fn delete(target: DeleteTarget) -> Self {
        let command = Self::new(Action::Delete);
        match target {
            DeleteTarget::AllPlacements => command.with(Key::DeleteTarget, Value::Code('a')),
            DeleteTarget::Image(id) => command
                .with(Key::DeleteTarget, Value::Code('i'))
                .with(Key::ImageId, Value::Number(id.get())),
        }
    }

    pub fn with(mut self, key: Key, value: Value) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn with_quiet(self, level: u8) -> Self {
        self.with(Key::Quiet, Value::Number(u32::from(level)))
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn param(&self, key: Key) -> Option<Value> {
        self.params.get(&key).copied()
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// `a=<action>` followed by the set keys in `KEY_ORDER`
    pub fn control_data(&self) -> String {
        let mut control = format!("a={}", self.action.code());
        for key in KEY_ORDER {
            if let Some(value) = self.params.get(&key) {
                control.push_str(&format!(",{}={}", key.code(), value));
            }
        }
        control
    }

    /// Control data repeated on continuation frames
    fn continuation_control(&self) -> String {
        match self.params.get(&Key::Quiet) {
            Some(value) => format!("{}={}", Key::Quiet.code(), value),
            None => String::new(),
        }
    }
}

/// One escape-delimited protocol message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    control: String,
    more: Option<bool>,
    chunk: Option<String>,
}

impl Frame {
    pub fn control(&self) -> &str {
        &self.control
    }

    /// `Some(true)` for `m=1`, `Some(false)` for `m=0`, `None` when no payload
    pub fn more_chunks(&self) -> Option<bool> {
        self.more
    }

    pub fn chunk(&self) -> Option<&str> {
        self.chunk.as_deref()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut control = self.control.clone();
        if let Some(more) = self.more {
            if !control.is_empty() {
                control.push(',');
            }
            control.push_str(if more { "m=1" } else { "m=0" });
        }

        let chunk = self.chunk.as_deref().unwrap_or_default();
        let mut bytes = Vec::with_capacity(
            protocol::START.len() + control.len() + 1 + chunk.len() + protocol::END.len(),
        );
        bytes.extend_from_slice(protocol::START);
        bytes.extend_from_slice(control.as_bytes());
        if self.chunk.is_some() {
            bytes.push(b';');
            bytes.extend_from_slice(chunk.as_bytes());
        }
        bytes.extend_from_slice(protocol::END);
        bytes
    }

    /// Emit the frame with a single write so it never interleaves with other output
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(&self.to_bytes())
    }
}

/// Split a command into frames: one per 4096 base64 bytes of payload, or a
/// single frame without an `m` flag when there is no payload.
pub fn serialize_and_chunk(command: &GraphicsCommand) -> Vec<Frame> {
    let control = command.control_data();

    let Some(payload) = command.payload() else {
        return vec![Frame {
            control,
            more: None,
            chunk: None,
        }];
    };

    let encoded = STANDARD.encode(payload);
    if encoded.is_empty() {
        return vec![Frame {
            control,
            more: Some(false),
            chunk: Some(String::new()),
        }];
    }

    let continuation = command.continuation_control();
    let mut frames = Vec::with_capacity(encoded.len().div_ceil(protocol::MAX_CHUNK_LEN));
    let mut start = 0;

    // base64 output is ASCII, so byte offsets are char boundaries
    while start < encoded.len() {
        let end = (start + protocol::MAX_CHUNK_LEN).min(encoded.len());
        frames.push(Frame {
            control: if start == 0 {
                control.clone()
            } else {
                continuation.clone()
            },
            more: Some(end < encoded.len()),
            chunk: Some(encoded[start..end].to_string()),
        });
        start = end;
    }

    frames
}
