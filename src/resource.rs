// ResourceArc wrapper for the streaming tokenizer
//
// Keeps one tokenizer alive across NIF calls. The BEAM may call from any
// scheduler thread, hence the Mutex.

use crate::error::Result;
use crate::strategy::StreamingTokenizer;
use rustler::ResourceArc;
use std::sync::Mutex;

pub struct TokenizerResource {
    pub inner: Mutex<StreamingTokenizer>,
}

#[rustler::resource_impl]
impl rustler::Resource for TokenizerResource {}

impl TokenizerResource {
    pub fn new() -> Self {
        TokenizerResource {
            inner: Mutex::new(StreamingTokenizer::new()),
        }
    }

    pub fn with_config(separator: u8, quote: u8) -> Result<Self> {
        Ok(TokenizerResource {
            inner: Mutex::new(StreamingTokenizer::with_config(separator, quote)?),
        })
    }
}

impl Default for TokenizerResource {
    fn default() -> Self {
        Self::new()
    }
}

pub type TokenizerRef = ResourceArc<TokenizerResource>;
