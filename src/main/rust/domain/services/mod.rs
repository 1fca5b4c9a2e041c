mod classifier;
mod decoder_registry;
mod decoders;

pub use classifier::Classifier;
pub use decoder_registry::{DecodeFn, DecoderRegistry};
pub use decoders::{decode_alarm, decode_status, PING_MARKER};
