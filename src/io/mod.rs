// Purpose - audio device boundary and sample format conversion

pub mod converter;
pub mod cpal_sink;
pub mod sink;

pub use cpal_sink::CpalSink;
pub use sink::{PcmSink, SinkError};
