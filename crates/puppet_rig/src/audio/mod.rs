//! Audio level detection driving avatar reactions

mod loudness;

pub use loudness::{rms_db, Loudness, LoudnessMeter};
