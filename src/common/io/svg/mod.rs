mod draw;
mod writer;

pub(crate) use draw::*;
pub(crate) use writer::*;
