mod destination;
mod dump_sink;

pub use destination::{Destination, STDOUT_MARKER};
pub use dump_sink::DumpSink;
