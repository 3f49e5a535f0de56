pub mod closable;

pub use closable::ClosableStream;
