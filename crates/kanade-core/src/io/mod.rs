pub mod image_io;
pub mod raw_stream;
pub mod ser;
pub mod ser_writer;
