pub mod consts;
pub mod error;
pub mod frame;
pub mod gradient;
pub mod io;
pub mod pipeline;
pub mod preprocess;
pub mod source;
