pub mod decode;
pub mod encode;
pub mod output;
pub mod timing;
