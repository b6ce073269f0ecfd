//! 封装文件格式。

pub mod header;
