mod decompress;
mod fetch;
mod verify;

pub(crate) use decompress::decompress as decompress;
pub(crate) use fetch::fetch_file as fetch_file;
pub(crate) use verify::file_sha256 as file_sha256;
