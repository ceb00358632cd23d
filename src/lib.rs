//! Retrieval layer for pretrained models and datasets distributed under
//! symbolic `(task, resource)` names: mirror fallback, SHA-256 verification,
//! archive extraction and a plain filesystem cache.

//Modules
mod functions;
mod implementations;
mod retriever;
mod retriever_builder;
mod structures;

pub use crate::retriever::Retriever;
pub use crate::retriever_builder::RetrieverBuilder;
pub use crate::structures::{Error, FetchOptions, Registry, ResourceEntry};
