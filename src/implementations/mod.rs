mod error;
mod options;
mod registry;
