// Shared builders
mod helpers;

// Value model and environment
mod environment;

mod limits;
