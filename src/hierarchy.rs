pub(crate) mod builder;
pub(crate) mod config;
pub(crate) mod controller;
pub(crate) mod root;
pub(crate) mod state;
