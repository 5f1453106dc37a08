pub(crate) mod forwarding;
pub(crate) mod matrix;
pub(crate) mod node;
pub(crate) mod rounding;
pub(crate) mod scale_type;
pub(crate) mod wrapping;
