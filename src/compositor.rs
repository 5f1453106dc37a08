pub(crate) mod fade;
pub(crate) mod layered;
pub(crate) mod parent;
