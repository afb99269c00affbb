pub(crate) mod body;
pub(crate) mod descriptor;
pub(crate) mod parameters;
