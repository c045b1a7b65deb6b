pub(crate) mod combinations;
pub(crate) mod kinds;
