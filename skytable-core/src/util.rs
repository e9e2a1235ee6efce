//! This module collects miscellaneous functionality.

pub(crate) mod mask;
pub(crate) use mask::Mask;
