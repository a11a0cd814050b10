//! Well-formedness check for group and member identifiers.

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

/// A hashable identifier that can report whether it is well formed.
///
/// String-like identifiers are well formed when non-empty. Integer handles
/// (e.g. from an interner) are always well formed.
pub trait Identifier: Eq + Hash + Debug {
    fn is_well_formed(&self) -> bool;
}

impl Identifier for String {
    #[inline]
    fn is_well_formed(&self) -> bool {
        !self.is_empty()
    }
}

impl Identifier for &str {
    #[inline]
    fn is_well_formed(&self) -> bool {
        !self.is_empty()
    }
}

impl Identifier for Box<str> {
    #[inline]
    fn is_well_formed(&self) -> bool {
        !self.is_empty()
    }
}

impl Identifier for Arc<str> {
    #[inline]
    fn is_well_formed(&self) -> bool {
        !self.is_empty()
    }
}

impl Identifier for Rc<str> {
    #[inline]
    fn is_well_formed(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! always_well_formed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identifier for $ty {
                #[inline]
                fn is_well_formed(&self) -> bool {
                    true
                }
            }
        )*
    };
}

always_well_formed!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_are_rejected() {
        assert!(!String::new().is_well_formed());
        assert!(!"".is_well_formed());
        assert!(!Arc::<str>::from("").is_well_formed());
        assert!(!Box::<str>::from("").is_well_formed());
    }

    #[test]
    fn non_empty_strings_and_handles_are_accepted() {
        assert!("d.com".to_string().is_well_formed());
        assert!(" ".is_well_formed());
        assert!(Rc::<str>::from("x@d.com").is_well_formed());
        assert!(0u32.is_well_formed());
        assert!(u64::MAX.is_well_formed());
    }
}
