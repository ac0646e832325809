use num_traits::{One, PrimInt};

/// Trait implemented by flag enums stored in a [`BitmaskFlags`].
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index.
/// The backing integer type is chosen through the associated `Storage`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A set of boolean flags packed into one integer.
///
/// Used for held-key state: one bit per key, set on key-down and cleared on key-up.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    pub fn set<U: FlagBitmask<Storage = T>>(&mut self, tag: U, on: bool) {
        if on {
            self.add(tag);
        } else {
            self.remove(tag);
        }
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    pub fn has_any<U: FlagBitmask<Storage = T> + Copy>(&self, tags: &[U]) -> bool {
        if tags.is_empty() {
            return false;
        }
        let combined = tags.iter().fold(T::zero(), |acc, t| acc | t.mask());
        (self.bits & combined) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// Example:
/// ```rust
/// kcc_shared::define_bitmask_flags!(Button, u8, {
///     Primary,
///     Secondary,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}
