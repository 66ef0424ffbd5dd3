//! Range types for the arena's side tables.

/// Define `(start, len)` range types indexing one side table each.
///
/// Each generated type has `start: u32` and `len: u16` fields, an `EMPTY`
/// constant, `new()`, `is_empty()`, `len()`, and a `Debug` impl printing
/// `TypeName(start..end)`.
macro_rules! define_range {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => { $(
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u16,
        }

        impl $name {
            pub const EMPTY: Self = Self { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u16) -> Self {
                Self { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(
                    f,
                    "{}({}..{})",
                    stringify!($name),
                    self.start,
                    u64::from(self.start) + u64::from(self.len)
                )
            }
        }
    )* };
}

define_range!(
    /// Function parameter names.
    ParamRange,
    /// Object literal (or object pattern) entries.
    ObjectEntryRange,
    /// `if` match branches.
    BranchRange,
);
