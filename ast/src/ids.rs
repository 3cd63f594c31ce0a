//! Typed `u32` handles
//!
//! Handles index arenas (symbols, scopes) instead of holding references into
//! them, so annotated trees stay plain owned data.

/// Define a `u32` newtype handle with arena-index helpers.
#[macro_export]
macro_rules! define_id_type {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn as_raw(self) -> u32 {
                self.0
            }

            /// Handle for the `index`-th slot of an arena
            pub fn from_index(index: usize) -> Self {
                Self(::std::convert::TryFrom::try_from(index).unwrap_or(u32::MAX))
            }

            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id_type! {
    /// Handle of a symbol in the analyzer's symbol arena
    #[derive(serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    SymbolId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        let id = SymbolId::from_index(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.as_raw(), 42);
        assert_eq!(id.to_string(), "SymbolId(42)");
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&SymbolId::from_raw(7)).unwrap();
        assert_eq!(json, "7");
    }
}
