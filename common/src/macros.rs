/// Declares a `u32`-backed index newtype.
///
/// Index types are dense, allocated sequentially from zero and used as
/// positions into side tables, so they convert to `usize` freely.
#[macro_export]
macro_rules! index_type {
    ($name:ident) => {
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Ord,
            PartialOrd,
            Debug,
            Hash,
            Default,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(value: u32) -> $name {
                $name(value)
            }
            pub const fn get(self) -> u32 {
                self.0
            }
            pub fn from_usize(value: usize) -> $name {
                let value = u32::try_from(value)
                    .unwrap_or_else(|_| panic!(concat!(stringify!($name), " overflow: {}"), value));
                $name(value)
            }
            pub const fn as_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> $name {
                $name(value)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
