//! # Internal Macros
//!
//! ## zerocopy_getters!
//!
//! Generates getter methods for zerocopy struct fields stored as little-endian
//! wrapper types (`U16`, `U32`). Serialized headers are only ever read through
//! these getters; the writer constructs headers whole.
//!
//! ```ignore
//! impl VectorHeader {
//!     zerocopy_getters! {
//!         count: u32,
//!         key_slot: u16,
//!     }
//! }
//! ```

/// Generates getter methods for zerocopy little-endian fields (read-only).
#[macro_export]
macro_rules! zerocopy_getters {
    ($($field:ident : $native_ty:ty),* $(,)?) => {
        $(
            #[inline]
            pub fn $field(&self) -> $native_ty {
                self.$field.get()
            }
        )*
    };
}
