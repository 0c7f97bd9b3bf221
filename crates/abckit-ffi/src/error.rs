//! Last-error register
//!
//! Every entry point records its outcome in a thread-local register: the
//! status of the failure, or `NoError` on success. Failed calls return a
//! sentinel (null, `false` or zero).

use abckit::{KitResult, LiteralTag, Status, Target, TypeId};
use std::cell::Cell;

thread_local! {
    static LAST_ERROR: Cell<Status> = Cell::new(Status::NoError);
}

pub(crate) fn set_last_error(status: Status) {
    LAST_ERROR.with(|cell| cell.set(status));
}

pub(crate) fn last_error() -> Status {
    LAST_ERROR.with(Cell::get)
}

/// Value returned by a failed call
pub(crate) trait Sentinel {
    fn sentinel() -> Self;
}

impl<T> Sentinel for *mut T {
    fn sentinel() -> Self {
        std::ptr::null_mut()
    }
}

impl<T> Sentinel for *const T {
    fn sentinel() -> Self {
        std::ptr::null()
    }
}

macro_rules! zero_sentinel {
    ($($ty:ty => $zero:expr;)*) => {
        $(
            impl Sentinel for $ty {
                fn sentinel() -> Self {
                    $zero
                }
            }
        )*
    };
}

zero_sentinel! {
    () => ();
    bool => false;
    u8 => 0;
    u16 => 0;
    u32 => 0;
    u64 => 0;
    i32 => 0;
    i64 => 0;
    usize => 0;
    f32 => 0.0;
    f64 => 0.0;
    LiteralTag => LiteralTag::Invalid;
    TypeId => TypeId::Invalid;
    Target => Target::Unknown;
}

/// Record the outcome of `operation` and unwrap it
pub(crate) fn finish<T: Sentinel>(operation: &'static str, result: KitResult<T>) -> T {
    match result {
        Ok(value) => {
            set_last_error(Status::NoError);
            value
        }
        Err(err) => {
            tracing::debug!(target: "abckit::ffi", operation, status = %err.status(), %err, "call failed");
            set_last_error(err.status());
            T::sentinel()
        }
    }
}

/// Define C entry points whose bodies return `KitResult`
///
/// The generated function records the outcome in the last-error register
/// and returns the sentinel on failure.
macro_rules! entry {
    ($(
        $(#[$meta:meta])*
        fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> $ret:ty $body:block
    )*) => {
        $(
            $(#[$meta])*
            pub(crate) unsafe extern "C" fn $name($($arg: $ty),*) -> $ret {
                let result = (|| -> abckit::KitResult<$ret> { $body })();
                $crate::error::finish(stringify!($name), result)
            }
        )*
    };
}

pub(crate) use entry;

#[cfg(test)]
mod tests {
    use super::*;
    use abckit::KitError;

    #[test]
    fn test_register_tracks_last_call() {
        let value: *mut u8 = finish("op", Err(KitError::Internal("broken".into())));
        assert!(value.is_null());
        assert_eq!(last_error(), Status::InternalError);

        let value = finish("op", Ok(7u32));
        assert_eq!(value, 7);
        assert_eq!(last_error(), Status::NoError);
    }
}
