//! Private macros shared by the eyeball crates.

/// Define a unit error type with a fixed message, taken from its doc attribute.
///
/// ```
/// eyeball_error::static_str_error! {
///     #[doc = "no suitable address found"]
///     pub struct NoSuitableAddressError;
/// }
///
/// assert_eq!(NoSuitableAddressError.to_string(), "no suitable address found");
/// ```
#[macro_export]
macro_rules! static_str_error {
    (
        #[doc = $desc:literal]
        $(#[$m:meta])*
        $vis:vis struct $name:ident;
    ) => {
        #[doc = $desc]
        $(#[$m])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        #[non_exhaustive]
        $vis struct $name;

        impl $name {
            #[doc = concat!("Create a new [`", stringify!($name), "`].")]
            #[must_use]
            $vis const fn new() -> Self {
                Self
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($desc)
            }
        }

        impl ::std::error::Error for $name {}
    };
}
