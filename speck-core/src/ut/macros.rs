// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

/// Forward an argument-free `&self` method to every variant of a
/// single-field enum
#[macro_export]
macro_rules! impl_enum_dispatch {
    ($enum_name:ident, $($variant:ident),*; $fn_name:ident(&self) -> $ret:ty) => {
        impl $enum_name {
            pub fn $fn_name(&self) -> $ret {
                match self {
                    $(Self::$variant(v) => v.$fn_name(),)*
                }
            }
        }
    };
}

/// Evaluate `$body` with `$inner` bound to the payload of whichever variant
/// `$value` holds
///
/// Useful when the body is generic over the payload type and so cannot be
/// written once as a closure.
#[macro_export]
macro_rules! match_variants {
    ($value:expr, $enum_name:ident, $($variant:ident),*; $inner:ident => $body:expr) => {
        match $value {
            $($enum_name::$variant($inner) => $body,)*
        }
    };
}
