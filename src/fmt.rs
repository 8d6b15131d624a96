#![macro_use]
#![allow(unused)]

// Forwards to the defmt macro of the same level, or swallows the arguments
// so that builds without logging keep the same set of used bindings.
#[allow(unused_macros)]
#[collapse_debuginfo(yes)]
macro_rules! radio_log {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt-03")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(not(feature = "defmt-03"))]
            let _ = ($( & $x ),*);
        }
    };
}

/// Per register access.
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        radio_log!(trace, $($arg)*)
    };
}

/// Configuration steps and derived values.
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        radio_log!(debug, $($arg)*)
    };
}

/// Rejected parameters and errata that changed the requested carrier.
#[allow(unused_macros)]
macro_rules! warn {
    ($($arg:tt)*) => {
        radio_log!(warn, $($arg)*)
    };
}
