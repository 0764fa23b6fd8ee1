/// Set by `--debug`; turns on [`print_dbg!`] in release builds.
pub const DEBUG_ENV: &str = "RELNOTIFY_DEBUG";

#[macro_export]
macro_rules! print_dbg {
    ( $( $x:expr ),* ) => {
        $(
            if $crate::is_debug!() {
                dbg!($x);
            }
        )*
    };
}

#[macro_export]
macro_rules! is_debug {
    () => {
        cfg!(debug_assertions) || std::env::var($crate::DEBUG_ENV).ok().is_some()
    };
}
