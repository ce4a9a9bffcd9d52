pub use anyhow::{
    anyhow,
    bail,
};
pub use paste::paste;
pub use regex::RegexBuilder;
pub use thiserror::Error;

pub type EmptyResult = anyhow::Result<()>;

pub const RUSTC_DIR: &str = "/rustc/";
pub const CARGO_REGISTRY_DIR: &str = "/.cargo/registry/";
pub const GLIBC: &str = "glibc";

// This macro creates an enum which derives from thiserror::Error, and also
// creates constructor functions in snake case for each of the enum variants
#[macro_export]
macro_rules! err_impl {
    (@hidden $errtype:ident, $item:ident, String) => {
        paste! {
            pub(crate) fn [<$item:snake>](in_: &str) -> anyhow::Error {
                anyhow!{$errtype::$item(in_.into())}
            }
        }
    };

    (@hidden $errtype:ident, $item:ident, $($dtype:tt)::+) => {
        paste! {
            pub(crate) fn [<$item:snake>](in_: &$($dtype)::+) -> anyhow::Error {
                anyhow!{$errtype::$item(in_.clone())}
            }
        }
    };

    ($errtype:ident,
        $(#[$errinfo:meta] $item:ident($($dtype:tt)::+),)+
    ) => {
        #[derive(Debug, Error)]
        pub(crate) enum $errtype {
            $(#[$errinfo] $item($($dtype)::+)),+
        }

        impl $errtype {
            $(err_impl! {@hidden $errtype, $item, $($dtype)::+})+
        }
    };
}

// Log an anyhow error along with a trimmed-down backtrace.  Tokio and the kube runtime add a few
// dozen frames to every trace, and none of them are interesting, so we drop any frame that points
// into the standard library, the cargo registry, or libc.  Frames that get dropped are replaced
// by a "skipped" marker so it's still obvious that something was elided.
//
// Building the filtered trace isn't cheap; only call this on the failure path.
#[macro_export]
macro_rules! dwerr {
    (@hidden $err:ident, $msg:literal, $($args:expr),*) => {
        let bt = $err.backtrace().to_string();
        let re = RegexBuilder::new(r"^\s+\d+(?s:.*?)(\s+at\s+.*:\d+)$")
            .multi_line(true)
            .build()
            .expect("backtrace regex is valid");
        let mut skipped_frames = 0;
        let mut filtered_bt = re.find_iter(&bt).fold(String::new(), |mut acc, frame| {
            let frame = frame.as_str();
            if frame.contains(RUSTC_DIR) || frame.contains(CARGO_REGISTRY_DIR) || frame.contains(GLIBC) {
                skipped_frames += 1;
            } else if !frame.is_empty() {
                if skipped_frames > 0 {
                    acc += &format!("      -- <skipped {skipped_frames} frame(s)> --\n");
                }
                acc += &format!("{frame}\n");
                skipped_frames = 0;
            }
            acc
        });

        if skipped_frames > 0 {
            filtered_bt += &format!("      -- <skipped {skipped_frames} frame(s)> --");
        }
        error!(concat!($msg, "\n\n{}\n\nPartial Stack Trace:\n\n{}\n\n") $(, $args)*, $err, filtered_bt);
    };

    ($err:ident, $msg:literal) => {
        dwerr! {@hidden $err, $msg, };
    };

    ($err:ident, $msg:literal, $($args:expr),*) => {
        dwerr! {@hidden $err, $msg, $($args),*};
    };
}

pub use {
    dwerr,
    err_impl,
};
