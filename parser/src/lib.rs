pub mod api;
pub mod client;
pub mod config;
pub mod grammar;
pub mod items;
pub mod logging;
pub mod replay;
pub mod symbols;
pub mod table;
pub mod view;

mod error;
pub use error::{Result, ViewError};
pub use logging::Logger;

pub use client::{ParseBackend, ParseClient, ProducerReply};
pub use config::ViewerConfig;
pub use grammar::GrammarModel;
pub use view::{ActiveView, Outcome, ViewState};

pub use url;

#[macro_export]
macro_rules! infoln {
    ($s:expr, $($arg:tt)*) => {
        if $s.logger.level_enabled($crate::logging::LEVEL_INFO) {
            use std::fmt::Write;
            writeln!($s.logger, $($arg)*).unwrap();
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($s:expr, $($arg:tt)*) => {
        if $s.logger.level_enabled($crate::logging::LEVEL_WARNING) {
            $s.logger.warn(&format!($($arg)*));
        }
    };
}
