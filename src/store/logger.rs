use std::sync::LazyLock;

use crate::logger::Logger;
use crate::store::constants::LOGGER_NAME;

pub static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new(LOGGER_NAME));
