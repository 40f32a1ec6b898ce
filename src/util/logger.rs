use std::fmt::{Debug, Display, Formatter};

use crate::util::Code;

use super::Log;
impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Function which return order of the log.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<TL: Display> Log<TL> {
    /// Report a terminal match attempt of a rule at the given position.
    pub fn log_terminal_result(
        &self,
        expected: &str,
        pointer: usize,
        matched: Option<usize>,
        code: &Code,
    ) {
        #[cfg(debug_assertions)]
        match matched {
            Some(width) => {
                if self.order() >= Log::Success(()).order() {
                    println!(
                        "[{}; TerminalSuccess]: {} consumed {} byte(s) at {}",
                        self,
                        expected,
                        width,
                        code.obtain_position(pointer)
                    )
                }
            }
            None => {
                if self.order() >= Log::Result(()).order() {
                    println!(
                        "[{}; TerminalError]: expected {} at {}",
                        self,
                        expected,
                        code.obtain_position(pointer)
                    )
                }
            }
        }
    }

    /// Report a completed derivation of a non-terminal over an input span.
    pub fn log_derivation(&self, rule: &str, start: usize, end: usize, code: &Code) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Success(()).order() {
            println!(
                "[{}; Derivation]: {} spans {} to {}",
                self,
                rule,
                code.obtain_position(start),
                code.obtain_position(end)
            )
        }
    }

    /// Report a scheduled descriptor when verbose debugging is enabled.
    pub fn log_descriptor<D: Debug>(&self, descriptor: &D) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Verbose(()).order() {
            println!("[{}; Descriptor]: {:?}", self, descriptor)
        }
    }
}
