//! Caller argument contract for `take_screenshot`.
//!
//! Exactly five arguments: content type, destination path, quality, width,
//! height. The last three must be numeric; fractional values truncate toward
//! zero the way a host's int32 conversion does.

use std::path::PathBuf;

use deskshot_core::ArgumentError;

pub const TAKE_SCREENSHOT_ARITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotArgs {
    pub content_type: String,
    pub path: PathBuf,
    pub quality: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenshotArgs {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, ArgumentError> {
        if args.len() != TAKE_SCREENSHOT_ARITY {
            return Err(ArgumentError::WrongArity {
                expected: TAKE_SCREENSHOT_ARITY,
                got: args.len(),
            });
        }
        Ok(Self {
            content_type: args[0].as_ref().to_owned(),
            path: PathBuf::from(args[1].as_ref()),
            quality: numeric(args, 2)?,
            width: numeric(args, 3)?,
            height: numeric(args, 4)?,
        })
    }
}

fn numeric<S: AsRef<str>>(args: &[S], index: usize) -> Result<i32, ArgumentError> {
    let raw = args[index].as_ref();
    match raw.trim().parse::<f64>() {
        // `as` saturates at the i32 bounds.
        Ok(n) if n.is_finite() => Ok(n.trunc() as i32),
        _ => Err(ArgumentError::WrongType { index, value: raw.to_owned() }),
    }
}
