//! Exit code constants for the breakdown CLI.
//!
//! - 0: Success
//! - 1: Usage error (parameters, options, configuration)
//! - 2: Input failure (stdin, input/output/schema paths)
//! - 3: Template failure (template lookup, variables, rendering)
//! - 4: Output failure (writing the rendered prompt)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Usage error: bad tokens, malformed options, or invalid configuration.
pub const USAGE_ERROR: i32 = 1;

/// Input failure: stdin timeout or read error, invalid or missing paths.
pub const INPUT_FAILURE: i32 = 2;

/// Template failure: missing template, rejected variables, render errors.
pub const TEMPLATE_FAILURE: i32 = 3;

/// Output failure: the rendered prompt could not be written.
pub const OUTPUT_FAILURE: i32 = 4;
