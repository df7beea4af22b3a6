//! Timeframes command implementation.

use barvault_lib::prelude::*;

/// Print every accepted timeframe specifier with its width.
pub(crate) fn list_timeframes() {
    println!("{:<8} {:>8} {:<10}", "SPEC", "MINUTES", "CANONICAL");
    println!("{}", "-".repeat(28));

    for spec in Timeframe::accepted_specs() {
        if let Ok(tf) = Timeframe::resolve(spec) {
            println!("{:<8} {:>8} {:<10}", spec, tf.minutes(), tf.as_str());
        }
    }

    println!("\n'1m' is rejected: use '1min' for one minute.");
}
