//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `studyhub_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("studyhub_core ping={}", studyhub_core::ping());
    println!("studyhub_core version={}", studyhub_core::core_version());
}
