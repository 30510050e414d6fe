//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[expect(clippy::print_stderr, reason = "errors are reported on stderr")]
fn main() {
    if let Err(err) = carmatch_cli::run() {
        eprintln!("carmatch: {err}");
        std::process::exit(1);
    }
}
