//! User-facing terminal messages.
//! Colored prefixes only when the destination stream is a TTY, so piped output
//! and scripts see plain `info:` / `ok:` / `warn:` / `error:` prefixes.

use owo_colors::OwoColorize;

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn is_tty(self) -> bool {
        match self {
            Stream::Stdout => atty::is(atty::Stream::Stdout),
            Stream::Stderr => atty::is(atty::Stream::Stderr),
        }
    }
}

fn emit(stream: Stream, prefix: &str, colored: String, msg: &str) {
    let head = if stream.is_tty() { colored } else { prefix.to_string() };
    match stream {
        Stream::Stdout => println!("{head} {msg}"),
        Stream::Stderr => eprintln!("{head} {msg}"),
    }
}

pub fn print_info(msg: &str) {
    emit(Stream::Stdout, "info:", "info:".cyan().bold().to_string(), msg);
}

pub fn print_warn(msg: &str) {
    emit(Stream::Stderr, "warn:", "warn:".yellow().bold().to_string(), msg);
}

pub fn print_error(msg: &str) {
    emit(Stream::Stderr, "error:", "error:".red().bold().to_string(), msg);
}

pub fn print_success(msg: &str) {
    emit(Stream::Stdout, "ok:", "ok:".green().bold().to_string(), msg);
}

/// Plain line with no prefix, for output meant to be consumed by scripts
/// (e.g. a generated name).
pub fn print_user(msg: &str) {
    println!("{msg}");
}
