use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = durable_write::cli::parse();
    app::run(args)
}
